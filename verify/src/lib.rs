//! Voice verification engine.
//!
//! Orchestrates the pipeline for a single attempt:
//!
//! ```text
//! RawAudioSample -> preprocess -> extract -> query -> decide
//! ```
//!
//! Enrollment stores the resulting embedding as the user's reference
//! record. Verification compares a fresh sample's embedding against
//! the enrolled population and applies a three-way decision rule:
//! the claimed user must be enrolled, the top-ranked match must carry
//! the claimed identity, and its cosine score must clear the
//! configured threshold. Identity alone is insufficient (a
//! low-confidence coincidental top rank must not authorize), and
//! score alone is insufficient (a confident match to the wrong
//! identity must not authorize either).
//!
//! Pipeline faults (preprocessing, extraction, store) surface as
//! [`VerifyError`] and are never downgraded to rejections: a fault
//! and a genuine mismatch call for different remediation. Rejections
//! ([`RejectReason`]) always fail closed.
//!
//! Each attempt owns its state end to end; independent attempts can
//! run concurrently against a shared [`Verifier`].

mod config;
mod error;
mod outcome;
mod phase;
mod verifier;

pub use config::VerifyConfig;
pub use error::VerifyError;
pub use outcome::{MatchOutcome, RejectReason};
pub use phase::Phase;
pub use verifier::Verifier;
