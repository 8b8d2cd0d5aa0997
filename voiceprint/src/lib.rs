//! Speaker embeddings from conditioned waveforms.
//!
//! # Architecture
//!
//! 1. [`EmbeddingModel::extract`]: conditioned waveform -> [`Embedding`]
//! 2. Any model satisfying the trait contract can back the
//!    verification engine: deterministic for identical input, fixed
//!    output dimension, cosine-comparable (same-speaker embeddings
//!    score higher than different-speaker embeddings).
//!
//! # Built-in model
//!
//! [`FbankEmbedder`] is a self-contained reference model: log mel
//! filterbank features (Povey window, pre-emphasis, Cooley-Tukey FFT,
//! triangular mel filters) pooled over time into a fixed-dimension
//! vector. It needs no inference engine and is fully deterministic,
//! which makes it the default for tests and offline tooling. A neural
//! speaker encoder can be dropped in behind the same trait.

mod embedding;
mod error;
pub mod fbank;
mod fbank_model;
mod model;

pub use embedding::Embedding;
pub use error::ExtractError;
pub use fbank::{cmvn, compute_fbank, l2_normalize, FbankConfig};
pub use fbank_model::{FbankEmbedder, FbankEmbedderConfig};
pub use model::EmbeddingModel;
