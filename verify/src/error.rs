use thiserror::Error;
use voicegate_audio::AudioError;
use voicegate_vecstore::StoreError;
use voicegate_voiceprint::ExtractError;

/// Faults that abort an enrollment or verification attempt.
///
/// These are distinct from verification rejections
/// ([`crate::RejectReason`]): a fault means the attempt could not be
/// evaluated at all and may be retried, while a rejection is a
/// completed evaluation that denied the claim.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("verify: preprocess: {0}")]
    Preprocess(#[from] AudioError),

    #[error("verify: extract: {0}")]
    Extract(#[from] ExtractError),

    #[error("verify: store: {0}")]
    Store(#[from] StoreError),
}
