use thiserror::Error;

/// Errors returned by embedding extraction.
///
/// An extraction fault means the attempt cannot proceed; it is never
/// substituted with a zero vector or treated as a non-match.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("voiceprint: waveform too short: need at least {min_samples} samples, got {got_samples}")]
    TooShort {
        min_samples: usize,
        got_samples: usize,
    },

    #[error("voiceprint: embedding is not finite or has zero norm")]
    NonFinite,

    #[error("voiceprint: model error: {0}")]
    Model(String),
}
