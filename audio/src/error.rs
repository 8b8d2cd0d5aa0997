use thiserror::Error;

/// Errors returned by audio preprocessing.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio: unsupported format: {reason}")]
    UnsupportedFormat { reason: String },

    #[error("audio: signal is empty after conditioning")]
    EmptySignal,

    #[error("audio: resample: {0}")]
    Resample(String),
}

impl From<rubato::ResamplerConstructionError> for AudioError {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        AudioError::Resample(e.to_string())
    }
}

impl From<rubato::ResampleError> for AudioError {
    fn from(e: rubato::ResampleError) -> Self {
        AudioError::Resample(e.to_string())
    }
}
