use thiserror::Error;

/// Errors returned by embedding store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("vecstore: dimension mismatch: got {got}, want {want}")]
    DimensionMismatch { got: usize, want: usize },

    #[error("vecstore: backend: {0}")]
    Backend(String),
}
