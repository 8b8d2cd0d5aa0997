use std::fmt;

use crate::ExtractError;

/// A fixed-dimension speaker embedding.
///
/// Invariant, enforced at construction: every component is finite and
/// the vector has non-zero norm. The dimension is fixed by the model
/// that produced it and must stay constant across the system.
#[derive(Clone, PartialEq)]
pub struct Embedding {
    values: Vec<f32>,
}

impl Embedding {
    /// Wraps a raw vector, rejecting non-finite or all-zero values.
    pub fn new(values: Vec<f32>) -> Result<Self, ExtractError> {
        if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
            return Err(ExtractError::NonFinite);
        }
        if values.iter().all(|&v| v == 0.0) {
            return Err(ExtractError::NonFinite);
        }
        Ok(Self { values })
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.values
    }
}

impl fmt::Debug for Embedding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Embedding")
            .field("dim", &self.values.len())
            .finish()
    }
}

impl AsRef<[f32]> for Embedding {
    fn as_ref(&self) -> &[f32] {
        &self.values
    }
}
