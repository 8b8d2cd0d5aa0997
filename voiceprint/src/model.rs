use voicegate_audio::PreprocessedWaveform;

use crate::{Embedding, ExtractError};

/// Extracts speaker embedding vectors from conditioned waveforms.
///
/// The input has already been normalized by the preprocessor: mono f32
/// at the canonical sample rate, fixed target length. The output is a
/// dense vector whose dimensionality is returned by
/// [`EmbeddingModel::dimension`].
///
/// # Contract
///
/// - Deterministic: identical input yields identical output.
/// - Fixed dimension for the lifetime of the model.
/// - Cosine-comparable: embeddings of the same speaker score higher
///   cosine similarity than embeddings of different speakers. The
///   verification decision rule depends on this property.
///
/// # Thread Safety
///
/// Implementations must be safe for concurrent use.
pub trait EmbeddingModel: Send + Sync {
    /// Computes a speaker embedding from a conditioned waveform.
    fn extract(&self, waveform: &PreprocessedWaveform) -> Result<Embedding, ExtractError>;

    /// Returns the dimensionality of the embedding vectors (e.g., 192).
    fn dimension(&self) -> usize;
}
