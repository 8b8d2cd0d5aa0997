//! [`EmbeddingModel`] implementation built on pooled fbank statistics.

use voicegate_audio::PreprocessedWaveform;

use crate::embedding::Embedding;
use crate::error::ExtractError;
use crate::fbank::{compute_fbank, l2_normalize, FbankConfig};
use crate::model::EmbeddingModel;

/// Configuration for [`FbankEmbedder`].
#[derive(Debug, Clone, Default)]
pub struct FbankEmbedderConfig {
    /// Filterbank configuration. The embedding dimension is
    /// `2 * num_mels` (default: 192).
    pub fbank: FbankConfig,
}

/// Deterministic speaker embedder over log mel filterbank statistics.
///
/// # Pipeline
///
/// 1. Conditioned waveform -> [`compute_fbank`] -> `[frames][mels]`
/// 2. Temporal pooling: per-mel mean and standard deviation
/// 3. Mean-centering of the pooled vector
/// 4. L2 normalization
///
/// Mean-centering removes the constant log-energy floor shared by all
/// inputs, so cosine similarity between embeddings reflects spectral
/// shape rather than the common baseline.
///
/// The embedder is stateless after construction and safe for
/// concurrent use.
pub struct FbankEmbedder {
    cfg: FbankEmbedderConfig,
}

impl FbankEmbedder {
    pub fn new(cfg: FbankEmbedderConfig) -> Self {
        Self { cfg }
    }
}

impl Default for FbankEmbedder {
    fn default() -> Self {
        Self::new(FbankEmbedderConfig::default())
    }
}

impl EmbeddingModel for FbankEmbedder {
    fn extract(&self, waveform: &PreprocessedWaveform) -> Result<Embedding, ExtractError> {
        let fbank_cfg = &self.cfg.fbank;
        if waveform.sample_rate() as usize != fbank_cfg.sample_rate {
            return Err(ExtractError::Model(format!(
                "waveform rate {} does not match model rate {}",
                waveform.sample_rate(),
                fbank_cfg.sample_rate
            )));
        }

        let features =
            compute_fbank(waveform.samples(), fbank_cfg).ok_or(ExtractError::TooShort {
                min_samples: fbank_cfg.frame_length,
                got_samples: waveform.len(),
            })?;

        let num_mels = fbank_cfg.num_mels;
        let t = features.len() as f64;

        // Mean and standard deviation per mel bin, pooled over time.
        let mut pooled = vec![0.0f32; 2 * num_mels];
        for m in 0..num_mels {
            let mut sum: f64 = 0.0;
            for frame in &features {
                sum += frame[m] as f64;
            }
            let mean = sum / t;

            let mut var_sum: f64 = 0.0;
            for frame in &features {
                let d = frame[m] as f64 - mean;
                var_sum += d * d;
            }
            pooled[m] = mean as f32;
            pooled[num_mels + m] = (var_sum / t).sqrt() as f32;
        }

        // Center, then project to the unit sphere.
        let center: f32 = pooled.iter().sum::<f32>() / pooled.len() as f32;
        for v in &mut pooled {
            *v -= center;
        }
        l2_normalize(&mut pooled);

        Embedding::new(pooled)
    }

    fn dimension(&self) -> usize {
        2 * self.cfg.fbank.num_mels
    }
}
