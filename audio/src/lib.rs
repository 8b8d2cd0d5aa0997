//! Deterministic audio conditioning for voice verification.
//!
//! Turns a captured [`RawAudioSample`] (PCM16, any rate, any channel
//! count) into a [`PreprocessedWaveform`]: mono f32 at the canonical
//! sample rate, amplitude-normalized, speech-trimmed, and padded or
//! truncated to a fixed target length so embeddings stay comparable
//! between enrollment and verification.
//!
//! Pipeline stages, in order (see [`Preprocessor::preprocess`]):
//!
//! 1. Loudness normalization to a reference RMS level
//! 2. Channel collapse (average to mono)
//! 3. Resampling to the canonical rate (rubato FFT resampler)
//! 4. Spectral-subtraction noise reduction
//! 5. Voice-activity trimming
//! 6. Peak normalization
//! 7. Fixed-length framing (zero pad / truncate)
//!
//! Silence anywhere it would produce an empty or all-zero buffer is
//! an [`AudioError::EmptySignal`] failure, never a silent waveform.

mod denoise;
mod error;
mod preprocess;
mod resample;
mod sample;
mod vad;

pub use denoise::{spectral_subtract, DenoiseConfig};
pub use error::AudioError;
pub use preprocess::{PreprocessConfig, Preprocessor};
pub use resample::resample;
pub use sample::{PreprocessedWaveform, RawAudioSample};
pub use vad::{speech_bounds, VadConfig};
