//! The preprocessing pipeline: raw capture to canonical waveform.

use std::time::Duration;

use crate::denoise::{spectral_subtract, DenoiseConfig};
use crate::resample::resample;
use crate::sample::{PreprocessedWaveform, RawAudioSample};
use crate::vad::{speech_bounds, VadConfig};
use crate::AudioError;

/// Controls the preprocessing pipeline.
///
/// Enrollment and verification must share one configuration: the
/// target duration fixes the embedding input length, and mismatched
/// lengths break embedding comparability.
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Canonical output sample rate in Hz (default: 16000).
    pub target_sample_rate: u32,
    /// Fixed output duration; shorter signals are zero-padded, longer
    /// ones truncated (default: 1s).
    pub target_duration: Duration,
    /// Apply spectral-subtraction noise reduction (default: true).
    pub denoise: bool,
    /// Noise reduction parameters.
    pub denoise_cfg: DenoiseConfig,
    /// Voice-activity trimming parameters.
    pub vad: VadConfig,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16000,
            target_duration: Duration::from_secs(1),
            denoise: true,
            denoise_cfg: DenoiseConfig::default(),
            vad: VadConfig::default(),
        }
    }
}

impl PreprocessConfig {
    /// Output length in samples.
    pub fn target_len(&self) -> usize {
        (self.target_sample_rate as f64 * self.target_duration.as_secs_f64()) as usize
    }
}

/// Runs the deterministic conditioning pipeline.
///
/// Stage order matters; each stage feeds the next:
/// loudness normalization, channel collapse, resampling, noise
/// reduction, voice-activity trimming, peak normalization,
/// fixed-length framing. See the crate docs for the contract of each
/// stage.
pub struct Preprocessor {
    cfg: PreprocessConfig,
}

impl Preprocessor {
    pub fn new(cfg: PreprocessConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.cfg
    }

    /// Conditions a raw capture into a canonical waveform.
    ///
    /// Fails with [`AudioError::UnsupportedFormat`] when the sample's
    /// metadata cannot describe its buffer, and with
    /// [`AudioError::EmptySignal`] when the input is silent or
    /// voice-activity trimming leaves nothing.
    pub fn preprocess(&self, raw: &RawAudioSample) -> Result<PreprocessedWaveform, AudioError> {
        let interleaved = raw.decode()?;
        if interleaved.is_empty() {
            return Err(AudioError::EmptySignal);
        }

        // 1. Loudness normalization: scale the measured RMS level to
        // full scale. A zero level means silence.
        let mut samples = loudness_normalize(interleaved)?;

        // 2. Channel collapse: average interleaved channels to mono.
        if raw.channels > 1 {
            samples = downmix(&samples, raw.channels as usize);
        }

        // 3. Resample to the canonical rate.
        if raw.sample_rate != self.cfg.target_sample_rate {
            samples = resample(&samples, raw.sample_rate, self.cfg.target_sample_rate)?;
        }

        // 4. Noise reduction, the signal as its own noise reference.
        if self.cfg.denoise {
            samples = spectral_subtract(&samples, &self.cfg.denoise_cfg);
        }

        // 5. Voice-activity trimming. An empty result is a failure,
        // never a silent waveform.
        let bounds = speech_bounds(&samples, &self.cfg.vad).ok_or(AudioError::EmptySignal)?;
        samples.truncate(bounds.end);
        samples.drain(..bounds.start);
        if samples.is_empty() {
            return Err(AudioError::EmptySignal);
        }

        // 6. Peak normalization to [-1, 1].
        let peak = samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        if peak <= 0.0 {
            return Err(AudioError::EmptySignal);
        }
        let scale = 1.0 / peak;
        for s in &mut samples {
            *s *= scale;
        }

        // 7. Fixed-length framing: right-pad with zeros or truncate.
        let target = self.cfg.target_len();
        samples.resize(target, 0.0);

        Ok(PreprocessedWaveform::new(
            samples,
            self.cfg.target_sample_rate,
        ))
    }
}

/// Scales the signal so its RMS level sits at full scale (0 dBFS),
/// the f32 equivalent of shifting by the negative measured dBFS.
/// Peak normalization later brings the amplitude back into [-1, 1].
fn loudness_normalize(mut samples: Vec<f32>) -> Result<Vec<f32>, AudioError> {
    let energy: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    let rms = (energy / samples.len() as f64).sqrt();
    if rms <= 0.0 {
        return Err(AudioError::EmptySignal);
    }
    let gain = (1.0 / rms) as f32;
    for s in &mut samples {
        *s *= gain;
    }
    Ok(samples)
}

/// Averages interleaved multi-channel samples into mono.
fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    let frames = samples.len() / channels;
    let mut out = Vec::with_capacity(frames);
    for f in 0..frames {
        let sum: f32 = samples[f * channels..(f + 1) * channels].iter().sum();
        out.push(sum / channels as f32);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn tone(freq: f32, rate: u32, len: usize, amp: f32) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / rate as f32).sin() * amp)
            .collect()
    }

    fn preprocessor() -> Preprocessor {
        Preprocessor::new(PreprocessConfig::default())
    }

    #[test]
    fn valid_input_yields_target_length() {
        let raw = RawAudioSample::from_f32(&tone(300.0, 16000, 20000, 0.5), 16000, 1);
        let wave = preprocessor().preprocess(&raw).unwrap();
        assert_eq!(wave.len(), 16000);
        assert_eq!(wave.sample_rate(), 16000);
    }

    #[test]
    fn short_input_is_padded() {
        // 0.6s of tone; after trimming it must come back padded to 1s.
        let raw = RawAudioSample::from_f32(&tone(300.0, 16000, 9600, 0.5), 16000, 1);
        let wave = preprocessor().preprocess(&raw).unwrap();
        assert_eq!(wave.len(), 16000);
        // The pad region is zeros.
        assert!(wave.samples()[15900..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn silence_fails_empty_signal() {
        let raw = RawAudioSample::new(vec![0u8; 32000], 16000, 1);
        assert!(matches!(
            preprocessor().preprocess(&raw),
            Err(AudioError::EmptySignal)
        ));
    }

    #[test]
    fn too_short_for_vad_fails_empty_signal() {
        // 10ms of tone is shorter than one VAD frame.
        let raw = RawAudioSample::from_f32(&tone(300.0, 16000, 160, 0.5), 16000, 1);
        assert!(matches!(
            preprocessor().preprocess(&raw),
            Err(AudioError::EmptySignal)
        ));
    }

    #[test]
    fn bad_metadata_fails_unsupported_format() {
        let raw = RawAudioSample::new(vec![0u8; 32000], 16000, 0);
        assert!(matches!(
            preprocessor().preprocess(&raw),
            Err(AudioError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn stereo_is_downmixed() {
        // Identical tone in both channels.
        let mono = tone(300.0, 16000, 20000, 0.5);
        let mut stereo = Vec::with_capacity(mono.len() * 2);
        for &s in &mono {
            stereo.push(s);
            stereo.push(s);
        }
        let raw = RawAudioSample::from_f32(&stereo, 16000, 2);
        let wave = preprocessor().preprocess(&raw).unwrap();
        assert_eq!(wave.len(), 16000);
    }

    #[test]
    fn resamples_to_canonical_rate() {
        let raw = RawAudioSample::from_f32(&tone(300.0, 48000, 60000, 0.5), 48000, 1);
        let wave = preprocessor().preprocess(&raw).unwrap();
        assert_eq!(wave.sample_rate(), 16000);
        assert_eq!(wave.len(), 16000);
    }

    #[test]
    fn peak_is_normalized() {
        // Very quiet input still comes out with a unity peak.
        let raw = RawAudioSample::from_f32(&tone(300.0, 16000, 20000, 0.01), 16000, 1);
        let wave = preprocessor().preprocess(&raw).unwrap();
        let peak = wave.samples().iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        assert!((peak - 1.0).abs() < 1e-3, "peak {peak}");
    }

    #[test]
    fn leading_silence_is_trimmed() {
        let mut signal = vec![0.0f32; 8000];
        signal.extend(tone(300.0, 16000, 12000, 0.5));
        let raw = RawAudioSample::from_f32(&signal, 16000, 1);
        let wave = preprocessor().preprocess(&raw).unwrap();
        // The tone starts near the beginning of the output.
        let early_peak = wave.samples()[..800]
            .iter()
            .fold(0.0f32, |m, &s| m.max(s.abs()));
        assert!(early_peak > 0.3, "speech should start early, peak {early_peak}");
    }

    #[test]
    fn downmix_averages() {
        let out = downmix(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2);
        assert_eq!(out, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn deterministic() {
        let raw = RawAudioSample::from_f32(&tone(300.0, 16000, 20000, 0.5), 16000, 1);
        let p = preprocessor();
        let a = p.preprocess(&raw).unwrap();
        let b = p.preprocess(&raw).unwrap();
        assert_eq!(a.samples(), b.samples());
    }
}
