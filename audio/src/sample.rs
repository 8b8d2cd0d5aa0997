use std::time::Duration;

use crate::AudioError;

/// A captured voice sample as handed over by the capture collaborator.
///
/// Audio is PCM16 signed little-endian, interleaved when multi-channel.
/// The sample is immutable once captured; the preprocessor reads it and
/// produces a fresh [`PreprocessedWaveform`].
#[derive(Debug, Clone)]
pub struct RawAudioSample {
    /// Interleaved PCM16LE bytes.
    pub pcm: Vec<u8>,
    /// Capture sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count (1 = mono, 2 = stereo, ...).
    pub channels: u16,
}

impl RawAudioSample {
    pub fn new(pcm: Vec<u8>, sample_rate: u32, channels: u16) -> Self {
        Self {
            pcm,
            sample_rate,
            channels,
        }
    }

    /// Builds a sample from f32 frames in [-1, 1], one `Vec` per channel
    /// position interleaved. Mostly useful in tests and tools.
    pub fn from_f32(samples: &[f32], sample_rate: u32, channels: u16) -> Self {
        let mut pcm = Vec::with_capacity(samples.len() * 2);
        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            pcm.extend_from_slice(&v.to_le_bytes());
        }
        Self::new(pcm, sample_rate, channels)
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.pcm.len() / 2 / self.channels as usize
    }

    /// Capture duration implied by the buffer length.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    /// Decodes the PCM buffer into per-frame f32 values in [-1, 1],
    /// still interleaved. Fails when the metadata cannot describe the
    /// buffer: zero rate, zero channels, or truncated frames.
    pub fn decode(&self) -> Result<Vec<f32>, AudioError> {
        if self.sample_rate == 0 {
            return Err(AudioError::UnsupportedFormat {
                reason: "sample rate is 0".into(),
            });
        }
        if self.channels == 0 {
            return Err(AudioError::UnsupportedFormat {
                reason: "channel count is 0".into(),
            });
        }
        if self.pcm.len() % 2 != 0 {
            return Err(AudioError::UnsupportedFormat {
                reason: format!("odd PCM16 byte length: {}", self.pcm.len()),
            });
        }
        let n_samples = self.pcm.len() / 2;
        if n_samples % self.channels as usize != 0 {
            return Err(AudioError::UnsupportedFormat {
                reason: format!(
                    "{} samples do not divide into {} channels",
                    n_samples, self.channels
                ),
            });
        }

        let mut out = Vec::with_capacity(n_samples);
        for i in 0..n_samples {
            let s = i16::from_le_bytes([self.pcm[2 * i], self.pcm[2 * i + 1]]);
            out.push(s as f32 / 32768.0);
        }
        Ok(out)
    }
}

/// A fully conditioned waveform: mono f32 at the canonical sample rate,
/// amplitude in [-1, 1], never empty, exactly the configured target
/// length. Only [`crate::Preprocessor`] constructs these.
#[derive(Debug, Clone)]
pub struct PreprocessedWaveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl PreprocessedWaveform {
    pub(crate) fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        debug_assert!(!samples.is_empty());
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_and_duration() {
        let raw = RawAudioSample::new(vec![0u8; 32000], 16000, 1);
        assert_eq!(raw.frames(), 16000);
        assert_eq!(raw.duration(), Duration::from_secs(1));

        let stereo = RawAudioSample::new(vec![0u8; 32000], 16000, 2);
        assert_eq!(stereo.frames(), 8000);
    }

    #[test]
    fn decode_roundtrip() {
        let raw = RawAudioSample::from_f32(&[0.0, 0.5, -0.5, 1.0], 16000, 1);
        let decoded = raw.decode().unwrap();
        assert_eq!(decoded.len(), 4);
        assert!((decoded[1] - 0.5).abs() < 1e-3);
        assert!((decoded[2] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn decode_rejects_bad_metadata() {
        let raw = RawAudioSample::new(vec![0u8; 4], 0, 1);
        assert!(matches!(
            raw.decode(),
            Err(AudioError::UnsupportedFormat { .. })
        ));

        let raw = RawAudioSample::new(vec![0u8; 4], 16000, 0);
        assert!(raw.decode().is_err());

        let raw = RawAudioSample::new(vec![0u8; 3], 16000, 1);
        assert!(raw.decode().is_err());

        // 3 samples cannot be 2-channel frames.
        let raw = RawAudioSample::new(vec![0u8; 6], 16000, 2);
        assert!(raw.decode().is_err());
    }
}
