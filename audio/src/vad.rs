//! Energy-based voice-activity detection for leading/trailing trim.

use std::ops::Range;

/// Controls speech detection.
#[derive(Debug, Clone)]
pub struct VadConfig {
    /// Analysis frame length in samples (default: 400 = 25ms @ 16kHz).
    pub frame_length: usize,
    /// Frame shift in samples (default: 160 = 10ms @ 16kHz).
    pub frame_shift: usize,
    /// A frame counts as speech when its RMS is at least this fraction
    /// of the loudest frame's RMS (default: 0.1, i.e. -20dB).
    pub threshold_ratio: f32,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            frame_length: 400,
            frame_shift: 160,
            threshold_ratio: 0.1,
        }
    }
}

/// Returns the sample range spanning the first through last speech
/// frame, or `None` when no frame qualifies (all-silence input, or a
/// signal shorter than a single frame).
pub fn speech_bounds(samples: &[f32], cfg: &VadConfig) -> Option<Range<usize>> {
    if cfg.frame_length == 0 || cfg.frame_shift == 0 || samples.len() < cfg.frame_length {
        return None;
    }

    let num_frames = (samples.len() - cfg.frame_length) / cfg.frame_shift + 1;
    let mut rms = Vec::with_capacity(num_frames);
    let mut peak: f32 = 0.0;
    for f in 0..num_frames {
        let offset = f * cfg.frame_shift;
        let frame = &samples[offset..offset + cfg.frame_length];
        let energy: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
        let r = (energy / cfg.frame_length as f64).sqrt() as f32;
        if r > peak {
            peak = r;
        }
        rms.push(r);
    }

    if peak <= 0.0 {
        return None;
    }

    let threshold = peak * cfg.threshold_ratio;
    let first = rms.iter().position(|&r| r >= threshold)?;
    let last = rms.iter().rposition(|&r| r >= threshold)?;

    let start = first * cfg.frame_shift;
    let end = (last * cfg.frame_shift + cfg.frame_length).min(samples.len());
    Some(start..end)
}
