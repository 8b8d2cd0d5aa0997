//! Whole-buffer sample rate conversion built on the rubato FFT resampler.

use rubato::{FftFixedInOut, Resampler};

use crate::AudioError;

/// Frames per processing block.
const CHUNK_FRAMES: usize = 1024;

/// Resamples a mono f32 buffer from `src_rate` to `dst_rate`.
///
/// Uses a band-limited FFT resampler. The tail is zero-padded to fill
/// the final block and the resampler's delay is compensated, so the
/// output length is `len * dst_rate / src_rate` (rounded down).
///
/// Same-rate input is returned unchanged.
pub fn resample(samples: &[f32], src_rate: u32, dst_rate: u32) -> Result<Vec<f32>, AudioError> {
    if src_rate == 0 || dst_rate == 0 {
        return Err(AudioError::Resample(format!(
            "invalid rates: {src_rate} -> {dst_rate}"
        )));
    }
    if src_rate == dst_rate {
        return Ok(samples.to_vec());
    }
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let mut resampler =
        FftFixedInOut::<f32>::new(src_rate as usize, dst_rate as usize, CHUNK_FRAMES, 1)?;
    let delay = resampler.output_delay();
    let expected = (samples.len() as u64 * dst_rate as u64 / src_rate as u64) as usize;

    let mut out: Vec<f32> = Vec::with_capacity(expected + delay);
    let mut pos = 0usize;

    // Keep feeding blocks (zero-padded past the end) until the delay
    // has flushed through and the expected output is available.
    while out.len() < expected + delay {
        let need = resampler.input_frames_next();
        let mut block = vec![0.0f32; need];
        if pos < samples.len() {
            let n = (samples.len() - pos).min(need);
            block[..n].copy_from_slice(&samples[pos..pos + n]);
            pos += n;
        }
        let processed = resampler.process(&[block], None)?;
        out.extend_from_slice(&processed[0]);
    }

    Ok(out[delay..delay + expected].to_vec())
}
