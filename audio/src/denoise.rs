//! Spectral-subtraction noise reduction.
//!
//! When no separate noise clip is available the signal serves as its
//! own noise reference: the quietest frames are averaged into a
//! per-bin noise magnitude profile, which is then subtracted from
//! every frame with a spectral floor to avoid musical-noise holes.

use std::f64::consts::PI;

/// Controls spectral subtraction.
#[derive(Debug, Clone)]
pub struct DenoiseConfig {
    /// Analysis frame length in samples, power of two (default: 512 = 32ms @ 16kHz).
    pub frame_length: usize,
    /// Over-subtraction factor applied to the noise profile (default: 1.0).
    pub alpha: f64,
    /// Spectral floor: each bin keeps at least this fraction of its
    /// original magnitude (default: 0.05).
    pub floor: f64,
    /// Fraction of frames (the quietest ones) used as the noise
    /// profile (default: 0.1).
    pub noise_fraction: f64,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            frame_length: 512,
            alpha: 1.0,
            floor: 0.05,
            noise_fraction: 0.1,
        }
    }
}

/// Applies spectral subtraction to a mono waveform and returns the
/// cleaned signal at the same length.
///
/// Signals shorter than two frames are returned unchanged; there is
/// not enough material to estimate a noise profile from.
pub fn spectral_subtract(samples: &[f32], cfg: &DenoiseConfig) -> Vec<f32> {
    let n = cfg.frame_length;
    let hop = n / 2;
    if n == 0 || !n.is_power_of_two() || samples.len() < 2 * n {
        return samples.to_vec();
    }

    let window = hann_window(n);
    let num_frames = (samples.len() - n) / hop + 1;

    // Forward transform every frame once; keep spectra for the
    // subtraction pass.
    let mut spectra: Vec<Vec<(f64, f64)>> = Vec::with_capacity(num_frames);
    let mut energies: Vec<(usize, f64)> = Vec::with_capacity(num_frames);
    for f in 0..num_frames {
        let offset = f * hop;
        let mut buf: Vec<(f64, f64)> = (0..n)
            .map(|i| (samples[offset + i] as f64 * window[i], 0.0))
            .collect();
        fft(&mut buf);
        let energy: f64 = buf.iter().map(|&(re, im)| re * re + im * im).sum();
        energies.push((f, energy));
        spectra.push(buf);
    }

    // Noise profile: per-bin mean magnitude of the quietest frames.
    energies.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let k = ((num_frames as f64 * cfg.noise_fraction).ceil() as usize).max(1);
    let mut noise_mag = vec![0.0f64; n];
    for &(f, _) in energies.iter().take(k) {
        for (bin, &(re, im)) in spectra[f].iter().enumerate() {
            noise_mag[bin] += (re * re + im * im).sqrt();
        }
    }
    for v in &mut noise_mag {
        *v /= k as f64;
    }

    // Subtract and resynthesize by overlap-add. A periodic hann window
    // at 50% overlap sums to unity, so no synthesis window is needed.
    let mut out = vec![0.0f64; samples.len()];
    for (f, spectrum) in spectra.iter_mut().enumerate() {
        for (bin, v) in spectrum.iter_mut().enumerate() {
            let mag = (v.0 * v.0 + v.1 * v.1).sqrt();
            if mag <= 0.0 {
                continue;
            }
            let cleaned = (mag - cfg.alpha * noise_mag[bin]).max(cfg.floor * mag);
            let scale = cleaned / mag;
            v.0 *= scale;
            v.1 *= scale;
        }
        ifft(spectrum);
        let offset = f * hop;
        for i in 0..n {
            out[offset + i] += spectrum[i].0;
        }
    }

    out.into_iter().map(|v| v as f32).collect()
}

/// Periodic hann window; sums to unity under 50% overlap-add.
fn hann_window(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / n as f64).cos())
        .collect()
}

/// In-place Cooley-Tukey FFT over (real, imag) tuples.
/// Input length must be a power of 2.
fn fft(x: &mut [(f64, f64)]) {
    let n = x.len();
    if n <= 1 {
        return;
    }

    // Bit-reversal permutation.
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            x.swap(i, j);
        }
    }

    // Butterfly passes.
    let mut size = 2;
    while size <= n {
        let half = size / 2;
        let angle = -2.0 * PI / size as f64;
        let wn = (angle.cos(), angle.sin());
        let mut start = 0;
        while start < n {
            let mut w = (1.0, 0.0);
            for k in 0..half {
                let u = x[start + k];
                let t_re = w.0 * x[start + k + half].0 - w.1 * x[start + k + half].1;
                let t_im = w.0 * x[start + k + half].1 + w.1 * x[start + k + half].0;
                x[start + k] = (u.0 + t_re, u.1 + t_im);
                x[start + k + half] = (u.0 - t_re, u.1 - t_im);
                let nw_re = w.0 * wn.0 - w.1 * wn.1;
                let nw_im = w.0 * wn.1 + w.1 * wn.0;
                w = (nw_re, nw_im);
            }
            start += size;
        }
        size <<= 1;
    }
}

/// Inverse FFT via conjugation: ifft(x) = conj(fft(conj(x))) / n.
fn ifft(x: &mut [(f64, f64)]) {
    let n = x.len() as f64;
    for v in x.iter_mut() {
        v.1 = -v.1;
    }
    fft(x);
    for v in x.iter_mut() {
        v.0 /= n;
        v.1 = -v.1 / n;
    }
}
