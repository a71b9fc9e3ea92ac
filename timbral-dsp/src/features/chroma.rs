//! Pitch-class (chroma) representation
//!
//! Chroma filterbank over the power spectrogram: each FFT bin is mapped to a
//! fractional position on the 12-semitone circle (A440 reference, 12-TET),
//! weighted by a wrapped Gaussian whose width follows the local bin spacing.
//! Columns are L2-normalized, attenuated by a Gaussian octave weighting
//! centered at octave 5 (width 2 octaves), and rolled so row 0 is pitch class
//! C. Frames are max-normalized after projection.

use ndarray::{Array2, Axis};

use crate::config::N_CHROMA;

/// Reference frequency of the chroma circle origin: A0 = A440 / 16
const A0_HZ: f64 = 27.5;

/// Center of the Gaussian octave weighting
const CENTER_OCTAVE: f64 = 5.0;

/// Width of the Gaussian octave weighting, in octaves
const OCTAVE_WIDTH: f64 = 2.0;

/// Build a chroma filterbank of shape (12, frame_size / 2 + 1)
pub fn chroma_filterbank(sample_rate: u32, frame_size: usize) -> Array2<f32> {
    let n_bins = frame_size / 2 + 1;
    let n_chroma = N_CHROMA as f64;

    // Fractional chroma-bin index of every FFT bin (DC handled below)
    let mut frqbins = vec![0.0f64; frame_size];
    for k in 1..frame_size {
        let freq = k as f64 * sample_rate as f64 / frame_size as f64;
        frqbins[k] = n_chroma * (freq / A0_HZ).log2();
    }
    frqbins[0] = frqbins[1] - 1.5 * n_chroma;

    // Gaussian width per bin follows the spacing to the next bin
    let mut binwidth = vec![1.0f64; frame_size];
    for k in 0..frame_size - 1 {
        binwidth[k] = (frqbins[k + 1] - frqbins[k]).max(1.0);
    }

    let half = (n_chroma / 2.0).round();
    let mut weights = Array2::<f32>::zeros((N_CHROMA, frame_size));
    for k in 0..frame_size {
        for c in 0..N_CHROMA {
            // Distance on the chroma circle, wrapped into [-half, half)
            let d = (frqbins[k] - c as f64 + half + 10.0 * n_chroma).rem_euclid(n_chroma) - half;
            weights[[c, k]] = (-0.5 * (2.0 * d / binwidth[k]).powi(2)).exp() as f32;
        }
    }

    // L2-normalize each column
    for k in 0..frame_size {
        let norm: f32 = (0..N_CHROMA)
            .map(|c| weights[[c, k]] * weights[[c, k]])
            .sum::<f32>()
            .sqrt();
        if norm > 1e-10 {
            for c in 0..N_CHROMA {
                weights[[c, k]] /= norm;
            }
        }
    }

    // De-emphasize very low and very high octaves
    for k in 0..frame_size {
        let octave = frqbins[k] / n_chroma;
        let w = (-0.5 * ((octave - CENTER_OCTAVE) / OCTAVE_WIDTH).powi(2)).exp() as f32;
        for c in 0..N_CHROMA {
            weights[[c, k]] *= w;
        }
    }

    // Roll rows so index 0 is C (the circle origin is A), keep only the
    // non-negative frequency bins
    let mut rolled = Array2::<f32>::zeros((N_CHROMA, n_bins));
    for c in 0..N_CHROMA {
        let src = (c + 3) % N_CHROMA;
        for k in 0..n_bins {
            rolled[[c, k]] = weights[[src, k]];
        }
    }

    rolled
}

/// Project a power spectrogram onto the chroma filterbank
///
/// Output shape: (12, frames); each frame is normalized by its maximum so
/// values lie in [0, 1]. All-zero frames are left as zeros.
pub fn chroma(power: &Array2<f32>, filterbank: &Array2<f32>) -> Array2<f32> {
    let mut raw = filterbank.dot(power);

    for mut frame in raw.axis_iter_mut(Axis(1)) {
        let peak = frame.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));
        if peak > 1e-10 {
            frame.mapv_inplace(|v| v / peak);
        }
    }

    raw
}
