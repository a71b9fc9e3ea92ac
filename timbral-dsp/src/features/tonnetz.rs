//! Tonal centroid (tonnetz) representation
//!
//! Projects per-frame L1-normalized chroma onto three harmonic circles:
//! fifths, minor thirds and major thirds, each as a sin/cos pair. The fifths
//! and minor-third circles use radius 1, the major-third circle radius 0.5,
//! matching the Harte/Sandler tonal-centroid construction.

use ndarray::Array2;
use std::f32::consts::PI;

use crate::config::{N_CHROMA, N_TONNETZ};

/// Compute tonnetz features from a chroma matrix of shape (12, frames)
///
/// Output shape: (6, frames).
pub fn tonnetz(chroma: &Array2<f32>) -> Array2<f32> {
    let n_frames = chroma.dim().1;

    // Step sizes around each harmonic circle, in pitch-class units
    let scale: [f32; N_TONNETZ] = [7.0 / 6.0, 7.0 / 6.0, 3.0 / 2.0, 3.0 / 2.0, 2.0 / 3.0, 2.0 / 3.0];
    let radius: [f32; N_TONNETZ] = [1.0, 1.0, 1.0, 1.0, 0.5, 0.5];

    let mut basis = Array2::<f32>::zeros((N_TONNETZ, N_CHROMA));
    for d in 0..N_TONNETZ {
        for c in 0..N_CHROMA {
            let mut v = scale[d] * c as f32;
            // Even rows are the sine phase of each pair
            if d % 2 == 0 {
                v -= 0.5;
            }
            basis[[d, c]] = radius[d] * (PI * v).cos();
        }
    }

    // L1-normalize chroma per frame before projecting
    let mut normalized = chroma.clone();
    for t in 0..n_frames {
        let sum: f32 = (0..N_CHROMA).map(|c| chroma[[c, t]].abs()).sum();
        if sum > 1e-10 {
            for c in 0..N_CHROMA {
                normalized[[c, t]] /= sum;
            }
        }
    }

    basis.dot(&normalized)
}
