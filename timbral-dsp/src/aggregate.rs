//! Time-axis aggregation of feature matrices
//!
//! Each matrix is reduced to four per-coefficient statistics along the time
//! axis. Statistic vectors are concatenated in a fixed order: for each
//! representation in [mfcc, chroma, mel, contrast, tonnetz], append
//! [mean, std, max, min]. Standard deviation is the population form
//! (a single-frame matrix has std 0).

use ndarray::Array2;

use crate::features::FeatureSet;

/// Concatenate per-coefficient statistics of all representations
///
/// Output length is fixed by the coefficient counts alone:
/// (20 + 12 + 128 + 7 + 6) * 4 = 692 for the default configuration.
pub fn summarize(features: &FeatureSet) -> Vec<f32> {
    let total: usize = features.in_order().iter().map(|m| m.dim().0 * 4).sum();
    let mut out = Vec::with_capacity(total);

    for matrix in features.in_order() {
        append_statistics(&mut out, matrix);
    }

    out
}

/// Append mean, std, max and min vectors of one matrix, in that order
fn append_statistics(out: &mut Vec<f32>, matrix: &Array2<f32>) {
    let (n_coeffs, n_frames) = matrix.dim();
    debug_assert!(n_frames > 0);

    let means: Vec<f32> = (0..n_coeffs)
        .map(|r| matrix.row(r).sum() / n_frames as f32)
        .collect();

    out.extend_from_slice(&means);

    for r in 0..n_coeffs {
        let variance = matrix
            .row(r)
            .iter()
            .map(|&v| {
                let d = v - means[r];
                d * d
            })
            .sum::<f32>()
            / n_frames as f32;
        out.push(variance.sqrt());
    }

    for r in 0..n_coeffs {
        out.push(matrix.row(r).iter().cloned().fold(f32::NEG_INFINITY, f32::max));
    }

    for r in 0..n_coeffs {
        out.push(matrix.row(r).iter().cloned().fold(f32::INFINITY, f32::min));
    }
}
