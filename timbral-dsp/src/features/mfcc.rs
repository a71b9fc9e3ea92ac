//! Mel-frequency cepstral coefficients
//!
//! Orthonormal DCT-II over the mel axis of the dB-scaled mel spectrogram,
//! keeping the lowest `n_mfcc` coefficients.

use ndarray::Array2;
use std::f32::consts::PI;

/// Compute MFCCs from a dB-scaled mel spectrogram of shape (n_mels, frames)
///
/// Output shape: (n_mfcc, frames).
pub fn mfcc(mel_db: &Array2<f32>, n_mfcc: usize) -> Array2<f32> {
    let n_mels = mel_db.dim().0;
    dct_matrix(n_mfcc, n_mels).dot(mel_db)
}

/// Orthonormal DCT-II basis of shape (n_coeffs, n)
fn dct_matrix(n_coeffs: usize, n: usize) -> Array2<f32> {
    let mut matrix = Array2::<f32>::zeros((n_coeffs, n));
    let scale = (2.0 / n as f32).sqrt();

    for k in 0..n_coeffs {
        // Row 0 carries an extra 1/sqrt(2) for orthonormality
        let s = if k == 0 { scale / 2.0f32.sqrt() } else { scale };
        for j in 0..n {
            matrix[[k, j]] = s * (PI / n as f32 * (j as f32 + 0.5) * k as f32).cos();
        }
    }

    matrix
}
