//! Spectral contrast across octave sub-bands
//!
//! For each band the magnitude bins of a frame are sorted; contrast is the
//! dB difference between the mean of the top and bottom `quantile` fraction
//! of bins. Bands are octaves starting at `fmin`, plus one reference band
//! covering everything below `fmin`.

use ndarray::Array2;

use crate::features::mel::AMIN;
use crate::stft::fft_frequencies;

/// Compute spectral contrast from a magnitude spectrogram
///
/// Output shape: (n_bands + 1, frames).
pub fn spectral_contrast(
    magnitude: &Array2<f32>,
    sample_rate: u32,
    frame_size: usize,
    n_bands: usize,
    fmin: f32,
    quantile: f32,
) -> Array2<f32> {
    let (n_bins, n_frames) = magnitude.dim();
    let freqs = fft_frequencies(sample_rate, frame_size);

    // Octave band edges: [0, fmin, 2*fmin, ..., fmin * 2^n_bands]
    let mut edges = vec![0.0f32; n_bands + 2];
    for (i, edge) in edges.iter_mut().enumerate().skip(1) {
        *edge = fmin * 2.0f32.powi(i as i32 - 1);
    }

    let mut out = Array2::<f32>::zeros((n_bands + 1, n_frames));

    for band in 0..=n_bands {
        let (f_low, f_high) = (edges[band], edges[band + 1]);

        let mut idx: Vec<usize> = (0..n_bins)
            .filter(|&k| freqs[k] >= f_low && freqs[k] <= f_high)
            .collect();

        // Widen band edges by one bin so adjacent bands overlap slightly
        if band > 0 {
            if let Some(&first) = idx.first() {
                if first > 0 {
                    idx.insert(0, first - 1);
                }
            }
        }
        if band == n_bands {
            if let Some(&last) = idx.last() {
                idx.extend(last + 1..n_bins);
            }
        } else if idx.len() > 1 {
            idx.pop();
        }

        if idx.is_empty() {
            continue;
        }

        let q = ((quantile * idx.len() as f32).round() as usize).max(1);

        let mut values = vec![0.0f32; idx.len()];
        for t in 0..n_frames {
            for (i, &k) in idx.iter().enumerate() {
                values[i] = magnitude[[k, t]];
            }
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            let valley: f32 = values[..q].iter().sum::<f32>() / q as f32;
            let peak: f32 = values[values.len() - q..].iter().sum::<f32>() / q as f32;

            out[[band, t]] = 10.0 * peak.max(AMIN).log10() - 10.0 * valley.max(AMIN).log10();
        }
    }

    out
}
