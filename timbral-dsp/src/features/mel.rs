//! Mel-scaled power spectrogram
//!
//! Slaney-style mel filterbank: linear below 1 kHz, logarithmic above, with
//! triangular filters area-normalized so each integrates to roughly constant
//! energy. `power_to_db` fixes its constants at ref = 1.0, amin = 1e-10 and a
//! configurable top_db clip against the per-signal maximum.

use ndarray::Array2;

/// Floor applied before taking logarithms
pub const AMIN: f32 = 1e-10;

const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

fn hz_to_mel(hz: f64) -> f64 {
    if hz < MIN_LOG_HZ {
        hz / F_SP
    } else {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / (6.4f64.ln() / 27.0)
    }
}

fn mel_to_hz(mel: f64) -> f64 {
    if mel < MIN_LOG_MEL {
        mel * F_SP
    } else {
        MIN_LOG_HZ * ((mel - MIN_LOG_MEL) * (6.4f64.ln() / 27.0)).exp()
    }
}

/// Build a mel filterbank of shape (n_mels, frame_size / 2 + 1)
///
/// Filters span 0 Hz to Nyquist with Slaney area normalization.
pub fn mel_filterbank(sample_rate: u32, frame_size: usize, n_mels: usize) -> Array2<f32> {
    let n_bins = frame_size / 2 + 1;
    let fmax = sample_rate as f64 / 2.0;

    // n_mels + 2 evenly spaced points on the mel scale
    let mel_max = hz_to_mel(fmax);
    let mel_points: Vec<f64> = (0..n_mels + 2)
        .map(|i| mel_to_hz(mel_max * i as f64 / (n_mels + 1) as f64))
        .collect();

    let bin_freqs: Vec<f64> = (0..n_bins)
        .map(|k| k as f64 * sample_rate as f64 / frame_size as f64)
        .collect();

    let mut weights = Array2::<f32>::zeros((n_mels, n_bins));
    for m in 0..n_mels {
        let (lower, center, upper) = (mel_points[m], mel_points[m + 1], mel_points[m + 2]);
        // Area normalization: keep per-filter energy roughly constant
        let enorm = 2.0 / (upper - lower);

        for (k, &freq) in bin_freqs.iter().enumerate() {
            let rising = (freq - lower) / (center - lower);
            let falling = (upper - freq) / (upper - center);
            let w = rising.min(falling).max(0.0);
            weights[[m, k]] = (w * enorm) as f32;
        }
    }

    weights
}

/// Apply a mel filterbank to a power spectrogram
///
/// Output shape: (n_mels, time frames), linear power.
pub fn mel_spectrogram(power: &Array2<f32>, filterbank: &Array2<f32>) -> Array2<f32> {
    filterbank.dot(power)
}

/// Convert a power spectrogram to decibels
///
/// `db = 10 * log10(max(amin, S))`, then clipped below `max(db) - top_db`.
pub fn power_to_db(power: &Array2<f32>, top_db: f32) -> Array2<f32> {
    let mut db = power.mapv(|v| 10.0 * v.max(AMIN).log10());

    let max_db = db.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let floor = max_db - top_db;
    db.mapv_inplace(|v| v.max(floor));

    db
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn mel_scale_round_trips() {
        for hz in [0.0, 150.0, 440.0, 1000.0, 4000.0, 11_025.0] {
            let back = mel_to_hz(hz_to_mel(hz));
            assert!((back - hz).abs() < 1e-6, "{hz} Hz round-tripped to {back}");
        }
    }

    #[test]
    fn filterbank_shape_and_nonnegativity() {
        let fb = mel_filterbank(22_050, 2048, 128);
        assert_eq!(fb.dim(), (128, 1025));
        assert!(fb.iter().all(|&w| w >= 0.0));
        // Every filter should cover at least one bin
        for m in 0..128 {
            let row_sum: f32 = fb.row(m).sum();
            assert!(row_sum > 0.0, "filter {m} is empty");
        }
    }

    #[test]
    fn filter_centers_are_monotonic() {
        let fb = mel_filterbank(22_050, 2048, 128);
        let mut last_peak = 0usize;
        for m in 0..128 {
            let peak = fb
                .row(m)
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .map(|(k, _)| k)
                .unwrap();
            assert!(peak >= last_peak, "filter {m} peaks before filter {}", m - 1);
            last_peak = peak;
        }
    }

    #[test]
    fn power_to_db_reference_values() {
        let s = array![[1.0f32, 0.1]];
        let db = power_to_db(&s, 80.0);
        assert!((db[[0, 0]] - 0.0).abs() < 1e-5);
        assert!((db[[0, 1]] - (-10.0)).abs() < 1e-4);
    }

    #[test]
    fn power_to_db_clips_at_top_db() {
        let s = array![[1.0f32, 1e-12]];
        let db = power_to_db(&s, 80.0);
        // 1e-12 clamps to amin (-100 dB), then clips at 0 - 80 = -80 dB
        assert!((db[[0, 1]] - (-80.0)).abs() < 1e-4);
    }
}
