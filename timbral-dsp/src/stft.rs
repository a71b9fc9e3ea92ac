//! Short-time Fourier analysis shared by all feature representations
//!
//! One STFT configuration feeds every representation so their time-frame
//! counts stay aligned. Frames start at sample 0 with no center padding:
//! frame count = 1 + (len - frame_size) / hop_size.

use ndarray::Array2;
use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::{ExtractError, Result};

/// Magnitude and power spectrograms from one analysis pass
///
/// Both arrays have shape (frequency bins, time frames) with
/// `frame_size / 2 + 1` bins.
#[derive(Debug)]
pub struct Spectrogram {
    /// |X[k, t]|
    pub magnitude: Array2<f32>,
    /// |X[k, t]|^2
    pub power: Array2<f32>,
}

/// Compute magnitude and power spectrograms with a periodic Hann window
///
/// Fails with [`ExtractError::Transform`] if the input is shorter than one
/// analysis frame.
pub fn stft(samples: &[f32], frame_size: usize, hop_size: usize) -> Result<Spectrogram> {
    if samples.len() < frame_size {
        return Err(ExtractError::Transform(format!(
            "waveform too short for analysis: {} samples, need at least {}",
            samples.len(),
            frame_size
        )));
    }

    let n_frames = 1 + (samples.len() - frame_size) / hop_size;
    let n_bins = frame_size / 2 + 1;

    // Periodic Hann window
    let window: Vec<f32> = (0..frame_size)
        .map(|n| {
            0.5 - 0.5 * (2.0 * std::f32::consts::PI * n as f32 / frame_size as f32).cos()
        })
        .collect();

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(frame_size);

    let mut magnitude = Array2::zeros((n_bins, n_frames));
    let mut power = Array2::zeros((n_bins, n_frames));
    let mut buffer = vec![Complex::new(0.0f32, 0.0); frame_size];

    for t in 0..n_frames {
        let start = t * hop_size;
        for n in 0..frame_size {
            buffer[n] = Complex::new(samples[start + n] * window[n], 0.0);
        }
        fft.process(&mut buffer);

        for k in 0..n_bins {
            let mag = buffer[k].norm();
            magnitude[[k, t]] = mag;
            power[[k, t]] = mag * mag;
        }
    }

    Ok(Spectrogram { magnitude, power })
}

/// Center frequency in Hz of each FFT bin
pub fn fft_frequencies(sample_rate: u32, frame_size: usize) -> Vec<f32> {
    let n_bins = frame_size / 2 + 1;
    (0..n_bins)
        .map(|k| k as f32 * sample_rate as f32 / frame_size as f32)
        .collect()
}
