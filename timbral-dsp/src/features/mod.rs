//! Spectral feature representations
//!
//! Five representations computed from one shared STFT so their time-frame
//! counts align: MFCC (20), chroma (12), mel spectrogram (128), spectral
//! contrast (7) and tonnetz (6).

pub mod chroma;
pub mod contrast;
pub mod mel;
pub mod mfcc;
pub mod tonnetz;

use ndarray::Array2;

use crate::config::PipelineConfig;
use crate::decode::Waveform;
use crate::error::Result;
use crate::stft::stft;

/// The five feature matrices for one waveform
///
/// Every matrix has shape (coefficients, time frames) with identical frame
/// counts across representations.
#[derive(Debug)]
pub struct FeatureSet {
    /// Cepstral representation, 20 coefficients
    pub mfcc: Array2<f32>,
    /// Pitch-class representation, 12 coefficients
    pub chroma: Array2<f32>,
    /// Mel-scaled power spectrogram, 128 bands (linear power)
    pub mel: Array2<f32>,
    /// Spectral contrast, 6 octave bands + 1 reference band
    pub contrast: Array2<f32>,
    /// Tonal centroid, 6 dimensions
    pub tonnetz: Array2<f32>,
}

impl FeatureSet {
    /// Matrices in aggregation order
    pub fn in_order(&self) -> [&Array2<f32>; 5] {
        [
            &self.mfcc,
            &self.chroma,
            &self.mel,
            &self.contrast,
            &self.tonnetz,
        ]
    }
}

/// Compute all five feature matrices from a waveform
///
/// Fails with [`crate::ExtractError::Transform`] if the waveform is shorter
/// than one analysis frame.
pub fn compute_features(waveform: &Waveform, config: &PipelineConfig) -> Result<FeatureSet> {
    let spectrogram = stft(&waveform.samples, config.frame_size, config.hop_size)?;

    let mel_fb = mel::mel_filterbank(waveform.sample_rate, config.frame_size, config.n_mels);
    let mel = mel::mel_spectrogram(&spectrogram.power, &mel_fb);
    let mel_db = mel::power_to_db(&mel, config.top_db);
    let mfcc = mfcc::mfcc(&mel_db, config.n_mfcc);

    let chroma_fb = chroma::chroma_filterbank(waveform.sample_rate, config.frame_size);
    let chroma = chroma::chroma(&spectrogram.power, &chroma_fb);

    let contrast = contrast::spectral_contrast(
        &spectrogram.magnitude,
        waveform.sample_rate,
        config.frame_size,
        config.n_contrast_bands,
        config.contrast_fmin,
        config.contrast_quantile,
    );

    let tonnetz = tonnetz::tonnetz(&chroma);

    Ok(FeatureSet {
        mfcc,
        chroma,
        mel,
        contrast,
        tonnetz,
    })
}
