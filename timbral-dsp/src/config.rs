//! Analysis configuration parameters
//!
//! All spectral representations share one STFT configuration so their
//! time-frame counts stay aligned. The constants below are fixed conventions
//! of this implementation; reference vectors are generated against them.

/// Pitch classes in the chroma representation (fixed by construction)
pub const N_CHROMA: usize = 12;

/// Dimensions of the tonal-centroid (tonnetz) representation
pub const N_TONNETZ: usize = 6;

/// Feature-extraction configuration parameters
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Sample rate every waveform is resampled to (default: 22050 Hz)
    pub target_sample_rate: u32,

    /// Frame size for STFT (default: 2048)
    pub frame_size: usize,

    /// Hop size for STFT (default: 512)
    pub hop_size: usize,

    /// Number of cepstral coefficients retained (default: 20)
    pub n_mfcc: usize,

    /// Number of mel filterbank bands (default: 128)
    pub n_mels: usize,

    /// Number of octave sub-bands for spectral contrast, excluding the
    /// reference band below `contrast_fmin` (default: 6)
    pub n_contrast_bands: usize,

    /// Lower edge of the first spectral-contrast octave band (default: 200 Hz)
    pub contrast_fmin: f32,

    /// Fraction of bins treated as peak/valley per contrast band (default: 0.02)
    pub contrast_quantile: f32,

    /// Dynamic range clip applied when converting power to dB (default: 80 dB)
    pub top_db: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 22_050,
            frame_size: 2048,
            hop_size: 512,
            n_mfcc: 20,
            n_mels: 128,
            n_contrast_bands: 6,
            contrast_fmin: 200.0,
            contrast_quantile: 0.02,
            top_db: 80.0,
        }
    }
}

impl PipelineConfig {
    /// Total length of the aggregated feature vector:
    /// four statistics per coefficient across all five representations.
    pub fn feature_vector_len(&self) -> usize {
        (self.n_mfcc + N_CHROMA + self.n_mels + (self.n_contrast_bands + 1) + N_TONNETZ) * 4
    }
}
