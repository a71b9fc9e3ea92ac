//! # Timbral DSP
//!
//! Deterministic audio feature-vector extraction: one audio byte stream in,
//! one fixed-length numeric vector out, suitable for downstream
//! classification or similarity search.
//!
//! ## Pipeline
//!
//! ```text
//! Audio Bytes → Decode/Resample → Feature Extraction → Aggregation → Normalization
//! ```
//!
//! - **Decode/Resample**: symphonia decoding (WAV, MP3, OGG, FLAC, ...),
//!   mono downmix by channel averaging, band-limited sinc resampling to
//!   22050 Hz.
//! - **Feature Extraction**: MFCC (20), chroma (12), mel spectrogram (128),
//!   spectral contrast (7) and tonnetz (6), all from one shared STFT.
//! - **Aggregation**: per-coefficient mean/std/max/min along time,
//!   concatenated into a 692-element vector.
//! - **Normalization**: global z-score over the whole vector.
//!
//! ## Quick Start
//!
//! ```no_run
//! let bytes = std::fs::read("music.flac")?;
//! let features = timbral_dsp::extract(&bytes, Some("flac"))?;
//! assert_eq!(features.len(), timbral_dsp::FEATURE_VECTOR_LEN);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The pipeline is purely functional per invocation: no shared mutable
//! state, no retries, and identical bytes always yield identical output.

#![warn(missing_docs)]

pub mod aggregate;
pub mod config;
pub mod decode;
pub mod error;
pub mod features;
pub mod normalize;
pub mod stft;

pub use config::PipelineConfig;
pub use decode::Waveform;
pub use error::{ExtractError, Result};

use tracing::debug;

/// Length of the feature vector under the default configuration
pub const FEATURE_VECTOR_LEN: usize = 692;

/// Extract a normalized feature vector from raw audio bytes
///
/// # Arguments
///
/// * `bytes` - Complete audio container (WAV, MP3, OGG, FLAC, ...)
/// * `extension_hint` - Optional file extension to speed up format probing
///
/// # Errors
///
/// * [`ExtractError::Decode`] - unparseable or corrupt audio
/// * [`ExtractError::Transform`] - audio shorter than one analysis frame
/// * [`ExtractError::DegenerateInput`] - silent/constant audio that cannot
///   be normalized
pub fn extract(bytes: &[u8], extension_hint: Option<&str>) -> Result<Vec<f32>> {
    extract_with_config(bytes, extension_hint, &PipelineConfig::default())
}

/// [`extract`] with explicit analysis parameters
pub fn extract_with_config(
    bytes: &[u8],
    extension_hint: Option<&str>,
    config: &PipelineConfig,
) -> Result<Vec<f32>> {
    let waveform = decode::decode_bytes(bytes, extension_hint, config.target_sample_rate)?;
    debug!(
        samples = waveform.samples.len(),
        duration_secs = waveform.duration_seconds(),
        "decoded waveform"
    );
    extract_from_waveform(&waveform, config)
}

/// Extract a normalized feature vector from an already decoded waveform
pub fn extract_from_waveform(waveform: &Waveform, config: &PipelineConfig) -> Result<Vec<f32>> {
    // A constant signal has no spectral variance to normalize against;
    // reject it up front instead of emitting NaN downstream.
    let peak = waveform
        .samples
        .iter()
        .fold(f32::NEG_INFINITY, |acc, &s| acc.max(s));
    let trough = waveform.samples.iter().fold(f32::INFINITY, |acc, &s| acc.min(s));
    if peak == trough {
        return Err(ExtractError::DegenerateInput(
            "silent or constant audio signal".to_string(),
        ));
    }

    let features = features::compute_features(waveform, config)?;
    let summary = aggregate::summarize(&features);
    debug_assert_eq!(summary.len(), config.feature_vector_len());

    normalize::zscore(&summary)
}
