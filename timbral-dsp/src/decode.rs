//! Audio decoding and resampling
//!
//! Decodes an in-memory byte stream with symphonia (WAV, MP3, OGG/Vorbis and
//! FLAC at minimum), downmixes to mono by averaging all channels, and
//! resamples to the target rate with rubato's band-limited sinc interpolator.

use std::io::Cursor;

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use tracing::debug;

use crate::error::{ExtractError, Result};

/// Decoded, resampled, mono audio signal
#[derive(Debug, Clone)]
pub struct Waveform {
    /// Mono PCM samples, normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Waveform {
    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decode raw audio bytes into a mono waveform at `target_sample_rate`
///
/// # Arguments
/// * `bytes` - Complete audio container (WAV, MP3, OGG, FLAC, ...)
/// * `extension_hint` - Optional file extension to speed up format probing
/// * `target_sample_rate` - Output sample rate in Hz
pub fn decode_bytes(
    bytes: &[u8],
    extension_hint: Option<&str>,
    target_sample_rate: u32,
) -> Result<Waveform> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension_hint {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| ExtractError::Decode(format!("unrecognized audio container: {e}")))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| ExtractError::Decode("no audio tracks found".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let native_sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| ExtractError::Decode("sample rate not specified".to_string()))?;

    debug!(
        native_sample_rate,
        target_sample_rate, "decoding audio stream"
    );

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| ExtractError::Decode(format!("failed to create decoder: {e}")))?;

    let mut mono = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(ExtractError::Decode(format!("failed to read packet: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| ExtractError::Decode(format!("failed to decode packet: {e}")))?;

        downmix_into(&mut mono, &decoded);
    }

    if mono.is_empty() {
        return Err(ExtractError::Decode("no audio samples decoded".to_string()));
    }

    if mono.iter().any(|s| !s.is_finite()) {
        return Err(ExtractError::Decode(
            "decoded stream contains non-finite samples".to_string(),
        ));
    }

    debug!(frames = mono.len(), "decoded mono stream");

    let samples = if native_sample_rate != target_sample_rate {
        resample_mono(mono, native_sample_rate, target_sample_rate)?
    } else {
        mono
    };

    Ok(Waveform {
        samples,
        sample_rate: target_sample_rate,
    })
}

/// Downmix one decoded buffer to mono by averaging all channels
fn downmix_into(mono: &mut Vec<f32>, decoded: &AudioBufferRef<'_>) {
    match decoded {
        AudioBufferRef::F32(buf) => downmix(mono, buf, |s| s),
        AudioBufferRef::F64(buf) => downmix(mono, buf, |s| s as f32),
        AudioBufferRef::U8(buf) => downmix(mono, buf, |s| (s as f32 - 128.0) / 128.0),
        AudioBufferRef::U16(buf) => downmix(mono, buf, |s| (s as f32 - 32_768.0) / 32_768.0),
        AudioBufferRef::U24(buf) => {
            downmix(mono, buf, |s| (s.inner() as f32 - 8_388_608.0) / 8_388_608.0)
        }
        AudioBufferRef::U32(buf) => downmix(mono, buf, |s| {
            ((s as f64 - 2_147_483_648.0) / 2_147_483_648.0) as f32
        }),
        AudioBufferRef::S8(buf) => downmix(mono, buf, |s| s as f32 / 128.0),
        AudioBufferRef::S16(buf) => downmix(mono, buf, |s| s as f32 / 32_768.0),
        AudioBufferRef::S24(buf) => downmix(mono, buf, |s| s.inner() as f32 / 8_388_608.0),
        AudioBufferRef::S32(buf) => downmix(mono, buf, |s| (s as f64 / 2_147_483_648.0) as f32),
    }
}

fn downmix<S: Sample>(mono: &mut Vec<f32>, buf: &AudioBuffer<S>, to_f32: impl Fn(S) -> f32) {
    let channels = buf.spec().channels.count();
    let frames = buf.frames();
    if channels == 0 || frames == 0 {
        return;
    }

    let base = mono.len();
    mono.resize(base + frames, 0.0);

    for ch in 0..channels {
        let plane = buf.chan(ch);
        for (i, &sample) in plane.iter().take(frames).enumerate() {
            mono[base + i] += to_f32(sample);
        }
    }

    let scale = 1.0 / channels as f32;
    for sample in &mut mono[base..] {
        *sample *= scale;
    }
}

/// Resample mono PCM to the target rate using sinc interpolation
///
/// Same filter configuration throughout: 256-tap sinc, BlackmanHarris2 window,
/// 0.95 cutoff, processed as a single chunk.
fn resample_mono(samples: Vec<f32>, source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    let num_frames = samples.len();

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let resample_ratio = target_rate as f64 / source_rate as f64;

    let mut resampler = SincFixedIn::<f32>::new(resample_ratio, 2.0, params, num_frames, 1)
        .map_err(|e| ExtractError::Decode(format!("failed to create resampler: {e}")))?;

    let input = vec![samples];
    let mut output = resampler
        .process(&input, None)
        .map_err(|e| ExtractError::Decode(format!("resampling failed: {e}")))?;

    let resampled = output.swap_remove(0);

    debug!(
        input_frames = num_frames,
        output_frames = resampled.len(),
        source_rate,
        target_rate,
        "resampled waveform"
    );

    Ok(resampled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(frequency: f32, duration_secs: f32, sample_rate: u32) -> Vec<f32> {
        let num_samples = (duration_secs * sample_rate as f32) as usize;
        (0..num_samples)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.5
            })
            .collect()
    }

    #[test]
    fn resample_44k_to_22k_halves_length() {
        let input = sine(440.0, 1.0, 44_100);
        let output = resample_mono(input, 44_100, 22_050).unwrap();

        let expected = 22_050usize;
        let tolerance = expected / 100;
        assert!(
            output.len() >= expected - tolerance && output.len() <= expected + tolerance,
            "expected ~{} frames, got {}",
            expected,
            output.len()
        );

        // Sinc interpolation may overshoot slightly (Gibbs phenomenon)
        for &s in &output {
            assert!((-1.01..=1.01).contains(&s), "sample out of range: {s}");
        }
    }

    #[test]
    fn resample_preserves_silence() {
        let input = vec![0.0f32; 48_000];
        let output = resample_mono(input, 48_000, 22_050).unwrap();
        assert!(output.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let bytes = vec![0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01, 0x02, 0x03];
        let err = decode_bytes(&bytes, None, 22_050).unwrap_err();
        assert!(matches!(err, ExtractError::Decode(_)), "got {err:?}");
    }

    #[test]
    fn truncated_header_fails_with_decode_error() {
        // A RIFF magic with nothing behind it
        let bytes = b"RIFF\x24\x00\x00\x00WAVE".to_vec();
        let err = decode_bytes(&bytes, Some("wav"), 22_050).unwrap_err();
        assert!(matches!(err, ExtractError::Decode(_)), "got {err:?}");
    }
}
