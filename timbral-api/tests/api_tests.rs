//! Integration tests for the timbral-api HTTP surface
//!
//! Tests the complete API: health check, upload validation, successful
//! feature extraction, and error mapping for corrupt or degenerate audio.

use std::io::Cursor;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use timbral_api::{build_router, AppState};

const BOUNDARY: &str = "timbral-test-boundary";

fn test_router() -> axum::Router {
    build_router(AppState::new())
}

/// Build a multipart/form-data body with one file field
fn multipart_body(field: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(filename: &str, data: &[u8]) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/process_audio")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body("audio", filename, data)))
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Encode f32 samples as a 16-bit PCM WAV in memory
fn wav_bytes(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &s in samples {
            writer
                .write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn sine(frequency: f32, duration_secs: f32, sample_rate: u32) -> Vec<f32> {
    let num_samples = (duration_secs * sample_rate as f32) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.5
        })
        .collect()
}

#[tokio::test]
async fn health_check_reports_ok() {
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "timbral-api");
}

#[tokio::test]
async fn valid_wav_upload_returns_692_features() {
    let wav = wav_bytes(&sine(440.0, 1.0, 22_050), 22_050);
    let (status, json) = upload("tone.wav", &wav).await;

    assert_eq!(status, StatusCode::OK, "body: {json}");
    let features = json["features"].as_array().expect("features array");
    assert_eq!(features.len(), 692);
    assert!(features.iter().all(|v| v.as_f64().unwrap().is_finite()));
}

#[tokio::test]
async fn unsupported_extension_is_rejected() {
    let (status, json) = upload("notes.txt", b"hello").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn missing_audio_field_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/process_audio")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body("document", "tone.wav", b"data")))
        .unwrap();

    let response = test_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn corrupt_audio_maps_to_server_error() {
    let (status, json) = upload("broken.wav", b"RIFF but not really").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "EXTRACTION_FAILED");
}

#[tokio::test]
async fn silent_audio_maps_to_server_error() {
    let wav = wav_bytes(&vec![0.0; 22_050], 22_050);
    let (status, json) = upload("silence.wav", &wav).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "EXTRACTION_FAILED");
    let message = json["error"]["message"].as_str().unwrap();
    assert!(message.contains("degenerate"), "message: {message}");
}

#[tokio::test]
async fn too_short_audio_maps_to_server_error() {
    let wav = wav_bytes(&sine(440.0, 0.01, 22_050), 22_050);
    let (status, json) = upload("blip.wav", &wav).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = json["error"]["message"].as_str().unwrap();
    assert!(message.contains("too short"), "message: {message}");
}
