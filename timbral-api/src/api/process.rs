//! Audio processing endpoint
//!
//! POST /process_audio accepts a multipart upload (field `audio`), validates
//! the file extension, and runs the extraction pipeline on the uploaded bytes.
//! The pipeline is CPU-bound so it runs under `spawn_blocking`; upload bytes
//! stay in memory for the lifetime of the request, no temporary files.

use std::path::Path;

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    AppState,
};

/// Accepted upload file extensions (case-insensitive)
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["wav", "mp3", "ogg", "flac"];

/// Feature extraction response: 692 floats
#[derive(Debug, Serialize)]
pub struct FeaturesResponse {
    /// Normalized feature vector
    pub features: Vec<f32>,
}

/// POST /process_audio
///
/// Extract a normalized feature vector from an uploaded audio file.
pub async fn process_audio(
    State(_state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<FeaturesResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("audio") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let extension = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| {
                ApiError::BadRequest(format!("file name has no extension: {file_name:?}"))
            })?;

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ApiError::BadRequest(format!(
                "unsupported file format: .{extension} (expected one of {ALLOWED_EXTENSIONS:?})"
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;

        info!(file = %file_name, size = bytes.len(), "processing audio upload");

        let features =
            tokio::task::spawn_blocking(move || timbral_dsp::extract(&bytes, Some(&extension)))
                .await
                .map_err(|e| ApiError::Internal(format!("extraction task failed: {e}")))??;

        return Ok(Json(FeaturesResponse { features }));
    }

    Err(ApiError::BadRequest("no audio file provided".to_string()))
}

/// Build audio processing routes
pub fn process_routes() -> Router<AppState> {
    Router::new().route("/process_audio", post(process_audio))
}
