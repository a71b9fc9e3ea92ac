//! timbral-api library interface
//!
//! Exposes the application state and router for integration testing.

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};

/// Maximum accepted upload size (32 MiB)
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Application state shared across handlers
///
/// The pipeline itself is stateless; the only process-wide state is the
/// startup timestamp used for uptime reporting.
#[derive(Clone)]
pub struct AppState {
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create state stamped with the current time
    pub fn new() -> Self {
        Self {
            startup_time: Utc::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::process_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
