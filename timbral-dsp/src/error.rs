//! Error types for the feature-extraction pipeline

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors produced by the feature-extraction pipeline
///
/// All errors are terminal for the request that triggered them; inputs are
/// not transient-failure-prone, so no retry semantics are offered.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The byte stream is not a recognized or parseable audio container
    #[error("decode error: {0}")]
    Decode(String),

    /// The waveform is too short to produce at least one analysis frame
    #[error("transform error: {0}")]
    Transform(String),

    /// Zero-variance input (e.g. silence), which cannot be normalized
    #[error("degenerate input: {0}")]
    DegenerateInput(String),
}
