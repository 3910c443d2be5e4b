//! Error types for the ContextForge domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all ContextForge operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Model gateway errors ---
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    // --- Multi-pass processing errors ---
    #[error("Multi-pass error: {0}")]
    MultiPass(#[from] MultiPassError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures from the language-model gateway collaborator.
///
/// Transport and rate-limit failures propagate through the engine
/// unchanged; the engine never retries on its own.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by gateway, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Gateway not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures from the multi-pass segmenter/executor.
///
/// Every variant identifies the failing phase so callers can tell
/// "segment 3 of 5" apart from "aggregation".
#[derive(Debug, Error)]
pub enum MultiPassError {
    #[error("Multi-pass processing is disabled in configuration")]
    Disabled,

    #[error("No segments to process (empty chunk stream)")]
    NoSegments,

    #[error("Segment {index} of {total} failed: {source}")]
    SegmentFailed {
        index: usize,
        total: usize,
        #[source]
        source: GatewayError,
    },

    #[error("Aggregation pass failed: {source}")]
    AggregationFailed {
        #[source]
        source: GatewayError,
    },

    #[error("Invalid multi-pass configuration: {0}")]
    InvalidConfig(String),
}
