//! Error types for the scan pipeline.

use thiserror::Error;

/// Top-level scan pipeline error.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Cleaning error: {0}")]
    Clean(#[from] CleanError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Market-data fetch errors.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Universe listing failed (auth/network). Not retried; the cycle aborts.
    #[error("Universe fetch failed: {0}")]
    Universe(String),

    /// One bar batch failed. The batch is dropped and the cycle continues.
    #[error("Batch starting at {first_symbol} failed: {message}")]
    Batch {
        first_symbol: String,
        message: String,
    },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Rate limited: retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

/// Panel cleaning errors. Caught inside the cleaner, never propagated.
#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Malformed panel: {0}")]
    MalformedPanel(String),

    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),
}

/// Indicator contract errors. These are caller errors and surface immediately.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;
