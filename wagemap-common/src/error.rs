//! Common error types for wagemap

use thiserror::Error;

/// Common result type for wagemap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the pipeline stages
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP transport error (retriable)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Provider signaled a rate-limit / quota threshold (never retried)
    #[error("Provider rate limit: {0}")]
    RateLimited(String),

    /// Payload did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required provider credential is not configured
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for transient failures the batch client may retry
    pub fn is_retriable(&self) -> bool {
        matches!(self, Error::Http(_))
    }
}
