//! Unified error types for Crosspost Core.

use serde::Serialize;
use thiserror::Error;

/// Main error type for all Crosspost routing operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RelayError {
    /// Network request failed (HTTP client).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// File system I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Persisted key-value store operation failed.
    #[error("Store error: {0}")]
    Store(String),

    /// Authentication fallback handling failed.
    #[error("Auth error: {0}")]
    Auth(String),

    /// Platform configuration problem.
    #[error("Platform error: {0}")]
    Platform(String),

    /// Unclassified error with message.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl Serialize for RelayError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Result type alias for Crosspost routing operations.
pub type RelayResult<T> = Result<T, RelayError>;

impl From<String> for RelayError {
    fn from(s: String) -> Self {
        RelayError::Unknown(s)
    }
}

impl From<&str> for RelayError {
    fn from(s: &str) -> Self {
        RelayError::Unknown(s.to_string())
    }
}
