//! Persisted key-value store errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during key-value store operations.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum StoreError {
    /// Read failed (I/O, permissions).
    #[error("Store read error for {key}: {message}")]
    ReadError {
        /// Key that was being read
        key: String,
        /// Description of the read failure
        message: String,
    },

    /// Write failed (I/O, permissions, disk full).
    #[error("Store write error for {key}: {message}")]
    WriteError {
        /// Key that was being written
        key: String,
        /// Description of the write failure
        message: String,
    },

    /// Stored value could not be decoded.
    #[error("Store parse error for {key}: {message}")]
    ParseError {
        /// Key whose value failed to parse
        key: String,
        /// Description of the parse failure
        message: String,
    },
}
