//! Platform-configuration errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while resolving platform configuration.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum PlatformError {
    /// Platform identifier has no registered configuration.
    ///
    /// Selection never hard-fails on this: unknown platforms fall back to a
    /// generic candidate list. The variant exists for surfaces that need to
    /// distinguish "configured" from "guessed".
    #[error("Unknown platform: {id}")]
    UnknownPlatform {
        /// Platform identifier that failed to resolve
        id: String,
    },

    /// Platform exists but declares no candidate endpoints.
    #[error("Platform {id} has no configured endpoints")]
    NoEndpoints {
        /// Platform identifier
        id: String,
    },

    /// Platform auth configuration is incomplete for the requested flow.
    #[error("Platform {id} auth config missing {field}")]
    IncompleteAuthConfig {
        /// Platform identifier
        id: String,
        /// Name of the missing auth field
        field: String,
    },
}
