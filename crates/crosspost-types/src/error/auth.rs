//! Authentication errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during authentication fallback handling.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum AuthError {
    /// The platform rejected the stored credentials.
    #[error("Credentials rejected for {platform}: {message}")]
    CredentialsRejected {
        /// Platform identifier
        platform: String,
        /// Rejection detail from the platform
        message: String,
    },

    /// A fallback method was declared but its credential material is absent.
    #[error("No stored credentials for {platform} method {method}")]
    MissingCredentials {
        /// Platform identifier
        platform: String,
        /// Declared fallback method name
        method: String,
    },

    /// A re-authentication URL could not be built from the platform config.
    #[error("Cannot build re-auth URL for {platform}: {message}")]
    ReauthUrlError {
        /// Platform identifier
        platform: String,
        /// Description of the failure
        message: String,
    },
}
