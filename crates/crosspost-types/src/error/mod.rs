//! Typed error definitions for Crosspost.
//!
//! This module provides a structured error hierarchy with specific error types
//! for different domains. All errors are designed to be:
//!
//! - **Serializable** for API responses via serde
//! - **Displayable** for logging via Display trait
//! - **Matchable** for error handling logic via enum variants
//! - **Composable** via thiserror derive macros

mod auth;
mod platform;
mod store;

pub use auth::AuthError;
pub use platform::PlatformError;
pub use store::StoreError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type that wraps all domain-specific errors.
///
/// Use this when you need a single error type that can represent
/// any Crosspost error.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "domain", content = "error")]
pub enum TypedError {
    /// Wraps a platform configuration error
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Wraps a persisted-store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Wraps an authentication error
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

/// Standard Result type using TypedError.
pub type Result<T> = std::result::Result<T, TypedError>;
