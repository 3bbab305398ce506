//! # Crosspost Types
//!
//! Core types, models, and error definitions for Crosspost.
//!
//! This crate provides the foundational type system for the Crosspost
//! ecosystem:
//!
//! - **`error`** - Typed error hierarchy for platforms, storage, and auth
//! - **`models`** - Domain models (platform configuration, auth settings)
//!
//! All types are designed to be:
//! - **Serializable** via serde for API/IPC
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and comparison

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{AuthError, PlatformError, Result, StoreError, TypedError};

// Re-export core model types
pub use models::{ApiOperation, AuthMethod, PlatformAuthConfig, PlatformConfig};
