//! Core domain models for Crosspost.
//!
//! This module contains the shared data structures used across the Crosspost
//! ecosystem.

mod platform;

// Re-export all models
pub use platform::{ApiOperation, AuthMethod, PlatformAuthConfig, PlatformConfig};
