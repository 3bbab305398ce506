//! # Crosspost Core
//!
//! Resilient multi-endpoint request routing for Crosspost.
//!
//! Outbound API calls for a platform are routed across multiple candidate
//! endpoints. Per-endpoint health is tracked from reported call outcomes,
//! unhealthy endpoints are demoted and conservatively probed back into
//! rotation, and rejected credentials fall back to alternative auth methods.
//!
//! ```text
//! crosspost-core/src/
//! ├── storage/          # KeyValueStore seam (file- and memory-backed)
//! ├── probe.rs          # EndpointProbe seam (reqwest-backed)
//! ├── platforms.rs      # Static per-platform endpoint/auth registry
//! ├── routing/          # Health store, evaluator, selector, prober
//! └── auth/             # Auth fallback controller
//! ```
//!
//! The HTTP transport used for real API calls, the credential contents, and
//! any UI live outside this crate; callers ask [`routing::EndpointRouter`]
//! for an endpoint before each call and report the outcome back afterwards.

pub mod auth;
pub mod error;
pub mod platforms;
pub mod probe;
pub mod routing;
pub mod storage;

// Re-export commonly used types
pub use auth::{AuthFallbackController, AuthFallbackResult, FallbackPolicy};
pub use error::{RelayError, RelayResult};
pub use platforms::PlatformRegistry;
pub use probe::{EndpointProbe, HttpProbe, ProbeResponse};
pub use routing::{EndpointRouter, RouterConfig};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
