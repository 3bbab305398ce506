//! Static per-platform endpoint and auth configuration.
//!
//! Candidate endpoint lists are ordered: list position is the deterministic
//! tie-break when selection scores are equal. Unknown platforms resolve to a
//! generic candidate list derived from the platform id so that selection
//! never hard-fails on configuration.

use std::collections::HashMap;

use crosspost_types::{AuthMethod, PlatformAuthConfig, PlatformConfig};

/// Registry of platform configurations.
///
/// Ships with the built-in publishing platforms; deployments override or
/// extend via [`PlatformRegistry::register`] (typically to fill in their own
/// `client_id`/`redirect_uri`).
#[derive(Debug, Clone)]
pub struct PlatformRegistry {
    platforms: HashMap<String, PlatformConfig>,
}

impl PlatformRegistry {
    /// Registry with the built-in platform set.
    pub fn builtin() -> Self {
        let mut registry = Self { platforms: HashMap::new() };

        registry.register(PlatformConfig {
            id: "twitter".to_string(),
            endpoints: vec![
                "https://api.twitter.com/2".to_string(),
                "https://api.x.com/2".to_string(),
            ],
            auth: PlatformAuthConfig {
                auth_url: "https://twitter.com/i/oauth2/authorize".to_string(),
                scopes: vec![
                    "tweet.read".to_string(),
                    "tweet.write".to_string(),
                    "users.read".to_string(),
                    "offline.access".to_string(),
                ],
                ..Default::default()
            },
        });

        registry.register(PlatformConfig {
            id: "mastodon".to_string(),
            endpoints: vec!["https://mastodon.social/api/v1".to_string()],
            auth: PlatformAuthConfig {
                auth_url: "https://mastodon.social/oauth/authorize".to_string(),
                scopes: vec!["read".to_string(), "write".to_string()],
                alternative_auth_methods: vec![AuthMethod::ManualToken],
                ..Default::default()
            },
        });

        registry.register(PlatformConfig {
            id: "linkedin".to_string(),
            endpoints: vec![
                "https://api.linkedin.com/rest".to_string(),
                "https://api.linkedin.com/v2".to_string(),
            ],
            auth: PlatformAuthConfig {
                auth_url: "https://www.linkedin.com/oauth/v2/authorization".to_string(),
                scopes: vec!["w_member_social".to_string(), "openid".to_string()],
                ..Default::default()
            },
        });

        registry.register(PlatformConfig {
            id: "facebook".to_string(),
            endpoints: vec![
                "https://graph.facebook.com/v19.0".to_string(),
                "https://graph.facebook.com/v18.0".to_string(),
            ],
            auth: PlatformAuthConfig {
                auth_url: "https://www.facebook.com/v19.0/dialog/oauth".to_string(),
                scopes: vec!["pages_manage_posts".to_string(), "pages_read_engagement".to_string()],
                alternative_auth_methods: vec![AuthMethod::AppSecret],
                ..Default::default()
            },
        });

        registry.register(PlatformConfig {
            id: "reddit".to_string(),
            endpoints: vec![
                "https://oauth.reddit.com/api/v1".to_string(),
                "https://www.reddit.com/api/v1".to_string(),
            ],
            auth: PlatformAuthConfig {
                auth_url: "https://www.reddit.com/api/v1/authorize".to_string(),
                scopes: vec!["submit".to_string(), "identity".to_string()],
                alternative_auth_methods: vec![AuthMethod::AppSecret, AuthMethod::ApiKey],
                ..Default::default()
            },
        });

        registry
    }

    /// Empty registry (every lookup falls back to the generic list).
    pub fn empty() -> Self {
        Self { platforms: HashMap::new() }
    }

    /// Register or replace a platform configuration, keyed by its id.
    pub fn register(&mut self, config: PlatformConfig) {
        self.platforms.insert(config.id.clone(), config);
    }

    /// Full configuration for a platform, if registered.
    pub fn get(&self, platform: &str) -> Option<&PlatformConfig> {
        self.platforms.get(platform)
    }

    /// Ordered candidate endpoints for a platform.
    ///
    /// Unknown platforms get a generic default list derived from the id. A
    /// registered platform's list is returned as-is, even when empty: an
    /// explicitly empty list means "no configured endpoints".
    pub fn endpoints_for(&self, platform: &str) -> Vec<String> {
        if let Some(config) = self.platforms.get(platform) {
            return config.endpoints.clone();
        }
        tracing::debug!(platform, "Unregistered platform, using generic candidate list");
        Self::generic_endpoints(platform)
    }

    /// Auth settings for a platform, if registered.
    pub fn auth_for(&self, platform: &str) -> Option<&PlatformAuthConfig> {
        self.platforms.get(platform).map(|c| &c.auth)
    }

    /// Registered platform ids.
    pub fn platform_ids(&self) -> Vec<String> {
        self.platforms.keys().cloned().collect()
    }

    fn generic_endpoints(platform: &str) -> Vec<String> {
        vec![
            format!("https://api.{platform}.com/v2"),
            format!("https://api.{platform}.com/v1"),
            format!("https://api.{platform}.com"),
        ]
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
