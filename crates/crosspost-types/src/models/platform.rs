//! Platform configuration models.
//!
//! A platform is a named external publishing service (twitter, mastodon,
//! linkedin, ...). Its configuration is static data: an ordered list of
//! candidate API base URLs plus the auth settings needed to rebuild an
//! authorization flow. Nothing here is mutated at runtime.

use serde::{Deserialize, Serialize};

/// Alternative authentication methods a platform may declare, tried in
/// declared order when the primary OAuth credentials are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Single static API key
    ApiKey,
    /// Application id + secret pair
    AppSecret,
    /// User-supplied long-lived token
    ManualToken,
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMethod::ApiKey => write!(f, "api_key"),
            AuthMethod::AppSecret => write!(f, "app_secret"),
            AuthMethod::ManualToken => write!(f, "manual_token"),
        }
    }
}

/// Kind of outbound API call an endpoint is being selected for.
///
/// Selection does not currently vary by operation; the parameter is part of
/// the contract so per-operation candidate sets can be added without
/// breaking callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiOperation {
    /// Read calls (timelines, profile lookups, analytics)
    Read,
    /// Post/status publishing
    Publish,
    /// Media upload
    Media,
}

impl std::fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiOperation::Read => write!(f, "read"),
            ApiOperation::Publish => write!(f, "publish"),
            ApiOperation::Media => write!(f, "media"),
        }
    }
}

/// Authorization settings for one platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformAuthConfig {
    /// Authorization endpoint the user is sent to for manual re-auth.
    pub auth_url: String,

    /// OAuth client id registered with the platform.
    pub client_id: String,

    /// Redirect URI registered with the platform.
    pub redirect_uri: String,

    /// Scopes requested during authorization.
    pub scopes: Vec<String>,

    /// Fallback methods to try when credentials are rejected, in order.
    pub alternative_auth_methods: Vec<AuthMethod>,
}

/// Static configuration for one platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Platform identifier (lowercase, e.g. "twitter").
    pub id: String,

    /// Ordered candidate API base URLs. List order is the deterministic
    /// tie-break during selection: earlier entries win on equal scores.
    pub endpoints: Vec<String>,

    /// Authorization settings.
    pub auth: PlatformAuthConfig,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_method_serde_roundtrip() {
        let json = serde_json::to_string(&AuthMethod::AppSecret).unwrap();
        assert_eq!(json, "\"app_secret\"");

        let back: AuthMethod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AuthMethod::AppSecret);
    }

    #[test]
    fn test_auth_method_display_matches_serde() {
        assert_eq!(AuthMethod::ApiKey.to_string(), "api_key");
        assert_eq!(AuthMethod::ManualToken.to_string(), "manual_token");
    }

    #[test]
    fn test_platform_config_defaults() {
        let config: PlatformConfig = serde_json::from_str("{}").unwrap();
        assert!(config.id.is_empty());
        assert!(config.endpoints.is_empty());
        assert!(config.auth.alternative_auth_methods.is_empty());
    }
}
