//! Authentication fallback handling.
//!
//! When a platform rejects the stored credentials, the controller wipes the
//! rejected credential material and either tries the platform's declared
//! alternative auth methods or hands the caller a fresh re-authorization URL
//! with an anti-replay state token. Every auth failure resolves to one of
//! those two structured outcomes; nothing is silently dropped.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crosspost_types::{AuthMethod, PlatformAuthConfig};

use crate::error::{RelayError, RelayResult};
use crate::platforms::PlatformRegistry;
use crate::storage::KeyValueStore;

fn tokens_key(platform: &str) -> String {
    format!("{platform}_tokens")
}

fn auth_state_key(platform: &str) -> String {
    format!("{platform}_auth_state")
}

fn code_verifier_key(platform: &str) -> String {
    format!("{platform}_code_verifier")
}

/// How declared alternative auth methods are walked.
///
/// The historical behavior is [`FallbackPolicy::FirstDeclared`]: only the
/// first declared method is attempted, whatever its outcome. The policy is
/// explicit so deployments can opt into the stricter walk instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Attempt only the first declared method; its result is final.
    #[default]
    FirstDeclared,
    /// Attempt methods in declared order until one succeeds.
    AllInOrder,
}

/// Outcome of attempting one alternative auth method.
#[derive(Debug, Clone, Serialize)]
pub struct MethodAttempt {
    pub method: AuthMethod,
    pub succeeded: bool,
    /// Human-readable detail for logs/UI.
    pub detail: Option<String>,
}

/// Terminal outcome of auth-failure handling.
#[derive(Debug, Clone, Serialize)]
pub struct AuthFallbackResult {
    pub platform: String,
    /// Whether any alternative method was declared (and therefore attempted).
    pub fallback_available: bool,
    /// Attempts made, in order. Empty when no alternatives were declared.
    pub attempts: Vec<MethodAttempt>,
    /// Fresh re-authorization URL when manual re-auth is required.
    pub retry_url: Option<String>,
}

impl AuthFallbackResult {
    /// True if some attempted method succeeded.
    pub fn authenticated(&self) -> bool {
        self.attempts.iter().any(|a| a.succeeded)
    }
}

/// Attempts one alternative auth method for a platform.
///
/// The actual platform authentication semantics live with the caller; the
/// routing core only decides *which* method to try and in what order.
#[async_trait]
pub trait FallbackAuthenticator: Send + Sync {
    async fn attempt(&self, platform: &str, method: AuthMethod) -> RelayResult<MethodAttempt>;
}

/// Default authenticator: a method succeeds when its credential material is
/// present (and non-empty) in the key-value store.
pub struct StoredCredentialAuthenticator {
    store: Arc<dyn KeyValueStore>,
}

impl StoredCredentialAuthenticator {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn has_value(&self, key: &str) -> RelayResult<bool> {
        Ok(self.store.get(key).await?.is_some_and(|v| !v.trim().is_empty()))
    }
}

#[async_trait]
impl FallbackAuthenticator for StoredCredentialAuthenticator {
    async fn attempt(&self, platform: &str, method: AuthMethod) -> RelayResult<MethodAttempt> {
        let succeeded = match method {
            AuthMethod::ApiKey => self.has_value(&format!("{platform}_api_key")).await?,
            AuthMethod::AppSecret => {
                self.has_value(&format!("{platform}_app_id")).await?
                    && self.has_value(&format!("{platform}_app_secret")).await?
            }
            AuthMethod::ManualToken => self.has_value(&format!("{platform}_manual_token")).await?,
        };

        let detail = if succeeded {
            None
        } else {
            Some(format!("no stored {method} credentials for {platform}"))
        };

        Ok(MethodAttempt { method, succeeded, detail })
    }
}

/// Reacts to rejected credentials for a platform.
pub struct AuthFallbackController {
    store: Arc<dyn KeyValueStore>,
    registry: Arc<PlatformRegistry>,
    authenticator: Arc<dyn FallbackAuthenticator>,
    policy: FallbackPolicy,
}

impl AuthFallbackController {
    /// Controller with the stored-credential authenticator and the
    /// historical first-declared-only policy.
    pub fn new(store: Arc<dyn KeyValueStore>, registry: Arc<PlatformRegistry>) -> Self {
        let authenticator = Arc::new(StoredCredentialAuthenticator::new(store.clone()));
        Self { store, registry, authenticator, policy: FallbackPolicy::default() }
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_authenticator(mut self, authenticator: Arc<dyn FallbackAuthenticator>) -> Self {
        self.authenticator = authenticator;
        self
    }

    /// Handle rejected credentials for a platform.
    ///
    /// Stored credential material (tokens, auth state, PKCE verifier) is
    /// cleared unconditionally before anything else: the session cannot be
    /// salvaged once the platform has rejected it.
    pub async fn handle_auth_failure(
        &self,
        platform: &str,
        error: &str,
    ) -> RelayResult<AuthFallbackResult> {
        tracing::warn!(platform, error, "Authentication failure, clearing stored credentials");
        self.clear_credentials(platform).await?;

        let Some(auth) = self.registry.auth_for(platform) else {
            tracing::warn!(platform, "No auth configuration, manual re-auth is not possible");
            return Ok(AuthFallbackResult {
                platform: platform.to_string(),
                fallback_available: false,
                attempts: Vec::new(),
                retry_url: None,
            });
        };

        if !auth.alternative_auth_methods.is_empty() {
            let attempts = self.walk_alternatives(platform, &auth.alternative_auth_methods).await?;
            return Ok(AuthFallbackResult {
                platform: platform.to_string(),
                fallback_available: true,
                attempts,
                retry_url: None,
            });
        }

        let state = uuid::Uuid::new_v4().simple().to_string();
        self.store.set(&auth_state_key(platform), &state).await?;
        let retry_url = build_retry_url(platform, auth, &state)?;

        tracing::info!(platform, "No fallback methods declared, manual re-auth required");
        Ok(AuthFallbackResult {
            platform: platform.to_string(),
            fallback_available: false,
            attempts: Vec::new(),
            retry_url: Some(retry_url),
        })
    }

    /// Compare a presented anti-replay state token against the stored one.
    /// Unknown or already-consumed states never validate.
    pub async fn validate_auth_state(&self, platform: &str, state: &str) -> RelayResult<bool> {
        let stored = self.store.get(&auth_state_key(platform)).await?;
        Ok(stored.as_deref() == Some(state) && !state.is_empty())
    }

    async fn clear_credentials(&self, platform: &str) -> RelayResult<()> {
        for key in [tokens_key(platform), auth_state_key(platform), code_verifier_key(platform)] {
            self.store.delete(&key).await?;
        }
        Ok(())
    }

    async fn walk_alternatives(
        &self,
        platform: &str,
        methods: &[AuthMethod],
    ) -> RelayResult<Vec<MethodAttempt>> {
        let mut attempts = Vec::new();

        match self.policy {
            FallbackPolicy::FirstDeclared => {
                if let Some(&method) = methods.first() {
                    tracing::info!(platform, %method, "Attempting fallback auth method");
                    attempts.push(self.authenticator.attempt(platform, method).await?);
                }
            }
            FallbackPolicy::AllInOrder => {
                for &method in methods {
                    tracing::info!(platform, %method, "Attempting fallback auth method");
                    let attempt = self.authenticator.attempt(platform, method).await?;
                    let succeeded = attempt.succeeded;
                    attempts.push(attempt);
                    if succeeded {
                        break;
                    }
                }
            }
        }

        Ok(attempts)
    }
}

/// Build a re-authorization URL from the platform auth settings.
fn build_retry_url(
    platform: &str,
    auth: &PlatformAuthConfig,
    state: &str,
) -> RelayResult<String> {
    let mut url = url::Url::parse(&auth.auth_url)
        .map_err(|e| RelayError::Auth(format!("Invalid auth_url for {platform}: {e}")))?;

    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &auth.client_id)
        .append_pair("redirect_uri", &auth.redirect_uri)
        .append_pair("scope", &auth.scopes.join(" "))
        .append_pair("state", state);

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosspost_types::PlatformConfig;

    use crate::storage::MemoryStore;

    fn registry_with(methods: Vec<AuthMethod>) -> Arc<PlatformRegistry> {
        let mut registry = PlatformRegistry::empty();
        registry.register(PlatformConfig {
            id: "twitter".to_string(),
            endpoints: vec!["https://api.twitter.com/2".to_string()],
            auth: PlatformAuthConfig {
                auth_url: "https://twitter.com/i/oauth2/authorize".to_string(),
                client_id: "client-123".to_string(),
                redirect_uri: "https://app.example.test/callback".to_string(),
                scopes: vec!["tweet.write".to_string(), "offline.access".to_string()],
                alternative_auth_methods: methods,
            },
        });
        Arc::new(registry)
    }

    async fn seed_primary_credentials(store: &MemoryStore) {
        store.set("twitter_tokens", "{\"access\":\"old\"}").await.unwrap();
        store.set("twitter_auth_state", "old-state").await.unwrap();
        store.set("twitter_code_verifier", "old-verifier").await.unwrap();
    }

    #[tokio::test]
    async fn test_credentials_cleared_unconditionally() {
        let store = Arc::new(MemoryStore::new());
        seed_primary_credentials(&store).await;

        let controller =
            AuthFallbackController::new(store.clone(), registry_with(vec![AuthMethod::ApiKey]));
        controller.handle_auth_failure("twitter", "401 invalid_token").await.unwrap();

        assert_eq!(store.get("twitter_tokens").await.unwrap(), None);
        assert_eq!(store.get("twitter_auth_state").await.unwrap(), None);
        assert_eq!(store.get("twitter_code_verifier").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_first_declared_method_is_attempted() {
        let store = Arc::new(MemoryStore::new());
        store.set("twitter_api_key", "key-abc").await.unwrap();

        let controller =
            AuthFallbackController::new(store, registry_with(vec![AuthMethod::ApiKey]));
        let result = controller.handle_auth_failure("twitter", "401").await.unwrap();

        assert!(result.fallback_available);
        assert!(result.authenticated());
        assert_eq!(result.attempts.len(), 1);
        assert_eq!(result.attempts[0].method, AuthMethod::ApiKey);
        assert_eq!(result.retry_url, None);
    }

    #[tokio::test]
    async fn test_first_declared_policy_stops_after_one_attempt() {
        let store = Arc::new(MemoryStore::new());
        // Only the second declared method has credentials.
        store.set("twitter_manual_token", "tok").await.unwrap();

        let controller = AuthFallbackController::new(
            store,
            registry_with(vec![AuthMethod::ApiKey, AuthMethod::ManualToken]),
        );
        let result = controller.handle_auth_failure("twitter", "401").await.unwrap();

        // Historical behavior: the failing first method is final.
        assert!(result.fallback_available);
        assert!(!result.authenticated());
        assert_eq!(result.attempts.len(), 1);
        assert_eq!(result.attempts[0].method, AuthMethod::ApiKey);
        assert!(result.attempts[0].detail.as_deref().unwrap().contains("api_key"));
    }

    #[tokio::test]
    async fn test_all_in_order_policy_walks_until_success() {
        let store = Arc::new(MemoryStore::new());
        store.set("twitter_manual_token", "tok").await.unwrap();

        let controller = AuthFallbackController::new(
            store,
            registry_with(vec![AuthMethod::ApiKey, AuthMethod::ManualToken]),
        )
        .with_policy(FallbackPolicy::AllInOrder);
        let result = controller.handle_auth_failure("twitter", "401").await.unwrap();

        assert!(result.authenticated());
        assert_eq!(result.attempts.len(), 2);
        assert!(!result.attempts[0].succeeded);
        assert!(result.attempts[1].succeeded);
        assert_eq!(result.attempts[1].method, AuthMethod::ManualToken);
    }

    #[tokio::test]
    async fn test_app_secret_requires_both_halves() {
        let store = Arc::new(MemoryStore::new());
        store.set("twitter_app_id", "app-1").await.unwrap();
        // app_secret missing

        let controller =
            AuthFallbackController::new(store.clone(), registry_with(vec![AuthMethod::AppSecret]));
        let result = controller.handle_auth_failure("twitter", "401").await.unwrap();
        assert!(!result.authenticated());

        store.set("twitter_app_secret", "s3cret").await.unwrap();
        let result = controller.handle_auth_failure("twitter", "401").await.unwrap();
        assert!(result.authenticated());
    }

    #[tokio::test]
    async fn test_no_alternatives_yields_retry_url() {
        let store = Arc::new(MemoryStore::new());
        seed_primary_credentials(&store).await;

        let controller = AuthFallbackController::new(store.clone(), registry_with(vec![]));
        let result = controller.handle_auth_failure("twitter", "401").await.unwrap();

        assert!(!result.fallback_available);
        assert!(result.attempts.is_empty());

        let url = result.retry_url.unwrap();
        assert!(url.starts_with("https://twitter.com/i/oauth2/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("scope=tweet.write+offline.access"));

        // The fresh state token is persisted for later validation and is not
        // the one that was just cleared.
        let stored_state = store.get("twitter_auth_state").await.unwrap().unwrap();
        assert_ne!(stored_state, "old-state");
        assert!(url.contains(&format!("state={stored_state}")));
        assert!(controller.validate_auth_state("twitter", &stored_state).await.unwrap());
        assert!(!controller.validate_auth_state("twitter", "old-state").await.unwrap());
    }

    #[tokio::test]
    async fn test_state_tokens_are_fresh_per_failure() {
        let store = Arc::new(MemoryStore::new());
        let controller = AuthFallbackController::new(store, registry_with(vec![]));

        let first = controller.handle_auth_failure("twitter", "401").await.unwrap();
        let second = controller.handle_auth_failure("twitter", "401").await.unwrap();
        assert_ne!(first.retry_url, second.retry_url);
    }

    #[tokio::test]
    async fn test_unknown_platform_has_no_retry_url() {
        let store = Arc::new(MemoryStore::new());
        let controller = AuthFallbackController::new(store, Arc::new(PlatformRegistry::empty()));

        let result = controller.handle_auth_failure("friendster", "401").await.unwrap();
        assert!(!result.fallback_available);
        assert_eq!(result.retry_url, None);
    }
}
