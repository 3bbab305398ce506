//! Endpoint selection and outcome reporting.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crosspost_types::ApiOperation;

use super::evaluator::{is_healthy, score};
use super::store::HealthStore;
use super::types::{
    EndpointHealth, EndpointHealthDetail, EndpointStatus, OverallStatus, PlatformHealthReport,
    RouterConfig,
};
use crate::error::RelayResult;
use crate::platforms::PlatformRegistry;
use crate::probe::EndpointProbe;
use crate::storage::KeyValueStore;

/// Routes outbound API calls across a platform's candidate endpoints.
///
/// Selection and outcome reporting run under a per-platform async mutex so
/// the load → classify → persist sequence is a single logical step within
/// this process. Cross-process writers race at the store level; see
/// [`KeyValueStore`].
pub struct EndpointRouter {
    pub(super) health: HealthStore,
    pub(super) probe: Arc<dyn EndpointProbe>,
    pub(super) registry: Arc<PlatformRegistry>,
    pub(super) config: RouterConfig,
    platform_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl EndpointRouter {
    /// Create a router with default configuration.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        probe: Arc<dyn EndpointProbe>,
        registry: Arc<PlatformRegistry>,
    ) -> Self {
        Self::with_config(store, probe, registry, RouterConfig::default())
    }

    /// Create a router with custom configuration.
    pub fn with_config(
        store: Arc<dyn KeyValueStore>,
        probe: Arc<dyn EndpointProbe>,
        registry: Arc<PlatformRegistry>,
        config: RouterConfig,
    ) -> Self {
        Self {
            health: HealthStore::new(store),
            probe,
            registry,
            config,
            platform_locks: DashMap::new(),
        }
    }

    pub(super) fn lock_for(&self, platform: &str) -> Arc<Mutex<()>> {
        self.platform_locks
            .entry(platform.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Pick the best endpoint for an outbound call, or `None` when nothing
    /// is currently available.
    ///
    /// Healthy candidates are ranked by score, ties broken by candidate list
    /// order. With no healthy candidate, exactly one recovery probe is spent
    /// on the least-bad unhealthy candidate. `operation` does not alter the
    /// candidate set yet; it is part of the contract for future extension.
    pub async fn select_endpoint(
        &self,
        platform: &str,
        operation: ApiOperation,
    ) -> RelayResult<Option<String>> {
        let candidates = self.registry.endpoints_for(platform);
        if candidates.is_empty() {
            return Ok(None);
        }

        let lock = self.lock_for(platform);
        let _guard = lock.lock().await;

        let mut map = self.health.load(platform).await?;
        let now = chrono::Utc::now().timestamp();

        let (healthy, unhealthy): (Vec<String>, Vec<String>) = candidates
            .into_iter()
            .partition(|url| is_healthy(map.get(url), now, &self.config));

        if !healthy.is_empty() {
            let best = self.pick_best(healthy, &map, now);
            tracing::debug!(platform, %operation, endpoint = %best, "Selected healthy endpoint");
            return Ok(Some(best));
        }

        tracing::debug!(
            platform,
            %operation,
            unhealthy = unhealthy.len(),
            "No healthy endpoint, attempting recovery"
        );
        self.attempt_recovery(platform, &mut map, unhealthy, now).await
    }

    fn pick_best(
        &self,
        healthy: Vec<String>,
        map: &std::collections::HashMap<String, EndpointHealth>,
        now: i64,
    ) -> String {
        if healthy.len() == 1 {
            return healthy.into_iter().next().unwrap_or_default();
        }

        let default_record = EndpointHealth::default();
        let mut scored: Vec<(String, i64)> = healthy
            .into_iter()
            .map(|url| {
                let record = map.get(&url).unwrap_or(&default_record);
                (url, score(record, now, &self.config))
            })
            .collect();

        // Stable descending sort: equal scores keep candidate list order, so
        // the first listed endpoint wins ties.
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().next().map(|(url, _)| url).unwrap_or_default()
    }

    /// Report a successful call against an endpoint.
    pub async fn report_success(&self, platform: &str, endpoint: &str) -> RelayResult<()> {
        let lock = self.lock_for(platform);
        let _guard = lock.lock().await;

        let mut map = self.health.load(platform).await?;
        let now = chrono::Utc::now().timestamp();

        let record = map.entry(endpoint.to_string()).or_default();
        let was_unhealthy = record.status == EndpointStatus::Unhealthy;
        record.record_success(now);

        if was_unhealthy {
            tracing::info!("🔄 Endpoint {} ({}) recovered after successful call", endpoint, platform);
        }

        self.health.save(platform, &map).await
    }

    /// Report a failed call against an endpoint.
    pub async fn report_failure(
        &self,
        platform: &str,
        endpoint: &str,
        message: &str,
    ) -> RelayResult<()> {
        let lock = self.lock_for(platform);
        let _guard = lock.lock().await;

        let mut map = self.health.load(platform).await?;
        let now = chrono::Utc::now().timestamp();

        let record = map.entry(endpoint.to_string()).or_default();
        let demoted = record.record_failure(now, message, self.config.failure_threshold);
        let failures = record.failure_count;

        if demoted {
            tracing::warn!(
                "⛔ Endpoint {} ({}) marked unhealthy: {} consecutive failures (threshold: {}). \
                 Last error: {}",
                endpoint,
                platform,
                failures,
                self.config.failure_threshold,
                message
            );
        } else {
            tracing::debug!(platform, endpoint, failures, error = message, "Endpoint failure recorded");
        }

        self.health.save(platform, &map).await
    }

    /// Health summary over the union of configured candidates and tracked
    /// records. `Unhealthy` means nothing is currently selectable.
    pub async fn get_platform_health(&self, platform: &str) -> RelayResult<PlatformHealthReport> {
        let lock = self.lock_for(platform);
        let _guard = lock.lock().await;

        let map = self.health.load(platform).await?;
        let now = chrono::Utc::now().timestamp();

        let mut endpoints = self.registry.endpoints_for(platform);
        let mut extras: Vec<String> =
            map.keys().filter(|url| !endpoints.contains(url)).cloned().collect();
        extras.sort();
        endpoints.extend(extras);

        let details: Vec<EndpointHealthDetail> = endpoints
            .into_iter()
            .map(|url| {
                let record = map.get(&url);
                let available = is_healthy(record, now, &self.config);
                let record = record.cloned().unwrap_or_default();
                let recovery_remaining_seconds = record
                    .unhealthy_since
                    .map(|since| (self.config.recovery_secs - (now - since)).max(0));

                EndpointHealthDetail {
                    available,
                    score: score(&record, now, &self.config),
                    status: record.status,
                    failure_count: record.failure_count,
                    success_count: record.success_count,
                    last_success: record.last_success,
                    last_failure: record.last_failure,
                    last_error: record.last_error,
                    unhealthy_since: record.unhealthy_since,
                    recovery_remaining_seconds,
                    endpoint: url,
                }
            })
            .collect();

        let unavailable = details.iter().filter(|d| !d.available).count();
        let overall_status = if details.is_empty() || unavailable == 0 {
            OverallStatus::Healthy
        } else if unavailable == details.len() {
            OverallStatus::Unhealthy
        } else {
            OverallStatus::Degraded
        };

        Ok(PlatformHealthReport { platform: platform.to_string(), overall_status, endpoints: details })
    }

    /// Clear one endpoint's record, or all of a platform's records.
    pub async fn reset_health(&self, platform: &str, endpoint: Option<&str>) -> RelayResult<()> {
        let lock = self.lock_for(platform);
        let _guard = lock.lock().await;

        match endpoint {
            Some(endpoint) => {
                let mut map = self.health.load(platform).await?;
                if map.remove(endpoint).is_some() {
                    tracing::info!(platform, endpoint, "Endpoint health record reset");
                }
                self.health.save(platform, &map).await
            }
            None => {
                tracing::info!(platform, "All endpoint health records reset");
                self.health.clear(platform).await
            }
        }
    }

    /// Manually return a demoted endpoint to rotation, bypassing probing.
    /// Returns `true` if a record existed and was reset.
    pub async fn force_recover(&self, platform: &str, endpoint: &str) -> RelayResult<bool> {
        let lock = self.lock_for(platform);
        let _guard = lock.lock().await;

        let mut map = self.health.load(platform).await?;
        let Some(record) = map.get_mut(endpoint) else {
            return Ok(false);
        };

        record.reset_recovered(chrono::Utc::now().timestamp());
        self.health.save(platform, &map).await?;

        tracing::info!("✅ Endpoint {} ({}) manually re-enabled", endpoint, platform);
        Ok(true)
    }
}
