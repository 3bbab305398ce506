//! Recovery probing and the comprehensive health sweep.

use std::collections::HashMap;
use std::time::Duration;

use super::selector::EndpointRouter;
use super::types::{EndpointCheckResult, EndpointHealth, HealthCheckReport};
use crate::error::RelayResult;

impl EndpointRouter {
    /// Try to reinstate one unhealthy endpoint.
    ///
    /// Candidates are ranked "least bad, longest waiting": ascending failure
    /// count, ties broken by oldest last failure. Exactly the top candidate
    /// is probed; a failed probe means "nothing available this attempt" and
    /// never cascades to the next candidate, which bounds the cost of
    /// serving a request while a platform is degraded.
    ///
    /// Called with the platform lock already held.
    pub(super) async fn attempt_recovery(
        &self,
        platform: &str,
        map: &mut HashMap<String, EndpointHealth>,
        mut unhealthy: Vec<String>,
        now: i64,
    ) -> RelayResult<Option<String>> {
        if unhealthy.is_empty() {
            return Ok(None);
        }

        unhealthy.sort_by_key(|url| {
            let record = map.get(url);
            (
                record.map_or(0, |r| r.failure_count),
                record.and_then(|r| r.last_failure).unwrap_or(i64::MIN),
            )
        });

        let candidate = match unhealthy.into_iter().next() {
            Some(url) => url,
            None => return Ok(None),
        };

        let timeout = Duration::from_secs(self.config.probe_timeout_secs);
        match self.probe.get(&candidate, timeout).await {
            Ok(response) if response.is_success() => {
                map.entry(candidate.clone()).or_default().reset_recovered(now);
                self.health.save(platform, map).await?;

                tracing::info!(
                    "🔄 Endpoint {} ({}) recovered via probe, returning to rotation",
                    candidate,
                    platform
                );
                Ok(Some(candidate))
            }
            Ok(response) => {
                tracing::debug!(
                    platform,
                    endpoint = %candidate,
                    status = response.status,
                    "Recovery probe failed"
                );
                Ok(None)
            }
            Err(e) => {
                tracing::debug!(platform, endpoint = %candidate, error = %e, "Recovery probe failed");
                Ok(None)
            }
        }
    }

    /// Probe every configured candidate for a platform and persist a
    /// diagnostic report.
    ///
    /// The report lives next to, but never feeds, the health map used for
    /// selection: a scheduled sweep must not push endpoints in or out of
    /// rotation behind the feedback loop's back.
    pub async fn run_comprehensive_health_check(
        &self,
        platform: &str,
    ) -> RelayResult<HealthCheckReport> {
        let candidates = self.registry.endpoints_for(platform);
        let timeout = Duration::from_secs(self.config.probe_timeout_secs);
        let mut results = Vec::with_capacity(candidates.len());

        for endpoint in candidates {
            let started = std::time::Instant::now();
            let result = match self.probe.get(&endpoint, timeout).await {
                Ok(response) => EndpointCheckResult {
                    healthy: response.is_success(),
                    status_code: Some(response.status),
                    latency_ms: started.elapsed().as_millis() as u64,
                    error: None,
                    endpoint,
                },
                Err(e) => EndpointCheckResult {
                    healthy: false,
                    status_code: None,
                    latency_ms: started.elapsed().as_millis() as u64,
                    error: Some(e.to_string()),
                    endpoint,
                },
            };
            results.push(result);
        }

        let healthy = results.iter().filter(|r| r.healthy).count();
        tracing::info!(
            platform,
            healthy,
            total = results.len(),
            "Comprehensive health check complete"
        );

        let report = HealthCheckReport {
            platform: platform.to_string(),
            checked_at: chrono::Utc::now().timestamp(),
            results,
        };
        self.health.save_report(platform, &report).await?;

        Ok(report)
    }

    /// Last persisted comprehensive health-check report, if any.
    pub async fn last_health_check(&self, platform: &str) -> RelayResult<Option<HealthCheckReport>> {
        self.health.load_report(platform).await
    }
}
