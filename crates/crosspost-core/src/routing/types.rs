//! Health tracking types and data structures.

use serde::{Deserialize, Serialize};

/// Stored health status for an endpoint.
///
/// This is the durable state machine field; the evaluator may still treat an
/// `Unhealthy` record as selectable once its recovery window has elapsed.
/// The field itself flips back to `Healthy` only via a success report, a
/// successful recovery probe, or a manual reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointStatus {
    /// Endpoint receives traffic
    Healthy,
    /// Endpoint demoted after consecutive failures
    Unhealthy,
}

impl std::fmt::Display for EndpointStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointStatus::Healthy => write!(f, "healthy"),
            EndpointStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

impl Default for EndpointStatus {
    fn default() -> Self {
        EndpointStatus::Healthy
    }
}

/// Durable health record for a single endpoint, scoped to one platform.
///
/// Created lazily on the first success/failure report; an absent record
/// means "assume healthy". All timestamps are unix seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointHealth {
    /// Consecutive successes since the last failure.
    pub success_count: u32,
    /// Consecutive failures since the last success.
    pub failure_count: u32,
    /// When the endpoint last served a successful call.
    pub last_success: Option<i64>,
    /// When the endpoint last failed a call.
    pub last_failure: Option<i64>,
    /// Last failure message (informational only).
    pub last_error: Option<String>,
    /// Stored status; flips to unhealthy at the failure threshold.
    pub status: EndpointStatus,
    /// When the current unhealthy episode began; gates recovery eligibility.
    pub unhealthy_since: Option<i64>,
}

impl EndpointHealth {
    /// Apply a successful call: bump successes, wipe failure streak, return
    /// the record to healthy.
    pub fn record_success(&mut self, now: i64) {
        self.success_count = self.success_count.saturating_add(1);
        self.last_success = Some(now);
        self.failure_count = 0;
        self.status = EndpointStatus::Healthy;
        self.unhealthy_since = None;
    }

    /// Apply a failed call. Returns `true` when this failure crossed the
    /// threshold and demoted the record.
    ///
    /// `unhealthy_since` is stamped once per unhealthy episode; repeat
    /// failures while already unhealthy leave it untouched.
    pub fn record_failure(&mut self, now: i64, message: &str, failure_threshold: u32) -> bool {
        self.failure_count = self.failure_count.saturating_add(1);
        self.success_count = 0;
        self.last_failure = Some(now);
        self.last_error = Some(truncate_error(message, 500));

        if self.failure_count >= failure_threshold {
            let transitioned = self.status != EndpointStatus::Unhealthy;
            self.status = EndpointStatus::Unhealthy;
            if self.unhealthy_since.is_none() {
                self.unhealthy_since = Some(now);
            }
            return transitioned;
        }
        false
    }

    /// Reset after a successful recovery probe (or manual recovery): the
    /// failure evidence is wiped so the endpoint re-enters rotation cleanly.
    pub fn reset_recovered(&mut self, now: i64) {
        self.status = EndpointStatus::Healthy;
        self.failure_count = 0;
        self.unhealthy_since = None;
        self.last_failure = None;
        self.last_error = None;
        self.last_success = Some(now);
    }
}

/// Configuration for health classification and probing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Consecutive failures before an endpoint is demoted (default: 3)
    pub failure_threshold: u32,
    /// Cooldown after a failure during which the endpoint is skipped even
    /// below the threshold, in seconds (default: 60)
    pub failure_cooldown_secs: i64,
    /// How long a demoted endpoint stays ineligible before the evaluator
    /// considers it again, in seconds (default: 300 = 5 minutes)
    pub recovery_secs: i64,
    /// Age beyond which a last success no longer counts towards the score,
    /// in seconds (default: 3600)
    pub stale_success_secs: i64,
    /// Timeout for recovery probes and comprehensive checks, in seconds
    /// (default: 10)
    pub probe_timeout_secs: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            failure_cooldown_secs: 60,
            recovery_secs: 300, // 5 minutes
            stale_success_secs: 3600,
            probe_timeout_secs: 10,
        }
    }
}

/// Aggregate platform status derived from per-endpoint classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    /// No endpoint is unhealthy
    Healthy,
    /// At least one endpoint is unhealthy, but not all
    Degraded,
    /// Every known endpoint is unhealthy
    Unhealthy,
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverallStatus::Healthy => write!(f, "healthy"),
            OverallStatus::Degraded => write!(f, "degraded"),
            OverallStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Per-endpoint detail in a platform health report.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointHealthDetail {
    pub endpoint: String,
    /// Evaluator verdict: would selection consider this endpoint right now.
    pub available: bool,
    /// Ranking score (meaningful for available endpoints).
    pub score: i64,
    pub status: EndpointStatus,
    pub failure_count: u32,
    pub success_count: u32,
    pub last_success: Option<i64>,
    pub last_failure: Option<i64>,
    pub last_error: Option<String>,
    pub unhealthy_since: Option<i64>,
    /// Seconds until a demoted endpoint becomes eligible again.
    pub recovery_remaining_seconds: Option<i64>,
}

/// Platform-wide health summary.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformHealthReport {
    pub platform: String,
    pub overall_status: OverallStatus,
    pub endpoints: Vec<EndpointHealthDetail>,
}

/// One probe result inside a comprehensive health check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointCheckResult {
    pub endpoint: String,
    /// 2xx within the timeout.
    pub healthy: bool,
    /// HTTP status, when a response came back at all.
    pub status_code: Option<u16>,
    pub latency_ms: u64,
    /// Transport/timeout error, when no response came back.
    pub error: Option<String>,
}

/// Diagnostic report from probing every candidate endpoint of a platform.
///
/// Persisted separately from the health map; never feeds selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckReport {
    pub platform: String,
    /// Unix seconds when the sweep ran.
    pub checked_at: i64,
    pub results: Vec<EndpointCheckResult>,
}

/// Truncate a failure message to a maximum length.
pub(crate) fn truncate_error(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let mut result: String = s.chars().take(max_len).collect();
        result.push('…');
        result
    }
}
