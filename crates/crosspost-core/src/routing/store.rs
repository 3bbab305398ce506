//! Durable health-map persistence.
//!
//! Thin wrapper over the injected [`KeyValueStore`]: pure persistence, no
//! classification logic. A missing or unreadable record is an empty map,
//! never an error — health tracking must not take a platform down.

use std::collections::HashMap;
use std::sync::Arc;

use super::types::{EndpointHealth, HealthCheckReport};
use crate::error::RelayResult;
use crate::storage::KeyValueStore;

pub(crate) fn health_key(platform: &str) -> String {
    format!("{platform}_endpoint_health")
}

pub(crate) fn report_key(platform: &str) -> String {
    format!("{platform}_health_report")
}

/// Per-platform health map storage (write-through, no batching).
#[derive(Clone)]
pub struct HealthStore {
    store: Arc<dyn KeyValueStore>,
}

impl HealthStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the health map for a platform. Absent or corrupt state yields an
    /// empty map (logged, not raised).
    pub async fn load(&self, platform: &str) -> RelayResult<HashMap<String, EndpointHealth>> {
        let key = health_key(platform);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(HashMap::new());
        };

        match serde_json::from_str(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(platform, error = %e, "Unreadable endpoint health record, starting fresh");
                Ok(HashMap::new())
            }
        }
    }

    /// Persist the health map for a platform.
    pub async fn save(
        &self,
        platform: &str,
        map: &HashMap<String, EndpointHealth>,
    ) -> RelayResult<()> {
        let raw = serde_json::to_string(map)?;
        self.store.set(&health_key(platform), &raw).await
    }

    /// Remove all health records for a platform.
    pub async fn clear(&self, platform: &str) -> RelayResult<()> {
        self.store.delete(&health_key(platform)).await
    }

    /// Persist a comprehensive health-check report (separate from the
    /// health map; diagnostics only).
    pub async fn save_report(&self, platform: &str, report: &HealthCheckReport) -> RelayResult<()> {
        let raw = serde_json::to_string(report)?;
        self.store.set(&report_key(platform), &raw).await
    }

    /// Load the last persisted comprehensive health-check report.
    pub async fn load_report(&self, platform: &str) -> RelayResult<Option<HealthCheckReport>> {
        let Some(raw) = self.store.get(&report_key(platform)).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(report) => Ok(Some(report)),
            Err(e) => {
                tracing::warn!(platform, error = %e, "Unreadable health-check report");
                Ok(None)
            }
        }
    }
}
