//! Lightweight HTTP probe transport.
//!
//! The only network I/O the routing core performs itself: a minimal GET used
//! by recovery probing and the comprehensive health check. Real API traffic
//! goes through the caller's own client; this seam stays narrow on purpose.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::RelayResult;

const PROBE_USER_AGENT: &str = concat!("crosspost-probe/", env!("CARGO_PKG_VERSION"));

/// Response from a probe request.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body (informational; probes only look at the status).
    pub body: String,
}

impl ProbeResponse {
    /// True for 2xx responses, the liveness criterion for probes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal "GET url with timeout" capability.
#[async_trait]
pub trait EndpointProbe: Send + Sync {
    /// Issue a GET against `url`, bounded by `timeout`. Timeouts and
    /// transport failures surface as errors; any HTTP status is `Ok`.
    async fn get(&self, url: &str, timeout: Duration) -> RelayResult<ProbeResponse>;
}

/// reqwest-backed probe implementation.
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(PROBE_USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EndpointProbe for HttpProbe {
    async fn get(&self, url: &str, timeout: Duration) -> RelayResult<ProbeResponse> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Ok(ProbeResponse { status, body })
    }
}
