use crate::app::ports::{HttpClientPort, HttpGetResult};
use crate::error::{CatalogError, Result};
use crate::metrics::UpstreamMetrics;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// `HttpClientPort` backed by a shared `reqwest::Client`.
pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dex_catalog/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

/// Send and body-read failures are reported the same way.
fn transport_error(url: &str, e: reqwest::Error) -> CatalogError {
    let kind = if e.is_timeout() { "timeout" } else { "transport" };
    UpstreamMetrics::record_request_error(kind);
    warn!(url, error = %e, "Upstream request failed");
    CatalogError::Transport { url: url.to_string(), message: e.to_string() }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        let started = Instant::now();
        let resp = self.client.get(url).send().await.map_err(|e| transport_error(url, e))?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await.map_err(|e| transport_error(url, e))?.to_vec();
        let elapsed = started.elapsed().as_secs_f64();
        UpstreamMetrics::record_response(status, elapsed, bytes.len());
        debug!(url, status, bytes = bytes.len(), elapsed_secs = elapsed, "Upstream response");
        Ok(HttpGetResult { url: url.to_string(), status, bytes })
    }
}
