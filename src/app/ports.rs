use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Outbound HTTP used by the catalog. Implemented by `infra::http_client::ReqwestHttp`
/// in production and by in-memory fakes in tests.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub url: String,
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into `CatalogError::Api`
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(CatalogError::Api { url: self.url, status: self.status })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.bytes)?)
    }
}
