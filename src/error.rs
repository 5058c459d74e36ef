use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {url} returned status {status}")]
    Api { url: String, status: u16 },

    #[error("Malformed resource URL: {0}")]
    MalformedUrl(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl CatalogError {
    /// True when the upstream answered but had nothing for the request (404).
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::Api { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
