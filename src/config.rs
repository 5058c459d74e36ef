use crate::constants::{
    is_allowed_page_size, DEFAULT_API_BASE_URL, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_SECONDS,
    DEFAULT_CONCURRENCY, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECONDS, FILTER_RESULT_LIMIT,
};
use crate::error::{CatalogError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Maximum number of detail requests in flight during a fan-out
    pub concurrency: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    pub max_entries: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub default_page_size: u32,
    pub filter_limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            filter_limit: FILTER_RESULT_LIMIT,
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory if present, then apply env overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                CatalogError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            Self::from_toml_str(&content)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Config::default()
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("DEX_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Ok(raw) = std::env::var("DEX_TIMEOUT_SECONDS") {
            self.api.timeout_seconds = raw
                .parse()
                .map_err(|_| CatalogError::Config(format!("DEX_TIMEOUT_SECONDS is not a number: {}", raw)))?;
        }
        if let Ok(raw) = std::env::var("DEX_CONCURRENCY") {
            self.api.concurrency = raw
                .parse()
                .map_err(|_| CatalogError::Config(format!("DEX_CONCURRENCY is not a number: {}", raw)))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(CatalogError::Config("api.base_url must not be empty".into()));
        }
        if self.api.concurrency == 0 {
            return Err(CatalogError::Config("api.concurrency must be at least 1".into()));
        }
        if !is_allowed_page_size(self.catalog.default_page_size) {
            return Err(CatalogError::Config(format!(
                "catalog.default_page_size {} is not an offered page size",
                self.catalog.default_page_size
            )));
        }
        if self.catalog.filter_limit == 0 {
            return Err(CatalogError::Config("catalog.filter_limit must be at least 1".into()));
        }
        Ok(())
    }
}
