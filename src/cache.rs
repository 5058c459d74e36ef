//! Query cache using moka
//!
//! Result sets are cached per `QueryKey` and detail panels per record id, both
//! with a time-to-live. Failed loads are never cached.

use crate::config::CacheConfig;
use crate::error::Result;
use crate::metrics::CacheMetrics;
use crate::query::QueryKey;
use crate::types::{CatalogPage, CreatureDetails, CreatureSummary};
use moka::future::Cache;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Result of one catalog query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedResult {
    Page(CatalogPage),
    Filtered(Vec<CreatureSummary>),
}

#[derive(Clone)]
pub struct QueryCache {
    results: Cache<QueryKey, Arc<CachedResult>>,
    details: Cache<u32, Arc<CreatureDetails>>,
}

impl QueryCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        Self {
            results: Cache::builder().max_capacity(max_entries).time_to_live(ttl).build(),
            details: Cache::builder().max_capacity(max_entries).time_to_live(ttl).build(),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_entries, Duration::from_secs(config.ttl_seconds))
    }

    pub async fn results_or_fetch<F, Fut>(&self, key: QueryKey, loader: F) -> Result<Arc<CachedResult>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachedResult>>,
    {
        get_or_fetch(&self.results, "results", key, loader).await
    }

    pub async fn details_or_fetch<F, Fut>(&self, id: u32, loader: F) -> Result<Arc<CreatureDetails>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CreatureDetails>>,
    {
        get_or_fetch(&self.details, "details", id, loader).await
    }

    pub fn invalidate_all(&self) {
        self.results.invalidate_all();
        self.details.invalidate_all();
    }
}

async fn get_or_fetch<K, V, F, Fut>(
    cache: &Cache<K, Arc<V>>,
    kind: &'static str,
    key: K,
    loader: F,
) -> Result<Arc<V>>
where
    K: Hash + Eq + Send + Sync + std::fmt::Debug + 'static,
    V: Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V>>,
{
    if let Some(hit) = cache.get(&key).await {
        CacheMetrics::record_hit(kind);
        debug!(kind, ?key, "Cache hit");
        return Ok(hit);
    }
    CacheMetrics::record_miss(kind);
    debug!(kind, ?key, "Cache miss");
    let value = Arc::new(loader().await?);
    cache.insert(key, value.clone()).await;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn page(total: u64) -> CachedResult {
        CachedResult::Page(CatalogPage { results: Vec::new(), total })
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let cache = QueryCache::new(16, Duration::from_secs(60));
        let calls = AtomicUsize::new(0);
        let key = QueryKey::Paginated { page: 1, page_size: 20 };

        for _ in 0..2 {
            let got = cache
                .results_or_fetch(key.clone(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(page(1302))
                })
                .await
                .unwrap();
            assert_eq!(*got, page(1302));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = QueryCache::new(16, Duration::from_secs(60));
        let key = QueryKey::Filtered { type_name: Some("fire".into()), search: None };

        let first = cache
            .results_or_fetch(key.clone(), || async { Err::<CachedResult, _>(CatalogError::Config("boom".into())) })
            .await;
        assert!(first.is_err());

        let second = cache
            .results_or_fetch(key, || async { Ok(CachedResult::Filtered(Vec::new())) })
            .await
            .unwrap();
        assert_eq!(*second, CachedResult::Filtered(Vec::new()));
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let cache = QueryCache::new(16, Duration::from_secs(60));
        let calls = AtomicUsize::new(0);
        let key = QueryKey::Paginated { page: 2, page_size: 10 };
        let load = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(page(5))
        };

        cache.results_or_fetch(key.clone(), load).await.unwrap();
        cache.invalidate_all();
        cache.results_or_fetch(key, load).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
