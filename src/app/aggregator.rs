//! Catalog aggregation: resolves a list endpoint plus one detail request per entry
//! into denormalized `CreatureSummary` rows, and builds the detail panel model.

use crate::app::ports::HttpClientPort;
use crate::config::Config;
use crate::constants::{DESCRIPTION_ENTRIES, DESCRIPTION_LANGUAGE};
use crate::error::{CatalogError, Result};
use crate::metrics::UpstreamMetrics;
use crate::types::{
    CatalogPage, CreatureDetails, CreatureRecord, CreatureSummary, NamedResource, ResourceList,
    SpeciesRecord, StatLine, TypeRecord,
};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Where a row takes its id from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowIdentity {
    /// Last path segment of the list entry's URL
    ListUrl,
    /// `id` field of the detail record
    Record,
}

pub struct CatalogAggregator {
    http: Arc<dyn HttpClientPort>,
    base_url: String,
    concurrency: usize,
    filter_limit: usize,
}

impl CatalogAggregator {
    pub fn new(http: Arc<dyn HttpClientPort>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            concurrency: crate::constants::DEFAULT_CONCURRENCY,
            filter_limit: crate::constants::FILTER_RESULT_LIMIT,
        }
    }

    pub fn from_config(http: Arc<dyn HttpClientPort>, config: &Config) -> Self {
        Self::new(http, config.api.base_url.clone())
            .with_concurrency(config.api.concurrency)
            .with_filter_limit(config.catalog.filter_limit)
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_filter_limit(mut self, limit: usize) -> Self {
        self.filter_limit = limit.max(1);
        self
    }

    pub fn filter_limit(&self) -> usize {
        self.filter_limit
    }

    /// One page of the unfiltered catalog. Fails if any detail request fails.
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, limit: u32, offset: u64) -> Result<CatalogPage> {
        let list = self.fetch_list(limit as usize, offset).await?;
        let results = self.resolve(&list.results, RowIdentity::ListUrl, false).await?;
        info!(count = results.len(), total = list.count, "Fetched catalog page");
        Ok(CatalogPage { results, total: list.count })
    }

    /// Records matching a name search or a type, capped at the filter limit.
    ///
    /// A search takes precedence over the type. A search that finds nothing (or
    /// fails to reach the upstream) yields an empty list rather than an error.
    #[instrument(skip(self))]
    pub async fn fetch_filtered(
        &self,
        type_filter: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<CreatureSummary>> {
        if let Some(name) = search.filter(|s| !s.is_empty()) {
            return Ok(self.lookup_by_name(name).await.into_iter().collect());
        }

        let entries = match type_filter.map(str::trim).filter(|t| !t.is_empty()) {
            Some(kind) => {
                let url = format!("{}/type/{}", self.base_url, urlencoding::encode(&kind.to_lowercase()));
                let record: TypeRecord = self.http.get(&url).await?.error_for_status()?.json()?;
                debug!(kind, members = record.pokemon.len(), "Resolved type membership");
                record
                    .pokemon
                    .into_iter()
                    .take(self.filter_limit)
                    .map(|m| m.pokemon)
                    .collect::<Vec<_>>()
            }
            None => {
                let list = self.fetch_list(self.filter_limit, 0).await?;
                list.results.into_iter().take(self.filter_limit).collect()
            }
        };

        self.resolve(&entries, RowIdentity::Record, false).await
    }

    /// Exact (case-insensitive) name lookup. `None` when the upstream has no such record.
    #[instrument(skip(self))]
    pub async fn lookup_by_name(&self, name: &str) -> Option<CreatureSummary> {
        if name.trim().is_empty() {
            debug!("Blank search matches nothing");
            return None;
        }
        let url = format!(
            "{}/pokemon/{}",
            self.base_url,
            urlencoding::encode(&name.trim().to_lowercase())
        );
        match self.http.get(&url).await {
            Ok(resp) if resp.is_success() => match resp.json::<CreatureRecord>() {
                Ok(record) => Some(CreatureSummary::from_record(&record)),
                Err(e) => {
                    warn!(name, error = %e, "Search result could not be decoded");
                    None
                }
            },
            Ok(resp) => {
                debug!(name, status = resp.status, "No record for search");
                None
            }
            Err(e) => {
                warn!(name, error = %e, "Search request failed");
                None
            }
        }
    }

    /// Detail panel model: the record plus its species entry.
    #[instrument(skip(self))]
    pub async fn fetch_details(&self, id: u32) -> Result<CreatureDetails> {
        let url = format!("{}/pokemon/{}", self.base_url, id);
        let record: CreatureRecord = self.http.get(&url).await?.error_for_status()?.json()?;
        let species: SpeciesRecord = self
            .http
            .get(&record.species.url)
            .await?
            .error_for_status()?
            .json()?;

        let description = species
            .flavor_text_entries
            .iter()
            .filter(|e| e.language.name == DESCRIPTION_LANGUAGE)
            .take(DESCRIPTION_ENTRIES)
            .map(|e| clean_flavor_text(&e.flavor_text))
            .collect();

        Ok(CreatureDetails {
            id: record.id,
            name: record.name.clone(),
            height: record.height,
            weight: record.weight,
            stats: record
                .stats
                .iter()
                .map(|s| StatLine { name: s.stat.name.clone(), base_stat: s.base_stat })
                .collect(),
            total_stats: record.total_stats(),
            types: record.type_names(),
            description,
            sprite: record.artwork(),
            color: species.color.name,
            hatch_counter: species.hatch_counter,
            capture_rate: species.capture_rate,
        })
    }

    /// List a page and keep only the entries whose name contains `needle`
    /// (case-insensitive) before resolving details. `total` counts the matches.
    #[instrument(skip(self))]
    pub async fn search_page(&self, limit: u32, offset: u64, needle: &str) -> Result<CatalogPage> {
        let list = self.fetch_list(limit as usize, offset).await?;
        let needle = needle.trim().to_lowercase();
        let matching: Vec<NamedResource> = list
            .results
            .into_iter()
            .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
            .collect();
        let results = self.resolve(&matching, RowIdentity::ListUrl, true).await?;
        Ok(CatalogPage { total: results.len() as u64, results })
    }

    async fn fetch_list(&self, limit: usize, offset: u64) -> Result<ResourceList> {
        let url = format!("{}/pokemon?limit={}&offset={}", self.base_url, limit, offset);
        self.http.get(&url).await?.error_for_status()?.json()
    }

    /// Fan out one detail request per entry, at most `concurrency` in flight.
    /// Output order follows `entries`.
    async fn resolve(
        &self,
        entries: &[NamedResource],
        identity: RowIdentity,
        with_cry: bool,
    ) -> Result<Vec<CreatureSummary>> {
        UpstreamMetrics::record_fanout(entries.len());
        stream::iter(entries.iter())
            .map(|entry| self.summarize(entry, identity, with_cry))
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    async fn summarize(
        &self,
        entry: &NamedResource,
        identity: RowIdentity,
        with_cry: bool,
    ) -> Result<CreatureSummary> {
        let record: CreatureRecord = self.http.get(&entry.url).await?.error_for_status()?.json()?;
        let mut summary = CreatureSummary::from_record(&record);
        summary.name = entry.name.clone();
        if identity == RowIdentity::ListUrl {
            summary.id = id_from_resource_url(&entry.url)?;
        }
        if with_cry {
            summary.cry = record.cry();
        }
        Ok(summary)
    }
}

/// Numeric id at the end of a resource URL such as `.../pokemon/25/`.
pub fn id_from_resource_url(url: &str) -> Result<u32> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .ok_or_else(|| CatalogError::MalformedUrl(url.to_string()))
}

/// Flavor texts carry hard line breaks and form feeds from the games.
fn clean_flavor_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
