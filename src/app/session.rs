use crate::app::aggregator::CatalogAggregator;
use crate::cache::{CachedResult, QueryCache};
use crate::error::{CatalogError, Result};
use crate::query::{QueryMode, QueryState};
use crate::types::{CreatureDetails, CreatureSummary};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// What the catalog table shows for the current state.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub mode: QueryMode,
    pub rows: Vec<CreatureSummary>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub page_count: u64,
    /// URL query matching the state the view was built from
    pub query: String,
}

/// Ties query state, the aggregator and the cache together.
pub struct CatalogSession {
    state: QueryState,
    aggregator: Arc<CatalogAggregator>,
    cache: QueryCache,
}

impl CatalogSession {
    pub fn new(aggregator: Arc<CatalogAggregator>, cache: QueryCache, state: QueryState) -> Self {
        Self { state, aggregator, cache }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut QueryState {
        &mut self.state
    }

    /// Replace the state with the one encoded in a URL query.
    pub fn navigate(&mut self, query: &str) {
        let default_size = self.state.default_page_size();
        self.state = QueryState::from_query_string(query, default_size);
    }

    #[instrument(skip(self))]
    pub async fn load_view(&self) -> Result<CatalogView> {
        let mode = self.state.mode();
        let aggregator = &self.aggregator;
        let state = &self.state;

        let result = self
            .cache
            .results_or_fetch(state.cache_key(), || async {
                let fetched = match &mode {
                    QueryMode::Browse { limit, offset } => {
                        CachedResult::Page(aggregator.fetch_page(*limit, *offset).await?)
                    }
                    QueryMode::TypeFilter { .. } | QueryMode::NameSearch { .. } => CachedResult::Filtered(
                        aggregator.fetch_filtered(state.type_filter(), state.search()).await?,
                    ),
                };
                Ok::<_, CatalogError>(fetched)
            })
            .await?;

        let (rows, total) = match result.as_ref() {
            CachedResult::Page(page) => {
                let mut rows = page.results.clone();
                if let Some(sort) = state.sort() {
                    sort.sort(&mut rows);
                }
                (rows, page.total)
            }
            CachedResult::Filtered(all) => {
                let mut all = all.clone();
                if let Some(sort) = state.sort() {
                    sort.sort(&mut all);
                }
                (state.paginate(&all).to_vec(), all.len() as u64)
            }
        };

        info!(query = %state.to_query_string(), rows = rows.len(), total, "Catalog view ready");
        Ok(CatalogView {
            mode,
            rows,
            total,
            page: state.page(),
            page_size: state.page_size(),
            page_count: state.page_count(total),
            query: state.to_query_string(),
        })
    }

    /// Detail panel for the selected record, if one is selected.
    pub async fn load_selected(&self) -> Result<Option<Arc<CreatureDetails>>> {
        match self.state.selected() {
            Some(id) => self.load_details(id).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn load_details(&self, id: u32) -> Result<Arc<CreatureDetails>> {
        let aggregator = &self.aggregator;
        self.cache
            .details_or_fetch(id, || async { aggregator.fetch_details(id).await })
            .await
    }
}
