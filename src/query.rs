//! Query mode selection for the catalog.
//!
//! `QueryState` holds what the user has asked for (page, page size, committed
//! search, type filter, sort, selected record). From it we derive which fetch
//! strategy is active (`QueryMode`), the cache key for its results, and the URL
//! query string that represents it. Every transition keeps those three in step.

use crate::constants::{
    is_allowed_page_size, known_type, DEFAULT_PAGE_SIZE, PARAM_PAGE, PARAM_SEARCH, PARAM_SIZE,
    PARAM_SORT, PARAM_TYPE,
};
use crate::error::{CatalogError, Result};
use crate::types::CreatureSummary;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The fetch strategy currently in effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum QueryMode {
    Browse { limit: u32, offset: u64 },
    TypeFilter { type_name: String },
    NameSearch { name: String },
}

impl QueryMode {
    pub fn is_filtered(&self) -> bool {
        !matches!(self, QueryMode::Browse { .. })
    }
}

/// Identifies a cached result set. Filtered results are paginated locally, so the
/// page does not take part in their key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Paginated { page: u32, page_size: u32 },
    Filtered { type_name: Option<String>, search: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Types,
    Total,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl FromStr for SortKey {
    type Err = CatalogError;

    /// `name`, `-total`, ... A leading `-` sorts descending.
    fn from_str(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let (descending, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let field = match name {
            "id" => SortField::Id,
            "name" => SortField::Name,
            "types" => SortField::Types,
            "total" => SortField::Total,
            other => return Err(CatalogError::InvalidQuery(format!("unknown sort field '{}'", other))),
        };
        Ok(SortKey { field, descending })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.field {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Types => "types",
            SortField::Total => "total",
        };
        if self.descending {
            write!(f, "-{}", name)
        } else {
            f.write_str(name)
        }
    }
}

impl SortKey {
    fn compare(&self, a: &CreatureSummary, b: &CreatureSummary) -> Ordering {
        let ordering = match self.field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Types => a.types.join(", ").cmp(&b.types.join(", ")),
            SortField::Total => a.total_stats.cmp(&b.total_stats),
        };
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }

    /// Stable sort, equal rows keep their upstream order.
    pub fn sort(&self, rows: &mut [CreatureSummary]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page: u32,
    page_size: u32,
    default_page_size: u32,
    /// Text typed into the search box, not yet submitted
    search_input: String,
    /// Submitted search that drives fetching
    search: String,
    type_filter: Option<String>,
    sort: Option<SortKey>,
    selected: Option<u32>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl QueryState {
    pub fn new(default_page_size: u32) -> Self {
        let default_page_size = if is_allowed_page_size(default_page_size) {
            default_page_size
        } else {
            DEFAULT_PAGE_SIZE
        };
        Self {
            page: 1,
            page_size: default_page_size,
            default_page_size,
            search_input: String::new(),
            search: String::new(),
            type_filter: None,
            sort: None,
            selected: None,
        }
    }

    /// Rebuild state from a URL query such as `page=2&type=fire&sort=-total`.
    /// Unknown keys are ignored and invalid values fall back to defaults.
    pub fn from_query_string(query: &str, default_page_size: u32) -> Self {
        let mut state = Self::new(default_page_size);
        let query = query.trim_start_matches('?');
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(value);
            match key {
                PARAM_PAGE => state.page = value.parse().ok().filter(|p| *p >= 1).unwrap_or(1),
                PARAM_SIZE => {
                    if let Some(size) = value.parse().ok().filter(|s| is_allowed_page_size(*s)) {
                        state.page_size = size;
                    }
                }
                PARAM_SEARCH => {
                    let trimmed = value.trim().to_string();
                    state.search_input = trimmed.clone();
                    state.search = trimmed;
                }
                PARAM_TYPE => state.type_filter = known_type(&value).map(str::to_string),
                PARAM_SORT => state.sort = value.parse().ok(),
                _ => {}
            }
        }
        state
    }

    /// URL query representing this state. `page` is always present; `size` only
    /// when it differs from the default.
    pub fn to_query_string(&self) -> String {
        let mut params = vec![format!("{}={}", PARAM_PAGE, self.page)];
        if self.page_size != self.default_page_size {
            params.push(format!("{}={}", PARAM_SIZE, self.page_size));
        }
        if !self.search.is_empty() {
            params.push(format!("{}={}", PARAM_SEARCH, urlencoding::encode(&self.search)));
        }
        if let Some(type_name) = &self.type_filter {
            params.push(format!("{}={}", PARAM_TYPE, urlencoding::encode(type_name)));
        }
        if let Some(sort) = &self.sort {
            params.push(format!("{}={}", PARAM_SORT, urlencoding::encode(&sort.to_string())));
        }
        params.join("&")
    }

    pub fn mode(&self) -> QueryMode {
        if !self.search.is_empty() {
            QueryMode::NameSearch { name: self.search.clone() }
        } else if let Some(type_name) = &self.type_filter {
            QueryMode::TypeFilter { type_name: type_name.clone() }
        } else {
            QueryMode::Browse { limit: self.page_size, offset: self.offset() }
        }
    }

    pub fn cache_key(&self) -> QueryKey {
        if self.mode().is_filtered() {
            QueryKey::Filtered {
                type_name: self.type_filter.clone(),
                search: Some(self.search.clone()).filter(|s| !s.is_empty()),
            }
        } else {
            QueryKey::Paginated { page: self.page, page_size: self.page_size }
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    // --- transitions -------------------------------------------------------

    /// Update the search box text. Nothing is fetched until `submit_search`.
    pub fn set_search_input(&mut self, text: impl Into<String>) {
        self.search_input = text.into();
    }

    pub fn submit_search(&mut self) {
        self.search = self.search_input.trim().to_string();
        self.page = 1;
    }

    /// Select or clear the type filter. Unknown type names are rejected.
    pub fn select_type(&mut self, type_name: Option<&str>) -> Result<()> {
        self.type_filter = match type_name {
            Some(name) => Some(
                known_type(name)
                    .ok_or_else(|| CatalogError::InvalidQuery(format!("unknown type '{}'", name)))?
                    .to_string(),
            ),
            None => None,
        };
        self.page = 1;
        Ok(())
    }

    /// Clear search and type filter and return to the first page.
    pub fn reset(&mut self) {
        self.search_input.clear();
        self.search.clear();
        self.type_filter = None;
        self.page = 1;
    }

    pub fn go_to_page(&mut self, page: u32) -> Result<()> {
        if page == 0 {
            return Err(CatalogError::InvalidQuery("pages start at 1".into()));
        }
        self.page = page;
        Ok(())
    }

    pub fn set_page_size(&mut self, size: u32) -> Result<()> {
        if !is_allowed_page_size(size) {
            return Err(CatalogError::InvalidQuery(format!("page size {} is not offered", size)));
        }
        self.page_size = size;
        self.page = 1;
        Ok(())
    }

    pub fn set_sort(&mut self, sort: Option<SortKey>) {
        self.sort = sort;
    }

    /// Open the detail panel for a record.
    pub fn select(&mut self, id: u32) {
        self.selected = Some(id);
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }

    // --- accessors ---------------------------------------------------------

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn search(&self) -> Option<&str> {
        Some(self.search.as_str()).filter(|s| !s.is_empty())
    }

    pub fn type_filter(&self) -> Option<&str> {
        self.type_filter.as_deref()
    }

    pub fn sort(&self) -> Option<SortKey> {
        self.sort
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    /// Whether a reset would change anything the user can see.
    pub fn has_filters(&self) -> bool {
        self.type_filter.is_some() || !self.search_input.is_empty() || !self.search.is_empty()
    }

    /// Slice of `items` that falls on the current page.
    pub fn paginate<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let size = self.page_size as usize;
        let start = (self.page as usize - 1).saturating_mul(size).min(items.len());
        let end = start.saturating_add(size).min(items.len());
        &items[start..end]
    }

    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.page_size as u64).max(1)
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}
