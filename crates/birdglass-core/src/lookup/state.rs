use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ErrorInfo;
use crate::model::{Route, RouteCategory};
use crate::pagination::{PageCursors, PaginationInfo};

/// Page size assumed until the server reports its own.
pub const DEFAULT_PAGE_SIZE: usize = 100;

// ── CategoryResults ──────────────────────────────────────────────

/// One page of one route category, plus its position in the full result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryResults {
    pub routes: Vec<Route>,
    /// Zero-based.
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_results: usize,
}

impl Default for CategoryResults {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            total_pages: 0,
            total_results: 0,
        }
    }
}

impl CategoryResults {
    /// Enforce `page_size > 0` and `total_results >= routes.len()`, and
    /// derive `total_pages` when the server left it out.
    pub fn normalized(mut self) -> Self {
        if self.page_size == 0 {
            self.page_size = if self.routes.is_empty() {
                DEFAULT_PAGE_SIZE
            } else {
                self.routes.len()
            };
        }
        self.total_results = self.total_results.max(self.routes.len());
        if self.total_pages == 0 && self.total_results > 0 {
            self.total_pages = self.total_results.div_ceil(self.page_size);
        }
        self
    }

    pub fn pagination_info(&self) -> PaginationInfo {
        PaginationInfo::new(
            self.page,
            self.page_size,
            self.total_results,
            self.total_pages,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.total_results == 0
    }
}

// ── ResultState ──────────────────────────────────────────────────

/// Everything known about the active lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultState {
    /// Last committed query; empty means no search.
    pub query: String,
    pub is_loading: bool,
    pub error: Option<ErrorInfo>,

    pub received: CategoryResults,
    pub filtered: CategoryResults,
    pub not_exported: CategoryResults,

    pub query_duration_ms: f64,
    pub cached_at: Option<DateTime<Utc>>,
    pub cache_ttl: Option<DateTime<Utc>>,
}

impl Default for ResultState {
    fn default() -> Self {
        Self::initial()
    }
}

impl ResultState {
    pub fn initial() -> Self {
        Self {
            query: String::new(),
            is_loading: false,
            error: None,
            received: CategoryResults::default(),
            filtered: CategoryResults::default(),
            not_exported: CategoryResults::default(),
            query_duration_ms: 0.0,
            cached_at: None,
            cache_ttl: None,
        }
    }

    pub fn category(&self, category: RouteCategory) -> &CategoryResults {
        match category {
            RouteCategory::Received => &self.received,
            RouteCategory::Filtered => &self.filtered,
            RouteCategory::NotExported => &self.not_exported,
        }
    }

    pub(crate) fn category_mut(&mut self, category: RouteCategory) -> &mut CategoryResults {
        match category {
            RouteCategory::Received => &mut self.received,
            RouteCategory::Filtered => &mut self.filtered,
            RouteCategory::NotExported => &mut self.not_exported,
        }
    }

    pub fn cursors(&self) -> PageCursors {
        PageCursors::new(
            self.received.page,
            self.filtered.page,
            self.not_exported.page,
        )
    }

    pub fn total_routes(&self) -> usize {
        RouteCategory::ALL
            .iter()
            .map(|c| self.category(*c).total_results)
            .sum()
    }

    /// A finished, error-free search that found nothing.
    pub fn has_no_results(&self) -> bool {
        !self.query.is_empty()
            && !self.is_loading
            && self.error.is_none()
            && self.total_routes() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_enforces_totals() {
        let category = CategoryResults {
            routes: vec![Route::default(), Route::default(), Route::default()],
            page: 0,
            page_size: 0,
            total_pages: 0,
            total_results: 1,
        }
        .normalized();

        assert_eq!(category.page_size, 3);
        assert_eq!(category.total_results, 3);
        assert_eq!(category.total_pages, 1);
    }

    #[test]
    fn normalized_derives_total_pages() {
        let category = CategoryResults {
            total_results: 120,
            page_size: 50,
            ..CategoryResults::default()
        }
        .normalized();
        assert_eq!(category.total_pages, 3);
    }

    #[test]
    fn no_results_needs_finished_search() {
        let mut state = ResultState::initial();
        assert!(!state.has_no_results());
        state.query = "AS64500".into();
        assert!(state.has_no_results());
        state.is_loading = true;
        assert!(!state.has_no_results());
    }
}
