use std::fmt;

use serde::Serialize;

/// "Showing x - y of z" line for one route category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    /// Zero-based.
    pub page: usize,
    pub page_size: usize,
    pub total_results: usize,
    pub total_pages: usize,
}

impl PaginationInfo {
    pub fn new(page: usize, page_size: usize, total_results: usize, total_pages: usize) -> Self {
        Self {
            page,
            page_size,
            total_results,
            total_pages,
        }
    }

    /// One-based index of the first route on this page.
    pub fn start(&self) -> usize {
        self.page.saturating_mul(self.page_size).saturating_add(1)
    }

    /// One-based index of the last route on this page.
    pub fn end(&self) -> usize {
        self.start()
            .saturating_add(self.page_size)
            .saturating_sub(1)
            .min(self.total_results)
    }

    pub fn is_single_page(&self) -> bool {
        self.total_pages <= 1
    }
}

impl fmt::Display for PaginationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_page() {
            let noun = if self.total_results == 1 {
                "route"
            } else {
                "routes"
            };
            return write!(f, "Showing all of {} {noun}", self.total_results);
        }
        write!(
            f,
            "Showing {} - {} of {} total routes",
            self.start(),
            self.end(),
            self.total_results
        )
    }
}
