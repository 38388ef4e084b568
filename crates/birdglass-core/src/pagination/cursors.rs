use serde::{Deserialize, Serialize};

use birdglass_api::LookupPages;

use crate::model::RouteCategory;

/// Zero-based page cursor per route category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageCursors {
    pub received: usize,
    pub filtered: usize,
    pub not_exported: usize,
}

impl PageCursors {
    pub fn new(received: usize, filtered: usize, not_exported: usize) -> Self {
        Self {
            received,
            filtered,
            not_exported,
        }
    }

    pub fn get(&self, category: RouteCategory) -> usize {
        match category {
            RouteCategory::Received => self.received,
            RouteCategory::Filtered => self.filtered,
            RouteCategory::NotExported => self.not_exported,
        }
    }

    /// Copy with a single cursor replaced.
    pub fn with(mut self, category: RouteCategory, page: usize) -> Self {
        match category {
            RouteCategory::Received => self.received = page,
            RouteCategory::Filtered => self.filtered = page,
            RouteCategory::NotExported => self.not_exported = page,
        }
        self
    }
}

impl From<PageCursors> for LookupPages {
    fn from(cursors: PageCursors) -> Self {
        Self {
            imported: cursors.received,
            filtered: cursors.filtered,
            not_exported: cursors.not_exported,
        }
    }
}
