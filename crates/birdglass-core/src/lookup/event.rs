use chrono::{DateTime, Utc};

use super::state::CategoryResults;
use crate::error::ErrorInfo;
use crate::pagination::PageCursors;

/// Decoded lookup response, independent of the wire shape it came in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupPayload {
    pub received: CategoryResults,
    pub filtered: CategoryResults,
    pub not_exported: CategoryResults,
    pub query_duration_ms: f64,
    pub cached_at: Option<DateTime<Utc>>,
    pub cache_ttl: Option<DateTime<Utc>>,
}

/// Inputs to the lookup state machine.
///
/// `Success` and `Error` carry the query they were issued for. They only
/// apply while that query is still the active one.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupEvent {
    /// Commit a new query starting at `cursors`. An empty query resets to
    /// the initial state.
    Request { query: String, cursors: PageCursors },
    /// Move cursors within the active query; results stay until replaced.
    PageChange { cursors: PageCursors },
    Success {
        query: String,
        payload: Box<LookupPayload>,
    },
    Error { query: String, error: ErrorInfo },
}

impl LookupEvent {
    pub fn request(query: impl Into<String>) -> Self {
        Self::request_at(query, PageCursors::default())
    }

    /// A request opened on a shared location with its own page cursors.
    pub fn request_at(query: impl Into<String>, cursors: PageCursors) -> Self {
        Self::Request {
            query: query.into(),
            cursors,
        }
    }

    pub fn success(query: impl Into<String>, payload: LookupPayload) -> Self {
        Self::Success {
            query: query.into(),
            payload: Box::new(payload),
        }
    }

    pub fn error(query: impl Into<String>, error: ErrorInfo) -> Self {
        Self::Error {
            query: query.into(),
            error,
        }
    }
}
