// ── Results summary ──
//
// Human-readable facts about the finished lookup: totals, query time,
// and the server's route cache freshness.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::state::ResultState;

/// Route cache freshness as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RefreshState {
    /// The server did not report cache metadata.
    Unknown,
    Fresh {
        cached_at: DateTime<Utc>,
        ttl: DateTime<Utc>,
    },
    /// The ttl has passed; the cache is being rebuilt.
    Refreshing { cached_at: DateTime<Utc> },
}

impl RefreshState {
    pub fn at(
        cached_at: Option<DateTime<Utc>>,
        ttl: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        match (cached_at, ttl) {
            (Some(cached_at), Some(ttl)) if ttl < now => Self::Refreshing { cached_at },
            (Some(cached_at), Some(ttl)) => Self::Fresh { cached_at, ttl },
            _ => Self::Unknown,
        }
    }

    /// Sentence describing the cache, relative to `now`.
    pub fn describe(&self, now: DateTime<Utc>) -> Option<String> {
        match self {
            Self::Unknown => None,
            Self::Fresh { cached_at, ttl } => Some(format!(
                "Routes cache was built {} and will be refreshed {}.",
                relative(*cached_at, now),
                relative(*ttl, now)
            )),
            Self::Refreshing { cached_at } => Some(format!(
                "Routes cache was built {} and is currently being refreshed.",
                relative(*cached_at, now)
            )),
        }
    }
}

/// `3m 20s ago` / `in 1h 5m`; sub-second precision is dropped.
pub fn relative(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = at.signed_duration_since(now);
    let secs = delta.num_seconds().unsigned_abs();
    if secs == 0 {
        return "just now".into();
    }
    let text = humantime::format_duration(Duration::from_secs(secs));
    if delta.num_seconds() < 0 {
        format!("{text} ago")
    } else {
        format!("in {text}")
    }
}

/// Summary block shown above the result tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsSummary {
    pub query: String,
    pub total_received: usize,
    pub total_filtered: usize,
    pub total_not_exported: usize,
    pub query_duration_ms: f64,
    pub refresh: RefreshState,
}

impl ResultsSummary {
    /// `None` while no search is active.
    pub fn from_state(state: &ResultState, now: DateTime<Utc>) -> Option<Self> {
        if state.query.is_empty() {
            return None;
        }
        Some(Self {
            query: state.query.clone(),
            total_received: state.received.total_results,
            total_filtered: state.filtered.total_results,
            total_not_exported: state.not_exported.total_results,
            query_duration_ms: state.query_duration_ms,
            refresh: RefreshState::at(state.cached_at, state.cache_ttl, now),
        })
    }

    pub fn found_line(&self) -> String {
        format!(
            "Found {} received and {} filtered routes.",
            self.total_received, self.total_filtered
        )
    }

    pub fn duration_line(&self) -> String {
        format!("Query took {:.2} ms to complete.", self.query_duration_ms)
    }

    pub fn lines(&self, now: DateTime<Utc>) -> Vec<String> {
        let mut lines = vec![self.found_line(), self.duration_line()];
        lines.extend(self.refresh.describe(now));
        lines
    }
}

impl fmt::Display for ResultsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.found_line(), self.duration_line())
    }
}

/// Message for a finished search without any route.
pub fn no_results_message(query: &str) -> String {
    format!("No prefixes could be found for {query}")
}
