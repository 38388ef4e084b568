use tracing::debug;

use super::event::LookupEvent;
use super::state::ResultState;
use crate::model::RouteCategory;

/// Pure transition `(state, event) -> state`.
///
/// A `Success` or `Error` for a query other than the active one returns a
/// value-equal copy of `state`.
pub fn reduce(state: &ResultState, event: LookupEvent) -> ResultState {
    match event {
        LookupEvent::Request { query, cursors } => {
            if query.is_empty() {
                return ResultState::initial();
            }
            let mut next = ResultState {
                query,
                is_loading: true,
                ..ResultState::initial()
            };
            for category in RouteCategory::ALL {
                next.category_mut(category).page = cursors.get(category);
            }
            next
        }

        LookupEvent::PageChange { cursors } => {
            if state.query.is_empty() {
                return state.clone();
            }
            let mut next = state.clone();
            for category in RouteCategory::ALL {
                next.category_mut(category).page = cursors.get(category);
            }
            next.is_loading = true;
            next.error = None;
            next
        }

        LookupEvent::Success { query, payload } => {
            if query != state.query {
                debug!(stale = %query, active = %state.query, "dropping stale lookup response");
                return state.clone();
            }
            let payload = *payload;
            ResultState {
                query,
                is_loading: false,
                error: None,
                received: payload.received.normalized(),
                filtered: payload.filtered.normalized(),
                not_exported: payload.not_exported.normalized(),
                query_duration_ms: payload.query_duration_ms.max(0.0),
                cached_at: payload.cached_at,
                cache_ttl: payload.cache_ttl,
            }
        }

        LookupEvent::Error { query, error } => {
            if query != state.query {
                debug!(stale = %query, active = %state.query, "dropping stale lookup error");
                return state.clone();
            }
            ResultState {
                query,
                error: Some(error),
                ..ResultState::initial()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorInfo;
    use crate::lookup::{CategoryResults, LookupPayload};
    use crate::model::Route;
    use crate::pagination::PageCursors;
    use pretty_assertions::assert_eq;

    fn route(network: &str) -> Route {
        Route {
            network: network.into(),
            ..Route::default()
        }
    }

    fn payload() -> LookupPayload {
        LookupPayload {
            received: CategoryResults {
                routes: vec![route("10.0.0.0/8"), route("10.1.0.0/16")],
                page: 1,
                page_size: 2,
                total_pages: 3,
                total_results: 5,
            },
            filtered: CategoryResults {
                routes: vec![route("10.2.0.0/16")],
                page: 0,
                page_size: 2,
                total_pages: 1,
                total_results: 1,
            },
            not_exported: CategoryResults::default(),
            query_duration_ms: 4.2,
            cached_at: None,
            cache_ttl: None,
        }
    }

    fn loaded(query: &str) -> ResultState {
        let requested = reduce(&ResultState::initial(), LookupEvent::request(query));
        reduce(&requested, LookupEvent::success(query, payload()))
    }

    #[test]
    fn request_sets_loading_and_resets() {
        let state = reduce(&loaded("q1"), LookupEvent::request("q2"));
        assert!(state.is_loading);
        assert_eq!(state.query, "q2");
        assert!(state.received.routes.is_empty());
        assert_eq!(state.cursors(), PageCursors::default());
        assert_eq!(state.error, None);
    }

    #[test]
    fn request_at_location_starts_on_its_cursors() {
        let state = reduce(
            &loaded("q1"),
            LookupEvent::request_at("q2", PageCursors::new(3, 0, 1)),
        );
        assert!(state.is_loading);
        assert_eq!(state.cursors(), PageCursors::new(3, 0, 1));
        assert!(state.received.routes.is_empty());
        assert_eq!(state.received.total_results, 0);
    }

    #[test]
    fn empty_request_always_yields_initial_state() {
        assert_eq!(
            reduce(&loaded("q1"), LookupEvent::request("")),
            ResultState::initial()
        );
        let errored = reduce(
            &reduce(&ResultState::initial(), LookupEvent::request("q1")),
            LookupEvent::error("q1", ErrorInfo::new("boom")),
        );
        assert_eq!(
            reduce(&errored, LookupEvent::request("")),
            ResultState::initial()
        );
    }

    #[test]
    fn success_populates_everything() {
        let state = loaded("q1");
        assert!(!state.is_loading);
        assert_eq!(state.received.routes.len(), 2);
        assert_eq!(state.received.total_results, 5);
        assert_eq!(state.cursors(), PageCursors::new(1, 0, 0));
        assert_eq!(state.filtered.total_pages, 1);
        assert!((state.query_duration_ms - 4.2).abs() < f64::EPSILON);
    }

    #[test]
    fn late_success_for_previous_query_is_ignored() {
        let requested = reduce(&ResultState::initial(), LookupEvent::request("q1"));
        let superseded = reduce(&requested, LookupEvent::request("q2"));
        let after = reduce(&superseded, LookupEvent::success("q1", payload()));
        assert_eq!(after, superseded);
        assert!(after.is_loading);
    }

    #[test]
    fn mismatched_error_leaves_state_equal() {
        let state = loaded("q2");
        let after = reduce(&state, LookupEvent::error("q1", ErrorInfo::new("late")));
        assert_eq!(after, state);
    }

    #[test]
    fn error_resets_but_keeps_query() {
        let requested = reduce(&ResultState::initial(), LookupEvent::request("q1"));
        let state = reduce(&requested, LookupEvent::error("q1", ErrorInfo::new("timeout")));
        assert_eq!(state.query, "q1");
        assert!(!state.is_loading);
        assert_eq!(state.error, Some(ErrorInfo::new("timeout")));
        assert_eq!(state.total_routes(), 0);
    }

    #[test]
    fn page_change_keeps_results_until_replaced() {
        let state = reduce(
            &loaded("q1"),
            LookupEvent::PageChange {
                cursors: PageCursors::new(2, 0, 0),
            },
        );
        assert!(state.is_loading);
        assert_eq!(state.cursors(), PageCursors::new(2, 0, 0));
        assert_eq!(state.received.routes.len(), 2);
    }

    #[test]
    fn page_change_without_query_is_noop() {
        let initial = ResultState::initial();
        let state = reduce(
            &initial,
            LookupEvent::PageChange {
                cursors: PageCursors::new(1, 1, 1),
            },
        );
        assert_eq!(state, initial);
    }

    #[test]
    fn totals_never_below_result_count() {
        let mut bad = payload();
        bad.received.total_results = 0;
        let requested = reduce(&ResultState::initial(), LookupEvent::request("q"));
        let state = reduce(&requested, LookupEvent::success("q", bad));
        assert!(state.received.total_results >= state.received.routes.len());
    }
}
