//! Lookup command: one search, three paged route tables.

use chrono::{DateTime, Utc};
use serde::Serialize;

use birdglass_core::{
    CategoryResults, ColumnRegistry, Controller, LOOKUP_PATH, LocationDescriptor, PageCursors,
    PaginationInfo, PaginatorView, RenderedCell, ResultState, ResultsSummary, Route, RouteCategory,
    compute_target, no_results_message,
};

use crate::cli::{GlobalOpts, LookupArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Target resolution ───────────────────────────────────────────────

/// The location to open: `--location` verbatim, else query + page flags.
pub fn target(args: &LookupArgs) -> Result<LocationDescriptor, CliError> {
    if let Some(ref raw) = args.location {
        return Ok(LocationDescriptor::parse(raw)?);
    }
    let query = args.query.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(CliError::Validation {
            field: "query".into(),
            reason: "search term cannot be empty".into(),
        });
    }
    Ok(LocationDescriptor {
        path: LOOKUP_PATH.into(),
        query: query.into(),
        cursors: PageCursors::new(
            args.received_page,
            args.filtered_page,
            args.not_exported_page,
        ),
        anchor: None,
    })
}

// ── Structured output ───────────────────────────────────────────────

#[derive(Serialize)]
struct LookupReport<'a> {
    query: &'a str,
    location: String,
    /// Same location as an absolute link on the looking glass.
    url: Option<String>,
    summary: Option<ResultsSummary>,
    received: CategoryReport<'a>,
    filtered: CategoryReport<'a>,
    not_exported: CategoryReport<'a>,
}

#[derive(Serialize)]
struct CategoryReport<'a> {
    pagination: PaginationInfo,
    info: String,
    next: Option<String>,
    routes: &'a [Route],
}

impl<'a> CategoryReport<'a> {
    fn new(state: &'a ResultState, category: RouteCategory, current: &LocationDescriptor) -> Self {
        let results = state.category(category);
        let pagination = results.pagination_info();
        Self {
            pagination,
            info: pagination.to_string(),
            next: next_page(state, category, current).map(|t| t.to_string()),
            routes: &results.routes,
        }
    }
}

fn next_page(
    state: &ResultState,
    category: RouteCategory,
    current: &LocationDescriptor,
) -> Option<LocationDescriptor> {
    let results = state.category(category);
    let next = results.page.checked_add(1)?;
    (next < results.total_pages).then(|| compute_target(state.cursors(), category, next, current))
}

// ── Table output ────────────────────────────────────────────────────

fn cell_text(cell: &RenderedCell) -> String {
    let mut text = cell.text.clone();
    if cell.primary {
        text.insert_str(0, "* ");
    }
    if cell.blackhole {
        text.push_str(" [blackhole]");
    }
    text
}

/// Paginator line: `« 1 [2] 3 »  +4 more (13-16)`.
fn paginator_line(view: &PaginatorView) -> String {
    let mut parts = Vec::with_capacity(view.links.len() + 3);
    if !view.prev.is_disabled() {
        parts.push(view.prev.label.clone());
    }
    for link in &view.links {
        if link.active {
            parts.push(format!("[{}]", link.label));
        } else {
            parts.push(link.label.clone());
        }
    }
    if let Some(ref next) = view.next {
        if !next.is_disabled() {
            parts.push(next.label.clone());
        }
    }
    if let Some(ref select) = view.select {
        let first = select.options.first().map_or(0, |p| p + 1);
        let last = select.options.last().map_or(0, |p| p + 1);
        if select.active {
            parts.push(format!("[{}] of {first}-{last}", select.selected.saturating_add(1)));
        } else {
            parts.push(format!("+{} more ({first}-{last})", select.options.len()));
        }
    }
    parts.join(" ")
}

fn render_category(
    state: &ResultState,
    category: RouteCategory,
    columns: &ColumnRegistry,
    current: &LocationDescriptor,
    color: bool,
) -> Option<String> {
    let results: &CategoryResults = state.category(category);
    if results.is_empty() {
        return None;
    }

    let mut out = vec![output::heading(category.label(), color)];
    out.push(output::render_dynamic_table(
        &columns.titles(),
        results
            .routes
            .iter()
            .map(|route| columns.render_row(route).iter().map(cell_text).collect()),
    ));
    out.push(results.pagination_info().to_string());

    if let Some(view) =
        PaginatorView::new(category, state.cursors(), results.total_pages, current)
    {
        out.push(format!("Pages: {}", paginator_line(&view)));
    }
    if let Some(next) = next_page(state, category, current) {
        out.push(output::muted(&format!("Next page: {next}"), color));
    }
    Some(out.join("\n"))
}

/// Everything printed for a finished lookup in table mode.
pub fn render_report(
    state: &ResultState,
    columns: &ColumnRegistry,
    current: &LocationDescriptor,
    now: DateTime<Utc>,
    color: bool,
) -> String {
    if state.has_no_results() {
        return output::alert(&no_results_message(&state.query), color);
    }

    let mut blocks = Vec::new();
    if let Some(summary) = ResultsSummary::from_state(state, now) {
        blocks.push(summary.lines(now).join("\n"));
    }
    blocks.extend(
        RouteCategory::ALL
            .iter()
            .filter_map(|&c| render_category(state, c, columns, current, color)),
    );
    blocks.join("\n\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    columns: &ColumnRegistry,
    args: LookupArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let target = target(&args)?;
    tracing::debug!(location = %target, "opening lookup");

    let (state, current) = if args.global {
        let flat = controller.global();
        let state = flat.lookup(target).await;
        let current = flat.location();
        flat.shutdown();
        (state, current)
    } else {
        (controller.lookup(target).await, controller.location())
    };
    if let Some(ref error) = state.error {
        return Err(CliError::LookupFailed {
            query: state.query.clone(),
            message: error.to_string(),
        });
    }
    let now = Utc::now();

    let out = match global.output {
        OutputFormat::Table => render_report(
            &state,
            columns,
            &current,
            now,
            output::should_color(&global.color),
        ),
        OutputFormat::Plain => RouteCategory::ALL
            .iter()
            .flat_map(|&c| state.category(c).routes.iter())
            .map(|r| r.network.clone())
            .collect::<Vec<_>>()
            .join("\n"),
        ref format => {
            let report = LookupReport {
                query: &state.query,
                location: current.to_string(),
                url: current
                    .to_url(controller.source().base_url())
                    .ok()
                    .map(String::from),
                summary: ResultsSummary::from_state(&state, now),
                received: CategoryReport::new(&state, RouteCategory::Received, &current),
                filtered: CategoryReport::new(&state, RouteCategory::Filtered, &current),
                not_exported: CategoryReport::new(&state, RouteCategory::NotExported, &current),
            };
            output::render_single(format, &report, |_| String::new(), |_| String::new())?
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use birdglass_core::{LookupEvent, LookupPayload, reduce};

    fn route(network: &str) -> Route {
        Route {
            network: network.into(),
            primary: true,
            ..Route::default()
        }
    }

    fn state() -> ResultState {
        let requested = reduce(&ResultState::initial(), LookupEvent::request("AS64500"));
        let payload = LookupPayload {
            received: CategoryResults {
                routes: vec![route("203.0.113.0/24"), route("198.51.100.0/24")],
                page: 0,
                page_size: 2,
                total_pages: 15,
                total_results: 30,
            },
            query_duration_ms: 4.0,
            ..LookupPayload::default()
        };
        reduce(&requested, LookupEvent::success("AS64500", payload))
    }

    fn args(query: &str) -> LookupArgs {
        LookupArgs {
            query: Some(query.into()),
            received_page: 2,
            filtered_page: 0,
            not_exported_page: 1,
            location: None,
            global: false,
        }
    }

    #[test]
    fn target_from_flags() {
        let t = target(&args(" AS64500 ")).unwrap();
        assert_eq!(t.to_string(), "/search?pr=2&pf=0&pn=1&q=AS64500");
    }

    #[test]
    fn target_from_location() {
        let mut a = args("ignored");
        a.query = None;
        a.location = Some("/search?pr=0&pf=3&pn=0&q=10.0.0.0%2F8#routes-filtered".into());
        let t = target(&a).unwrap();
        assert_eq!(t.query, "10.0.0.0/8");
        assert_eq!(t.cursors, PageCursors::new(0, 3, 0));
        assert_eq!(t.anchor, Some(RouteCategory::Filtered));
    }

    #[test]
    fn blank_query_is_rejected() {
        assert!(matches!(
            target(&args("   ")),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn report_lists_pages_and_next_location() {
        let state = state();
        let current = LocationDescriptor::search("AS64500");
        let text = render_report(&state, &ColumnRegistry::default(), &current, Utc::now(), false);

        assert!(text.contains("Found 30 received and 0 filtered routes."));
        assert!(text.contains("* 203.0.113.0/24"));
        assert!(text.contains("Showing 1 - 2 of 30 total routes"));
        assert!(text.contains("Pages: [1] 2 3 4 5 6 7 8 9 10 11 12 +3 more (13-15)"));
        assert!(text.contains("Next page: /search?pr=1&pf=0&pn=0&q=AS64500#routes-received"));
    }

    #[test]
    fn no_next_location_past_the_largest_page() {
        let mut state = state();
        state.received.page = usize::MAX;
        let current = LocationDescriptor::search("AS64500");
        assert_eq!(next_page(&state, RouteCategory::Received, &current), None);

        let text = render_report(&state, &ColumnRegistry::default(), &current, Utc::now(), false);
        assert!(!text.contains("Next page"), "{text}");
    }

    #[test]
    fn empty_result_prints_fallback() {
        let requested = reduce(&ResultState::initial(), LookupEvent::request("192.0.2.0/24"));
        let state = reduce(
            &requested,
            LookupEvent::success("192.0.2.0/24", LookupPayload::default()),
        );
        let text = render_report(
            &state,
            &ColumnRegistry::default(),
            &LocationDescriptor::search("192.0.2.0/24"),
            Utc::now(),
            false,
        );
        assert_eq!(text, "No prefixes could be found for 192.0.2.0/24");
    }
}
