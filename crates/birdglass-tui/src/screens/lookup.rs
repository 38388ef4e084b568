//! Lookup screen: search box, one table per route category with its
//! paginator, and a detail panel for the selected route.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap,
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use tui_input::Input;

use birdglass_core::model::route::format_community;
use birdglass_core::{
    CategoryResults, ColumnRegistry, FilterGate, LocationDescriptor, PaginatorView, RenderedCell,
    RendererVariant, ResultState, ResultsSummary, Route, RouteCategory, no_results_message,
};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::{paginator, sub_tabs, text_input};

const PLACEHOLDER: &str = "Search for a prefix, ASN or neighbour";

fn category_index(category: RouteCategory) -> usize {
    match category {
        RouteCategory::Received => 0,
        RouteCategory::Filtered => 1,
        RouteCategory::NotExported => 2,
    }
}

pub struct LookupScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    gate: Option<FilterGate<Action>>,
    input: Input,
    editing: bool,
    state: Arc<ResultState>,
    location: LocationDescriptor,
    columns: Arc<ColumnRegistry>,
    category: RouteCategory,
    tables: [TableState; 3],
    detail_open: bool,
    throbber_state: ThrobberState,
}

impl LookupScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            gate: None,
            input: Input::default(),
            editing: true,
            state: Arc::new(ResultState::initial()),
            location: LocationDescriptor::home(),
            columns: Arc::new(ColumnRegistry::default()),
            category: RouteCategory::Received,
            tables: Default::default(),
            detail_open: false,
            throbber_state: ThrobberState::default(),
        }
    }

    fn results(&self) -> &CategoryResults {
        self.state.category(self.category)
    }

    fn table(&self) -> TableState {
        self.tables[category_index(self.category)]
    }

    fn table_mut(&mut self) -> &mut TableState {
        &mut self.tables[category_index(self.category)]
    }

    fn selected_route(&self) -> Option<&Route> {
        self.results().routes.get(self.table().selected()?)
    }

    fn move_selection(&mut self, down: bool, step: usize) {
        let len = self.results().routes.len();
        if len == 0 {
            return;
        }
        let current = self.table().selected().unwrap_or(0);
        let next = if down {
            current.saturating_add(step).min(len - 1)
        } else {
            current.saturating_sub(step)
        };
        self.table_mut().select(Some(next));
    }

    fn cycle_category(&mut self, forward: bool) {
        let idx = category_index(self.category);
        let n = RouteCategory::ALL.len();
        let next = if forward { (idx + 1) % n } else { (idx + n - 1) % n };
        self.category = RouteCategory::ALL[next];
    }

    /// Clamp every table's selection to its rows.
    fn clamp_selections(&mut self) {
        for category in RouteCategory::ALL {
            let len = self.state.category(category).routes.len();
            let table = &mut self.tables[category_index(category)];
            if len == 0 {
                table.select(None);
            } else {
                table.select(Some(table.selected().unwrap_or(0).min(len - 1)));
            }
        }
    }

    fn prev_page(&self) -> Option<Action> {
        let page = self.results().page;
        page.checked_sub(1)
            .map(|p| Action::SetPage(self.category, p))
    }

    fn next_page(&self) -> Option<Action> {
        let results = self.results();
        let next = results.page.checked_add(1)?;
        (next < results.total_pages).then_some(Action::SetPage(self.category, next))
    }

    fn last_page(&self) -> Option<Action> {
        let results = self.results();
        let last = results.total_pages.checked_sub(1)?;
        (last != results.page).then_some(Action::SetPage(self.category, last))
    }

    fn first_page(&self) -> Option<Action> {
        (self.results().page != 0).then_some(Action::SetPage(self.category, 0))
    }

    /// Show the committed query in the box unless a keystroke is still
    /// waiting for the debounce window.
    fn sync_input(&mut self, query: &str) {
        let typing = self.gate.as_ref().is_some_and(FilterGate::is_pending);
        if typing || self.input.value().trim() == query {
            return;
        }
        self.input = Input::new(query.to_owned());
        if let Some(gate) = self.gate.as_mut() {
            gate.set_filter_value(query);
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if let Some(gate) = self.gate.as_mut() {
                    gate.flush();
                }
                self.editing = false;
            }
            KeyCode::Esc | KeyCode::Down | KeyCode::Tab => self.editing = false,
            _ => {
                if text_input::edit(&mut self.input, key) {
                    if let Some(gate) = self.gate.as_mut() {
                        gate.set_filter(self.input.value());
                    }
                }
            }
        }
    }

    fn open_neighbours(&self) -> Option<Action> {
        let route = self.selected_route()?;
        let tx = self.action_tx.as_ref()?;
        let _ = tx.send(Action::SelectRouteserver(route.routeserver.id.clone()));
        Some(Action::SwitchScreen(ScreenId::Neighbours))
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_summary(&self, frame: &mut Frame, area: Rect) {
        let state = &self.state;

        if let Some(ref error) = state.error {
            let lines = vec![
                Line::from(Span::styled(format!("Lookup failed: {error}"), theme::error())),
                Line::from(vec![
                    Span::styled("r ", theme::key_hint_key()),
                    Span::styled("retry", theme::key_hint()),
                ]),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
            return;
        }

        if state.is_loading {
            let throbber = Throbber::default()
                .label(format!("  Searching for {}\u{2026}", state.query))
                .style(theme::table_row())
                .throbber_style(theme::border_focused());
            frame.render_stateful_widget(throbber, area, &mut self.throbber_state.clone());
            return;
        }

        if state.has_no_results() {
            frame.render_widget(
                Paragraph::new(Span::styled(no_results_message(&state.query), theme::warning())),
                area,
            );
            return;
        }

        let now = Utc::now();
        let lines: Vec<Line> = match ResultsSummary::from_state(state, now) {
            Some(summary) => summary
                .lines(now)
                .into_iter()
                .map(|l| Line::from(Span::styled(l, theme::table_row())))
                .collect(),
            None => vec![Line::from(Span::styled(
                "Type a prefix or ASN, then press Enter.",
                theme::muted(),
            ))],
        };
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let results = self.results();
        if results.routes.is_empty() {
            let msg = if self.state.is_loading || self.state.query.is_empty() {
                ""
            } else {
                "No routes in this category."
            };
            frame.render_widget(Paragraph::new(Span::styled(msg, theme::muted())), area);
            return;
        }

        let header = Row::new(
            self.columns
                .titles()
                .into_iter()
                .map(|t| Cell::from(t.to_owned()).style(theme::table_header())),
        );
        let rows: Vec<Row> = results
            .routes
            .iter()
            .map(|route| {
                Row::new(self.columns.render_row(route).into_iter().map(route_cell))
                    .style(theme::table_row())
            })
            .collect();
        let widths: Vec<Constraint> = self
            .columns
            .columns()
            .iter()
            .map(|c| match c.renderer {
                RendererVariant::AsPath => Constraint::Fill(3),
                RendererVariant::Default => Constraint::Fill(1),
                _ => Constraint::Fill(2),
            })
            .collect();

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("\u{25b8} ");

        let mut state = self.table();
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_detail(frame: &mut Frame, area: Rect, route: &Route) {
        let block = Block::default()
            .title(" Route ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        frame.render_widget(
            Paragraph::new(detail_lines(route))
                .block(block)
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let keys: &[(&str, &str)] = if self.editing {
            &[("Enter ", "search  "), ("Esc ", "results  "), ("C-u ", "clear")]
        } else {
            &[
                ("/ ", "search  "),
                ("j/k ", "select  "),
                ("h/l ", "category  "),
                ("\u{2190}/\u{2192} ", "page  "),
                ("Enter ", "detail  "),
                ("n ", "neighbours  "),
                ("c ", "clear"),
            ]
        };
        let mut spans = vec![Span::raw(" ")];
        for (key, label) in keys {
            spans.push(Span::styled(*key, theme::key_hint_key()));
            spans.push(Span::styled(*label, theme::key_hint()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn route_cell(cell: RenderedCell) -> Cell<'static> {
    let text = if cell.primary {
        format!("* {}", cell.text)
    } else {
        cell.text
    };
    let style = if cell.primary {
        theme::primary_route()
    } else if cell.link.is_some() {
        theme::link()
    } else {
        theme::table_row()
    };
    if cell.blackhole {
        return Cell::from(Line::from(vec![
            Span::styled(text, style),
            Span::styled(" [blackhole]", theme::blackhole()),
        ]));
    }
    Cell::from(text).style(style)
}

fn kv(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<13}"), theme::key_hint_key()),
        Span::styled(value, theme::table_row()),
    ])
}

fn join_communities<T: ToString>(list: &[Vec<T>]) -> String {
    list.iter()
        .map(|c| format_community(c))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Route facts and BGP attributes; empty values are left out.
fn detail_lines(route: &Route) -> Vec<Line<'static>> {
    let bgp = &route.bgp;
    let neighbour = route.neighbour.as_ref().map_or_else(
        || route.neighbour_id.clone(),
        |n| format!("{} (AS{})", n.description, n.asn),
    );
    let age = humantime::format_duration(Duration::from_secs(route.age.as_secs())).to_string();

    let fields = [
        ("Network", route.network.clone()),
        ("Gateway", route.gateway.clone()),
        ("Interface", route.interface.clone()),
        ("Neighbour", neighbour),
        ("Route server", route.routeserver.name.clone()),
        ("Age", age),
        ("Primary", if route.primary { "yes" } else { "no" }.to_owned()),
    ];
    let bgp_fields = [
        ("Origin", bgp.origin.clone()),
        ("AS path", bgp.as_path_text()),
        ("Next hop", bgp.next_hop.clone()),
        ("Local pref", bgp.local_pref.to_string()),
        ("MED", bgp.med.to_string()),
        ("Communities", join_communities(&bgp.communities)),
        ("Large", join_communities(&bgp.large_communities)),
        ("Extended", join_communities(&bgp.ext_communities)),
    ];

    let mut lines: Vec<Line<'static>> = fields
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| kv(k, v))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("BGP", theme::title_style())));
    lines.extend(
        bgp_fields
            .into_iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| kv(k, v)),
    );
    if route.is_blackhole() {
        lines.push(Line::from(Span::styled(
            "Blackhole community 65535:666 present",
            theme::blackhole(),
        )));
    }
    lines
}

impl Component for LookupScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.gate = Some(FilterGate::new(action_tx.clone(), Action::ApplyQuery));
        self.action_tx = Some(action_tx);
        Ok(())
    }

    /// Inserts at the cursor while editing; otherwise replaces the value.
    fn handle_paste(&mut self, text: &str) -> Result<Option<Action>> {
        if !self.editing {
            self.input.reset();
            self.editing = true;
        }
        if text_input::paste(&mut self.input, text) {
            if let Some(gate) = self.gate.as_mut() {
                gate.set_filter(self.input.value());
            }
        }
        Ok(None)
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.editing {
            self.handle_editing_key(key);
            return Ok(None);
        }

        let action = match key.code {
            KeyCode::Char('/' | 'i') => {
                self.editing = true;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(true, 1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(false, 1);
                None
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(true, 10);
                None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(false, 10);
                None
            }
            KeyCode::Char('l') => {
                self.cycle_category(true);
                None
            }
            KeyCode::Char('h') => {
                self.cycle_category(false);
                None
            }
            KeyCode::Left | KeyCode::Char('[') => self.prev_page(),
            KeyCode::Right | KeyCode::Char(']') => self.next_page(),
            KeyCode::Home => self.first_page(),
            KeyCode::End => self.last_page(),
            KeyCode::Enter => {
                self.detail_open = !self.detail_open && self.selected_route().is_some();
                None
            }
            KeyCode::Esc => {
                self.detail_open = false;
                None
            }
            KeyCode::Char('n') => self.open_neighbours(),
            KeyCode::Char('r') if self.state.error.is_some() => {
                Some(Action::Navigate(self.location.clone()))
            }
            KeyCode::Char('c') => {
                self.input.reset();
                if let Some(gate) = self.gate.as_mut() {
                    gate.reset();
                }
                self.editing = true;
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.move_selection(true, 1),
            MouseEventKind::ScrollUp => self.move_selection(false, 1),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LookupUpdated(state) => {
                let finished = self.state.is_loading && !state.is_loading;
                if state.query != self.state.query {
                    self.tables = Default::default();
                    self.detail_open = false;
                }
                self.state = Arc::clone(state);
                if finished && self.results().is_empty() {
                    if let Some(first) = RouteCategory::ALL
                        .into_iter()
                        .find(|&c| !self.state.category(c).is_empty())
                    {
                        self.category = first;
                    }
                }
                self.clamp_selections();
            }
            Action::LocationChanged(location) => {
                if let Some(anchor) = location.anchor {
                    self.category = anchor;
                }
                self.sync_input(&location.query);
                self.location = location.clone();
            }
            Action::ColumnsLoaded(columns) => {
                debug!(columns = columns.columns().len(), "lookup columns loaded");
                self.columns = Arc::clone(columns);
            }
            Action::Tick if self.state.is_loading => {
                self.throbber_state.calc_next();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = if self.state.query.is_empty() {
            " Lookup ".to_owned()
        } else {
            format!(" Lookup \u{b7} {} ", self.state.query)
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(3), // search
            Constraint::Length(3), // summary
            Constraint::Length(1), // categories
            Constraint::Min(3),    // table + detail
            Constraint::Length(1), // info line
            Constraint::Length(1), // paginator
            Constraint::Length(1), // hints
        ])
        .split(inner);

        text_input::render_input(
            frame,
            layout[0],
            &self.input,
            "Search",
            PLACEHOLDER,
            self.editing && self.focused,
        );
        self.render_summary(frame, layout[1]);

        let labels: Vec<String> = RouteCategory::ALL
            .iter()
            .map(|&c| format!("{} ({})", c.label(), self.state.category(c).total_results))
            .collect();
        frame.render_widget(
            Paragraph::new(sub_tabs::render_sub_tabs(
                &labels,
                category_index(self.category),
            )),
            layout[2],
        );

        let (table_area, detail_area) = if self.detail_open {
            let chunks =
                Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .split(layout[3]);
            (chunks[0], Some(chunks[1]))
        } else {
            (layout[3], None)
        };
        self.render_table(frame, table_area);
        if let (Some(area), Some(route)) = (detail_area, self.selected_route()) {
            Self::render_detail(frame, area, route);
        }

        let results = self.results();
        if !results.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    results.pagination_info().to_string(),
                    theme::muted(),
                )),
                layout[4],
            );
        }
        if let Some(view) = PaginatorView::new(
            self.category,
            self.state.cursors(),
            results.total_pages,
            &self.location,
        ) {
            frame.render_widget(Paragraph::new(paginator::paginator_line(&view)), layout[5]);
        }

        self.render_hints(frame, layout[6]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn captures_input(&self) -> bool {
        self.editing
    }

    fn id(&self) -> &str {
        "lookup"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use birdglass_core::{BgpAttributes, LookupEvent, LookupPayload, Neighbour, Routeserver, reduce};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use tokio::sync::mpsc;

    fn route(network: &str) -> Route {
        Route {
            network: network.into(),
            primary: true,
            ..Route::default()
        }
    }

    fn loaded(query: &str, page: usize) -> Arc<ResultState> {
        let requested = reduce(&ResultState::initial(), LookupEvent::request(query));
        let payload = LookupPayload {
            received: CategoryResults {
                routes: vec![route("203.0.113.0/24"), route("198.51.100.0/24")],
                page,
                page_size: 2,
                total_pages: 3,
                total_results: 6,
            },
            query_duration_ms: 2.5,
            ..LookupPayload::default()
        };
        Arc::new(reduce(&requested, LookupEvent::success(query, payload)))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen_with(state: Arc<ResultState>) -> LookupScreen {
        let mut screen = LookupScreen::new();
        screen.editing = false;
        screen.update(&Action::LookupUpdated(state)).unwrap();
        screen
    }

    fn rendered(screen: &LookupScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn prev_is_disabled_on_first_page() {
        let mut screen = screen_with(loaded("AS64500", 0));
        assert!(screen.handle_key_event(key(KeyCode::Left)).unwrap().is_none());
        assert!(screen.handle_key_event(key(KeyCode::Home)).unwrap().is_none());
        assert!(matches!(
            screen.handle_key_event(key(KeyCode::Right)).unwrap(),
            Some(Action::SetPage(RouteCategory::Received, 1))
        ));
    }

    #[test]
    fn next_is_disabled_on_last_page() {
        let mut screen = screen_with(loaded("AS64500", 2));
        assert!(screen.handle_key_event(key(KeyCode::Right)).unwrap().is_none());
        assert!(screen.handle_key_event(key(KeyCode::End)).unwrap().is_none());
        assert!(matches!(
            screen.handle_key_event(key(KeyCode::Left)).unwrap(),
            Some(Action::SetPage(RouteCategory::Received, 1))
        ));
    }

    #[test]
    fn paging_past_the_largest_page_is_ignored() {
        let mut screen = screen_with(loaded("AS64500", usize::MAX));
        assert!(screen.handle_key_event(key(KeyCode::Right)).unwrap().is_none());
        assert!(matches!(
            screen.handle_key_event(key(KeyCode::End)).unwrap(),
            Some(Action::SetPage(RouteCategory::Received, 2))
        ));
        assert!(rendered(&screen).contains("Lookup"));
    }

    #[test]
    fn anchor_selects_category() {
        let mut screen = screen_with(loaded("AS64500", 0));
        let mut location = LocationDescriptor::search("AS64500");
        location.anchor = Some(RouteCategory::Filtered);
        screen.update(&Action::LocationChanged(location)).unwrap();
        assert_eq!(screen.category, RouteCategory::Filtered);
        assert_eq!(screen.input.value(), "AS64500");
    }

    #[test]
    fn selection_is_clamped_to_rows() {
        let mut screen = screen_with(loaded("AS64500", 0));
        for _ in 0..5 {
            screen.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        }
        assert_eq!(screen.table().selected(), Some(1));
        assert_eq!(screen.selected_route().unwrap().network, "198.51.100.0/24");
    }

    #[test]
    fn retry_reopens_current_location() {
        let requested = reduce(&ResultState::initial(), LookupEvent::request("AS64500"));
        let failed = reduce(
            &requested,
            LookupEvent::error("AS64500", birdglass_core::ErrorInfo::new("timeout")),
        );
        let mut screen = screen_with(Arc::new(failed));
        screen
            .update(&Action::LocationChanged(LocationDescriptor::search("AS64500")))
            .unwrap();
        let action = screen.handle_key_event(key(KeyCode::Char('r'))).unwrap();
        assert!(matches!(action, Some(Action::Navigate(ref l)) if l.query == "AS64500"));
        assert!(rendered(&screen).contains("Lookup failed: timeout"));
    }

    #[test]
    fn renders_tables_info_and_paginator() {
        let mut screen = screen_with(loaded("AS64500", 1));
        screen
            .update(&Action::LocationChanged(LocationDescriptor::search("AS64500")))
            .unwrap();
        let text = rendered(&screen);
        assert!(text.contains("Found 6 received and 0 filtered routes."), "{text}");
        assert!(text.contains("[Routes Received (6)]"), "{text}");
        assert!(text.contains("* 203.0.113.0/24"), "{text}");
        assert!(text.contains("Showing 3 - 4 of 6 total routes"), "{text}");
        assert!(text.contains("« 1 [2] 3 »"), "{text}");
    }

    #[test]
    fn empty_result_shows_fallback() {
        let requested = reduce(&ResultState::initial(), LookupEvent::request("192.0.2.0/24"));
        let done = reduce(
            &requested,
            LookupEvent::success("192.0.2.0/24", LookupPayload::default()),
        );
        let screen = screen_with(Arc::new(done));
        assert!(rendered(&screen).contains("No prefixes could be found for 192.0.2.0/24"));
    }

    #[test]
    fn detail_lists_bgp_attributes() {
        let route = Route {
            network: "203.0.113.0/24".into(),
            gateway: "192.0.2.1".into(),
            neighbour: Some(Neighbour {
                description: "Example Transit".into(),
                asn: 64500,
                ..Neighbour::default()
            }),
            routeserver: Routeserver {
                name: "RS 1".into(),
                ..Routeserver::default()
            },
            age: Duration::from_secs(3720),
            bgp: BgpAttributes {
                origin: "IGP".into(),
                as_path: vec![64500, 64511],
                next_hop: "192.0.2.1".into(),
                communities: vec![vec![65535, 666], vec![64500, 1]],
                local_pref: 100,
                ..BgpAttributes::default()
            },
            ..Route::default()
        };
        let text = detail_lines(&route)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        insta::assert_snapshot!(text, @r"
        Network      203.0.113.0/24
        Gateway      192.0.2.1
        Neighbour    Example Transit (AS64500)
        Route server RS 1
        Age          1h 2m
        Primary      no

        BGP
        Origin       IGP
        AS path      64500 64511
        Next hop     192.0.2.1
        Local pref   100
        MED          0
        Communities  65535:666 64500:1
        Blackhole community 65535:666 present
        ");
    }

    #[tokio::test(start_paused = true)]
    async fn typing_commits_after_quiet_window() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut screen = LookupScreen::new();
        screen.init(tx).unwrap();

        for c in "AS1".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(screen.input.value(), "AS1");
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(matches!(rx.try_recv().unwrap(), Action::ApplyQuery(ref q) if q == "AS1"));
    }

    #[tokio::test(start_paused = true)]
    async fn paste_replaces_shown_query_and_commits() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut screen = LookupScreen::new();
        screen.init(tx).unwrap();
        screen
            .update(&Action::LocationChanged(LocationDescriptor::search("AS64500")))
            .unwrap();
        screen.editing = false;
        assert_eq!(screen.input.value(), "AS64500");

        screen.handle_paste("192.0.2.0/24\n").unwrap();
        assert!(screen.captures_input());
        assert_eq!(screen.input.value(), "192.0.2.0/24");

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(matches!(rx.try_recv().unwrap(), Action::ApplyQuery(ref q) if q == "192.0.2.0/24"));
    }

    #[tokio::test]
    async fn enter_commits_immediately() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut screen = LookupScreen::new();
        screen.init(tx).unwrap();

        screen.handle_key_event(key(KeyCode::Char('7'))).unwrap();
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(rx.try_recv().unwrap(), Action::ApplyQuery(ref q) if q == "7"));
        assert!(!screen.captures_input());
    }
}
