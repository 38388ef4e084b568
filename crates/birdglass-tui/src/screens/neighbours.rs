//! Neighbours screen: BGP sessions of one route server, filterable by
//! address, ASN or description.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;

use birdglass_core::{FilterGate, Neighbour, Routeserver, filter_neighbours};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::{sub_tabs, text_input};

const PLACEHOLDER: &str = "Filter by Neighbour, ASN or Description";

pub struct NeighboursScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    gate: Option<FilterGate<Action>>,
    input: Input,
    editing: bool,
    routeservers: Arc<Vec<Routeserver>>,
    selected: Option<String>,
    neighbours: Arc<Vec<Neighbour>>,
    filter: String,
    loading: bool,
    error: Option<String>,
    table_state: TableState,
    throbber_state: ThrobberState,
}

impl NeighboursScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            action_tx: None,
            gate: None,
            input: Input::default(),
            editing: false,
            routeservers: Arc::new(Vec::new()),
            selected: None,
            neighbours: Arc::new(Vec::new()),
            filter: String::new(),
            loading: false,
            error: None,
            table_state: TableState::default(),
            throbber_state: ThrobberState::default(),
        }
    }

    fn visible(&self) -> Vec<&Neighbour> {
        filter_neighbours(&self.neighbours, &self.filter)
    }

    fn selected_index(&self) -> Option<usize> {
        let id = self.selected.as_deref()?;
        self.routeservers.iter().position(|rs| rs.id == id)
    }

    fn selected_name(&self) -> Option<&str> {
        self.selected_index()
            .map(|i| self.routeservers[i].name.as_str())
    }

    fn cycle_routeserver(&self, forward: bool) -> Option<Action> {
        let n = self.routeservers.len();
        if n == 0 {
            return None;
        }
        let next = match self.selected_index() {
            Some(i) if forward => (i + 1) % n,
            Some(i) => (i + n - 1) % n,
            None => 0,
        };
        Some(Action::SelectRouteserver(self.routeservers[next].id.clone()))
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.table_state.select(Some(next));
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            let current = self.table_state.selected().unwrap_or(0);
            self.table_state.select(Some(current.min(len - 1)));
        }
    }

    /// Look up the routes of the selected neighbour's AS.
    fn lookup_selected(&self) -> Option<Action> {
        let visible = self.visible();
        let neighbour = visible.get(self.table_state.selected()?)?;
        let tx = self.action_tx.as_ref()?;
        let _ = tx.send(Action::ApplyQuery(format!("AS{}", neighbour.asn)));
        Some(Action::SwitchScreen(ScreenId::Lookup))
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if let Some(gate) = self.gate.as_mut() {
                    gate.flush();
                }
                self.editing = false;
            }
            KeyCode::Esc | KeyCode::Down => self.editing = false,
            _ => {
                if text_input::edit(&mut self.input, key) {
                    if let Some(gate) = self.gate.as_mut() {
                        gate.set_filter(self.input.value());
                    }
                }
            }
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        if self.loading {
            let throbber = Throbber::default()
                .label(" Loading neighbours\u{2026}")
                .style(theme::table_row())
                .throbber_style(theme::border_focused());
            frame.render_stateful_widget(throbber, area, &mut self.throbber_state.clone());
            return;
        }
        let line = if let Some(ref error) = self.error {
            Line::from(Span::styled(error.clone(), theme::error()))
        } else if self.selected.is_none() {
            Line::from(Span::styled("No route server selected", theme::muted()))
        } else {
            Line::from(Span::styled(
                format!(
                    "Showing {} of {} neighbours",
                    self.visible().len(),
                    self.neighbours.len()
                ),
                theme::muted(),
            ))
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(
            [
                "Neighbour",
                "ASN",
                "State",
                "Uptime",
                "Received",
                "Filtered",
                "Description",
            ]
            .into_iter()
            .map(|h| Cell::from(h).style(theme::table_header())),
        );

        let rows: Vec<Row> = self
            .visible()
            .into_iter()
            .map(|n| {
                let state_style = if n.is_up() {
                    theme::success()
                } else {
                    theme::error()
                };
                let uptime =
                    humantime::format_duration(Duration::from_secs(n.uptime.as_secs())).to_string();
                Row::new(vec![
                    Cell::from(n.address.clone()),
                    Cell::from(n.asn.to_string()),
                    Cell::from(Span::styled(n.state.clone(), state_style)),
                    Cell::from(uptime),
                    Cell::from(n.routes_received.to_string()),
                    Cell::from(n.routes_filtered.to_string()),
                    Cell::from(n.description.clone()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(24),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(14),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Fill(1),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("\u{25b8} ");

        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let keys: &[(&str, &str)] = if self.editing {
            &[("Enter ", "apply  "), ("Esc ", "table")]
        } else {
            &[
                ("/ ", "filter  "),
                ("j/k ", "select  "),
                ("h/l ", "route server  "),
                ("Enter ", "lookup AS  "),
                ("r ", "reload"),
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

impl Component for NeighboursScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.gate = Some(FilterGate::new(
            action_tx.clone(),
            Action::ApplyNeighbourFilter,
        ));
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
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(10);
                None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(-10);
                None
            }
            KeyCode::Char('g') => {
                self.table_state.select_first();
                self.clamp_selection();
                None
            }
            KeyCode::Char('G') => {
                self.move_selection(isize::MAX);
                None
            }
            KeyCode::Char('l') | KeyCode::Right => self.cycle_routeserver(true),
            KeyCode::Char('h') | KeyCode::Left => self.cycle_routeserver(false),
            KeyCode::Char('r') => self.selected.clone().map(Action::SelectRouteserver),
            KeyCode::Enter => self.lookup_selected(),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.move_selection(1),
            MouseEventKind::ScrollUp => self.move_selection(-1),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::RouteserversLoaded(list) => {
                self.routeservers = Arc::clone(list);
                if self.selected.is_none() {
                    return Ok(list
                        .first()
                        .map(|rs| Action::SelectRouteserver(rs.id.clone())));
                }
            }
            Action::SelectRouteserver(id) => {
                if self.selected.as_deref() != Some(id.as_str()) {
                    self.neighbours = Arc::new(Vec::new());
                    self.table_state = TableState::default();
                }
                self.selected = Some(id.clone());
                self.loading = true;
                self.error = None;
            }
            Action::NeighboursLoaded {
                routeserver_id,
                neighbours,
            } if self.selected.as_ref() == Some(routeserver_id) => {
                self.neighbours = Arc::clone(neighbours);
                self.loading = false;
                self.clamp_selection();
            }
            Action::NeighboursFailed {
                routeserver_id,
                message,
            } if self.selected.as_ref() == Some(routeserver_id) => {
                self.loading = false;
                self.error = Some(message.clone());
            }
            Action::ApplyNeighbourFilter(filter) => {
                self.filter.clone_from(filter);
                self.table_state = TableState::default();
                self.clamp_selection();
            }
            Action::Tick if self.loading => {
                self.throbber_state.calc_next();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = match self.selected_name() {
            Some(name) => format!(" Neighbours \u{b7} {name} "),
            None => " Neighbours ".to_owned(),
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
            Constraint::Length(1), // route servers
            Constraint::Length(3), // filter
            Constraint::Length(1), // status
            Constraint::Min(1),    // table
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let names: Vec<&str> = self.routeservers.iter().map(|rs| rs.name.as_str()).collect();
        frame.render_widget(
            Paragraph::new(sub_tabs::render_sub_tabs(
                &names,
                self.selected_index().unwrap_or(usize::MAX),
            )),
            layout[0],
        );
        text_input::render_input(
            frame,
            layout[1],
            &self.input,
            "Filter",
            PLACEHOLDER,
            self.editing && self.focused,
        );
        self.render_status(frame, layout[2]);
        self.render_table(frame, layout[3]);
        self.render_hints(frame, layout[4]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            // A fresh visit starts unfiltered
            self.input.reset();
            self.editing = false;
            if let Some(gate) = self.gate.as_mut() {
                gate.reset();
            }
        }
    }

    fn captures_input(&self) -> bool {
        self.editing
    }

    fn id(&self) -> &str {
        "neighbours"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use tokio::sync::mpsc;

    fn routeservers() -> Arc<Vec<Routeserver>> {
        Arc::new(vec![
            Routeserver {
                id: "rs1".into(),
                name: "RS 1 (IPv4)".into(),
                ..Routeserver::default()
            },
            Routeserver {
                id: "rs2".into(),
                name: "RS 2 (IPv6)".into(),
                ..Routeserver::default()
            },
        ])
    }

    fn neighbours() -> Arc<Vec<Neighbour>> {
        Arc::new(vec![
            Neighbour {
                id: "n1".into(),
                address: "192.0.2.10".into(),
                asn: 64500,
                state: "up".into(),
                description: "Example Transit".into(),
                routes_received: 120,
                uptime: Duration::from_secs(90_000),
                ..Neighbour::default()
            },
            Neighbour {
                id: "n2".into(),
                address: "192.0.2.20".into(),
                asn: 64511,
                state: "down".into(),
                description: "Content Network".into(),
                ..Neighbour::default()
            },
        ])
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_screen() -> NeighboursScreen {
        let mut screen = NeighboursScreen::new();
        screen
            .update(&Action::RouteserversLoaded(routeservers()))
            .unwrap();
        screen
            .update(&Action::SelectRouteserver("rs1".into()))
            .unwrap();
        screen
            .update(&Action::NeighboursLoaded {
                routeserver_id: "rs1".into(),
                neighbours: neighbours(),
            })
            .unwrap();
        screen
    }

    fn rendered(screen: &NeighboursScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 16)).unwrap();
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
    fn first_routeserver_is_selected_on_load() {
        let mut screen = NeighboursScreen::new();
        let next = screen
            .update(&Action::RouteserversLoaded(routeservers()))
            .unwrap();
        assert!(matches!(next, Some(Action::SelectRouteserver(ref id)) if id == "rs1"));
    }

    #[test]
    fn stale_neighbours_are_ignored() {
        let mut screen = loaded_screen();
        screen
            .update(&Action::SelectRouteserver("rs2".into()))
            .unwrap();
        screen
            .update(&Action::NeighboursLoaded {
                routeserver_id: "rs1".into(),
                neighbours: neighbours(),
            })
            .unwrap();
        assert!(screen.loading);
        assert!(screen.neighbours.is_empty());
    }

    #[test]
    fn filter_narrows_rows() {
        let mut screen = loaded_screen();
        screen
            .update(&Action::ApplyNeighbourFilter("AS64511".into()))
            .unwrap();
        let text = rendered(&screen);
        assert!(text.contains("Showing 1 of 2 neighbours"), "{text}");
        assert!(text.contains("Content Network"), "{text}");
        assert!(!text.contains("Example Transit"), "{text}");
    }

    #[test]
    fn renders_sessions() {
        let screen = loaded_screen();
        let text = rendered(&screen);
        assert!(text.contains("Neighbours · RS 1 (IPv4)"), "{text}");
        assert!(text.contains("[RS 1 (IPv4)]"), "{text}");
        assert!(text.contains("1day 1h"), "{text}");
        assert!(text.contains(PLACEHOLDER), "{text}");
    }

    #[test]
    fn failure_is_shown_for_selected_routeserver() {
        let mut screen = NeighboursScreen::new();
        screen
            .update(&Action::SelectRouteserver("rs9".into()))
            .unwrap();
        screen
            .update(&Action::NeighboursFailed {
                routeserver_id: "rs9".into(),
                message: "route server not found: rs9".into(),
            })
            .unwrap();
        assert!(rendered(&screen).contains("route server not found: rs9"));
    }

    #[test]
    fn h_and_l_cycle_routeservers() {
        let mut screen = loaded_screen();
        let next = screen.handle_key_event(key(KeyCode::Char('l'))).unwrap();
        assert!(matches!(next, Some(Action::SelectRouteserver(ref id)) if id == "rs2"));
        let prev = screen.handle_key_event(key(KeyCode::Char('h'))).unwrap();
        assert!(matches!(prev, Some(Action::SelectRouteserver(ref id)) if id == "rs2"));
    }

    #[tokio::test]
    async fn enter_looks_up_neighbour_asn() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut screen = loaded_screen();
        screen.init(tx).unwrap();

        let next = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(next, Some(Action::SwitchScreen(ScreenId::Lookup))));
        assert!(matches!(rx.try_recv().unwrap(), Action::ApplyQuery(ref q) if q == "AS64500"));
    }

    #[tokio::test(start_paused = true)]
    async fn focusing_resets_filter() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut screen = loaded_screen();
        screen.init(tx).unwrap();

        screen.handle_key_event(key(KeyCode::Char('/'))).unwrap();
        screen.handle_key_event(key(KeyCode::Char('x'))).unwrap();
        screen.set_focused(true);

        assert_eq!(screen.input.value(), "");
        assert!(matches!(rx.try_recv().unwrap(), Action::ApplyNeighbourFilter(ref f) if f.is_empty()));
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(rx.try_recv().is_err(), "pending filter was cancelled");
    }
}
