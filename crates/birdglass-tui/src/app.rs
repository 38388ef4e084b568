//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use birdglass_core::Controller;

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventRates, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// How long a toast stays up.
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    /// Shown in the status bar (profile name or URL).
    source_label: String,
    /// Action sender; components dispatch through this.
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    controller: Controller,
    column_overrides: Vec<(String, String)>,
    /// Committed once the event loop is running.
    initial_query: Option<String>,
    rates: EventRates,
    /// Stops the data bridge and the event reader.
    shutdown: CancellationToken,
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(
        controller: Controller,
        source_label: String,
        column_overrides: Vec<(String, String)>,
        initial_query: Option<String>,
        rates: EventRates,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        Self {
            active_screen: ScreenId::default(),
            screens,
            running: true,
            help_visible: false,
            source_label,
            action_tx,
            action_rx,
            controller,
            column_overrides,
            initial_query,
            rates,
            shutdown: CancellationToken::new(),
            notification: None,
        }
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let (cols, rows) = tui.size().unwrap_or((80, 24));
        debug!(cols, rows, "terminal size");
        self.init_screens()?;

        tokio::spawn(crate::data_bridge::spawn_data_bridge(
            self.controller.clone(),
            self.column_overrides.clone(),
            self.action_tx.clone(),
            self.shutdown.clone(),
        ));

        if let Some(query) = self.initial_query.take() {
            self.action_tx.send(Action::ApplyQuery(query))?;
        }

        let mut events = EventReader::new(self.rates, &self.shutdown);

        info!(source = %self.source_label, "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = self.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Paste(text) => {
                    if let Some(action) = self.handle_paste(&text)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.shutdown.cancel();
        events.stop();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys first, unless the active screen is capturing text input;
    /// everything else goes to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        let capturing = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input());

        if !capturing {
            match (key.modifiers, key.code) {
                (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
                (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                    return Ok(Some(Action::ToggleHelp));
                }
                (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                    let n = c as u8 - b'0';
                    if let Some(screen) = ScreenId::from_number(n) {
                        return Ok(Some(Action::SwitchScreen(screen)));
                    }
                }
                (KeyModifiers::NONE, KeyCode::Tab) => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
                }
                (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
                }
                _ => {}
            }
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_mouse_event(mouse);
        }
        Ok(None)
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(None);
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            debug!(screen = screen.id(), len = text.len(), "paste");
            return screen.handle_paste(text);
        }
        Ok(None)
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Update app state and propagate to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(w, h) => {
                debug!(cols = w, rows = h, "terminal resized");
            }

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        debug!(screen = screen.id(), "switched screen");
                        screen.set_focused(true);
                    }
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::Render => {}

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    screen.update(action)?;
                }
            }

            // ── Controller commands ──
            Action::ApplyQuery(query) => {
                debug!(%query, "committing query");
                self.controller.request(query);
            }
            Action::SetPage(category, page) => {
                let target = self.controller.set_page(*category, *page);
                debug!(%target, "page change");
            }
            Action::Navigate(target) => {
                self.controller.navigate(target.clone());
            }
            Action::SelectRouteserver(id) => {
                self.fetch_neighbours(id.clone());
                self.broadcast(action)?;
            }

            // Data updates go to ALL screens so they stay in sync
            Action::LookupUpdated(_)
            | Action::LocationChanged(_)
            | Action::ColumnsLoaded(_)
            | Action::RouteserversLoaded(_)
            | Action::NeighboursLoaded { .. }
            | Action::NeighboursFailed { .. } => {
                self.broadcast(action)?;
            }

            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }

            // Everything else goes to the active screen only
            other => {
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(other)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn fetch_neighbours(&self, routeserver_id: String) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let action = match controller.neighbours(&routeserver_id).await {
                Ok(list) => {
                    debug!(%routeserver_id, count = list.len(), "neighbours loaded");
                    Action::NeighboursLoaded {
                        routeserver_id,
                        neighbours: Arc::new(list),
                    }
                }
                Err(e) => {
                    warn!(%routeserver_id, error = %e, "failed to load neighbours");
                    Action::NeighboursFailed {
                        routeserver_id,
                        message: e.to_string(),
                    }
                }
            };
            let _ = tx.send(action);
        });
    }

    // ── Rendering ────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if let Some((ref notif, _)) = self.notification {
            render_notification(frame, area, notif);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(format!("\u{25cf} {}", self.source_label), theme::success()),
            Span::styled(" \u{2502} ? help  Tab screen  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Centered rectangle of at most `width` x `height` inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(area.x + x, area.y + y, width, height)
}

fn help_row(key: &str, text: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<11}"), theme::key_hint_key()),
        Span::styled(text.to_owned(), theme::key_hint()),
    ])
}

fn help_section(title: &str) -> [Line<'static>; 2] {
    [
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(theme::SKY),
        )),
        Line::from(Span::styled(
            format!("  {}", "\u{2500}".repeat(title.chars().count())),
            theme::key_hint(),
        )),
    ]
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_area = centered(area, 60, 26);
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::NIGHT));
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let mut lines = vec![Line::from("")];
    lines.extend(help_section("Navigation"));
    lines.extend([
        help_row("1-2 Tab", "Switch screen"),
        help_row("j/k \u{2191}/\u{2193}", "Move up/down"),
        help_row("Ctrl+d/u", "Jump ten rows"),
        help_row("h/l", "Category / route server"),
        help_row("\u{2190}/\u{2192} [ ]", "Previous / next page"),
        help_row("Home/End", "First / last page"),
    ]);
    lines.push(Line::from(""));
    lines.extend(help_section("Lookup"));
    lines.extend([
        help_row("/ i", "Edit search (Enter applies now)"),
        help_row("Enter", "Route details"),
        help_row("c", "Clear search"),
        help_row("r", "Retry failed lookup"),
        help_row("n", "Neighbours of the route server"),
    ]);
    lines.push(Line::from(""));
    lines.extend(help_section("Global"));
    lines.extend([help_row("?", "This help"), help_row("q Ctrl+c", "Quit")]);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "                         Esc or ? to close",
        theme::key_hint(),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 60);
    let height = 3u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(area.x + x, area.y + y, width.min(area.width), height);

    let (style, icon) = match notif.level {
        NotificationLevel::Error => (theme::error(), "\u{2717}"),
        NotificationLevel::Warning => (theme::warning(), "!"),
    };

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style)
        .style(Style::default().bg(theme::NIGHT));
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), style),
        Span::styled(notif.message.clone(), theme::table_row()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
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
    fn toast_shows_message() {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal
            .draw(|f| {
                render_notification(
                    f,
                    f.area(),
                    &Notification::error("Route servers unavailable"),
                );
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("\u{2717} Route servers unavailable"));
    }

    #[test]
    fn help_lists_lookup_keys() {
        let mut terminal = Terminal::new(TestBackend::new(80, 32)).unwrap();
        terminal
            .draw(|f| render_help_overlay(f, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Keyboard Shortcuts"), "{text}");
        assert!(text.contains("Retry failed lookup"), "{text}");
    }

    #[test]
    fn centered_fits_small_areas() {
        let rect = centered(Rect::new(0, 0, 30, 10), 60, 26);
        assert_eq!(rect, Rect::new(2, 2, 26, 6));
    }
}
