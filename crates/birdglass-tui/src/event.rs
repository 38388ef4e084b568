//! Terminal input for the app loop.
//!
//! A background task turns crossterm events into [`Event`]s and interleaves
//! them with two clocks: the tick that drives the throbber and toast expiry,
//! and the render clock. Bracketed paste arrives as one [`Event::Paste`], so
//! a prefix copied from a router session lands in the search box in one edit.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// (cols, rows)
    Resize(u16, u16),
    Paste(String),
    Tick,
    Render,
}

/// Clock rates of the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRates {
    pub tick: Duration,
    pub render: Duration,
}

impl EventRates {
    pub const DEFAULT_FPS: u16 = 30;
    pub const MAX_FPS: u16 = 60;
    const TICK: Duration = Duration::from_millis(250);

    /// Render `fps` frames per second, clamped to `1..=MAX_FPS`. The tick
    /// stays at 4 Hz so the throbber speed does not depend on the frame rate.
    pub fn with_fps(fps: u16) -> Self {
        let fps = u64::from(fps.clamp(1, Self::MAX_FPS));
        Self {
            tick: Self::TICK,
            render: Duration::from_millis(1000 / fps),
        }
    }
}

impl Default for EventRates {
    fn default() -> Self {
        Self::with_fps(Self::DEFAULT_FPS)
    }
}

/// The app only sees key presses; releases, repeats and focus changes are
/// dropped, as is an empty paste.
fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        CrosstermEvent::Paste(text) if !text.trim().is_empty() => Some(Event::Paste(text)),
        _ => None,
    }
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Spawn the reader task. It stops on [`stop`](Self::stop), on drop,
    /// when `shutdown` is cancelled, or once the receiver is gone.
    pub fn new(rates: EventRates, shutdown: &CancellationToken) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = shutdown.child_token();
        debug!(tick = ?rates.tick, render = ?rates.render, "starting event reader");

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut terminal_events = EventStream::new();
            let mut tick = tokio::time::interval(rates.tick);
            let mut render = tokio::time::interval(rates.render);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            render.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let event = tokio::select! {
                    () = task_cancel.cancelled() => break,
                    _ = tick.tick() => Event::Tick,
                    _ = render.tick() => Event::Render,
                    next = terminal_events.next() => match next {
                        Some(Ok(raw)) => match translate(raw) {
                            Some(event) => event,
                            None => continue,
                        },
                        Some(Err(e)) => {
                            debug!(error = %e, "terminal event error");
                            continue;
                        }
                        None => break,
                    },
                };

                if tx.send(event).is_err() {
                    break;
                }
            }
            debug!("event reader stopped");
        });

        Self { rx, cancel }
    }

    /// `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
