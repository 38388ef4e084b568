//! All UI actions. Actions are the only way state changes.

use std::sync::Arc;

use birdglass_core::{
    ColumnRegistry, LocationDescriptor, Neighbour, ResultState, RouteCategory, Routeserver,
};

use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Warning,
    Error,
}

/// A toast shown above the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ──
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Lookup ──
    /// Debounced search input, committed as a new request.
    ApplyQuery(String),
    /// Jump one category to a page, keeping the others.
    SetPage(RouteCategory, usize),
    /// Open a location, e.g. to retry a failed lookup with its cursors.
    Navigate(LocationDescriptor),
    LookupUpdated(Arc<ResultState>),
    LocationChanged(LocationDescriptor),
    ColumnsLoaded(Arc<ColumnRegistry>),

    // ── Neighbours ──
    RouteserversLoaded(Arc<Vec<Routeserver>>),
    SelectRouteserver(String),
    NeighboursLoaded {
        routeserver_id: String,
        neighbours: Arc<Vec<Neighbour>>,
    },
    NeighboursFailed {
        routeserver_id: String,
        message: String,
    },
    /// Debounced neighbour filter.
    ApplyNeighbourFilter(String),

    // ── Notifications ──
    Notify(Notification),
}
