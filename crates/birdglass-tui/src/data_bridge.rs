//! Connects the [`Controller`] to TUI actions.
//!
//! Runs as a background task: loads the lookup columns and route servers
//! once, then forwards every published `ResultState` snapshot and location
//! change as an [`Action`] until cancelled.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use birdglass_core::{ColumnRegistry, Controller};

use crate::action::{Action, Notification};

pub async fn spawn_data_bridge(
    controller: Controller,
    column_overrides: Vec<(String, String)>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut state = controller.subscribe();
    let mut location = controller.subscribe_location();

    // Push initial snapshots so screens have data immediately
    let _ = action_tx.send(Action::LookupUpdated(Arc::clone(&state.borrow_and_update())));
    let _ = action_tx.send(Action::LocationChanged(location.borrow_and_update().clone()));

    // Metadata may be slow; lookups must not wait for it
    tokio::spawn(load_metadata(controller.clone(), column_overrides, action_tx.clone()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = state.changed() => {
                let snapshot = Arc::clone(&state.borrow_and_update());
                debug!(query = %snapshot.query, loading = snapshot.is_loading, "dispatching LookupUpdated");
                let _ = action_tx.send(Action::LookupUpdated(snapshot));
            }
            Ok(()) = location.changed() => {
                let loc = location.borrow_and_update().clone();
                let _ = action_tx.send(Action::LocationChanged(loc));
            }
            else => break,
        }
    }

    controller.shutdown();
    debug!("data bridge shut down");
}

/// Lookup columns and route servers, fetched once per session.
async fn load_metadata(
    controller: Controller,
    column_overrides: Vec<(String, String)>,
    action_tx: mpsc::UnboundedSender<Action>,
) {
    let columns = match controller.lookup_columns(&column_overrides).await {
        Ok(columns) => columns,
        Err(e) => {
            warn!(error = %e, "could not load lookup columns, using defaults");
            let _ = action_tx.send(Action::Notify(Notification::warning(
                "Using default lookup columns",
            )));
            ColumnRegistry::default()
        }
    };
    let _ = action_tx.send(Action::ColumnsLoaded(Arc::new(columns)));

    match controller.routeservers().await {
        Ok(list) => {
            debug!(count = list.len(), "route servers loaded");
            let _ = action_tx.send(Action::RouteserversLoaded(Arc::new(list)));
        }
        Err(e) => {
            warn!(error = %e, "failed to load route servers");
            let _ = action_tx.send(Action::Notify(Notification::error(format!(
                "Route servers unavailable: {e}"
            ))));
        }
    }
}
