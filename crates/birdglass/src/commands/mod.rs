//! Command dispatch: bridges CLI args -> core Controller -> output formatting.

pub mod config_cmd;
pub mod lookup;
pub mod neighbours;
pub mod routeservers;
pub mod status;

use birdglass_core::{ClientConfig, ColumnRegistry, Controller};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a looking-glass-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    client: &ClientConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Lookup(args) => {
            let columns = lookup_columns(controller, client).await;
            lookup::handle(controller, &columns, args, global).await
        }
        Command::Routeservers(args) => routeservers::handle(controller, args, global).await,
        Command::Status(args) => status::handle(controller, args, global).await,
        Command::Neighbours(args) => neighbours::handle(controller, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

/// Profile columns, else the server's, else the built-in defaults.
async fn lookup_columns(controller: &Controller, client: &ClientConfig) -> ColumnRegistry {
    match controller.lookup_columns(&client.lookup_columns).await {
        Ok(columns) => columns,
        Err(e) => {
            tracing::warn!(error = %e, "could not load lookup columns, using defaults");
            ColumnRegistry::default()
        }
    }
}
