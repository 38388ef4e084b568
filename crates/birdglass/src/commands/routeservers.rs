//! Route server command handlers.

use tabled::Tabled;

use birdglass_core::{Controller, Routeserver};

use crate::cli::{GlobalOpts, RouteserversArgs, RouteserversCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RouteserverRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Blackholes")]
    blackholes: String,
}

impl From<&Routeserver> for RouteserverRow {
    fn from(rs: &Routeserver) -> Self {
        Self {
            id: rs.id.clone(),
            name: rs.name.clone(),
            group: rs.group.clone(),
            blackholes: rs.blackholes.join(", "),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: RouteserversArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RouteserversCommand::List { group } => {
            let mut all = controller.routeservers().await?;
            if let Some(ref group) = group {
                all.retain(|rs| rs.group.eq_ignore_ascii_case(group));
            }
            let out = output::render_list(
                &global.output,
                &all,
                |rs| RouteserverRow::from(rs),
                |rs| rs.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
