//! Route server status command.

use chrono::{DateTime, Utc};

use birdglass_core::{Controller, RouteserverStatus};

use crate::cli::{GlobalOpts, StatusArgs};
use crate::error::CliError;
use crate::output;

fn timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

fn detail(rs: &str, status: &RouteserverStatus) -> String {
    let rows = [
        ("Route server", rs.to_owned()),
        ("Router ID", status.router_id.clone()),
        ("Backend", status.backend.clone()),
        ("Version", status.version.clone()),
        ("Message", status.message.clone()),
        ("Server time", timestamp(status.server_time)),
        ("Last reboot", timestamp(status.last_reboot)),
        ("Last reconfig", timestamp(status.last_reconfig)),
        ("Cached at", timestamp(status.cached_at)),
    ];
    rows.iter()
        .map(|(k, v)| format!("{k:<14} {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn handle(
    controller: &Controller,
    args: StatusArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let status = controller.status(&args.routeserver).await?;
    let out = output::render_single(
        &global.output,
        &status,
        |s| detail(&args.routeserver, s),
        |s| s.router_id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
