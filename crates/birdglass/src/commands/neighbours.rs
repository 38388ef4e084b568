//! Neighbour command handler.

use tabled::Tabled;

use birdglass_core::{Controller, Neighbour, filter_neighbours};

use crate::cli::{GlobalOpts, NeighboursArgs};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NeighbourRow {
    #[tabled(rename = "ASN")]
    asn: u32,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Uptime")]
    uptime: String,
    #[tabled(rename = "Received")]
    received: u64,
    #[tabled(rename = "Filtered")]
    filtered: u64,
    #[tabled(rename = "Exported")]
    exported: u64,
}

impl From<&Neighbour> for NeighbourRow {
    fn from(n: &Neighbour) -> Self {
        Self {
            asn: n.asn,
            address: n.address.clone(),
            description: n.description.clone(),
            state: n.state.clone(),
            uptime: output::format_duration(n.uptime),
            received: n.routes_received,
            filtered: n.routes_filtered,
            exported: n.routes_exported,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: NeighboursArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let all = controller.neighbours(&args.routeserver).await?;
    let shown: Vec<Neighbour> = filter_neighbours(&all, args.filter.as_deref().unwrap_or(""))
        .into_iter()
        .filter(|n| !args.up || n.is_up())
        .cloned()
        .collect();

    let out = output::render_list(
        &global.output,
        &shown,
        |n| NeighbourRow::from(n),
        |n| n.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
