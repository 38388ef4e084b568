// ── Domain model ──
//
// Canonical types consumed by the CLI and TUI. Built from wire types in
// `crate::convert`.

pub mod category;
pub mod neighbour;
pub mod route;

pub use category::RouteCategory;
pub use neighbour::{Neighbour, Routeserver, RouteserverStatus, filter_neighbours};
pub use route::{BLACKHOLE_COMMUNITY, BgpAttributes, Route};
