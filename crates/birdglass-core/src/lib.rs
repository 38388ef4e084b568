//! Lookup coordination layer between `birdglass-api` and UI consumers (CLI / TUI).
//!
//! This crate owns everything that decides *what* is on screen for a
//! prefix lookup, independent of how it is drawn:
//!
//! - **[`ResultState`]**: One immutable snapshot of the active query, the
//!   three route categories (received, filtered, not exported), their page
//!   cursors and totals, the last error, and cache metadata. Produced only by
//!   the pure [`reduce`] transition over [`LookupEvent`]s.
//!
//! - **[`Controller`]**: Request lifecycle: fires one fetch per committed
//!   query or page change, tags each response with the query it was issued
//!   for, and publishes snapshots through a `tokio::sync::watch` channel.
//!   Responses from a superseded fetch are dropped. [`GlobalLookup`] serves
//!   the same lifecycle from the flat, non-categorised endpoint.
//!
//! - **Pagination** ([`pagination`]): Three page cursors encoded into one
//!   location (`?pr=&pf=&pn=&q=#anchor`), page link sets with an overflow
//!   selector, and the "Showing x - y of z" info line.
//!
//! - **[`FilterGate`]**: Debounced filter dispatch with an immediate echo
//!   value and a cancellable trailing timer.
//!
//! - **[`ColumnRegistry`]**: Column key to renderer mapping for route tables.

pub mod columns;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod filter_gate;
pub mod lookup;
pub mod model;
pub mod pagination;

// ── Primary re-exports ──────────────────────────────────────────────
pub use columns::{ColumnRegistry, RenderedCell, RendererVariant};
pub use config::{ClientConfig, TlsVerification};
pub use controller::{Controller, GlobalLookup, LookupSource};
pub use error::{CoreError, ErrorInfo};
pub use filter_gate::{FILTER_DEBOUNCE, FilterGate};
pub use lookup::{
    CategoryResults, LookupEvent, LookupPayload, RefreshState, ResultState, ResultsSummary,
    no_results_message, reduce,
};
pub use model::{
    BgpAttributes, Neighbour, Route, RouteCategory, Routeserver, RouteserverStatus,
    filter_neighbours,
};
pub use pagination::{
    LOOKUP_PATH, LocationDescriptor, PageCursors, PageLink, PageLinkSet, PageSelect,
    PaginationInfo, PaginatorView, build_page_link_set, compute_target,
};
