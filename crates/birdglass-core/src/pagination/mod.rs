// ── Multi-cursor pagination ──
//
// Three independent page cursors share one location. Navigating one
// category rewrites only its own cursor and anchor; the query and the
// other two cursors are carried over untouched.

pub mod cursors;
pub mod info;
pub mod links;
pub mod location;

pub use cursors::PageCursors;
pub use info::PaginationInfo;
pub use links::{
    MAX_DIRECT_LINKS, PageLink, PageLinkSet, PageSelect, PaginatorView, build_page_link_set,
};
pub use location::{LOOKUP_PATH, LocationDescriptor, compute_target};
