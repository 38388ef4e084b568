// ── Lookup state machine ──
//
// `ResultState` is only ever produced by `reduce`. Consumers hold
// `Arc<ResultState>` snapshots and never observe a change in place.

pub mod event;
pub mod reducer;
pub mod state;
pub mod summary;

pub use event::{LookupEvent, LookupPayload};
pub use reducer::reduce;
pub use state::{CategoryResults, DEFAULT_PAGE_SIZE, ResultState};
pub use summary::{RefreshState, ResultsSummary, no_results_message, relative};
