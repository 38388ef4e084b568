// ── Controller ──
//
// Request lifecycle for prefix lookups. Every committed query or page
// change starts a new generation and fires one fetch on a spawned task.
// A completion is applied only if its generation is still current, checked
// under the same `watch` lock that replaces the `ResultState` snapshot.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use birdglass_api::LookingGlassClient;

use crate::columns::ColumnRegistry;
use crate::config::ClientConfig;
use crate::error::{CoreError, ErrorInfo};
use crate::lookup::{DEFAULT_PAGE_SIZE, LookupEvent, LookupPayload, ResultState, reduce};
use crate::model::{Neighbour, RouteCategory, Routeserver, RouteserverStatus};
use crate::pagination::{LocationDescriptor, PageCursors, compute_target};

// ── LookupSource ─────────────────────────────────────────────────

/// Where lookups are fetched from.
pub trait LookupSource: Send + Sync + 'static {
    fn lookup(
        &self,
        query: &str,
        cursors: PageCursors,
    ) -> impl Future<Output = Result<LookupPayload, CoreError>> + Send;
}

impl LookupSource for LookingGlassClient {
    async fn lookup(&self, query: &str, cursors: PageCursors) -> Result<LookupPayload, CoreError> {
        let resp = self.lookup_prefix(query, cursors.into()).await?;
        Ok(resp.into())
    }
}

/// Flat prefix lookup for looking glasses without categorised pagination.
///
/// Every route lands in `received`; the received cursor picks the offset.
/// The filtered and not-exported cursors are ignored.
#[derive(Debug, Clone)]
pub struct GlobalLookup {
    client: LookingGlassClient,
    page_size: usize,
}

impl GlobalLookup {
    pub fn new(client: LookingGlassClient) -> Self {
        Self {
            client,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

impl LookupSource for GlobalLookup {
    async fn lookup(&self, query: &str, cursors: PageCursors) -> Result<LookupPayload, CoreError> {
        let offset = cursors.received.saturating_mul(self.page_size);
        let resp = self
            .client
            .lookup_global(query, self.page_size, offset)
            .await?;
        Ok(resp.into())
    }
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Must be driven from
/// within a tokio runtime.
pub struct Controller<S: LookupSource = LookingGlassClient> {
    inner: Arc<ControllerInner<S>>,
}

impl<S: LookupSource> Clone for Controller<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ControllerInner<S> {
    source: S,
    state: watch::Sender<Arc<ResultState>>,
    location: watch::Sender<LocationDescriptor>,
    /// Bumped for every fetch; completions from older fetches are dropped.
    generation: AtomicU64,
    /// Token of the fetch currently in flight.
    in_flight: Mutex<Option<CancellationToken>>,
    cancel: CancellationToken,
}

impl<S: LookupSource> Controller<S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(Arc::new(ResultState::initial()));
        let (location, _) = watch::channel(LocationDescriptor::home());

        Self {
            inner: Arc::new(ControllerInner {
                source,
                state,
                location,
                generation: AtomicU64::new(0),
                in_flight: Mutex::new(None),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    // ── Read side ────────────────────────────────────────────────

    /// Current snapshot.
    pub fn state(&self) -> Arc<ResultState> {
        Arc::clone(&self.inner.state.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ResultState>> {
        self.inner.state.subscribe()
    }

    pub fn location(&self) -> LocationDescriptor {
        self.inner.location.borrow().clone()
    }

    pub fn subscribe_location(&self) -> watch::Receiver<LocationDescriptor> {
        self.inner.location.subscribe()
    }

    /// Run a lookup for `target` and wait for its result.
    pub async fn lookup(&self, target: LocationDescriptor) -> Arc<ResultState> {
        self.navigate(target);
        self.settled().await
    }

    /// Wait until no lookup is loading and return that snapshot.
    pub async fn settled(&self) -> Arc<ResultState> {
        let mut rx = self.subscribe();
        match rx.wait_for(|s| !s.is_loading).await {
            Ok(state) => Arc::clone(&state),
            Err(_) => self.state(),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Apply one event. Subscribers are only woken when the state changed.
    pub fn dispatch(&self, event: LookupEvent) {
        self.inner
            .state
            .send_if_modified(|current| apply(current, event));
    }

    /// Commit `query`. An empty query resets and navigates home without
    /// fetching; anything else fetches the first page of every category.
    pub fn request(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.clear();
            return;
        }
        self.start(query, PageCursors::default(), LocationDescriptor::search(query));
    }

    /// Go to `target`. A different query is a new request; a cursor change
    /// within the active query refetches with the new pages.
    pub fn navigate(&self, target: LocationDescriptor) {
        if target.query.trim().is_empty() {
            self.clear();
            return;
        }

        if self.inner.cancel.is_cancelled() {
            debug!("controller shut down, ignoring navigation");
            return;
        }

        let state = self.state();
        if target.query != state.query {
            let query = target.query.clone();
            let cursors = target.cursors;
            self.start(&query, cursors, target);
            return;
        }

        let cursors = target.cursors;
        let refetch = cursors != state.cursors() || state.error.is_some();
        self.inner.location.send_replace(target);
        if refetch {
            let generation = self.supersede();
            self.dispatch(LookupEvent::PageChange { cursors });
            self.fetch(generation, state.query.clone(), cursors);
        }
    }

    /// Jump one category to `page`, keeping the query and other cursors.
    pub fn set_page(&self, category: RouteCategory, page: usize) -> LocationDescriptor {
        let state = self.state();
        let target = compute_target(state.cursors(), category, page, &self.location());
        self.navigate(target.clone());
        target
    }

    /// Completion for `for_query`; ignored unless it is still active.
    pub fn on_success(&self, for_query: &str, payload: LookupPayload) {
        self.dispatch(LookupEvent::success(for_query, payload));
    }

    /// Failure for `for_query`; ignored unless it is still active.
    pub fn on_error(&self, for_query: &str, error: &CoreError) {
        self.dispatch(LookupEvent::error(for_query, ErrorInfo::from(error)));
    }

    /// Cancel in-flight work. Further requests are no-ops.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        info!("controller shut down");
    }

    fn clear(&self) {
        self.supersede();
        self.dispatch(LookupEvent::request(""));
        self.inner.location.send_replace(LocationDescriptor::home());
        debug!("query cleared");
    }

    fn start(&self, query: &str, cursors: PageCursors, location: LocationDescriptor) {
        if self.inner.cancel.is_cancelled() {
            debug!(query, "controller shut down, ignoring request");
            return;
        }
        info!(query, ?cursors, "lookup requested");
        let generation = self.supersede();
        self.dispatch(LookupEvent::request_at(query, cursors));
        self.inner.location.send_replace(location);
        self.fetch(generation, query.to_owned(), cursors);
    }

    /// Start a new generation and cancel whatever is in flight. Runs before
    /// the state changes, so a completion that still sees its own generation
    /// under the state lock is never older than the state it replaces.
    fn supersede(&self) -> u64 {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let previous = self
            .inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.cancel();
        }
        generation
    }

    /// Apply a fetch completion unless a newer fetch or a reset happened
    /// since `generation`. Check and replace share the state lock.
    fn complete(&self, generation: u64, event: LookupEvent) {
        self.inner.state.send_if_modified(|current| {
            if self.inner.generation.load(Ordering::SeqCst) != generation {
                debug!(generation, "dropping superseded response");
                return false;
            }
            apply(current, event)
        });
    }

    fn fetch(&self, generation: u64, query: String, cursors: PageCursors) {
        let token = self.inner.cancel.child_token();
        *self
            .inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(token.clone());

        debug!(%query, ?cursors, generation, "dispatching lookup");
        let this = self.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!(%query, generation, "lookup cancelled");
                    return;
                }
                result = this.inner.source.lookup(&query, cursors) => result,
            };

            let event = match result {
                Ok(payload) => LookupEvent::success(query, payload),
                Err(e) => {
                    warn!(%query, error = %e, "lookup failed");
                    LookupEvent::error(query, ErrorInfo::from(&e))
                }
            };
            this.complete(generation, event);
        });
    }
}

/// Reduce `event` into `current`; `true` when the snapshot changed.
fn apply(current: &mut Arc<ResultState>, event: LookupEvent) -> bool {
    let next = reduce(current, event);
    if next == **current {
        return false;
    }
    *current = Arc::new(next);
    true
}

// ── Looking glass specifics ──────────────────────────────────────

impl Controller<LookingGlassClient> {
    /// Build a controller talking to the looking glass in `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, CoreError> {
        let client = LookingGlassClient::new(config.url.clone(), &config.transport())?;
        Ok(Self::new(client))
    }

    /// A controller on the same looking glass using the flat lookup.
    pub fn global(&self) -> Controller<GlobalLookup> {
        Controller::new(GlobalLookup::new(self.inner.source.clone()))
    }

    pub async fn routeservers(&self) -> Result<Vec<Routeserver>, CoreError> {
        let list = self.inner.source.routeservers().await?;
        Ok(list.into_iter().map(Routeserver::from).collect())
    }

    /// Neighbours of a route server, ordered by ASN.
    pub async fn neighbours(&self, routeserver_id: &str) -> Result<Vec<Neighbour>, CoreError> {
        let resp = self
            .inner
            .source
            .neighbours(routeserver_id)
            .await
            .map_err(|e| not_found_as_routeserver(e.into(), routeserver_id))?;
        let mut neighbours: Vec<Neighbour> =
            resp.neighbours.into_iter().map(Neighbour::from).collect();
        neighbours.sort_by_key(|n| n.asn);
        Ok(neighbours)
    }

    pub async fn status(&self, routeserver_id: &str) -> Result<RouteserverStatus, CoreError> {
        let resp = self
            .inner
            .source
            .status(routeserver_id)
            .await
            .map_err(|e| not_found_as_routeserver(e.into(), routeserver_id))?;
        Ok(resp.into())
    }

    /// Lookup table columns: `overrides` if given, otherwise the server's.
    pub async fn lookup_columns(
        &self,
        overrides: &[(String, String)],
    ) -> Result<ColumnRegistry, CoreError> {
        if !overrides.is_empty() {
            return Ok(ColumnRegistry::from_pairs(overrides.iter().cloned()));
        }
        let config = self.inner.source.config().await?;
        if !config.prefix_lookup_enabled {
            warn!("looking glass reports prefix lookup as disabled");
        }
        Ok(ColumnRegistry::from_config(
            &config.lookup_columns,
            &config.lookup_columns_order,
        ))
    }
}

fn not_found_as_routeserver(err: CoreError, routeserver_id: &str) -> CoreError {
    match err {
        CoreError::NotFound { .. } => CoreError::RouteserverNotFound {
            identifier: routeserver_id.to_owned(),
        },
        other => other,
    }
}
