// ── API-to-domain type conversions ──
//
// Bridges raw `birdglass_api` response types into canonical
// `birdglass_core::model` domain types. Both lookup wire shapes end up as
// one `LookupPayload`.

use std::time::Duration;

use serde_json::Value;

use birdglass_api::models as api;

use crate::lookup::{CategoryResults, LookupPayload};
use crate::model::{BgpAttributes, Neighbour, Route, Routeserver, RouteserverStatus};

// ── Helpers ────────────────────────────────────────────────────────

/// Go durations travel as signed nanoseconds.
fn nanos_to_duration(nanos: i64) -> Duration {
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(0))
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

// ── Route servers / neighbours ─────────────────────────────────────

impl From<api::Routeserver> for Routeserver {
    fn from(rs: api::Routeserver) -> Self {
        Self {
            id: rs.id,
            name: rs.name,
            group: rs.group,
            blackholes: rs.blackholes,
        }
    }
}

impl From<api::Neighbour> for Neighbour {
    fn from(n: api::Neighbour) -> Self {
        Self {
            id: n.id,
            address: n.address,
            asn: n.asn,
            state: n.state,
            description: n.description,
            routes_received: n.routes_received,
            routes_filtered: n.routes_filtered,
            routes_exported: n.routes_exported,
            routes_accepted: n.routes_accepted,
            uptime: nanos_to_duration(n.uptime),
            last_error: non_empty(n.last_error),
        }
    }
}

impl From<api::StatusResponse> for RouteserverStatus {
    fn from(resp: api::StatusResponse) -> Self {
        let status = resp.status;
        Self {
            router_id: status.router_id,
            version: status.version,
            backend: status.backend,
            message: status.message,
            server_time: status.server_time,
            last_reboot: status.last_reboot,
            last_reconfig: status.last_reconfig,
            cached_at: resp.api.cache_status.cached_at,
        }
    }
}

// ── Routes ─────────────────────────────────────────────────────────

impl From<api::BgpInfo> for BgpAttributes {
    fn from(bgp: api::BgpInfo) -> Self {
        Self {
            origin: bgp.origin,
            as_path: bgp.as_path,
            next_hop: bgp.next_hop,
            communities: bgp.communities,
            large_communities: bgp.large_communities,
            ext_communities: bgp
                .ext_communities
                .into_iter()
                .map(|c| c.into_iter().map(value_text).collect())
                .collect(),
            local_pref: bgp.local_pref,
            med: bgp.med,
        }
    }
}

impl From<api::LookupRoute> for Route {
    fn from(r: api::LookupRoute) -> Self {
        Self {
            id: r.id,
            neighbour_id: r.neighbour_id,
            neighbour: r.neighbour.map(Neighbour::from),
            routeserver: r.routeserver.into(),
            state: r.state,
            network: r.network,
            interface: r.interface,
            gateway: r.gateway,
            metric: r.metric,
            bgp: r.bgp.into(),
            age: nanos_to_duration(r.age),
            primary: r.primary,
            details: r.details,
        }
    }
}

impl From<api::LookupRoutesResponse> for CategoryResults {
    fn from(resp: api::LookupRoutesResponse) -> Self {
        Self {
            routes: resp.routes.into_iter().map(Route::from).collect(),
            page: resp.pagination.page,
            page_size: resp.pagination.page_size,
            total_pages: resp.pagination.total_pages,
            total_results: resp.pagination.total_results,
        }
    }
}

fn category(resp: Option<api::LookupRoutesResponse>) -> CategoryResults {
    resp.map(CategoryResults::from).unwrap_or_default()
}

// ── Lookup payloads ────────────────────────────────────────────────

impl From<api::PaginatedRoutesLookupResponse> for LookupPayload {
    fn from(resp: api::PaginatedRoutesLookupResponse) -> Self {
        Self {
            received: category(resp.imported),
            filtered: category(resp.filtered),
            not_exported: category(resp.not_exported),
            query_duration_ms: resp.request_duration_ms,
            cached_at: resp.api.cache_status.cached_at,
            cache_ttl: resp.api.ttl,
        }
    }
}

/// The flat lookup has no categories; every route lands in `received`
/// and `limit`/`offset` become page size and cursor.
impl From<api::RoutesLookupResponseGlobal> for LookupPayload {
    fn from(resp: api::RoutesLookupResponseGlobal) -> Self {
        let page = resp.offset.checked_div(resp.limit).unwrap_or(0);
        Self {
            received: CategoryResults {
                routes: resp.routes.into_iter().map(Route::from).collect(),
                page,
                page_size: resp.limit,
                total_pages: 0,
                total_results: resp.total_routes,
            },
            filtered: CategoryResults::default(),
            not_exported: CategoryResults::default(),
            query_duration_ms: resp.query_duration_ms,
            cached_at: None,
            cache_ttl: None,
        }
    }
}
