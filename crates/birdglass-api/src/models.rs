// Wire types for the looking glass REST API.
//
// Field names follow the JSON the server emits. Everything is
// `#[serde(default)]` because backends omit fields freely, and Go
// zero-values (`0001-01-01T00:00:00Z`, `0`, `""`) are common.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ── Helpers ─────────────────────────────────────────────────────────

/// Identifiers are integers on older backends and strings on newer ones.
fn string_or_int<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Str(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
        None => String::new(),
    })
}

fn opt_string_or_int<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = string_or_int(deserializer)?;
    Ok((!id.is_empty() && id != "0").then_some(id))
}

// ── Errors ──────────────────────────────────────────────────────────

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorResponse {
    pub message: String,
    pub code: i64,
    pub tag: String,
    #[serde(deserialize_with = "opt_string_or_int")]
    pub routeserver_id: Option<String>,
}

// ── API status / cache ──────────────────────────────────────────────

/// Cache bookkeeping attached to cacheable responses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheStatus {
    pub cached_at: Option<DateTime<Utc>>,
    pub orig_ttl: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiStatus {
    pub version: String,
    pub cache_status: CacheStatus,
    pub result_from_cache: bool,
    /// Point in time at which the cached result expires.
    pub ttl: Option<DateTime<Utc>>,
}

// ── Config ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigResponse {
    pub asn: u32,
    pub bgp_communities: serde_json::Value,
    pub neighbours_columns: HashMap<String, String>,
    pub neighbours_columns_order: Vec<String>,
    pub routes_columns: HashMap<String, String>,
    pub routes_columns_order: Vec<String>,
    pub lookup_columns: HashMap<String, String>,
    pub lookup_columns_order: Vec<String>,
    pub prefix_lookup_enabled: bool,
}

// ── Routeservers ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Routeserver {
    #[serde(deserialize_with = "string_or_int")]
    pub id: String,
    pub name: String,
    pub group: String,
    pub blackholes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteserversResponse {
    pub routeservers: Vec<Routeserver>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Status {
    pub server_time: Option<DateTime<Utc>>,
    pub last_reboot: Option<DateTime<Utc>>,
    pub last_reconfig: Option<DateTime<Utc>>,
    pub message: String,
    pub router_id: String,
    pub version: String,
    pub backend: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusResponse {
    pub api: ApiStatus,
    pub status: Status,
}

// ── Neighbours ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Neighbour {
    pub id: String,
    pub address: String,
    pub asn: u32,
    pub state: String,
    pub description: String,
    pub routes_received: u64,
    pub routes_filtered: u64,
    pub routes_exported: u64,
    pub routes_preferred: u64,
    pub routes_accepted: u64,
    pub routes_pipe_filtered: u64,
    /// Uptime in nanoseconds.
    pub uptime: i64,
    pub last_error: String,
    pub details: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NeighboursResponse {
    pub api: ApiStatus,
    pub neighbours: Vec<Neighbour>,
}

// ── BGP / routes ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BgpInfo {
    pub origin: String,
    pub as_path: Vec<u32>,
    pub next_hop: String,
    pub communities: Vec<Vec<u32>>,
    pub large_communities: Vec<Vec<u32>>,
    /// Extended communities mix strings (`"rt"`) and integers.
    pub ext_communities: Vec<Vec<serde_json::Value>>,
    pub local_pref: u32,
    pub med: u32,
}

/// A route as returned by the prefix lookup, annotated with the
/// neighbour and routeserver it was learned from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LookupRoute {
    pub id: String,
    pub neighbour_id: String,
    pub neighbour: Option<Neighbour>,
    /// `imported`, `filtered`, `noexport`, ...
    pub state: String,
    pub routeserver: Routeserver,
    pub network: String,
    pub interface: String,
    pub gateway: String,
    pub metric: i64,
    pub bgp: BgpInfo,
    /// Age in nanoseconds.
    pub age: i64,
    #[serde(rename = "type")]
    pub route_type: Vec<String>,
    pub primary: bool,
    pub details: serde_json::Map<String, serde_json::Value>,
}

// ── Lookup responses ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_results: usize,
}

/// One category of a paginated lookup.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LookupRoutesResponse {
    pub pagination: Pagination,
    pub routes: Vec<LookupRoute>,
}

/// Categorised, paginated prefix lookup.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginatedRoutesLookupResponse {
    pub request_duration_ms: f64,
    pub api: ApiStatus,
    pub imported: Option<LookupRoutesResponse>,
    pub filtered: Option<LookupRoutesResponse>,
    pub not_exported: Option<LookupRoutesResponse>,
}

/// Flat lookup with limit/offset paging, served by older backends.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesLookupResponseGlobal {
    pub routes: Vec<LookupRoute>,
    pub total_routes: usize,
    pub limit: usize,
    pub offset: usize,
    pub query_duration_ms: f64,
}

/// Requested zero-based page per category for a prefix lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupPages {
    pub imported: usize,
    pub filtered: usize,
    pub not_exported: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn routeserver_id_accepts_int_and_string() {
        let a: Routeserver = serde_json::from_value(json!({"id": 3, "name": "rs3"})).unwrap();
        let b: Routeserver = serde_json::from_value(json!({"id": "rs3-v4", "name": "rs3"})).unwrap();
        assert_eq!(a.id, "3");
        assert_eq!(b.id, "rs3-v4");
    }

    #[test]
    fn lookup_route_tolerates_sparse_payload() {
        let route: LookupRoute = serde_json::from_value(json!({
            "network": "10.0.0.0/8",
            "type": ["BGP", "unicast"],
            "bgp": {
                "as_path": [64500, 64501],
                "ext_communities": [["rt", 64500, 1]]
            }
        }))
        .unwrap();
        assert_eq!(route.network, "10.0.0.0/8");
        assert_eq!(route.route_type, vec!["BGP", "unicast"]);
        assert_eq!(route.bgp.as_path, vec![64500, 64501]);
        assert!(route.neighbour.is_none());
    }

    #[test]
    fn zero_routeserver_id_in_error_is_none() {
        let err: ErrorResponse =
            serde_json::from_value(json!({"message": "boom", "code": 1, "routeserver_id": 0}))
                .unwrap();
        assert!(err.routeserver_id.is_none());
    }
}
