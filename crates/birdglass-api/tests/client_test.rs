#![allow(clippy::unwrap_used)]
// Integration tests for `LookingGlassClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use birdglass_api::{Error, LookingGlassClient, LookupPages};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, LookingGlassClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = LookingGlassClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn lookup_route(network: &str, state: &str) -> serde_json::Value {
    json!({
        "id": network,
        "neighbour_id": "AS64500_1",
        "neighbour": { "id": "AS64500_1", "asn": 64500, "description": "Example Transit" },
        "state": state,
        "routeserver": { "id": "rs1", "name": "RS 1" },
        "network": network,
        "gateway": "192.0.2.1",
        "bgp": { "as_path": [64500, 64511], "communities": [[65535, 666]] },
        "primary": true
    })
}

// ── Lookup tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_lookup_prefix_sends_all_cursors() {
    let (server, client) = setup().await;

    let body = json!({
        "request_duration_ms": 12.5,
        "api": {
            "cache_status": { "cached_at": "2024-05-01T10:00:00Z" },
            "ttl": "2024-05-01T10:05:00Z"
        },
        "imported": {
            "pagination": { "page": 1, "page_size": 2, "total_pages": 3, "total_results": 5 },
            "routes": [lookup_route("10.0.0.0/8", "imported"), lookup_route("10.1.0.0/16", "imported")]
        },
        "filtered": {
            "pagination": { "page": 0, "page_size": 2, "total_pages": 1, "total_results": 1 },
            "routes": [lookup_route("10.2.0.0/16", "filtered")]
        }
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/lookup/prefix"))
        .and(query_param("q", "10.0.0.0/8"))
        .and(query_param("page_imported", "1"))
        .and(query_param("page_filtered", "0"))
        .and(query_param("page_not_exported", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let pages = LookupPages {
        imported: 1,
        filtered: 0,
        not_exported: 2,
    };
    let resp = client.lookup_prefix("10.0.0.0/8", pages).await.unwrap();

    let imported = resp.imported.unwrap();
    assert_eq!(imported.pagination.total_results, 5);
    assert_eq!(imported.routes.len(), 2);
    assert_eq!(imported.routes[0].routeserver.id, "rs1");
    assert_eq!(resp.filtered.unwrap().routes[0].state, "filtered");
    assert!(resp.not_exported.is_none());
    assert!(resp.api.cache_status.cached_at.is_some());
    assert!((resp.request_duration_ms - 12.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_lookup_global() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/lookup/prefix"))
        .and(query_param("q", "AS64500"))
        .and(query_param("limit", "100"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "routes": [lookup_route("192.0.2.0/24", "imported")],
            "total_routes": 1,
            "limit": 100,
            "offset": 0,
            "query_duration_ms": 3.25
        })))
        .mount(&server)
        .await;

    let resp = client.lookup_global("AS64500", 100, 0).await.unwrap();
    assert_eq!(resp.total_routes, 1);
    assert_eq!(resp.routes[0].network, "192.0.2.0/24");
}

// ── Routeserver tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_routeservers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/routeservers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "routeservers": [
                { "id": 1, "name": "rs1.example", "group": "FRA", "blackholes": ["192.0.2.66"] },
                { "id": "rs2", "name": "rs2.example", "group": "FRA" }
            ]
        })))
        .mount(&server)
        .await;

    let list = client.routeservers().await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, "1");
    assert_eq!(list[0].blackholes, vec!["192.0.2.66"]);
    assert_eq!(list[1].id, "rs2");
}

#[tokio::test]
async fn test_neighbours_and_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/routeservers/rs1/neighbours"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "api": { "result_from_cache": true },
            "neighbours": [
                { "id": "n1", "address": "192.0.2.10", "asn": 64500, "state": "up",
                  "description": "Example Transit", "routes_received": 10 }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/routeservers/rs1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": { "router_id": "192.0.2.254", "version": "2.0.7", "backend": "bird" }
        })))
        .mount(&server)
        .await;

    let neighbours = client.neighbours("rs1").await.unwrap();
    assert!(neighbours.api.result_from_cache);
    assert_eq!(neighbours.neighbours[0].routes_received, 10);

    let status = client.status("rs1").await.unwrap();
    assert_eq!(status.status.router_id, "192.0.2.254");
}

#[tokio::test]
async fn test_config() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "asn": 64496,
            "lookup_columns": { "network": "Network", "bgp.as_path": "AS Path" },
            "lookup_columns_order": ["network", "bgp.as_path"],
            "prefix_lookup_enabled": true
        })))
        .mount(&server)
        .await;

    let config = client.config().await.unwrap();
    assert_eq!(config.asn, 64496);
    assert!(config.prefix_lookup_enabled);
    assert_eq!(config.lookup_columns_order, vec!["network", "bgp.as_path"]);
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_structured_error_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/routeservers/rs9/status"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "dial tcp: connection refused",
            "code": 42,
            "tag": "CONNECTION_REFUSED",
            "routeserver_id": "rs9"
        })))
        .mount(&server)
        .await;

    let err = client.status("rs9").await.unwrap_err();
    match err {
        Error::Api {
            status,
            ref tag,
            ref routeserver_id,
            ..
        } => {
            assert_eq!(status, 500);
            assert_eq!(tag, "CONNECTION_REFUSED");
            assert_eq!(routeserver_id.as_deref(), Some("rs9"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_without_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/config"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.config().await.unwrap_err();
    assert!(err.is_not_found(), "expected not found, got: {err:?}");
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/routeservers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.routeservers().await;
    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body.contains("oops")),
        "expected Deserialization error, got: {result:?}"
    );
}
