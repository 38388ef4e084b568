// Looking glass HTTP client
//
// Wraps `reqwest::Client` with `/api/v1` URL construction, status
// handling and body decoding. Every endpoint is a thin inherent method
// over `get_json`.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{
    ConfigResponse, LookupPages, NeighboursResponse, PaginatedRoutesLookupResponse, Routeserver,
    RouteserversResponse, RoutesLookupResponseGlobal, StatusResponse,
};
use crate::transport::TransportConfig;

/// Raw HTTP client for an Alice-LG compatible looking glass.
///
/// All methods return decoded payloads. Non-2xx responses are turned into
/// [`Error::Api`] when the server sent a structured error body and
/// [`Error::Http`] otherwise.
#[derive(Debug, Clone)]
pub struct LookingGlassClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl LookingGlassClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the looking glass root, e.g. `https://lg.example.net`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
        }
    }

    /// The looking glass base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/v1/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/v1/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(|e| self.map_send(e))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.map_send(e))?;
        trace!(status = status.as_u16(), bytes = body.len(), "response received");

        if !status.is_success() {
            return Err(Error::from_status(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: preview(&body),
        })
    }

    fn map_send(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /api/v1/config`
    pub async fn config(&self) -> Result<ConfigResponse, Error> {
        self.get_json(self.api_url("config")?).await
    }

    /// `GET /api/v1/routeservers`
    pub async fn routeservers(&self) -> Result<Vec<Routeserver>, Error> {
        let resp: RouteserversResponse = self.get_json(self.api_url("routeservers")?).await?;
        Ok(resp.routeservers)
    }

    /// `GET /api/v1/routeservers/{id}/status`
    pub async fn status(&self, routeserver_id: &str) -> Result<StatusResponse, Error> {
        let mut url = self.api_url("routeservers")?;
        push_segments(&mut url, &[routeserver_id, "status"])?;
        self.get_json(url).await
    }

    /// `GET /api/v1/routeservers/{id}/neighbours`
    pub async fn neighbours(&self, routeserver_id: &str) -> Result<NeighboursResponse, Error> {
        let mut url = self.api_url("routeservers")?;
        push_segments(&mut url, &[routeserver_id, "neighbours"])?;
        self.get_json(url).await
    }

    /// `GET /api/v1/lookup/prefix?q=...&page_imported=...&page_filtered=...&page_not_exported=...`
    ///
    /// Categorised lookup with an independent page per category.
    pub async fn lookup_prefix(
        &self,
        query: &str,
        pages: LookupPages,
    ) -> Result<PaginatedRoutesLookupResponse, Error> {
        let mut url = self.api_url("lookup/prefix")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("page_imported", &pages.imported.to_string())
            .append_pair("page_filtered", &pages.filtered.to_string())
            .append_pair("page_not_exported", &pages.not_exported.to_string());
        self.get_json(url).await
    }

    /// `GET /api/lookup/prefix?q=...&limit=...&offset=...`
    ///
    /// Flat lookup served by backends that predate categorised pagination.
    pub async fn lookup_global(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<RoutesLookupResponseGlobal, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/api/lookup/prefix"))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        self.get_json(url).await
    }
}

/// Append percent-encoded path segments.
fn push_segments(url: &mut Url, segments: &[&str]) -> Result<(), Error> {
    url.path_segments_mut()
        .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .extend(segments);
    Ok(())
}

/// Keep error bodies readable in logs.
fn preview(body: &str) -> String {
    const MAX: usize = 512;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_owned(),
    }
}
