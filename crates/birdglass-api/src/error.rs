use thiserror::Error;

use crate::models::ErrorResponse;

/// Top-level error type for the `birdglass-api` crate.
///
/// Covers every failure mode of talking to a looking glass:
/// transport, TLS, HTTP status errors, and payload decoding.
/// `birdglass-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Looking glass API ───────────────────────────────────────────
    /// Structured error body returned by the looking glass
    /// (`{message, code, tag, routeserver_id}`).
    #[error("Looking glass error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: i64,
        tag: String,
        routeserver_id: Option<String>,
    },

    /// Non-success status without a decodable error body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Build an error from a non-2xx response, preferring the structured body.
    pub(crate) fn from_status(status: u16, body: String) -> Self {
        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) if !err.message.is_empty() => Self::Api {
                status,
                message: err.message,
                code: err.code,
                tag: err.tag,
                routeserver_id: err.routeserver_id,
            },
            _ => Self::Http { status, body },
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Api { status, .. } | Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } | Self::Http { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The looking glass error tag (e.g. `CONNECTION_REFUSED`), if available.
    pub fn api_error_tag(&self) -> Option<&str> {
        match self {
            Self::Api { tag, .. } if !tag.is_empty() => Some(tag),
            _ => None,
        }
    }

    /// HTTP status code, if the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
