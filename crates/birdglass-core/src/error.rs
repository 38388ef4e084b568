// ── Core error types ──
//
// User-facing errors from birdglass-core. Consumers never see reqwest
// or serde failures directly; the `From<birdglass_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use serde::Serialize;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach looking glass at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Looking glass request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Route server not found: {identifier}")]
    RouteserverNotFound { identifier: String },

    #[error("Not found: {identifier}")]
    NotFound { identifier: String },

    #[error("Prefix lookup is disabled on this looking glass")]
    LookupDisabled,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Numeric error code from the looking glass error body.
        code: Option<i64>,
        /// Error tag, e.g. `CONNECTION_REFUSED`.
        tag: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
        /// Route server that produced the error, when reported.
        routeserver_id: Option<String>,
    },

    #[error("Unexpected response: {message}")]
    InvalidResponse { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid location: {message}")]
    InvalidLocation { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<birdglass_api::Error> for CoreError {
    fn from(err: birdglass_api::Error) -> Self {
        match err {
            birdglass_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        tag: None,
                        status: e.status().map(|s| s.as_u16()),
                        routeserver_id: None,
                    }
                }
            }
            birdglass_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            birdglass_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            birdglass_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            birdglass_api::Error::Api {
                status: 404,
                message,
                ..
            } => CoreError::NotFound {
                identifier: message,
            },
            birdglass_api::Error::Api {
                status,
                message,
                code,
                tag,
                routeserver_id,
            } => CoreError::Api {
                message,
                code: Some(code),
                tag: (!tag.is_empty()).then_some(tag),
                status: Some(status),
                routeserver_id,
            },
            birdglass_api::Error::Http { status: 404, body } => CoreError::NotFound {
                identifier: body,
            },
            birdglass_api::Error::Http { status, body } => CoreError::Api {
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                },
                code: None,
                tag: None,
                status: Some(status),
                routeserver_id: None,
            },
            birdglass_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}

// ── ErrorInfo ────────────────────────────────────────────────────────

/// Cloneable projection of a failed lookup, stored in `ResultState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    pub code: Option<i64>,
    pub tag: Option<String>,
    pub status: Option<u16>,
    pub routeserver_id: Option<String>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            tag: None,
            status: None,
            routeserver_id: None,
        }
    }
}

impl From<&CoreError> for ErrorInfo {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::Api {
                message,
                code,
                tag,
                status,
                routeserver_id,
            } => Self {
                message: message.clone(),
                code: *code,
                tag: tag.clone(),
                status: *status,
                routeserver_id: routeserver_id.clone(),
            },
            other => Self::new(other.to_string()),
        }
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "{} ({tag})", self.message),
            None => f.write_str(&self.message),
        }
    }
}
