//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use birdglass_config::ConfigError;
use birdglass_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const UNAVAILABLE: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to looking glass at {url}")]
    #[diagnostic(
        code(birdglass::connection_failed),
        help(
            "Check that the looking glass is reachable: {reason}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(birdglass::timeout),
        help("Increase the timeout with --timeout or try again later.")
    )]
    Timeout { seconds: u64 },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(birdglass::not_found),
        help("Run: birdglass {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Prefix lookup is disabled on this looking glass")]
    #[diagnostic(code(birdglass::lookup_disabled))]
    LookupDisabled,

    // ── API ──────────────────────────────────────────────────────────
    #[error("Looking glass error: {message}")]
    #[diagnostic(code(birdglass::api_error), help("{hint}"))]
    ApiError { message: String, hint: String },

    #[error("Lookup for '{query}' failed: {message}")]
    #[diagnostic(code(birdglass::lookup_failed))]
    LookupFailed { query: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(birdglass::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(birdglass::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: birdglass config init <URL> --name {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No looking glass configured")]
    #[diagnostic(
        code(birdglass::no_config),
        help(
            "Pass --url, or create a profile with: birdglass config init <URL>\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(birdglass::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON output: {0}")]
    #[diagnostic(code(birdglass::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode YAML output: {0}")]
    #[diagnostic(code(birdglass::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::LookupDisabled => exit_code::UNAVAILABLE,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::RouteserverNotFound { identifier } => CliError::NotFound {
                resource_type: "route server".into(),
                identifier,
                list_command: "routeservers list".into(),
            },

            CoreError::NotFound { identifier } => CliError::NotFound {
                resource_type: "resource".into(),
                identifier,
                list_command: "routeservers list".into(),
            },

            CoreError::LookupDisabled => CliError::LookupDisabled,

            CoreError::Api {
                message,
                tag,
                routeserver_id,
                ..
            } => {
                let hint = match (tag, routeserver_id) {
                    (Some(tag), Some(rs)) => format!("Route server {rs} reported {tag}."),
                    (Some(tag), None) => format!("The looking glass reported {tag}."),
                    (None, Some(rs)) => format!("Reported by route server {rs}."),
                    (None, None) => "Retry later; the looking glass may be refreshing.".into(),
                };
                CliError::ApiError { message, hint }
            }

            CoreError::InvalidResponse { message } | CoreError::Internal(message) => {
                CliError::ApiError {
                    message,
                    hint: "The looking glass returned something birdglass does not understand."
                        .into(),
                }
            }

            CoreError::Config { message } | CoreError::InvalidLocation { message } => {
                CliError::Validation {
                    field: "input".into(),
                    reason: message,
                }
            }
        }
    }
}
