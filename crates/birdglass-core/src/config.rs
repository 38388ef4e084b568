// ── Runtime connection configuration ──
//
// These types describe *how* to reach a looking glass. They never touch
// disk; the CLI/TUI constructs a `ClientConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use birdglass_api::transport::{TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default for public looking glasses.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (lab deployments with self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for talking to a single looking glass.
///
/// Built by CLI/TUI, passed to `Controller::from_config`. Core never reads config files.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Looking glass root URL (e.g., `https://lg.example.net`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Ordered `(column key, title)` pairs overriding the server's lookup columns.
    pub lookup_columns: Vec<(String, String)>,
}

impl ClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            lookup_columns: Vec::new(),
        }
    }

    /// Transport settings for `birdglass-api`.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
