//! CLI-side profile resolution: `GlobalOpts` flags layered over
//! `birdglass-config` profiles, producing a `ClientConfig`.

use std::time::Duration;

use birdglass_config::{self as config, Config};
use birdglass_core::{ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the `ClientConfig` for this invocation.
///
/// Precedence: flags > env > profile > defaults. `--url` alone is enough
/// when no profile exists; an explicitly named profile must exist.
pub fn build_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut client = match cfg.profiles.get(&profile_name) {
        Some(profile) => config::profile_to_client_config(profile, &cfg.defaults)?,
        None if global.profile.is_some() => return Err(profile_not_found(profile_name, cfg)),
        None => {
            let Some(ref url) = global.url else {
                return Err(CliError::NoConfig {
                    path: config::config_path().display().to_string(),
                });
            };
            let mut client = ClientConfig::new(config::parse_url(url)?);
            client.timeout = Duration::from_secs(cfg.defaults.timeout);
            if cfg.defaults.insecure {
                client.tls = TlsVerification::DangerAcceptInvalid;
            }
            client
        }
    };

    if let Some(ref url) = global.url {
        client.url = config::parse_url(url)?;
    }
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }

    tracing::debug!(profile = %profile_name, url = %client.url, "resolved looking glass");
    Ok(client)
}

pub fn profile_not_found(name: String, cfg: &Config) -> CliError {
    let available = cfg.profile_names();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::{ColorMode, OutputFormat};
    use birdglass_config::Profile;

    fn global() -> GlobalOpts {
        GlobalOpts {
            profile: None,
            url: None,
            output: OutputFormat::Table,
            color: ColorMode::Never,
            verbose: 0,
            quiet: false,
            insecure: false,
            timeout: None,
        }
    }

    fn config_with_profile() -> Config {
        let mut cfg = Config::default();
        let mut profile = Profile::new("https://lg.example.net");
        profile.timeout = Some(20);
        cfg.profiles.insert("default".into(), profile);
        cfg
    }

    #[test]
    fn url_flag_alone_is_enough() {
        let mut g = global();
        g.url = Some("https://lg.example.org".into());
        let client = build_client_config(&g, &Config::default()).unwrap();
        assert_eq!(client.url.as_str(), "https://lg.example.org/");
        assert_eq!(client.timeout, Duration::from_secs(30));
    }

    #[test]
    fn flags_override_profile() {
        let mut g = global();
        g.insecure = true;
        g.timeout = Some(3);
        let client = build_client_config(&g, &config_with_profile()).unwrap();
        assert_eq!(client.url.as_str(), "https://lg.example.net/");
        assert_eq!(client.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(client.timeout, Duration::from_secs(3));
    }

    #[test]
    fn missing_named_profile_is_an_error() {
        let mut g = global();
        g.profile = Some("ixp".into());
        g.url = Some("https://lg.example.org".into());
        let err = build_client_config(&g, &config_with_profile()).unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { ref available, .. } if available == "default"));
    }

    #[test]
    fn nothing_configured() {
        let err = build_client_config(&global(), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }
}
