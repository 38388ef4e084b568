//! `birdglass-tui`: interactive terminal front-end for a BGP looking glass.
//!
//! Two screens, switched with number keys or Tab: a prefix/ASN lookup with
//! paginated received, filtered and not-exported route tables, and a
//! per-route-server neighbour list.
//!
//! Logs go to a file (default under the platform data dir) so they never
//! corrupt the terminal. A background data bridge forwards every lookup
//! state snapshot from `birdglass-core` into the action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use birdglass_config::Config;
use birdglass_core::{ClientConfig, Controller, TlsVerification};

use crate::app::App;
use crate::event::EventRates;

/// Terminal UI for browsing a BGP looking glass.
#[derive(Parser, Debug)]
#[command(name = "birdglass-tui", version, about)]
struct Cli {
    /// Prefix or ASN to look up on start
    query: Option<String>,

    /// Looking glass profile from the config file
    #[arg(short = 'p', long, env = "BIRDGLASS_PROFILE")]
    profile: Option<String>,

    /// Looking glass URL (overrides the profile)
    #[arg(short = 'u', long, env = "BIRDGLASS_URL")]
    url: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long, env = "BIRDGLASS_INSECURE")]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "BIRDGLASS_TIMEOUT")]
    timeout: Option<u64>,

    /// Frames per second, at most 60
    #[arg(long, default_value_t = EventRates::DEFAULT_FPS)]
    fps: u16,

    /// Log file path (defaults to birdglass-tui.log in the data dir)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing; stdout/stderr belong to the terminal UI. The guard
/// must live until exit so buffered lines are flushed.
fn setup_tracing(cli: &Cli) -> Result<WorkerGuard> {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "birdglass_tui={log_level},birdglass_core={log_level},birdglass_api={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| birdglass_config::log_dir().join("birdglass-tui.log"));
    let log_dir = log_file
        .parent()
        .map_or_else(|| PathBuf::from("."), std::path::Path::to_path_buf);
    let log_filename = log_file
        .file_name()
        .map_or_else(|| "birdglass-tui.log".into(), std::ffi::OsStr::to_os_string);

    std::fs::create_dir_all(&log_dir)
        .wrap_err_with(|| format!("cannot create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}

/// Resolved looking glass plus the label shown in the status bar.
struct Target {
    label: String,
    client: ClientConfig,
}

/// Precedence: flags > profile > defaults. `--url` alone is enough when
/// no profile exists; a profile named with `--profile` must exist.
fn resolve_target(cli: &Cli, cfg: &Config) -> Result<Target> {
    let profile = match cfg.profile(cli.profile.as_deref()) {
        Ok((name, profile)) => Some((name, profile)),
        Err(e) if cli.profile.is_some() => return Err(e).wrap_err("cannot load profile"),
        Err(_) => None,
    };

    let (mut label, mut client) = match profile {
        Some((name, profile)) => (
            name,
            birdglass_config::profile_to_client_config(profile, &cfg.defaults)?,
        ),
        None => {
            let Some(ref url) = cli.url else {
                return Err(eyre!(
                    "no looking glass configured; run `birdglass config init <URL>` or pass --url"
                ));
            };
            let mut client = ClientConfig::new(birdglass_config::parse_url(url)?);
            client.timeout = Duration::from_secs(cfg.defaults.timeout);
            if cfg.defaults.insecure {
                client.tls = TlsVerification::DangerAcceptInvalid;
            }
            (String::new(), client)
        }
    };

    if let Some(ref url) = cli.url {
        client.url = birdglass_config::parse_url(url)?;
        label.clear();
    }
    if cli.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = cli.timeout {
        client.timeout = Duration::from_secs(secs);
    }
    if label.is_empty() {
        label = client.url.host_str().unwrap_or(client.url.as_str()).to_owned();
    }

    Ok(Target { label, client })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks before the terminal is touched
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli)?;

    let cfg = birdglass_config::load_config().wrap_err("cannot read config file")?;
    let target = resolve_target(&cli, &cfg)?;
    info!(source = %target.label, url = %target.client.url, "starting birdglass-tui");

    let controller = Controller::from_config(&target.client)?;
    let column_overrides = target.client.lookup_columns.clone();
    let query = cli.query.filter(|q| !q.trim().is_empty());

    let rates = EventRates::with_fps(cli.fps);
    let mut app = App::new(controller, target.label, column_overrides, query, rates);
    app.run().await
}
