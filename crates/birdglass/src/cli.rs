//! Clap derive structures for the `birdglass` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// birdglass -- query BGP looking glasses from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "birdglass",
    version,
    about = "Query BGP route server looking glasses from the command line",
    long_about = "Search prefixes, ASNs and neighbours across the route servers of a\n\
        looking glass. Received, filtered and not-exported routes are paged\n\
        independently; every page has a shareable location.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Looking glass profile to use
    #[arg(long, short = 'p', env = "BIRDGLASS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Looking glass URL (overrides profile)
    #[arg(long, short = 'u', env = "BIRDGLASS_URL", global = true)]
    pub url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BIRDGLASS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "BIRDGLASS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "BIRDGLASS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a prefix, ASN or neighbour across all route servers
    #[command(alias = "l", alias = "search")]
    Lookup(LookupArgs),

    /// List route servers
    #[command(alias = "rs")]
    Routeservers(RouteserversArgs),

    /// Show the daemon status of a route server
    Status(StatusArgs),

    /// List the neighbours of a route server
    #[command(alias = "n")]
    Neighbours(NeighboursArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Lookup ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Prefix, address, ASN or neighbour name to search for
    #[arg(required_unless_present = "location")]
    pub query: Option<String>,

    /// Page of received routes (zero-based)
    #[arg(long, default_value = "0")]
    pub received_page: usize,

    /// Page of filtered routes (zero-based)
    #[arg(long, default_value = "0")]
    pub filtered_page: usize,

    /// Page of not-exported routes (zero-based)
    #[arg(long, default_value = "0")]
    pub not_exported_page: usize,

    /// Open a location such as `/search?pr=1&pf=0&pn=0&q=AS64500`
    #[arg(long, conflicts_with_all = ["query", "received_page", "filtered_page", "not_exported_page"])]
    pub location: Option<String>,

    /// Use the flat lookup endpoint; all routes are listed as received
    #[arg(long, conflicts_with_all = ["filtered_page", "not_exported_page"])]
    pub global: bool,
}

// ── Route servers ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RouteserversArgs {
    #[command(subcommand)]
    pub command: RouteserversCommand,
}

#[derive(Debug, Subcommand)]
pub enum RouteserversCommand {
    /// List all route servers
    #[command(alias = "ls")]
    List {
        /// Only route servers in this group
        #[arg(long, short = 'g')]
        group: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Route server ID
    pub routeserver: String,
}

#[derive(Debug, Args)]
pub struct NeighboursArgs {
    /// Route server ID
    pub routeserver: String,

    /// Only neighbours whose description, ASN or address matches
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Only established sessions
    #[arg(long)]
    pub up: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a profile for a looking glass
    Init {
        /// Looking glass URL
        url: String,

        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Overwrite an existing profile of the same name
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
