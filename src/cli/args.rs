//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// netgauge launcher
///
/// Downloads a verified netgauge release into a local cache and runs its
/// client with transparent stdin/stdout passthrough.
#[derive(Parser, Debug)]
#[command(name = "netgauge-launcher")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "NETGAUGE_LAUNCHER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the binary if needed, then run the netgauge client
    Run(RunArgs),

    /// Download and verify the binary without running it
    Fetch(FetchArgs),

    /// Print the cache path the current version resolves to
    Which(WhichArgs),

    /// Inspect or clear the artifact cache
    Cache(CacheArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Release tag to run (defaults to the configured version)
    #[arg(long, env = "NETGAUGE_VERSION")]
    pub version_tag: Option<String>,

    /// GitHub repository publishing releases, as owner/name
    #[arg(long, env = "NETGAUGE_REPO")]
    pub repo: Option<String>,

    /// Launch this local binary instead of a cached release
    #[arg(long, env = "NETGAUGE_BIN")]
    pub bin_path: Option<PathBuf>,

    /// Extra environment for the child, as KEY=VALUE (repeatable)
    #[arg(short, long, value_parser = parse_key_val)]
    pub env: Vec<(String, String)>,

    /// Arguments passed to the netgauge client verbatim
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Release tag to fetch (defaults to the configured version)
    #[arg(long, env = "NETGAUGE_VERSION")]
    pub version_tag: Option<String>,

    /// GitHub repository publishing releases, as owner/name
    #[arg(long, env = "NETGAUGE_REPO")]
    pub repo: Option<String>,
}

/// Arguments for the which command
#[derive(Parser, Debug)]
pub struct WhichArgs {
    /// Release tag to resolve (defaults to the configured version)
    #[arg(long, env = "NETGAUGE_VERSION")]
    pub version_tag: Option<String>,

    /// GitHub repository publishing releases, as owner/name
    #[arg(long, env = "NETGAUGE_REPO")]
    pub repo: Option<String>,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Print the cache root directory
    Path,

    /// Remove cached binaries
    Clean {
        /// Remove only this version's directory
        #[arg(long)]
        version_tag: Option<String>,

        /// Remove the entire cache root
        #[arg(long, conflicts_with = "version_tag")]
        all: bool,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse a KEY=VALUE pair
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE pair: {}", s))?;
    if key.is_empty() {
        return Err(format!("empty key in pair: {}", s));
    }
    Ok((key.to_string(), value.to_string()))
}
