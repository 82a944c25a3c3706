//! netgauge launcher
//!
//! CLI entry point that dispatches to subcommands. The child's exit status
//! becomes this process's exit status; all diagnostics go to stderr.

use clap::Parser;
use console::style;
use netgauge_launcher::cli::{commands, Cli, Commands};
use netgauge_launcher::config::ConfigManager;
use netgauge_launcher::error::LaunchResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code.clamp(0, 255) as u8),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> LaunchResult<i32> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug. The subscriber
    // writes to stderr; stdout stays reserved for the child's protocol.
    let filter = match cli.verbose {
        0 => EnvFilter::new("netgauge_launcher=warn"),
        1 => EnvFilter::new("netgauge_launcher=info"),
        _ => EnvFilter::new("netgauge_launcher=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = config_manager.load().await?;

    match cli.command {
        Commands::Run(args) => commands::run(args, &config).await,
        Commands::Fetch(args) => commands::fetch(args, &config).await.map(|()| 0),
        Commands::Which(args) => commands::which(args, &config).await.map(|()| 0),
        Commands::Cache(args) => commands::cache(args, &config).await.map(|()| 0),
        Commands::Config(args) => commands::config(args, &config, &config_manager)
            .await
            .map(|()| 0),
    }
}
