//! Run command - acquire the binary and hand control to the client
//!
//! Stdout and stdin belong to the child's protocol from the moment it
//! spawns; every message this command prints goes to stderr.

use crate::cli::args::RunArgs;
use crate::cli::commands::{cache_store, release_source, version_request};
use crate::config::Config;
use crate::error::LaunchResult;
use crate::manager::BinaryManager;
use crate::platform::PlatformInfo;
use crate::spawn;
use console::style;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Execute the run command, returning the child's exit code
pub async fn execute(args: RunArgs, config: &Config) -> LaunchResult<i32> {
    let platform = PlatformInfo::detect()?;
    debug!("Detected platform: {}", platform);

    if platform.is_experimental() {
        eprintln!(
            "{} Windows support is experimental",
            style("!").yellow()
        );
    }

    let binary = resolve_binary(&args, config, &platform).await?;

    // Child env: configured overrides first, CLI -e pairs win on collision
    let mut env: HashMap<String, String> = config.launch.env.clone();
    env.extend(args.env.iter().cloned());

    spawn::run(&binary, &args.args, &env).await
}

async fn resolve_binary(
    args: &RunArgs,
    config: &Config,
    platform: &PlatformInfo,
) -> LaunchResult<PathBuf> {
    if let Some(ref path) = args.bin_path {
        debug!("Using local binary override: {}", path.display());
        return Ok(path.clone());
    }

    let source = release_source(args.repo.as_deref(), config);
    let manager = BinaryManager::new(&source, cache_store(config)?);
    manager
        .ensure(version_request(args.version_tag.as_deref(), config), platform)
        .await
}
