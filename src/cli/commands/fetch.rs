//! Fetch command - populate the cache without launching

use crate::cli::args::FetchArgs;
use crate::cli::commands::{cache_store, release_source, version_request};
use crate::config::Config;
use crate::error::LaunchResult;
use crate::manager::BinaryManager;
use crate::platform::PlatformInfo;
use console::style;

/// Execute the fetch command
pub async fn execute(args: FetchArgs, config: &Config) -> LaunchResult<()> {
    let platform = PlatformInfo::detect()?;

    let source = release_source(args.repo.as_deref(), config);
    let manager = BinaryManager::new(&source, cache_store(config)?);
    let path = manager
        .ensure(version_request(args.version_tag.as_deref(), config), &platform)
        .await?;

    eprintln!(
        "{} Binary ready: {}",
        style("✓").green(),
        style(path.display()).cyan()
    );
    Ok(())
}
