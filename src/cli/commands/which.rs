//! Which command - print where the current version lives in the cache
//!
//! The path goes to stdout for scripting; whether it is actually installed
//! is reported on stderr.

use crate::cache::CacheStore;
use crate::cli::args::WhichArgs;
use crate::cli::commands::{cache_store, release_source, version_request};
use crate::config::Config;
use crate::error::LaunchResult;
use crate::manager::BinaryManager;
use crate::platform::PlatformInfo;
use console::style;

/// Execute the which command
pub async fn execute(args: WhichArgs, config: &Config) -> LaunchResult<()> {
    let platform = PlatformInfo::detect()?;

    let source = release_source(args.repo.as_deref(), config);
    let manager = BinaryManager::new(&source, cache_store(config)?);
    let path = manager
        .resolved_path(version_request(args.version_tag.as_deref(), config), &platform)
        .await?;

    if !CacheStore::is_executable(&path) {
        eprintln!(
            "{} Not cached yet; run `netgauge-launcher fetch` to download",
            style("!").yellow()
        );
    }

    println!("{}", path.display());
    Ok(())
}
