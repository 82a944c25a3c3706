//! Cache command - inspect or clear the artifact cache

use crate::cli::args::{CacheAction, CacheArgs};
use crate::cli::commands::cache_store;
use crate::config::Config;
use crate::error::{LaunchError, LaunchResult};
use console::style;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> LaunchResult<()> {
    let store = cache_store(config)?;

    match args.action {
        CacheAction::Path => {
            println!("{}", store.root().display());
            Ok(())
        }
        CacheAction::Clean { version_tag, all } => {
            if version_tag.is_none() && !all {
                return Err(LaunchError::Internal(
                    "cache clean needs --version-tag <TAG> or --all".to_string(),
                ));
            }

            let removed = store.clean(version_tag.as_deref()).await?;
            eprintln!(
                "{} Removed {}",
                style("✓").green(),
                style(removed.display()).cyan()
            );
            Ok(())
        }
    }
}
