//! CLI command implementations

pub mod cache;
pub mod config;
pub mod fetch;
pub mod run;
pub mod which;

pub use cache::execute as cache;
pub use config::execute as config;
pub use fetch::execute as fetch;
pub use run::execute as run;
pub use which::execute as which;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::LaunchResult;
use crate::release::GithubReleaseSource;

/// Build the release source for a command, honoring the repo override
pub(crate) fn release_source(repo_override: Option<&str>, config: &Config) -> GithubReleaseSource {
    let repo = repo_override.unwrap_or(&config.release.repo);
    GithubReleaseSource::new(repo)
}

/// Build the cache store for a command
pub(crate) fn cache_store(config: &Config) -> LaunchResult<CacheStore> {
    let root = CacheStore::resolve_root(config.cache.dir.as_deref())?;
    Ok(CacheStore::new(root))
}

/// Version request for a command, honoring the tag override
pub(crate) fn version_request<'a>(tag_override: Option<&'a str>, config: &'a Config) -> &'a str {
    tag_override.unwrap_or(&config.release.version)
}
