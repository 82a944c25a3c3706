//! Configuration schema for the launcher
//!
//! Configuration is stored at `~/.config/netgauge-launcher/config.toml`.
//! Every field has a default; CLI flags and environment variables override
//! file values.

use crate::release::{DEFAULT_REPO, LATEST};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Release selection settings
    pub release: ReleaseConfig,

    /// Cache location settings
    pub cache: CacheConfig,

    /// Child process settings
    pub launch: LaunchConfig,
}

/// Which repository and version to launch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// GitHub repository publishing releases, as `owner/name`
    pub repo: String,

    /// Version to run: `latest` or an explicit release tag
    pub version: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            repo: DEFAULT_REPO.to_string(),
            version: LATEST.to_string(),
        }
    }
}

/// Cache location settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root directory; platform cache dir when unset
    pub dir: Option<PathBuf>,
}

/// Child process settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Extra environment variables for the child (override wins on collision)
    pub env: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_latest_upstream() {
        let config = Config::default();
        assert_eq!(config.release.repo, DEFAULT_REPO);
        assert_eq!(config.release.version, LATEST);
        assert!(config.cache.dir.is_none());
        assert!(config.launch.env.is_empty());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
[release]
version = "v0.9.1"
"#,
        )
        .unwrap();

        assert_eq!(config.release.version, "v0.9.1");
        assert_eq!(config.release.repo, DEFAULT_REPO);
    }

    #[test]
    fn launch_env_round_trips() {
        let config: Config = toml::from_str(
            r#"
[launch.env]
NETGAUGE_LOG = "debug"
"#,
        )
        .unwrap();

        assert_eq!(
            config.launch.env.get("NETGAUGE_LOG").map(String::as_str),
            Some("debug")
        );

        let rendered = toml::to_string_pretty(&config).unwrap();
        let reparsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(reparsed.launch.env, config.launch.env);
    }
}
