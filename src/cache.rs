//! Local artifact cache
//!
//! One file per (version, platform) under a versioned directory tree:
//! `<root>/<version>/<artifact-name>`. Paths are pure string composition, so
//! two launcher invocations always agree on where a given release lives, and
//! distinct versions can never overwrite each other in place.

use crate::error::{LaunchError, LaunchResult};
use crate::platform::PlatformInfo;
use std::path::{Path, PathBuf};

/// Environment variable overriding the cache root
pub const CACHE_DIR_ENV: &str = "NETGAUGE_CACHE_DIR";

/// Cache store rooted at a fixed directory
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Create a store over an explicit root
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve the default cache root
    ///
    /// Precedence: explicit override (config), then `NETGAUGE_CACHE_DIR`,
    /// then the platform cache directory (XDG-aware on Linux) under
    /// `netgauge`.
    pub fn resolve_root(configured: Option<&Path>) -> LaunchResult<PathBuf> {
        if let Some(dir) = configured {
            return Ok(dir.to_path_buf());
        }
        if let Ok(dir) = std::env::var(CACHE_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        dirs::cache_dir()
            .map(|d| d.join(crate::platform::PRODUCT))
            .ok_or(LaunchError::NoCacheDir)
    }

    /// The cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache location for a resolved version and platform
    ///
    /// Pure composition; performs no I/O. The version tag must already be
    /// concrete (never `latest`).
    pub fn path_for(&self, version: &str, platform: &PlatformInfo) -> PathBuf {
        self.root.join(version).join(platform.artifact_name())
    }

    /// Whether a cached file exists and is executable by the current user
    ///
    /// On Windows, where execute permission bits are not meaningful,
    /// existence of a regular file suffices.
    pub fn is_executable(path: &Path) -> bool {
        let Ok(metadata) = std::fs::metadata(path) else {
            return false;
        };
        if !metadata.is_file() {
            return false;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            metadata.permissions().mode() & 0o111 != 0
        }
        #[cfg(not(unix))]
        {
            true
        }
    }

    /// Mark an installed file executable
    ///
    /// No-op on Windows.
    pub async fn mark_executable(path: &Path) -> LaunchResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o755);
            tokio::fs::set_permissions(path, perms)
                .await
                .map_err(|e| {
                    LaunchError::io(format!("marking {} executable", path.display()), e)
                })?;
        }
        #[cfg(not(unix))]
        {
            let _ = path;
        }
        Ok(())
    }

    /// Remove one cached version directory, or the whole cache root
    pub async fn clean(&self, version: Option<&str>) -> LaunchResult<PathBuf> {
        let target = match version {
            Some(tag) => self.root.join(tag),
            None => self.root.clone(),
        };

        match tokio::fs::remove_dir_all(&target).await {
            Ok(()) => Ok(target),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(target),
            Err(e) => Err(LaunchError::io(
                format!("removing {}", target.display()),
                e,
            )),
        }
    }
}
