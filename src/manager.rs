//! Binary acquisition orchestration
//!
//! One launch is a single pipeline: resolve the version request to a
//! concrete tag, check the cache, download on miss or invalidation, and hand
//! back a path that is safe to exec.
//!
//! Validation is deliberately asymmetric. A fresh download with an available
//! but mismatching checksum always fails. An already-cached executable whose
//! manifest cannot be fetched is trusted with a warning: the execute bit
//! proves a prior successful install, and an unreachable manifest must not
//! ground a working launcher.

use crate::cache::CacheStore;
use crate::checksum::{sha256_file, ChecksumManifest};
use crate::error::LaunchResult;
use crate::fetch::ArtifactFetcher;
use crate::platform::PlatformInfo;
use crate::release::{resolve_version, ReleaseSource};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Ensures a runnable binary for a version request
pub struct BinaryManager<'a> {
    source: &'a dyn ReleaseSource,
    cache: CacheStore,
}

impl<'a> BinaryManager<'a> {
    /// Create a manager over a release source and cache store
    pub fn new(source: &'a dyn ReleaseSource, cache: CacheStore) -> Self {
        Self { source, cache }
    }

    /// Ensure the binary exists and is ready to run, returning its path
    ///
    /// `requested` may be `latest` or an explicit tag; it is resolved to a
    /// concrete tag before any cache lookup.
    pub async fn ensure(
        &self,
        requested: &str,
        platform: &PlatformInfo,
    ) -> LaunchResult<PathBuf> {
        let version = resolve_version(requested, self.source).await?;
        let path = self.cache.path_for(&version, platform);

        if self.is_valid(&path, platform, &version).await {
            info!("Using cached binary: {}", path.display());
            return Ok(path);
        }

        info!(
            "Downloading netgauge {} for {}...",
            version,
            platform.label()
        );
        let fetcher = ArtifactFetcher::new(self.source, &self.cache);
        fetcher.fetch(&version, platform).await
    }

    /// The cache path this manager would use, without touching the network
    /// beyond version resolution
    pub async fn resolved_path(
        &self,
        requested: &str,
        platform: &PlatformInfo,
    ) -> LaunchResult<PathBuf> {
        let version = resolve_version(requested, self.source).await?;
        Ok(self.cache.path_for(&version, platform))
    }

    /// Whether a cached file can be launched as-is
    async fn is_valid(&self, path: &Path, platform: &PlatformInfo, version: &str) -> bool {
        if !CacheStore::is_executable(path) {
            return false;
        }

        let Some(text) = self.source.fetch_checksums(version).await else {
            warn!("Could not fetch checksum manifest, trusting cached binary");
            return true;
        };

        let manifest = ChecksumManifest::parse(&text);
        let Some(expected) = manifest.digest_for(&platform.artifact_name()) else {
            debug!("Manifest has no entry for {}, trusting cached binary", platform.artifact_name());
            return true;
        };

        match sha256_file(path).await {
            Ok(actual) => {
                let valid = actual.eq_ignore_ascii_case(expected);
                if !valid {
                    warn!("Cached binary failed checksum verification, re-downloading");
                }
                valid
            }
            Err(e) => {
                warn!("Could not hash cached binary ({}), trusting it", e);
                true
            }
        }
    }
}
