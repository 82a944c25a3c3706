//! Artifact download, verification, and atomic install
//!
//! Bytes land in a `.tmp` file colocated with the destination so the final
//! rename stays on one file-system volume and is atomic. The rename is the
//! only commit point: a partially downloaded or unverified file is never
//! visible at the destination path, and two invocations racing for the same
//! path cannot corrupt it (the rename loser merely wasted a download).

use crate::cache::CacheStore;
use crate::checksum::{sha256_file, ChecksumManifest};
use crate::error::{LaunchError, LaunchResult};
use crate::platform::PlatformInfo;
use crate::release::ReleaseSource;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Downloads release artifacts into the cache
pub struct ArtifactFetcher<'a> {
    source: &'a dyn ReleaseSource,
    cache: &'a CacheStore,
}

impl<'a> ArtifactFetcher<'a> {
    /// Create a fetcher over a release source and cache store
    pub fn new(source: &'a dyn ReleaseSource, cache: &'a CacheStore) -> Self {
        Self { source, cache }
    }

    /// Download, verify, and install the artifact for a resolved version
    ///
    /// Returns the installed cache path. Checksum verification is
    /// best-effort: a missing manifest (or one without an entry for this
    /// artifact) installs unverified, but an entry that disagrees with the
    /// downloaded bytes is fatal and leaves the destination untouched.
    pub async fn fetch(&self, version: &str, platform: &PlatformInfo) -> LaunchResult<PathBuf> {
        let dest = self.cache.path_for(version, platform);

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LaunchError::io(format!("creating {}", parent.display()), e))?;
        }

        let tmp = temp_path(&dest);
        let result = self.download_and_commit(version, platform, &tmp, &dest).await;

        if result.is_err() {
            // Orphaned .tmp files are harmless; the destination was never touched
            let _ = tokio::fs::remove_file(&tmp).await;
        }
        result?;

        CacheStore::mark_executable(&dest).await?;
        info!("Installed {} at {}", platform.artifact_name(), dest.display());
        Ok(dest)
    }

    async fn download_and_commit(
        &self,
        version: &str,
        platform: &PlatformInfo,
        tmp: &Path,
        dest: &Path,
    ) -> LaunchResult<()> {
        let artifact = platform.artifact_name();

        let found = self.source.download_asset(version, &artifact, tmp).await?;
        if !found {
            return Err(LaunchError::NotFound {
                version: version.to_string(),
                platform: platform.label(),
                releases_url: self.source.releases_url(),
            });
        }

        match self.source.fetch_checksums(version).await {
            Some(text) => {
                let manifest = ChecksumManifest::parse(&text);
                match manifest.digest_for(&artifact) {
                    Some(expected) => {
                        let actual = sha256_file(tmp).await?;
                        if !actual.eq_ignore_ascii_case(expected) {
                            return Err(LaunchError::ChecksumMismatch {
                                artifact,
                                expected: expected.to_ascii_lowercase(),
                                actual,
                            });
                        }
                        debug!("Checksum verified for {}", artifact);
                    }
                    None => {
                        warn!("Checksum manifest has no entry for {}; installing unverified", artifact);
                    }
                }
            }
            None => {
                warn!("No checksum manifest published for {}; installing unverified", version);
            }
        }

        tokio::fs::rename(tmp, dest).await.map_err(|e| {
            LaunchError::io(
                format!("installing {} into place", dest.display()),
                e,
            )
        })
    }
}

/// Staging path colocated with the destination, `.tmp`-suffixed
fn temp_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Arch, Os};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn linux_amd64() -> PlatformInfo {
        PlatformInfo {
            os: Os::Linux,
            arch: Arch::X64,
        }
    }

    /// In-memory release source serving canned bytes and manifests
    struct FakeSource {
        assets: HashMap<String, Vec<u8>>,
        checksums: Option<String>,
        fail_after_write: bool,
    }

    impl FakeSource {
        fn with_asset(name: &str, bytes: &[u8]) -> Self {
            let mut assets = HashMap::new();
            assets.insert(name.to_string(), bytes.to_vec());
            Self {
                assets,
                checksums: None,
                fail_after_write: false,
            }
        }

        fn sha256(bytes: &[u8]) -> String {
            use sha2::{Digest, Sha256};
            hex::encode(Sha256::digest(bytes))
        }
    }

    #[async_trait]
    impl ReleaseSource for FakeSource {
        async fn latest_tag(&self) -> LaunchResult<String> {
            Ok("v1.0.0".to_string())
        }

        async fn download_asset(
            &self,
            _version: &str,
            name: &str,
            dest: &Path,
        ) -> LaunchResult<bool> {
            let Some(bytes) = self.assets.get(name) else {
                return Ok(false);
            };
            tokio::fs::write(dest, bytes).await.unwrap();
            if self.fail_after_write {
                return Err(LaunchError::Internal("connection reset".to_string()));
            }
            Ok(true)
        }

        async fn fetch_checksums(&self, _version: &str) -> Option<String> {
            self.checksums.clone()
        }

        fn releases_url(&self) -> String {
            "https://example.invalid/releases".to_string()
        }
    }

    #[tokio::test]
    async fn installs_with_matching_checksum() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());
        let platform = linux_amd64();
        let bytes = b"fake binary contents";

        let mut source = FakeSource::with_asset(&platform.artifact_name(), bytes);
        source.checksums = Some(format!(
            "{}  {}\n",
            FakeSource::sha256(bytes),
            platform.artifact_name()
        ));

        let fetcher = ArtifactFetcher::new(&source, &cache);
        let path = fetcher.fetch("v1.0.0", &platform).await.unwrap();

        assert_eq!(path, cache.path_for("v1.0.0", &platform));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), bytes);
        assert!(CacheStore::is_executable(&path));
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn checksum_is_compared_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());
        let platform = linux_amd64();
        let bytes = b"payload";

        let mut source = FakeSource::with_asset(&platform.artifact_name(), bytes);
        source.checksums = Some(format!(
            "{}  {}\n",
            FakeSource::sha256(bytes).to_ascii_uppercase(),
            platform.artifact_name()
        ));

        let fetcher = ArtifactFetcher::new(&source, &cache);
        fetcher.fetch("v1.0.0", &platform).await.unwrap();
    }

    #[tokio::test]
    async fn mismatch_is_fatal_and_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());
        let platform = linux_amd64();

        let mut source = FakeSource::with_asset(&platform.artifact_name(), b"actual bytes");
        source.checksums = Some(format!(
            "{}  {}\n",
            FakeSource::sha256(b"expected different bytes"),
            platform.artifact_name()
        ));

        let fetcher = ArtifactFetcher::new(&source, &cache);
        let err = fetcher.fetch("v1.0.0", &platform).await.unwrap_err();

        assert!(matches!(err, LaunchError::ChecksumMismatch { .. }));
        let dest = cache.path_for("v1.0.0", &platform);
        assert!(!dest.exists());
        assert!(!temp_path(&dest).exists());
    }

    #[tokio::test]
    async fn missing_manifest_installs_unverified() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());
        let platform = linux_amd64();

        let source = FakeSource::with_asset(&platform.artifact_name(), b"bytes");
        let fetcher = ArtifactFetcher::new(&source, &cache);
        let path = fetcher.fetch("v1.0.0", &platform).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn manifest_without_entry_installs_unverified() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());
        let platform = linux_amd64();

        let mut source = FakeSource::with_asset(&platform.artifact_name(), b"bytes");
        source.checksums = Some("0011aabb  some-other-file\n".to_string());

        let fetcher = ArtifactFetcher::new(&source, &cache);
        let path = fetcher.fetch("v1.0.0", &platform).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn unpublished_artifact_is_not_found() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());
        let platform = linux_amd64();

        let source = FakeSource {
            assets: HashMap::new(),
            checksums: None,
            fail_after_write: false,
        };

        let fetcher = ArtifactFetcher::new(&source, &cache);
        let err = fetcher.fetch("v9.9.9", &platform).await.unwrap_err();

        match err {
            LaunchError::NotFound {
                version,
                platform: label,
                releases_url,
            } => {
                assert_eq!(version, "v9.9.9");
                assert_eq!(label, "linux-amd64");
                assert!(releases_url.contains("releases"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(!cache.path_for("v9.9.9", &platform).exists());
    }

    #[tokio::test]
    async fn failure_after_staging_leaves_destination_absent() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path().to_path_buf());
        let platform = linux_amd64();

        let mut source = FakeSource::with_asset(&platform.artifact_name(), b"half a download");
        source.fail_after_write = true;

        let fetcher = ArtifactFetcher::new(&source, &cache);
        let err = fetcher.fetch("v1.0.0", &platform).await.unwrap_err();
        assert!(matches!(err, LaunchError::Internal(_)));

        let dest = cache.path_for("v1.0.0", &platform);
        assert!(!dest.exists());
        assert!(!temp_path(&dest).exists());
    }

    #[test]
    fn temp_path_is_colocated() {
        let dest = PathBuf::from("/cache/v1.0.0/netgauge-linux-amd64");
        let tmp = temp_path(&dest);
        assert_eq!(tmp.parent(), dest.parent());
        assert_eq!(
            tmp.file_name().unwrap().to_str().unwrap(),
            "netgauge-linux-amd64.tmp"
        );
    }
}
