//! Release index access and version resolution
//!
//! Turns a version request (`latest` or an explicit tag) into a concrete,
//! immutable tag, and exposes the two per-release download endpoints (binary
//! asset and checksum manifest) behind the [`ReleaseSource`] trait so the
//! acquisition pipeline can be driven without a network in tests.

use crate::error::{LaunchError, LaunchResult};
use async_trait::async_trait;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Default GitHub repository publishing netgauge releases
pub const DEFAULT_REPO: &str = "netgauge-io/netgauge";

/// Version request meaning "whatever the index currently reports"
pub const LATEST: &str = "latest";

const USER_AGENT: &str = concat!("netgauge-launcher/", env!("CARGO_PKG_VERSION"));

/// Resolve a version request to a concrete tag
///
/// Explicit tags are trusted as-is and never touch the network; only
/// `latest` queries the release index.
pub async fn resolve_version(requested: &str, source: &dyn ReleaseSource) -> LaunchResult<String> {
    if requested != LATEST {
        return Ok(requested.to_string());
    }

    let tag = source.latest_tag().await?;
    debug!("Resolved latest to {}", tag);
    Ok(tag)
}

/// Remote side of the acquisition pipeline
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Tag of the most recent published release
    async fn latest_tag(&self) -> LaunchResult<String>;

    /// Stream a release asset into `dest`
    ///
    /// Returns `Ok(false)` when no such asset is published for the version
    /// (the 404 case); transport failures are errors.
    async fn download_asset(&self, version: &str, name: &str, dest: &Path) -> LaunchResult<bool>;

    /// Fetch the checksum manifest text for a version
    ///
    /// Manifests are best-effort: absence, transport failure, or a
    /// non-success status all yield `None`.
    async fn fetch_checksums(&self, version: &str) -> Option<String>;

    /// Human-browsable releases listing, for error messages
    fn releases_url(&self) -> String;
}

#[derive(Debug, Deserialize)]
struct ReleaseInfo {
    tag_name: String,
}

/// Production [`ReleaseSource`] backed by GitHub releases
pub struct GithubReleaseSource {
    repo: String,
    client: reqwest::Client,
}

impl GithubReleaseSource {
    /// Create a source for an `owner/name` repository
    pub fn new(repo: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            repo: repo.into(),
            client,
        }
    }

    fn asset_url(&self, version: &str, name: &str) -> String {
        format!(
            "https://github.com/{}/releases/download/{}/{}",
            self.repo, version, name
        )
    }
}

#[async_trait]
impl ReleaseSource for GithubReleaseSource {
    async fn latest_tag(&self) -> LaunchResult<String> {
        let url = format!("https://api.github.com/repos/{}/releases/latest", self.repo);
        debug!("Querying release index: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(|e| LaunchError::VersionResolution {
                repo: self.repo.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(LaunchError::VersionResolution {
                repo: self.repo.clone(),
                reason: format!("release index returned {}", response.status()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LaunchError::VersionResolution {
                repo: self.repo.clone(),
                reason: format!("reading release index response: {}", e),
            })?;

        let release: ReleaseInfo =
            serde_json::from_str(&body).map_err(|e| LaunchError::VersionResolution {
                repo: self.repo.clone(),
                reason: format!("unparseable release index response: {}", e),
            })?;

        if release.tag_name.is_empty() {
            return Err(LaunchError::VersionResolution {
                repo: self.repo.clone(),
                reason: "release index reported an empty tag".to_string(),
            });
        }

        Ok(release.tag_name)
    }

    async fn download_asset(&self, version: &str, name: &str, dest: &Path) -> LaunchResult<bool> {
        let url = self.asset_url(version, name);
        debug!("Downloading {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LaunchError::transfer(format!("requesting {}", url), e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }

        let response = response
            .error_for_status()
            .map_err(|e| LaunchError::transfer(format!("fetching {}", url), e))?;

        let pb = download_progress(name, response.content_length());

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| LaunchError::io(format!("creating {}", dest.display()), e))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| LaunchError::transfer(format!("reading body of {}", url), e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| LaunchError::io(format!("writing {}", dest.display()), e))?;
            pb.inc(chunk.len() as u64);
        }

        file.flush()
            .await
            .map_err(|e| LaunchError::io(format!("flushing {}", dest.display()), e))?;
        pb.finish_and_clear();

        Ok(true)
    }

    async fn fetch_checksums(&self, version: &str) -> Option<String> {
        let url = self.asset_url(version, crate::platform::checksums_file_name());

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!("Checksum manifest unavailable: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            debug!("Checksum manifest returned {}", response.status());
            return None;
        }

        response.text().await.ok()
    }

    fn releases_url(&self) -> String {
        format!("https://github.com/{}/releases", self.repo)
    }
}

/// Progress on stderr: a byte bar when the size is known, a spinner otherwise
fn download_progress(name: &str, total: Option<u64>) -> ProgressBar {
    let pb = match total {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{msg} {bytes}/{total_bytes} [{bar:30.cyan}] {eta}")
                    .unwrap()
                    .progress_chars("=> "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg} {bytes}")
                    .unwrap(),
            );
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            pb
        }
    };
    pb.set_message(name.to_string());
    pb
}
