//! Checksum manifest parsing and file digests
//!
//! Releases publish a `checksums.txt` with one `<hex-digest>  <filename>`
//! line per asset (the `sha256sum` format). Digest comparison is
//! case-insensitive; manifests are advisory at download time and entries for
//! unrelated files are ignored.

use crate::error::{LaunchError, LaunchResult};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Parsed checksum manifest: artifact file name -> lowercase hex SHA-256
#[derive(Debug, Clone, Default)]
pub struct ChecksumManifest {
    entries: HashMap<String, String>,
}

impl ChecksumManifest {
    /// Parse the `sha256sum`-style manifest text
    ///
    /// Lines that do not contain a digest and a file name are skipped.
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();

        for line in content.lines() {
            let mut parts = line.split_whitespace();
            let (Some(digest), Some(name)) = (parts.next(), parts.next()) else {
                continue;
            };
            // sha256sum marks binary-mode entries with a leading '*'
            let name = name.strip_prefix('*').unwrap_or(name);
            entries.insert(name.to_string(), digest.to_ascii_lowercase());
        }

        Self { entries }
    }

    /// Look up the expected digest for an artifact file name
    pub fn digest_for(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Number of parsed entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest parsed to nothing usable
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute the streaming SHA-256 digest of a file, as lowercase hex
///
/// Reads in fixed-size chunks so large binaries never sit in memory whole.
pub async fn sha256_file(path: &Path) -> LaunchResult<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| LaunchError::io(format!("opening {} for hashing", path.display()), e))?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];

    loop {
        let n = file
            .read(&mut buf)
            .await
            .map_err(|e| LaunchError::io(format!("reading {} for hashing", path.display()), e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}
