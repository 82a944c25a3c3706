//! Error types for the netgauge launcher
//!
//! All modules use `LaunchResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for launcher operations
pub type LaunchResult<T> = Result<T, LaunchError>;

/// All errors that can occur while acquiring or running the binary
#[derive(Error, Debug)]
pub enum LaunchError {
    // Platform errors
    #[error("Unsupported platform: {os}/{arch}. netgauge ships for darwin, linux, and windows on x64/arm64.")]
    UnsupportedPlatform { os: String, arch: String },

    // Release resolution errors
    #[error("Failed to resolve latest version from {repo}: {reason}")]
    VersionResolution { repo: String, reason: String },

    // Download errors
    #[error("No netgauge binary published for {platform} at version {version}. Check {releases_url}")]
    NotFound {
        version: String,
        platform: String,
        releases_url: String,
    },

    #[error("Download failed: {context}")]
    Transfer {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Checksum mismatch for {artifact}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine cache directory for this platform")]
    NoCacheDir,

    // Process errors
    #[error("Failed to start {command}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LaunchError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a transfer error with context
    pub fn transfer(context: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transfer {
            context: context.into(),
            source,
        }
    }

    /// Create a spawn error for a command path
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotFound { releases_url, .. } => {
                Some(format!("Browse published releases: {}", releases_url))
            }
            Self::VersionResolution { .. } => Some(
                "Pin an explicit version with --version-tag or NETGAUGE_VERSION to skip the release lookup"
                    .to_string(),
            ),
            Self::ChecksumMismatch { .. } => Some(
                "The download was discarded. Retry, or pin a different version if the release was re-uploaded"
                    .to_string(),
            ),
            Self::Spawn { .. } => Some(
                "Run `netgauge-launcher cache clean` to force a fresh download".to_string(),
            ),
            _ => None,
        }
    }
}
