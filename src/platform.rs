//! Host platform detection and release artifact naming
//!
//! The internal [`Os`]/[`Arch`] tags and the names used in published release
//! assets are deliberately distinct: host detection and the release naming
//! scheme evolve independently. Release assets follow the Go toolchain
//! convention (`windows`, `amd64`).

use crate::error::{LaunchError, LaunchResult};
use std::fmt;

/// Binary name prefix shared by every release asset
pub const PRODUCT: &str = "netgauge";

/// Supported operating systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Darwin,
    Linux,
    Windows,
}

impl Os {
    /// Name used in release asset file names
    pub fn release_name(&self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Darwin => "darwin",
            Self::Linux => "linux",
            Self::Windows => "windows",
        };
        write!(f, "{}", name)
    }
}

/// Supported CPU architectures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    /// Name used in release asset file names (Go convention)
    pub fn release_name(&self) -> &'static str {
        match self {
            Self::X64 => "amd64",
            Self::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X64 => "x64",
            Self::Arm64 => "arm64",
        };
        write!(f, "{}", name)
    }
}

/// The host platform, detected once per process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformInfo {
    pub os: Os,
    pub arch: Arch,
}

impl PlatformInfo {
    /// Detect the current platform from the compile-time host constants
    pub fn detect() -> LaunchResult<Self> {
        Self::from_strs(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map OS/arch strings to a supported platform
    pub fn from_strs(os: &str, arch: &str) -> LaunchResult<Self> {
        let mapped_os = match os {
            "macos" | "darwin" => Os::Darwin,
            "linux" => Os::Linux,
            "windows" => Os::Windows,
            other => {
                return Err(LaunchError::UnsupportedPlatform {
                    os: other.to_string(),
                    arch: arch.to_string(),
                })
            }
        };

        let mapped_arch = match arch {
            "x86_64" | "amd64" | "x64" => Arch::X64,
            "aarch64" | "arm64" => Arch::Arm64,
            other => {
                return Err(LaunchError::UnsupportedPlatform {
                    os: os.to_string(),
                    arch: other.to_string(),
                })
            }
        };

        Ok(Self {
            os: mapped_os,
            arch: mapped_arch,
        })
    }

    /// Release asset file name for this platform
    ///
    /// Format: `netgauge-{os}-{arch}` (e.g. `netgauge-darwin-arm64`,
    /// `netgauge-linux-amd64`), with `.exe` appended on Windows.
    pub fn artifact_name(&self) -> String {
        let ext = match self.os {
            Os::Windows => ".exe",
            _ => "",
        };
        format!(
            "{}-{}-{}{}",
            PRODUCT,
            self.os.release_name(),
            self.arch.release_name(),
            ext
        )
    }

    /// Short `os-arch` label for log and error messages
    pub fn label(&self) -> String {
        format!("{}-{}", self.os.release_name(), self.arch.release_name())
    }

    /// Whether this platform gets full support
    ///
    /// Windows builds are published but support is experimental; callers
    /// emit a one-time stderr warning before launching there.
    pub fn is_experimental(&self) -> bool {
        self.os == Os::Windows
    }
}

impl fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// File name of the checksum manifest published with every release
pub fn checksums_file_name() -> &'static str {
    "checksums.txt"
}
