//! Supported target architectures
//!
//! The set is closed: every workspace, toolchain invocation and archive name
//! is keyed by one of these identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DistError;

/// Target CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// 64-bit x86
    X64,
    /// 32-bit x86
    X86,
    /// 64-bit ARM, cross-compiled from an x64 host
    Arm64,
}

impl Architecture {
    /// All supported architectures, in build order
    pub const ALL: [Architecture; 3] = [Self::X64, Self::X86, Self::Arm64];

    /// Identifier used for directories and archive names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::X86 => "x86",
            Self::Arm64 => "arm64",
        }
    }

    /// Token that marks this architecture in redistributable directory names
    pub fn platform_token(&self) -> &'static str {
        self.as_str()
    }

    /// `vcvarsall` argument used when generating project files
    pub fn configure_toolchain_id(&self) -> &'static str {
        match self {
            Self::Arm64 => "amd64_arm64",
            _ => self.as_str(),
        }
    }

    /// `vcvarsall` argument used when building and installing
    ///
    /// Differs from [`Self::configure_toolchain_id`] for arm64.
    pub fn build_toolchain_id(&self) -> &'static str {
        match self {
            Self::Arm64 => "x64_arm64",
            _ => self.as_str(),
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = DistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|arch| arch.as_str() == s)
            .ok_or_else(|| DistError::UnknownArchitecture {
                name: s.to_string(),
            })
    }
}

/// Which architectures a run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchScope {
    /// Every supported architecture
    #[default]
    All,
    /// Exactly one architecture
    Only(Architecture),
}

impl ArchScope {
    /// Architectures in scope, in build order
    pub fn architectures(&self) -> Vec<Architecture> {
        match self {
            Self::All => Architecture::ALL.to_vec(),
            Self::Only(arch) => vec![*arch],
        }
    }
}
