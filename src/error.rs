//! Error types for z3-windist
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::settings::SettingsError;
use crate::infra::git::RevisionError;

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to copy file
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

/// Top-level distribution build error
#[derive(Error, Debug)]
pub enum DistError {
    /// Architecture identifier outside the supported set
    #[error("Unknown architecture '{name}'. Supported: x64, x86, arm64")]
    UnknownArchitecture { name: String },

    /// Toolchain command line could not be assembled
    #[error("Cannot construct toolchain commands: {message}")]
    CommandConstruction { message: String },

    /// A scripted toolchain session exited unsuccessfully
    #[error("Toolchain {step} step failed for {arch} with exit code {code}")]
    ToolchainExecution {
        arch: String,
        step: String,
        code: i32,
    },

    /// Source revision could not be determined
    #[error("Failed to resolve source revision: {0}")]
    RevisionResolution(#[from] RevisionError),

    /// No redistributable runtime libraries matched
    #[error("Did not find any runtime files for {arch} under '{root}'")]
    NoRuntimeFilesFound { arch: String, root: PathBuf },

    /// Build directory is not usable
    #[error("Invalid build directory '{path}': {reason}")]
    InvalidBuildDir { path: PathBuf, reason: String },

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Settings file error
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl DistError {
    /// Whether this error stops every remaining architecture.
    ///
    /// Configuration-time errors abort the whole run; everything else is
    /// confined to the architecture whose pipeline raised it.
    pub fn aborts_run(&self) -> bool {
        matches!(
            self,
            Self::UnknownArchitecture { .. }
                | Self::CommandConstruction { .. }
                | Self::RevisionResolution(_)
                | Self::InvalidBuildDir { .. }
                | Self::Settings(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_abort_run() {
        let err = DistError::UnknownArchitecture {
            name: "mips".to_string(),
        };
        assert!(err.aborts_run());

        let err = DistError::CommandConstruction {
            message: "bad".to_string(),
        };
        assert!(err.aborts_run());

        let err = DistError::RevisionResolution(RevisionError::UnexpectedOutput {
            output: String::new(),
        });
        assert!(err.aborts_run());
    }

    #[test]
    fn test_pipeline_errors_are_isolated() {
        let err = DistError::ToolchainExecution {
            arch: "x64".to_string(),
            step: "install".to_string(),
            code: 2,
        };
        assert!(!err.aborts_run());
        assert!(err.to_string().contains("exit code 2"));

        let err = DistError::NoRuntimeFilesFound {
            arch: "arm64".to_string(),
            root: PathBuf::from("redist"),
        };
        assert!(!err.aborts_run());
    }
}
