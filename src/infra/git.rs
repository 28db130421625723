//! Git operations
//!
//! Resolves the abbreviated commit hash of the checked-out branch by querying
//! the `git` command-line tool.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

use crate::config::defaults::REVISION_ABBREV;

/// Revision query errors
#[derive(Error, Debug)]
pub enum RevisionError {
    /// Git could not be run or exited unsuccessfully
    #[error("Failed to run '{command}': {error}")]
    QueryFailed { command: String, error: String },

    /// Output did not contain exactly a hash and a ref name
    #[error("Unexpected git output '{output}'")]
    UnexpectedOutput { output: String },
}

/// Source of the revision identifier embedded in builds
pub trait RevisionResolver {
    /// Resolve the short commit hash of the current branch
    fn resolve(&self) -> Result<String, RevisionError>;
}

/// Revision resolver backed by the git CLI
#[derive(Debug)]
pub struct GitRevision {
    /// Repository working directory
    work_dir: PathBuf,
}

impl GitRevision {
    /// Create a resolver for the repository at `work_dir`
    pub fn new(work_dir: PathBuf) -> Self {
        Self { work_dir }
    }

    /// Get the working directory
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Run git and return stdout without the trailing newline
    fn query(&self, args: &[&str]) -> Result<String, RevisionError> {
        let command = format!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .map_err(|e| RevisionError::QueryFailed {
                command: command.clone(),
                error: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(RevisionError::QueryFailed {
                command,
                error: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .trim_end_matches(['\r', '\n'])
            .to_string())
    }
}

impl RevisionResolver for GitRevision {
    fn resolve(&self) -> Result<String, RevisionError> {
        let branch = self.query(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let abbrev = format!("--abbrev={REVISION_ABBREV}");
        let reference = format!("refs/heads/{branch}");
        let refs = self.query(&["show-ref", &abbrev, &reference])?;

        let hash = parse_show_ref(&refs)?;
        tracing::debug!("Resolved {reference} to {hash}");
        Ok(hash)
    }
}

/// Extract the hash from `git show-ref` output
///
/// Exactly one `<hash> <ref>` pair is accepted; no refs or several refs are
/// treated as unresolvable.
pub fn parse_show_ref(output: &str) -> Result<String, RevisionError> {
    let parts: Vec<&str> = output.split(' ').collect();
    match parts.as_slice() {
        [hash, reference] if !hash.is_empty() && !reference.is_empty() => Ok((*hash).to_string()),
        _ => Err(RevisionError::UnexpectedOutput {
            output: output.to_string(),
        }),
    }
}
