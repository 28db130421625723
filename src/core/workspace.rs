//! Workspace state tracking
//!
//! Decides whether an architecture's workspace already holds generated
//! project files, which makes repeated runs skip the configure step.

use serde::Serialize;

use crate::config::defaults::CONFIGURE_MARKER;
use crate::core::arch::Architecture;
use crate::core::registry::ArchRegistry;
use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Observed state of a workspace directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceState {
    /// Directory does not exist
    Absent,
    /// Directory exists without generated project files
    Unconfigured,
    /// Directory holds the configure marker
    Configured,
}

/// What the orchestrator must do before building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigureAction {
    /// Run the configure session
    Configure,
    /// Project files are present, go straight to building
    Skip,
}

/// Workspace state tracker
#[derive(Debug)]
pub struct WorkspaceTracker<'a> {
    registry: &'a ArchRegistry,
}

impl<'a> WorkspaceTracker<'a> {
    /// Create a tracker over the registry's workspaces
    pub fn new(registry: &'a ArchRegistry) -> Self {
        Self { registry }
    }

    /// Current state of the workspace for `arch`
    pub fn state(&self, arch: Architecture) -> WorkspaceState {
        let path = self.registry.path_for(arch);
        if !path.is_dir() {
            WorkspaceState::Absent
        } else if path.join(CONFIGURE_MARKER).exists() {
            WorkspaceState::Configured
        } else {
            WorkspaceState::Unconfigured
        }
    }

    /// Whether `arch` already has generated project files
    pub fn is_configured(&self, arch: Architecture) -> bool {
        self.state(arch) == WorkspaceState::Configured
    }

    /// Prepare the workspace and decide whether to configure
    ///
    /// A configured workspace is left untouched unless `force_reconfigure`
    /// is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the workspace directory cannot be created.
    pub fn ensure_workspace(
        &self,
        arch: Architecture,
        force_reconfigure: bool,
    ) -> Result<ConfigureAction, FilesystemError> {
        if self.is_configured(arch) && !force_reconfigure {
            tracing::info!("Workspace for {arch} already configured, skipping configure");
            return Ok(ConfigureAction::Skip);
        }

        let path = self.registry.path_for(arch);
        if !path.is_dir() {
            filesystem::create_dir_all(path)?;
        }
        tracing::info!("Workspace for {arch} needs configuring: {}", path.display());
        Ok(ConfigureAction::Configure)
    }
}
