//! Build orchestration logic
//!
//! Drives each architecture in scope through configure, install and
//! packaging, one architecture at a time.

use serde::Serialize;
use std::path::Path;

use crate::core::arch::Architecture;
use crate::core::commands::{checked_revision, CommandBuilder};
use crate::core::package::{DistributionArtifact, Packager};
use crate::core::registry::ArchRegistry;
use crate::core::settings::DistConfig;
use crate::core::workspace::{ConfigureAction, WorkspaceTracker};
use crate::error::DistError;
use crate::infra::executor::SessionRunner;
use crate::infra::git::RevisionResolver;
use crate::infra::toolchain::VsToolchain;

/// Pipeline state of one architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchState {
    /// Nothing done yet
    Unbuilt,
    /// Configure session running
    Configuring,
    /// Project files present
    Configured,
    /// Install session running
    Installing,
    /// Install tree present
    Installed,
    /// Runtime, license and archive done
    Packaged,
    /// Pipeline aborted
    Failed,
}

/// Whether the configure session ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigureStep {
    /// Not reached
    Pending,
    /// Session ran
    Ran,
    /// Workspace already configured
    Skipped,
}

/// Outcome for one architecture
#[derive(Debug, Clone, Serialize)]
pub struct ArchReport {
    /// Architecture built
    pub arch: Architecture,
    /// Current state
    pub state: ArchState,
    /// Every state visited, in order
    pub history: Vec<ArchState>,
    /// Configure step outcome
    pub configure: ConfigureStep,
    /// Packaged artifact
    pub artifact: Option<DistributionArtifact>,
    /// Error that failed the pipeline
    pub error: Option<String>,
}

impl ArchReport {
    fn new(arch: Architecture) -> Self {
        Self {
            arch,
            state: ArchState::Unbuilt,
            history: vec![ArchState::Unbuilt],
            configure: ConfigureStep::Pending,
            artifact: None,
            error: None,
        }
    }

    fn advance(&mut self, state: ArchState) {
        tracing::info!("{}: {:?} -> {:?}", self.arch, self.state, state);
        self.state = state;
        self.history.push(state);
    }

    fn fail(&mut self, error: &DistError) {
        tracing::error!("{} failed: {error}", self.arch);
        self.error = Some(error.to_string());
        self.advance(ArchState::Failed);
    }

    /// Whether the pipeline finished
    pub fn succeeded(&self) -> bool {
        self.state == ArchState::Packaged
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// Revision embedded in the build, if any
    pub revision: Option<String>,
    /// One report per architecture in scope
    pub architectures: Vec<ArchReport>,
}

impl BuildReport {
    /// Whether every architecture was packaged
    pub fn all_succeeded(&self) -> bool {
        self.architectures.iter().all(ArchReport::succeeded)
    }

    /// Architectures that failed
    pub fn failed(&self) -> Vec<Architecture> {
        self.architectures
            .iter()
            .filter(|r| !r.succeeded())
            .map(|r| r.arch)
            .collect()
    }
}

/// Build orchestrator
pub struct BuildOrchestrator<'a> {
    config: &'a DistConfig,
    registry: &'a ArchRegistry,
    toolchain: &'a VsToolchain,
    runner: &'a dyn SessionRunner,
    revisions: &'a dyn RevisionResolver,
    runtime_root: &'a Path,
}

impl<'a> BuildOrchestrator<'a> {
    /// Create a new build orchestrator
    pub fn new(
        config: &'a DistConfig,
        registry: &'a ArchRegistry,
        toolchain: &'a VsToolchain,
        runner: &'a dyn SessionRunner,
        revisions: &'a dyn RevisionResolver,
        runtime_root: &'a Path,
    ) -> Self {
        Self {
            config,
            registry,
            toolchain,
            runner,
            revisions,
            runtime_root,
        }
    }

    /// Run every architecture in scope
    ///
    /// # Errors
    ///
    /// Returns configuration-time errors, which abort the whole run. Errors
    /// raised inside one architecture's pipeline are recorded in its report
    /// and the next architecture still runs.
    pub fn run(&self) -> Result<BuildReport, DistError> {
        let revision = if self.config.include_revision {
            Some(self.revisions.resolve()?)
        } else {
            None
        };
        // Reject an unusable revision before any session starts.
        checked_revision(self.config, revision.as_deref())?;

        let mut reports = Vec::new();
        for arch in self.config.scope.architectures() {
            let mut report = ArchReport::new(arch);
            if let Err(e) = self.build_arch(arch, revision.as_deref(), &mut report) {
                if e.aborts_run() {
                    return Err(e);
                }
                report.fail(&e);
            }
            reports.push(report);
        }

        Ok(BuildReport {
            revision,
            architectures: reports,
        })
    }

    /// Run the full pipeline for one architecture
    fn build_arch(
        &self,
        arch: Architecture,
        revision: Option<&str>,
        report: &mut ArchReport,
    ) -> Result<(), DistError> {
        let tracker = WorkspaceTracker::new(self.registry);
        let commands = CommandBuilder::new(self.registry, self.toolchain);

        match tracker.ensure_workspace(arch, self.config.force_reconfigure)? {
            ConfigureAction::Configure => {
                let session = commands.configure_commands(self.config, arch, revision)?;
                report.advance(ArchState::Configuring);
                self.runner.run(&session, arch.as_str(), "configure")?;
                report.configure = ConfigureStep::Ran;
            }
            ConfigureAction::Skip => {
                report.configure = ConfigureStep::Skipped;
            }
        }
        report.advance(ArchState::Configured);

        report.advance(ArchState::Installing);
        self.runner
            .run(&commands.install_commands(arch), arch.as_str(), "install")?;
        report.advance(ArchState::Installed);

        let packager = Packager::new(self.registry, self.config, self.runtime_root);
        report.artifact = Some(packager.package(arch, revision)?);
        report.advance(ArchState::Packaged);
        Ok(())
    }
}
