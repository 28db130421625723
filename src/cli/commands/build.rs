//! Build command implementation
//!
//! Implements `z3-windist build`: configure, install and package every
//! architecture in scope from a Visual Studio Developer Command Prompt.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::cli::commands::DistArgs;
use crate::cli::output::{is_json, print_detail, print_info, print_success, print_warning, status};
use crate::core::orchestrator::{BuildOrchestrator, BuildReport, ConfigureStep};
use crate::core::package::ArchiveOutcome;
use crate::core::registry::ArchRegistry;
use crate::core::settings::DistConfig;
use crate::error::DistError;
use crate::infra::executor::ScriptExecutor;
use crate::infra::git::GitRevision;
use crate::infra::toolchain::{self, VsToolchain};

/// Execute the build command
pub async fn execute(args: DistArgs) -> Result<()> {
    let (config, toolchain) = args.resolve()?;

    if !cfg!(windows) {
        bail!("This tool is for Windows only");
    }
    if !toolchain::is_vs_prompt() {
        bail!("cl not found in PATH. Run z3-windist from a Visual Studio Developer Command Prompt");
    }
    let runtime_root = toolchain
        .redist_root()
        .context("VCINSTALLDIR is not set; pass --vcinstalldir")?;

    print_info(&format!(
        "Building {} into {}",
        config
            .scope
            .architectures()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        config.build_root.display()
    ));

    // The toolchain sessions block, so keep them off the async workers.
    let report = tokio::task::spawn_blocking(move || run_build(&config, &toolchain, &runtime_root))
        .await
        .context("Build task panicked")??;

    if is_json() {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    let failed = report.failed();
    if !failed.is_empty() {
        bail!(
            "Build failed for {}",
            failed
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}

/// Wire the real executor and revision resolver into the orchestrator
fn run_build(
    config: &DistConfig,
    toolchain: &VsToolchain,
    runtime_root: &Path,
) -> Result<BuildReport, DistError> {
    let registry = ArchRegistry::new(&config.build_root)?;
    let executor = ScriptExecutor::new(registry.build_root().to_path_buf());
    let revisions = GitRevision::new(config.source_root.clone());

    BuildOrchestrator::new(config, &registry, toolchain, &executor, &revisions, runtime_root).run()
}

fn print_report(report: &BuildReport) {
    if let Some(revision) = &report.revision {
        print_info(&format!("Revision {revision}"));
    }

    for arch in &report.architectures {
        if let Some(error) = &arch.error {
            eprintln!("{} {}: {error}", status::ERROR, arch.arch);
            continue;
        }

        print_success(&format!("{} packaged", arch.arch));
        if arch.configure == ConfigureStep::Skipped {
            print_detail("configure skipped (already configured)");
        }
        let Some(artifact) = &arch.artifact else {
            continue;
        };
        print_detail(&format!("install tree: {}", artifact.install_dir.display()));
        print_detail(&format!("runtime files: {}", artifact.runtime_files.len()));
        match &artifact.archive {
            ArchiveOutcome::Written { path } => {
                print_detail(&format!("archive: {}", path.display()));
            }
            ArchiveOutcome::Failed { reason } => {
                print_warning(&format!("{}: archive not written: {reason}", arch.arch));
            }
            ArchiveOutcome::Skipped => {}
        }
    }
}
