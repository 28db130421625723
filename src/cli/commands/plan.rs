//! Plan command implementation
//!
//! Implements `z3-windist plan`, which prints the command sessions a build
//! would run for each architecture. No toolchain process is spawned; git is
//! queried only when `--githash` is set.

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::commands::DistArgs;
use crate::cli::output::{is_json, print_detail, print_info};
use crate::core::arch::Architecture;
use crate::core::commands::CommandBuilder;
use crate::core::package::DistributionName;
use crate::core::registry::ArchRegistry;
use crate::core::workspace::{WorkspaceState, WorkspaceTracker};
use crate::infra::git::{GitRevision, RevisionResolver};

/// Planned work for one architecture
#[derive(Debug, Serialize)]
struct ArchPlan {
    arch: Architecture,
    workspace: PathBuf,
    state: WorkspaceState,
    /// `None` when the configure step would be skipped
    configure: Option<Vec<String>>,
    install: Vec<String>,
    archive: Option<String>,
}

/// Execute the plan command
pub async fn execute(args: &DistArgs) -> Result<()> {
    let (config, toolchain) = args.resolve()?;

    let revision = if config.include_revision {
        Some(GitRevision::new(config.source_root.clone()).resolve()?)
    } else {
        None
    };

    let registry = ArchRegistry::new(&config.build_root)?;
    let tracker = WorkspaceTracker::new(&registry);
    let commands = CommandBuilder::new(&registry, &toolchain);

    let mut plans = Vec::new();
    for arch in config.scope.architectures() {
        let state = tracker.state(arch);
        let configure = if state == WorkspaceState::Configured && !config.force_reconfigure {
            None
        } else {
            Some(
                commands
                    .configure_commands(&config, arch, revision.as_deref())?
                    .commands()
                    .to_vec(),
            )
        };
        plans.push(ArchPlan {
            arch,
            workspace: registry.path_for(arch).to_path_buf(),
            state,
            configure,
            install: commands.install_commands(arch).commands().to_vec(),
            archive: config.archive.then(|| {
                DistributionName::new(&config.version, revision.as_deref(), arch)
                    .archive_file_name()
            }),
        });
    }

    if is_json() {
        let json = serde_json::json!({
            "revision": revision,
            "architectures": plans,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    if let Some(revision) = &revision {
        print_info(&format!("Revision {revision}"));
    }
    for plan in &plans {
        print_info(&format!("{} ({})", plan.arch, plan.workspace.display()));
        match &plan.configure {
            Some(lines) => {
                print_detail("configure:");
                for line in lines {
                    print_detail(&format!("  {line}"));
                }
            }
            None => print_detail("configure: skipped (already configured)"),
        }
        print_detail("install:");
        for line in &plan.install {
            print_detail(&format!("  {line}"));
        }
        if let Some(archive) = &plan.archive {
            print_detail(&format!("archive: {archive}"));
        }
    }

    Ok(())
}
