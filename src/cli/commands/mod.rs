//! CLI command implementations
//!
//! Each command is implemented in its own submodule. `build` and `plan` share
//! the [`DistArgs`] flags, which are layered over `z3dist.toml` and the
//! built-in defaults.

pub mod build;
pub mod doctor;
pub mod plan;

use anyhow::Result;
use clap::{ArgGroup, Args, Subcommand};
use std::path::PathBuf;

use crate::config::defaults;
use crate::core::arch::{ArchScope, Architecture};
use crate::core::settings::{Component, DistConfig, DistSettings};
use crate::error::{DistError, FilesystemError};
use crate::infra::toolchain::VsToolchain;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build, install and package every architecture in scope
    Build {
        #[command(flatten)]
        args: DistArgs,
    },

    /// Show the command sessions a build would run, without running them
    Plan {
        #[command(flatten)]
        args: DistArgs,
    },

    /// Check the Visual Studio toolchain and project layout
    Doctor {
        /// Project source root
        #[arg(long, default_value = ".", value_name = "DIR")]
        source: PathBuf,

        /// Visual C++ install directory
        #[arg(long, env = "VCINSTALLDIR", value_name = "DIR")]
        vcinstalldir: Option<String>,
    },
}

/// Flags shared by `build` and `plan`
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("arch").args(["x86_only", "x64_only", "arm64_only"])))]
pub struct DistArgs {
    /// Build root, relative to the source root
    #[arg(short, long, value_name = "DIR")]
    pub build: Option<PathBuf>,

    /// Regenerate project files even if already configured
    #[arg(short, long)]
    pub force: bool,

    /// Release version embedded in archive names
    #[arg(long, value_name = "VERSION")]
    pub assembly_version: Option<String>,

    /// Do not build .NET bindings
    #[arg(long)]
    pub nodotnet: bool,

    /// Do not build Java bindings
    #[arg(long)]
    pub nojava: bool,

    /// Do not build Python bindings
    #[arg(long)]
    pub nopython: bool,

    /// Zip each distribution
    #[arg(long)]
    pub zip: bool,

    /// Embed the current git revision
    #[arg(long)]
    pub githash: bool,

    /// Build only x86
    #[arg(long)]
    pub x86_only: bool,

    /// Build only x64
    #[arg(long)]
    pub x64_only: bool,

    /// Build only arm64
    #[arg(long)]
    pub arm64_only: bool,

    /// Project source root
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub source: PathBuf,

    /// Settings file (defaults to z3dist.toml in the source root)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// vcvarsall.bat used for the configure step
    #[arg(long, value_name = "FILE")]
    pub vcvarsall: Option<PathBuf>,

    /// Visual C++ install directory
    #[arg(long, env = "VCINSTALLDIR", value_name = "DIR")]
    pub vcinstalldir: Option<String>,
}

impl DistArgs {
    /// Architecture scope selected by the `--*-only` flags
    pub fn scope(&self) -> ArchScope {
        if self.x64_only {
            ArchScope::Only(Architecture::X64)
        } else if self.x86_only {
            ArchScope::Only(Architecture::X86)
        } else if self.arm64_only {
            ArchScope::Only(Architecture::Arm64)
        } else {
            ArchScope::All
        }
    }

    /// Resolve flags, settings file and defaults into a configuration
    ///
    /// Flags win over `z3dist.toml`, which wins over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DistError::InvalidBuildDir`] when the build directory is the
    /// source tree's `src`, from `-b` or the settings file, or a settings
    /// error if the settings file is malformed.
    pub fn resolve(&self) -> Result<(DistConfig, VsToolchain), DistError> {
        let source_root =
            std::path::absolute(&self.source).map_err(|e| FilesystemError::ReadFile {
                path: self.source.clone(),
                error: e.to_string(),
            })?;
        let settings_path = self
            .config
            .clone()
            .unwrap_or_else(|| source_root.join(defaults::SETTINGS_FILE));
        let settings = DistSettings::load_from_path(&settings_path)?;

        let mut config = settings.apply(DistConfig::new(&source_root));
        if let Some(build) = &self.build {
            config.build_root = source_root.join(build);
        }
        if config.build_root == source_root.join("src") {
            return Err(DistError::InvalidBuildDir {
                path: config.build_root,
                reason: "the src directory should not be used to host build files".to_string(),
            });
        }
        if let Some(version) = &self.assembly_version {
            config.version.clone_from(version);
        }
        config.force_reconfigure |= self.force;
        config.archive |= self.zip;
        config.include_revision |= self.githash;
        for (disabled, component) in [
            (self.nodotnet, Component::DotNet),
            (self.nojava, Component::Java),
            (self.nopython, Component::Python),
        ] {
            if disabled {
                config.components.remove(&component);
            }
        }
        config.scope = self.scope();

        let mut toolchain = VsToolchain::default();
        if let Some(vcvarsall) = self.vcvarsall.clone().or(settings.toolchain.vcvarsall) {
            toolchain = toolchain.with_vcvarsall(vcvarsall);
        }
        if let Some(dir) = self
            .vcinstalldir
            .as_deref()
            .map(env_path)
            .or(settings.toolchain.vcinstalldir)
        {
            toolchain = toolchain.with_vc_install_dir(dir);
        }

        tracing::debug!("Resolved configuration: {config:?}");
        Ok((config, toolchain))
    }
}

/// Path from an environment value, which the prompt may have quoted
pub fn env_path(value: &str) -> PathBuf {
    PathBuf::from(value.trim_matches([' ', '"', '\'']))
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> Result<()> {
        match self {
            Self::Build { args } => build::execute(args).await,
            Self::Plan { args } => plan::execute(&args).await,
            Self::Doctor {
                source,
                vcinstalldir,
            } => doctor::execute(&source, vcinstalldir.as_deref()).await,
        }
    }
}
