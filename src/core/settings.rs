//! Build configuration
//!
//! [`DistConfig`] is the resolved, immutable configuration handed to the
//! orchestrator. [`DistSettings`] is the optional `z3dist.toml` file layered
//! underneath command-line flags.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::defaults;
use crate::core::arch::ArchScope;

/// Settings file error types
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read settings file
    #[error("Failed to read settings file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse settings file
    #[error("Failed to parse settings file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// Optional language binding built alongside the core library
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    /// .NET bindings
    DotNet,
    /// Java bindings
    Java,
    /// Python bindings
    Python,
}

impl Component {
    /// All components, in the order their flags are emitted
    pub const ALL: [Component; 3] = [Self::DotNet, Self::Java, Self::Python];

    /// CMake flags enabling this component
    pub fn cmake_flags(&self) -> &'static [&'static str] {
        match self {
            Self::DotNet => &[
                "-DZ3_BUILD_DOTNET_BINDINGS=ON",
                "-DZ3_INSTALL_DOTNET_BINDINGS=ON",
            ],
            Self::Java => &[
                "-DZ3_BUILD_JAVA_BINDINGS=ON",
                "-DZ3_INSTALL_JAVA_BINDINGS=ON",
                "-DZ3_JAVA_JAR_INSTALLDIR=java",
                "-DZ3_JAVA_JNI_LIB_INSTALLDIR=java",
            ],
            Self::Python => &[
                "-DZ3_BUILD_PYTHON_BINDINGS=ON",
                "-DZ3_INSTALL_PYTHON_BINDINGS=ON",
                "-DCMAKE_INSTALL_PYTHON_PKG_DIR=python",
            ],
        }
    }
}

/// Set of enabled components, iterated in [`Component::ALL`] order
pub type ComponentSet = BTreeSet<Component>;

/// Resolved configuration for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistConfig {
    /// Project source root passed to the generator
    pub source_root: PathBuf,
    /// Root holding one workspace per architecture
    pub build_root: PathBuf,
    /// Install prefix, relative to each workspace
    pub install_path: PathBuf,
    /// Enabled optional components
    pub components: ComponentSet,
    /// Release version embedded in archive names
    pub version: String,
    /// Embed the current source revision
    pub include_revision: bool,
    /// Produce zip archives
    pub archive: bool,
    /// Architectures to build
    pub scope: ArchScope,
    /// Regenerate project files even if already configured
    pub force_reconfigure: bool,
    /// License file copied into every distribution
    pub license_file: PathBuf,
}

impl DistConfig {
    /// Create a configuration with defaults for the given source root
    ///
    /// Every component is enabled by default.
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        let source_root = source_root.into();
        Self {
            build_root: source_root.join(defaults::DEFAULT_BUILD_DIR),
            license_file: source_root.join(defaults::LICENSE_FILE),
            source_root,
            install_path: PathBuf::from(defaults::DEFAULT_INSTALL_DIR),
            components: Component::ALL.into_iter().collect(),
            version: defaults::DEFAULT_VERSION.to_string(),
            include_revision: false,
            archive: false,
            scope: ArchScope::All,
            force_reconfigure: false,
        }
    }

    /// Set the build root
    #[must_use]
    pub fn with_build_root(mut self, build_root: impl Into<PathBuf>) -> Self {
        self.build_root = build_root.into();
        self
    }

    /// Set the install prefix
    #[must_use]
    pub fn with_install_path(mut self, install_path: impl Into<PathBuf>) -> Self {
        self.install_path = install_path.into();
        self
    }

    /// Replace the enabled components
    #[must_use]
    pub fn with_components(mut self, components: impl IntoIterator<Item = Component>) -> Self {
        self.components = components.into_iter().collect();
        self
    }

    /// Set the release version
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Embed the source revision
    #[must_use]
    pub fn with_revision(mut self, include: bool) -> Self {
        self.include_revision = include;
        self
    }

    /// Produce zip archives
    #[must_use]
    pub fn with_archive(mut self, archive: bool) -> Self {
        self.archive = archive;
        self
    }

    /// Set the architecture scope
    #[must_use]
    pub fn with_scope(mut self, scope: ArchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Force project file regeneration
    #[must_use]
    pub fn with_force_reconfigure(mut self, force: bool) -> Self {
        self.force_reconfigure = force;
        self
    }

    /// Set the license file
    #[must_use]
    pub fn with_license_file(mut self, license_file: impl Into<PathBuf>) -> Self {
        self.license_file = license_file.into();
        self
    }
}

/// Contents of `z3dist.toml`
///
/// Every field is optional; command-line flags override what is set here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistSettings {
    /// Build directory settings
    #[serde(default)]
    pub build: BuildSettings,

    /// Optional component toggles
    #[serde(default)]
    pub components: ComponentSettings,

    /// Packaging settings
    #[serde(default)]
    pub package: PackageSettings,

    /// Toolchain locations
    #[serde(default)]
    pub toolchain: ToolchainSettings,
}

/// Build directory settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Build root
    pub dir: Option<PathBuf>,

    /// Always regenerate project files
    pub force: Option<bool>,
}

/// Optional component toggles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentSettings {
    /// Build .NET bindings
    pub dotnet: Option<bool>,

    /// Build Java bindings
    pub java: Option<bool>,

    /// Build Python bindings
    pub python: Option<bool>,
}

/// Packaging settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageSettings {
    /// Release version
    pub version: Option<String>,

    /// Produce zip archives
    pub zip: Option<bool>,

    /// Embed the git revision
    pub githash: Option<bool>,

    /// License file, relative to the source root
    pub license: Option<PathBuf>,
}

/// Toolchain locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolchainSettings {
    /// `vcvarsall.bat` used for the configure step
    pub vcvarsall: Option<PathBuf>,

    /// Visual C++ install directory (`VCINSTALLDIR`)
    pub vcinstalldir: Option<PathBuf>,
}

impl DistSettings {
    /// Load settings from a specific path
    ///
    /// A missing file yields default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SettingsError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| SettingsError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Whether `component` is enabled, defaulting to enabled
    #[must_use]
    pub fn component_enabled(&self, component: Component) -> bool {
        let setting = match component {
            Component::DotNet => self.components.dotnet,
            Component::Java => self.components.java,
            Component::Python => self.components.python,
        };
        setting.unwrap_or(true)
    }

    /// Apply the file's settings on top of a default configuration
    #[must_use]
    pub fn apply(&self, mut config: DistConfig) -> DistConfig {
        if let Some(dir) = &self.build.dir {
            config.build_root = config.source_root.join(dir);
        }
        if let Some(force) = self.build.force {
            config.force_reconfigure = force;
        }
        if let Some(version) = &self.package.version {
            config.version.clone_from(version);
        }
        if let Some(zip) = self.package.zip {
            config.archive = zip;
        }
        if let Some(githash) = self.package.githash {
            config.include_revision = githash;
        }
        if let Some(license) = &self.package.license {
            config.license_file = config.source_root.join(license);
        }
        config.components = Component::ALL
            .into_iter()
            .filter(|c| self.component_enabled(*c))
            .collect();
        config
    }
}
