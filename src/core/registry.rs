//! Architecture to workspace path table
//!
//! Built once at startup. Creating the per-architecture directories is the
//! only mutation this table ever performs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::arch::Architecture;
use crate::error::DistError;
use crate::infra::filesystem;

/// Read-only mapping from architecture to workspace directory
#[derive(Debug, Clone)]
pub struct ArchRegistry {
    /// Root holding one workspace per architecture
    build_root: PathBuf,
    /// Workspace directory per architecture
    paths: BTreeMap<Architecture, PathBuf>,
}

impl ArchRegistry {
    /// Build the table under `build_root` and create every workspace root
    ///
    /// # Errors
    ///
    /// Returns a filesystem error if a directory cannot be created.
    pub fn new(build_root: &Path) -> Result<Self, DistError> {
        let mut paths = BTreeMap::new();
        for arch in Architecture::ALL {
            let path = build_root.join(arch.as_str());
            filesystem::create_dir_all(&path)?;
            paths.insert(arch, path);
        }

        tracing::debug!("Workspace roots ready under {}", build_root.display());

        Ok(Self {
            build_root: build_root.to_path_buf(),
            paths,
        })
    }

    /// Root directory of all workspaces
    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    /// Workspace directory of `arch`
    pub fn path_for(&self, arch: Architecture) -> &Path {
        // Every variant is inserted in `new`.
        &self.paths[&arch]
    }

    /// Resolve an architecture identifier and its workspace directory
    ///
    /// # Errors
    ///
    /// Returns [`DistError::UnknownArchitecture`] for identifiers outside the
    /// supported set.
    pub fn lookup(&self, name: &str) -> Result<(Architecture, &Path), DistError> {
        let arch: Architecture = name.parse()?;
        Ok((arch, self.path_for(arch)))
    }

    /// Every supported architecture, in build order
    pub fn all_architectures(&self) -> Vec<Architecture> {
        Architecture::ALL.to_vec()
    }

    /// Install prefix of `arch`
    pub fn install_dir(&self, arch: Architecture, install_path: &Path) -> PathBuf {
        self.path_for(arch).join(install_path)
    }

    /// `bin` directory inside the install prefix of `arch`
    pub fn bin_dir(&self, arch: Architecture, install_path: &Path) -> PathBuf {
        self.install_dir(arch, install_path).join("bin")
    }
}
