//! Distribution packaging
//!
//! Completes an installed tree with the runtime libraries and license, then
//! optionally zips it. The install tree is the deliverable; the archive is a
//! convenience, so archive failures are reported as an outcome and never
//! raised.

use serde::Serialize;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::defaults::{ARCHIVE_STAGING_PREFIX, LICENSE_FILE, PLATFORM, PRODUCT_NAME};
use crate::core::arch::Architecture;
use crate::core::registry::ArchRegistry;
use crate::core::runtime;
use crate::core::settings::DistConfig;
use crate::error::DistError;
use crate::infra::filesystem;

/// Deterministic distribution name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionName {
    version: String,
    revision: Option<String>,
    arch: Architecture,
}

impl DistributionName {
    /// Create a name from its parts
    pub fn new(version: &str, revision: Option<&str>, arch: Architecture) -> Self {
        Self {
            version: version.to_string(),
            revision: revision.map(String::from),
            arch,
        }
    }

    /// Base name, e.g. `z3-4-x64-win`
    pub fn stem(&self) -> String {
        match &self.revision {
            Some(rev) => format!(
                "{PRODUCT_NAME}-{}-{rev}-{}-{PLATFORM}",
                self.version, self.arch
            ),
            None => format!("{PRODUCT_NAME}-{}-{}-{PLATFORM}", self.version, self.arch),
        }
    }

    /// Archive file name, e.g. `z3-4-x64-win.zip`
    pub fn archive_file_name(&self) -> String {
        format!("{}.zip", self.stem())
    }
}

/// Result of the optional archive step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum ArchiveOutcome {
    /// Archive written
    Written { path: PathBuf },
    /// Archiving disabled
    Skipped,
    /// Archive could not be written; the install tree is still valid
    Failed { reason: String },
}

/// Output of packaging one architecture
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionArtifact {
    /// Architecture packaged
    pub arch: Architecture,
    /// Install tree
    pub install_dir: PathBuf,
    /// Runtime libraries copied into `bin`
    pub runtime_files: Vec<PathBuf>,
    /// License file inside the install tree
    pub license: PathBuf,
    /// Archive outcome
    pub archive: ArchiveOutcome,
}

/// Packaging stage for one build
#[derive(Debug)]
pub struct Packager<'a> {
    registry: &'a ArchRegistry,
    config: &'a DistConfig,
    runtime_root: &'a Path,
}

impl<'a> Packager<'a> {
    /// Create a packager
    ///
    /// `runtime_root` is the redistributable tree searched for runtime DLLs.
    pub fn new(registry: &'a ArchRegistry, config: &'a DistConfig, runtime_root: &'a Path) -> Self {
        Self {
            registry,
            config,
            runtime_root,
        }
    }

    /// Package the install tree of `arch`
    ///
    /// # Errors
    ///
    /// Returns [`DistError::NoRuntimeFilesFound`] when no runtime libraries
    /// are found, or a filesystem error if copying fails. Archive errors are
    /// not returned.
    pub fn package(
        &self,
        arch: Architecture,
        revision: Option<&str>,
    ) -> Result<DistributionArtifact, DistError> {
        let install_dir = self.registry.install_dir(arch, &self.config.install_path);
        let bin_dir = self.registry.bin_dir(arch, &self.config.install_path);

        let runtime_files = runtime::locate(arch, self.runtime_root)?;
        filesystem::create_dir_all(&bin_dir)?;
        let mut copied = Vec::with_capacity(runtime_files.len());
        for file in &runtime_files {
            let dest = filesystem::copy_into_dir(&file.path, &bin_dir)?;
            tracing::debug!("Copied '{}' to '{}'", file.path.display(), bin_dir.display());
            copied.push(dest);
        }

        let license = install_dir.join(
            self.config
                .license_file
                .file_name()
                .unwrap_or_else(|| OsStr::new(LICENSE_FILE)),
        );
        filesystem::copy_file(&self.config.license_file, &license)?;

        let archive = if self.config.archive {
            let name = DistributionName::new(&self.config.version, revision, arch);
            let path = self
                .registry
                .path_for(arch)
                .join(name.archive_file_name());
            match write_archive(&install_dir, &path) {
                Ok(count) => {
                    tracing::info!("Generated '{}' ({count} files)", path.display());
                    ArchiveOutcome::Written { path }
                }
                Err(e) => {
                    tracing::warn!("Failed to write archive '{}': {e}", path.display());
                    ArchiveOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        } else {
            ArchiveOutcome::Skipped
        };

        Ok(DistributionArtifact {
            arch,
            install_dir,
            runtime_files: copied,
            license,
            archive,
        })
    }
}

/// Zip every regular file under `tree` into `archive`
///
/// Entry names are relative to `tree` with `/` separators. The zip is staged
/// next to `archive` and only renamed into place once complete, so a failed
/// write never leaves a truncated archive behind. Returns the number of files
/// written.
pub fn write_archive(tree: &Path, archive: &Path) -> io::Result<usize> {
    let dir = archive
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let staged = tempfile::Builder::new()
        .prefix(ARCHIVE_STAGING_PREFIX)
        .tempfile_in(dir)?;
    let mut zip = ZipWriter::new(BufWriter::new(staged));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut count = 0;

    for entry in walkdir::WalkDir::new(tree)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(io::Error::other)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(tree)
            .map_err(io::Error::other)?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        zip.start_file(name, options).map_err(io::Error::other)?;
        let mut source = File::open(entry.path())?;
        io::copy(&mut source, &mut zip)?;
        count += 1;
    }

    let staged = zip
        .finish()
        .map_err(io::Error::other)?
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?;
    staged.persist(archive)?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_name_without_revision() {
        let name = DistributionName::new("4", None, Architecture::X64);
        assert_eq!(name.archive_file_name(), "z3-4-x64-win.zip");
    }

    #[test]
    fn test_name_with_revision() {
        let name = DistributionName::new("4.13.1", Some("0123456789ab"), Architecture::Arm64);
        assert_eq!(name.stem(), "z3-4.13.1-0123456789ab-arm64-win");
    }

    #[test]
    fn test_names_unique_per_triple() {
        let names: std::collections::HashSet<String> = Architecture::ALL
            .iter()
            .flat_map(|arch| {
                [None, Some("aaaaaaaaaaaa"), Some("bbbbbbbbbbbb")]
                    .into_iter()
                    .map(move |rev| DistributionName::new("4", rev, *arch).archive_file_name())
            })
            .collect();
        assert_eq!(names.len(), 9);
    }

    #[test]
    fn test_write_archive_counts_files() {
        let temp = TempDir::new().unwrap();
        let tree = temp.path().join("dist");
        std::fs::create_dir_all(tree.join("bin")).unwrap();
        std::fs::write(tree.join("bin").join("z3.exe"), b"exe").unwrap();
        std::fs::write(tree.join("LICENSE.txt"), b"MIT").unwrap();

        let count = write_archive(&tree, &temp.path().join("out.zip")).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_failed_write_leaves_no_archive() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("z3-4-x64-win.zip");

        let result = write_archive(&temp.path().join("missing"), &archive);

        assert!(result.is_err());
        assert!(!archive.exists());
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_write_archive_to_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let result = write_archive(temp.path(), &temp.path().join("no").join("out.zip"));
        assert!(result.is_err());
    }
}
