//! Visual C++ toolchain environment
//!
//! Locates the pieces of an MSVC installation the pipeline depends on. The
//! toolchain itself is only ever driven through command scripts.

use std::path::{Path, PathBuf};

use crate::config::defaults;

/// Tools expected on PATH inside a Visual Studio command prompt
pub const PROMPT_TOOLS: &[&str] = &["cl", "cmake", "nmake"];

/// MSVC toolchain locations
#[derive(Debug, Clone, PartialEq)]
pub struct VsToolchain {
    /// `vcvarsall.bat` used for the configure step
    vcvarsall: PathBuf,
    /// Visual C++ install directory (`VCINSTALLDIR`)
    vc_install_dir: Option<PathBuf>,
}

impl VsToolchain {
    /// Create a toolchain description
    pub fn new(vcvarsall: PathBuf, vc_install_dir: Option<PathBuf>) -> Self {
        Self {
            vcvarsall,
            vc_install_dir,
        }
    }

    /// Override the configure-step `vcvarsall.bat`
    #[must_use]
    pub fn with_vcvarsall(mut self, vcvarsall: PathBuf) -> Self {
        self.vcvarsall = vcvarsall;
        self
    }

    /// Override the Visual C++ install directory
    #[must_use]
    pub fn with_vc_install_dir(mut self, dir: PathBuf) -> Self {
        self.vc_install_dir = Some(dir);
        self
    }

    /// Path of the configure-step `vcvarsall.bat`
    pub fn vcvarsall(&self) -> &Path {
        &self.vcvarsall
    }

    /// Visual C++ install directory, if known
    pub fn vc_install_dir(&self) -> Option<&Path> {
        self.vc_install_dir.as_deref()
    }

    /// Root of the redistributable runtime tree
    pub fn redist_root(&self) -> Option<PathBuf> {
        self.vc_install_dir.as_ref().map(|dir| dir.join("redist"))
    }
}

impl Default for VsToolchain {
    fn default() -> Self {
        Self::new(PathBuf::from(defaults::DEFAULT_VCVARSALL), None)
    }
}

/// Check if a tool is on PATH
pub fn is_tool_available(tool: &str) -> bool {
    which::which(tool).is_ok()
}

/// Check if we run inside a Visual Studio command prompt
pub fn is_vs_prompt() -> bool {
    is_tool_available("cl")
}
