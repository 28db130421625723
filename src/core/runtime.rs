//! Visual C++ runtime discovery
//!
//! The redistributable layout shipped with Visual Studio changes with every
//! release, so the runtime DLLs are found by directory naming conventions
//! rather than by reading manifests. The rules over-match on purpose.

use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::core::arch::Architecture;
use crate::error::DistError;

/// Runtime library name patterns: compiler runtime, C++ runtime, C runtime, OpenMP
const RUNTIME_PATTERNS: &[&str] = &[
    r"^vcrun.*\.dll",
    r"^msvcp.*\.dll",
    r"^msvcr.*\.dll",
    r"^vcomp.*\.dll",
];

/// Directory tokens marking a redistributable runtime folder
const REDIST_TOKENS: &[&str] = &["CRT", "MP"];

/// Directory tokens marking variants that must not ship
const EXCLUDED_TOKENS: &[&str] = &["onecore", "debug"];

/// A runtime library discovered for an architecture
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RuntimeFile {
    /// Full path of the library
    pub path: PathBuf,
    /// Architecture it was discovered for
    pub arch: Architecture,
}

/// Predicate deciding whether a file is a shippable runtime library
#[derive(Debug)]
pub struct RuntimeMatcher {
    patterns: Vec<Regex>,
}

impl Default for RuntimeMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeMatcher {
    /// Compile the runtime name patterns
    pub fn new() -> Self {
        let patterns = RUNTIME_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("Invalid runtime pattern"))
            .collect();
        Self { patterns }
    }

    /// Whether `file_name` inside `dir` is a runtime library for `arch`
    ///
    /// `dir` is matched textually, so callers should pass it relative to the
    /// redistributable root.
    pub fn matches(&self, dir: &Path, file_name: &str, arch: Architecture) -> bool {
        let is_dll = Path::new(file_name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("dll"));
        if !is_dll {
            return false;
        }

        let dir = dir.to_string_lossy();
        dir.contains(arch.platform_token())
            && REDIST_TOKENS.iter().any(|t| dir.contains(t))
            && !EXCLUDED_TOKENS.iter().any(|t| dir.contains(t))
            && self.patterns.iter().any(|p| p.is_match(file_name))
    }
}

/// Whether `file_name` inside `dir` is a runtime library for `arch`
pub fn is_runtime_library(dir: &Path, file_name: &str, arch: Architecture) -> bool {
    RuntimeMatcher::new().matches(dir, file_name, arch)
}

/// Find the runtime libraries for `arch` under `toolchain_root`
///
/// # Errors
///
/// Returns [`DistError::NoRuntimeFilesFound`] when nothing matches.
pub fn locate(arch: Architecture, toolchain_root: &Path) -> Result<Vec<RuntimeFile>, DistError> {
    tracing::info!("Walking {} for {arch} runtime files", toolchain_root.display());
    let matcher = RuntimeMatcher::new();
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(toolchain_root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let Some(parent) = path.parent() else {
            continue;
        };
        let dir = parent.strip_prefix(toolchain_root).unwrap_or(parent);
        let file_name = entry.file_name().to_string_lossy();

        if matcher.matches(dir, &file_name, arch) {
            tracing::debug!("Found runtime file {}", path.display());
            files.push(RuntimeFile {
                path: path.to_path_buf(),
                arch,
            });
        }
    }

    if files.is_empty() {
        return Err(DistError::NoRuntimeFilesFound {
            arch: arch.to_string(),
            root: toolchain_root.to_path_buf(),
        });
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crt_dir() -> PathBuf {
        ["MSVC", "14.38.33135", "x64", "Microsoft.VC143.CRT"].iter().collect()
    }

    #[test]
    fn test_matches_crt_runtime() {
        let matcher = RuntimeMatcher::new();
        for name in [
            "vcruntime140.dll",
            "vcruntime140_1.dll",
            "msvcp140.dll",
            "msvcp140_atomic_wait.dll",
        ] {
            assert!(matcher.matches(&crt_dir(), name, Architecture::X64), "{name}");
        }
    }

    #[test]
    fn test_matches_openmp_runtime() {
        let dir: PathBuf = ["MSVC", "14.38", "x86", "Microsoft.VC143.OpenMP"].iter().collect();
        assert!(is_runtime_library(&dir, "vcomp140.dll", Architecture::X86));
    }

    #[test]
    fn test_rejects_other_architecture() {
        assert!(!is_runtime_library(&crt_dir(), "msvcp140.dll", Architecture::Arm64));
        assert!(!is_runtime_library(&crt_dir(), "msvcp140.dll", Architecture::X86));
    }

    #[test]
    fn test_rejects_debug_and_onecore() {
        let debug: PathBuf = ["debug_nonredist", "x64", "Microsoft.VC143.DebugCRT"].iter().collect();
        let onecore: PathBuf = ["onecore", "x64", "Microsoft.VC143.CRT"].iter().collect();
        assert!(!is_runtime_library(&debug, "vcruntime140d.dll", Architecture::X64));
        assert!(!is_runtime_library(&onecore, "vcruntime140.dll", Architecture::X64));
    }

    #[test]
    fn test_token_checks_are_case_sensitive() {
        let upper: PathBuf = ["DEBUG", "x64", "Microsoft.VC143.CRT"].iter().collect();
        assert!(is_runtime_library(&upper, "vcruntime140.dll", Architecture::X64));

        let lower_crt: PathBuf = ["x64", "microsoft.vc143.crt"].iter().collect();
        assert!(!is_runtime_library(&lower_crt, "vcruntime140.dll", Architecture::X64));
    }

    #[test]
    fn test_rejects_non_runtime_names() {
        assert!(!is_runtime_library(&crt_dir(), "concrt140.dll", Architecture::X64));
        assert!(!is_runtime_library(&crt_dir(), "vccorlib140.dll", Architecture::X64));
        assert!(!is_runtime_library(&crt_dir(), "msvcp140.pdb", Architecture::X64));
        assert!(!is_runtime_library(&crt_dir(), "xmsvcp140.dll", Architecture::X64));
    }

    #[test]
    fn test_name_patterns_are_case_sensitive() {
        assert!(!is_runtime_library(&crt_dir(), "MSVCP140.DLL", Architecture::X64));
        assert!(!is_runtime_library(&crt_dir(), "msvcp140.DLL", Architecture::X64));
    }
}
