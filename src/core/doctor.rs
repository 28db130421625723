//! Doctor command logic
//!
//! Checks that the host can run a distribution build and reports issues with
//! suggestions.

use std::path::Path;

use crate::config::defaults::{LICENSE_FILE, SETTINGS_FILE};
use crate::core::settings::DistSettings;
use crate::infra::toolchain::{self, VsToolchain};

/// Result of a single dependency check
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckResult {
    /// Name of the dependency being checked
    pub name: String,
    /// Whether the check passed
    pub passed: bool,
    /// Version if available
    pub version: Option<String>,
    /// Error message if check failed
    pub error: Option<String>,
    /// Suggestion for fixing the issue
    pub suggestion: Option<String>,
    /// Whether this is a required or optional dependency
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result
    pub fn pass(name: &str, version: Option<String>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            version,
            error: None,
            suggestion: None,
            required,
        }
    }

    /// Create a failing check result
    pub fn fail(name: &str, error: &str, suggestion: Option<&str>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            version: None,
            error: Some(error.to_string()),
            suggestion: suggestion.map(String::from),
            required,
        }
    }
}

/// Overall doctor report
#[derive(Debug, Default, serde::Serialize)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,
    /// Configuration issues found
    pub config_issues: Vec<String>,
}

impl DoctorReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check result
    pub fn add_check(&mut self, result: CheckResult) {
        self.checks.push(result);
    }

    /// Add a configuration issue
    pub fn add_config_issue(&mut self, issue: String) {
        self.config_issues.push(issue);
    }

    /// Check if all required checks passed
    pub fn all_required_passed(&self) -> bool {
        self.checks
            .iter()
            .filter(|c| c.required)
            .all(|c| c.passed)
    }

    /// Check if all checks passed (including optional)
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed) && self.config_issues.is_empty()
    }

    /// Count passed checks
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Get all failed required checks
    pub fn failed_required(&self) -> Vec<&CheckResult> {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .collect()
    }
}

/// Version reported by `<command> --version`, if it runs
pub fn command_version(command: &str) -> Option<String> {
    std::process::Command::new(command)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| extract_version(&String::from_utf8_lossy(&output.stdout)))
}

/// Extract version string from command output
fn extract_version(output: &str) -> Option<String> {
    let version_regex = regex::Regex::new(r"v?(\d+\.\d+(?:\.\d+)?(?:-\w+)?)").ok()?;
    version_regex
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Check one Visual Studio prompt tool
pub fn check_prompt_tool(tool: &str) -> CheckResult {
    if toolchain::is_tool_available(tool) {
        CheckResult::pass(tool, command_version(tool), true)
    } else {
        CheckResult::fail(
            tool,
            &format!("{tool} not found in PATH"),
            Some("Run from a Visual Studio Developer Command Prompt"),
            true,
        )
    }
}

/// Check Git availability (needed for --githash)
pub fn check_git() -> CheckResult {
    if toolchain::is_tool_available("git") {
        CheckResult::pass("git", command_version("git"), false)
    } else {
        CheckResult::fail(
            "git",
            "git not found in PATH",
            Some("Install Git to embed the source revision with --githash (optional)"),
            false,
        )
    }
}

/// Check the Visual C++ install directory
pub fn check_vc_install_dir(toolchain: &VsToolchain) -> CheckResult {
    match toolchain.redist_root() {
        Some(root) if root.is_dir() => CheckResult::pass("VCINSTALLDIR", None, true),
        Some(root) => CheckResult::fail(
            "VCINSTALLDIR",
            &format!("redistributable directory '{}' does not exist", root.display()),
            Some("Point --vcinstalldir at the VC directory of a Visual Studio install"),
            true,
        ),
        None => CheckResult::fail(
            "VCINSTALLDIR",
            "VCINSTALLDIR is not set",
            Some("Run from a Visual Studio Developer Command Prompt or pass --vcinstalldir"),
            true,
        ),
    }
}

/// Check the source tree for configuration problems
pub fn check_project(source_root: &Path) -> Vec<String> {
    let mut issues = Vec::new();

    if !source_root.join(LICENSE_FILE).is_file() {
        issues.push(format!(
            "{LICENSE_FILE} not found in {}",
            source_root.display()
        ));
    }
    if !source_root.join("CMakeLists.txt").is_file() {
        issues.push(format!(
            "CMakeLists.txt not found in {}; run from the project root",
            source_root.display()
        ));
    }
    if let Err(e) = DistSettings::load_from_path(&source_root.join(SETTINGS_FILE)) {
        issues.push(e.to_string());
    }

    issues
}

/// Run all doctor checks
pub fn run_doctor(source_root: &Path, toolchain: &VsToolchain) -> DoctorReport {
    let mut report = DoctorReport::new();

    for tool in toolchain::PROMPT_TOOLS {
        report.add_check(check_prompt_tool(tool));
    }
    report.add_check(check_vc_install_dir(toolchain));
    report.add_check(check_git());

    for issue in check_project(source_root) {
        report.add_config_issue(issue);
    }

    report
}
