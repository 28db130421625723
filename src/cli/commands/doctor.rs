//! CLI command for `z3-windist doctor`
//!
//! Checks the Visual Studio toolchain and project layout and reports issues
//! with suggestions.

use anyhow::Result;
use std::path::Path;

use crate::cli::build_info;
use crate::cli::commands::env_path;
use crate::cli::output::{
    is_json, is_quiet, print_detail, print_info, print_success, print_warning, status,
};
use crate::core::doctor::run_doctor;
use crate::infra::toolchain::VsToolchain;

/// Execute the doctor command
pub async fn execute(source_root: &Path, vcinstalldir: Option<&str>) -> Result<()> {
    let toolchain = match vcinstalldir {
        Some(dir) => VsToolchain::default().with_vc_install_dir(env_path(dir)),
        None => VsToolchain::default(),
    };
    let report = run_doctor(source_root, &toolchain);

    if is_json() {
        let json_result = serde_json::json!({
            "status": if report.all_passed() { "success" } else if report.failed_required().is_empty() { "warning" } else { "error" },
            "version": build_info(),
            "checks": report.checks,
            "config_issues": report.config_issues,
            "passed_count": report.passed_count(),
            "total_count": report.checks.len()
        });
        println!("{}", serde_json::to_string_pretty(&json_result)?);

        if !report.failed_required().is_empty() {
            return Err(anyhow::anyhow!("Missing required dependencies"));
        }
        return Ok(());
    }

    if is_quiet() {
        let failed_required = report.failed_required();
        if !failed_required.is_empty() {
            for check in failed_required {
                eprintln!("{} Missing required: {}", status::ERROR, check.name);
            }
            return Err(anyhow::anyhow!("Missing required dependencies"));
        }
        return Ok(());
    }

    print_info(&build_info());
    print_info("Checking build prerequisites...");
    println!();

    for check in &report.checks {
        let version_str = check
            .version
            .as_ref()
            .map(|v| format!(" (v{v})"))
            .unwrap_or_default();

        let required_str = if check.required { "" } else { " [optional]" };

        if check.passed {
            println!("  {} {}{version_str}{required_str}", status::SUCCESS, check.name);
        } else {
            println!("  {} {}{required_str}", status::ERROR, check.name);
            if let Some(error) = &check.error {
                print_detail(&format!("Error: {error}"));
            }
            if let Some(suggestion) = &check.suggestion {
                print_detail(&format!("Suggestion: {suggestion}"));
            }
        }
    }

    if !report.config_issues.is_empty() {
        println!();
        print_warning("Project issues:");
        for issue in &report.config_issues {
            print_detail(&format!("• {issue}"));
        }
    }

    println!();
    let passed = report.passed_count();
    let total = report.checks.len();
    let failed_required = report.failed_required();

    if report.all_passed() {
        print_success(&format!("All checks passed ({passed}/{total})"));
    } else if failed_required.is_empty() {
        print_warning(&format!("{passed}/{total} checks passed"));
        print_detail("Distributions can be built, with the limitations above.");
    } else {
        println!("{} {passed}/{total} checks passed", status::ERROR);
        for check in &failed_required {
            if let Some(suggestion) = &check.suggestion {
                print_detail(&format!("• {}: {suggestion}", check.name));
            }
        }
        return Err(anyhow::anyhow!(
            "Missing required dependencies. Run 'z3-windist doctor' for details."
        ));
    }

    Ok(())
}
