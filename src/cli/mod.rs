//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no build logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use anyhow::Result;
use clap::Parser;
use std::sync::LazyLock;

use commands::Commands;

/// Version, git revision and build date of this binary
pub fn build_info() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), LONG_VERSION.as_str())
}

static LONG_VERSION: LazyLock<String> = LazyLock::new(|| {
    format!(
        "{} ({} {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        option_env!("VERGEN_BUILD_DATE").unwrap_or("unknown"),
    )
});

/// z3-windist - Z3 Windows distribution generator
///
/// Builds Z3 for x64, x86 and arm64 with CMake and NMake, bundles the
/// Visual C++ runtime and optionally zips each distribution.
#[derive(Parser, Debug)]
#[command(name = "z3-windist")]
#[command(author, version, long_version = LONG_VERSION.as_str(), about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        if let Some(cmd) = self.command {
            cmd.run().await
        } else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
