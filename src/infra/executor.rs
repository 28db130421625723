//! Scripted command execution
//!
//! A [`CommandSession`] is written to one temporary script and run as a single
//! process. The shell keeps going after a failing line, so the session status
//! is the script's exit status and nothing finer-grained.

use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::defaults::SCRIPT_PREFIX;
use crate::core::commands::CommandSession;
use crate::error::{DistError, FilesystemError};

/// Shell used to interpret session scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptShell {
    /// `cmd.exe` batch script
    Cmd,
    /// POSIX shell script
    Sh,
}

impl ScriptShell {
    /// Shell of the host platform
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::Cmd
        } else {
            Self::Sh
        }
    }

    /// Script file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Cmd => ".cmd",
            Self::Sh => ".sh",
        }
    }

    /// Command that runs `script`
    fn command(&self, script: &Path) -> Command {
        match self {
            Self::Cmd => {
                let mut cmd = Command::new("cmd");
                cmd.arg("/C").arg(script);
                cmd
            }
            Self::Sh => {
                let mut cmd = Command::new("sh");
                cmd.arg(script);
                cmd
            }
        }
    }
}

/// What happened to the script file after the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptCleanup {
    /// Script was deleted
    Removed,
    /// Deletion failed; the file is left behind
    Leaked { path: PathBuf, error: String },
}

/// Outcome of a successful session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    /// Exit code of the script
    pub code: i32,
    /// Script cleanup outcome
    pub cleanup: ScriptCleanup,
}

/// Runs command sessions
pub trait SessionRunner {
    /// Run `session` to completion
    ///
    /// `step` names the pipeline step for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`DistError::ToolchainExecution`] on non-zero or abnormal exit.
    fn run(&self, session: &CommandSession, arch: &str, step: &str)
        -> Result<SessionReport, DistError>;
}

/// Session runner that executes real scripts
#[derive(Debug)]
pub struct ScriptExecutor {
    /// Directory the transient script is written to
    script_dir: PathBuf,
    /// Interpreter for the script
    shell: ScriptShell,
}

impl ScriptExecutor {
    /// Create an executor writing scripts into `script_dir`
    pub fn new(script_dir: PathBuf) -> Self {
        Self {
            script_dir,
            shell: ScriptShell::native(),
        }
    }

    /// Use a specific shell
    #[must_use]
    pub fn with_shell(mut self, shell: ScriptShell) -> Self {
        self.shell = shell;
        self
    }

    /// Write the session script, returning its path handle
    fn write_script(&self, session: &CommandSession) -> Result<tempfile::TempPath, FilesystemError> {
        let write_err = |e: std::io::Error| FilesystemError::WriteFile {
            path: self.script_dir.join(SCRIPT_PREFIX),
            error: e.to_string(),
        };

        let mut file = tempfile::Builder::new()
            .prefix(SCRIPT_PREFIX)
            .suffix(self.shell.extension())
            .tempfile_in(&self.script_dir)
            .map_err(write_err)?;
        file.write_all(session.to_script().as_bytes())
            .map_err(write_err)?;
        file.flush().map_err(write_err)?;

        // Close the handle so the shell can open the script on Windows.
        Ok(file.into_temp_path())
    }
}

impl SessionRunner for ScriptExecutor {
    fn run(
        &self,
        session: &CommandSession,
        arch: &str,
        step: &str,
    ) -> Result<SessionReport, DistError> {
        let script = self.write_script(session)?;
        tracing::debug!("Running {step} session for {arch}:\n{session}");

        let code = match self.shell.command(&script).status() {
            Ok(status) => status.code().unwrap_or(-1),
            Err(e) => {
                tracing::warn!("Failed to start {step} session for {arch}: {e}");
                -1
            }
        };

        let path = script.to_path_buf();
        let cleanup = match script.close() {
            Ok(()) => ScriptCleanup::Removed,
            Err(e) => {
                tracing::warn!("Could not remove {}: {e}", path.display());
                ScriptCleanup::Leaked {
                    path,
                    error: e.to_string(),
                }
            }
        };

        if code != 0 {
            return Err(DistError::ToolchainExecution {
                arch: arch.to_string(),
                step: step.to_string(),
                code,
            });
        }

        Ok(SessionReport { code, cleanup })
    }
}
