//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests: a temporary
//! source tree, a synthetic redistributable tree, and fakes for the command
//! runner and the revision resolver.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use z3_windist::core::arch::Architecture;
use z3_windist::core::commands::CommandSession;
use z3_windist::error::DistError;
use z3_windist::infra::executor::{ScriptCleanup, SessionReport, SessionRunner};
use z3_windist::infra::git::{parse_show_ref, RevisionError, RevisionResolver};

/// Test project context
///
/// Creates a temporary directory for test projects and provides
/// utilities for setting up test scenarios.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Create a project that looks like a z3 checkout
    pub fn with_sources() -> Self {
        let project = Self::new();
        project.create_file("LICENSE.txt", "MIT License");
        project.create_file("CMakeLists.txt", "project(Z3)\n");
        project
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().expect("file has a parent"))
        .expect("Failed to create parent directories");
    std::fs::write(path, b"dll").expect("Failed to write file");
}

/// Populate `root` with a redistributable layout for `arch`
///
/// Adds the shippable CRT and OpenMP libraries plus debug and onecore
/// variants that must never be picked up.
pub fn create_redist(root: &Path, arch: Architecture) {
    let version = root.join("14.38.33135");
    let arch_dir = version.join(arch.as_str());
    touch(&arch_dir.join("Microsoft.VC143.CRT").join("msvcp140.dll"));
    touch(&arch_dir.join("Microsoft.VC143.CRT").join("vcruntime140.dll"));
    touch(&arch_dir.join("Microsoft.VC143.OPENMP").join("vcomp140.dll"));
    touch(&arch_dir.join("Microsoft.VC143.CRT").join("concrt140.dll"));
    touch(
        &version
            .join("debug_nonredist")
            .join(arch.as_str())
            .join("Microsoft.VC143.DebugCRT")
            .join("msvcp140d.dll"),
    );
    touch(
        &version
            .join("onecore")
            .join(arch.as_str())
            .join("Microsoft.VC143.CRT")
            .join("msvcp140.dll"),
    );
}

/// Session recorded by [`FakeRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSession {
    pub arch: String,
    pub step: String,
    pub commands: Vec<String>,
}

/// Session runner that records sessions instead of spawning processes
///
/// Configure writes the `Makefile` marker and install writes a library into
/// the install tree, as the real toolchain would.
pub struct FakeRunner {
    build_root: PathBuf,
    fail_on: Option<(String, String, i32)>,
    sessions: RefCell<Vec<RecordedSession>>,
}

impl FakeRunner {
    /// Runner that succeeds for every session
    pub fn new(build_root: &Path) -> Self {
        Self {
            build_root: build_root.to_path_buf(),
            fail_on: None,
            sessions: RefCell::new(Vec::new()),
        }
    }

    /// Fail `step` for `arch` with exit `code`
    pub fn failing(mut self, arch: Architecture, step: &str, code: i32) -> Self {
        self.fail_on = Some((arch.to_string(), step.to_string(), code));
        self
    }

    /// Sessions run so far
    pub fn sessions(&self) -> Vec<RecordedSession> {
        self.sessions.borrow().clone()
    }

    /// `(arch, step)` pairs run so far
    pub fn steps(&self) -> Vec<(String, String)> {
        self.sessions
            .borrow()
            .iter()
            .map(|s| (s.arch.clone(), s.step.clone()))
            .collect()
    }
}

impl SessionRunner for FakeRunner {
    fn run(
        &self,
        session: &CommandSession,
        arch: &str,
        step: &str,
    ) -> Result<SessionReport, DistError> {
        self.sessions.borrow_mut().push(RecordedSession {
            arch: arch.to_string(),
            step: step.to_string(),
            commands: session.commands().to_vec(),
        });

        if let Some((fail_arch, fail_step, code)) = &self.fail_on {
            if fail_arch == arch && fail_step == step {
                return Err(DistError::ToolchainExecution {
                    arch: arch.to_string(),
                    step: step.to_string(),
                    code: *code,
                });
            }
        }

        let workspace = self.build_root.join(arch);
        match step {
            "configure" => touch(&workspace.join("Makefile")),
            "install" => touch(&workspace.join("dist").join("bin").join("libz3.dll")),
            _ => {}
        }

        Ok(SessionReport {
            code: 0,
            cleanup: ScriptCleanup::Removed,
        })
    }
}

/// Revision resolver answering from canned `git show-ref` output
pub struct FakeRevision {
    show_ref_output: String,
    calls: Cell<usize>,
}

impl FakeRevision {
    /// Resolver whose `show-ref` query prints `output`
    pub fn new(output: &str) -> Self {
        Self {
            show_ref_output: output.to_string(),
            calls: Cell::new(0),
        }
    }

    /// Number of times the revision was requested
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl RevisionResolver for FakeRevision {
    fn resolve(&self) -> Result<String, RevisionError> {
        self.calls.set(self.calls.get() + 1);
        parse_show_ref(&self.show_ref_output)
    }
}
