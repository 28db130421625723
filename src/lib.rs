//! z3-windist - Windows binary distribution builder for Z3
//!
//! This library configures, builds and packages Z3 for every supported
//! Windows architecture using CMake, NMake and the MSVC toolchain.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Build orchestration, command construction and packaging
//! - [`infra`] - Infrastructure layer (filesystem, processes, git)
//! - [`config`] - Configuration constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
