//! Core business logic module
//!
//! Everything that decides what to build and how to package it. Toolchain
//! sessions are only ever started through the traits in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`arch`] - Supported architectures and toolchain naming
//! - [`registry`] - Architecture to workspace path table
//! - [`settings`] - Resolved configuration and the settings file
//! - [`workspace`] - Workspace configured/unconfigured tracking
//! - [`commands`] - Configure and install command sessions
//! - [`runtime`] - Visual C++ runtime discovery
//! - [`package`] - Install tree completion and zip archives
//! - [`orchestrator`] - Per-architecture pipeline driver
//! - [`doctor`] - Host environment checks

pub mod arch;
pub mod commands;
pub mod doctor;
pub mod orchestrator;
pub mod package;
pub mod registry;
pub mod runtime;
pub mod settings;
pub mod workspace;
