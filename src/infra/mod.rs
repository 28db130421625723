//! Infrastructure layer
//!
//! Filesystem helpers, the toolchain script runner and the git revision
//! query.

pub mod executor;
pub mod filesystem;
pub mod git;
pub mod toolchain;
