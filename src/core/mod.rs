//! Core engine
//!
//! - **config**: config file loading (YAML or TOML)
//! - **context**: run settings resolved from flags, config and environment
//! - **error**: error types with contextual help messages
//! - **process**: external command execution with timeouts
//! - **vcs**: git operations (SystemGit)
//! - **branch**: scoped branch transitions with guaranteed restoration
//! - **recovery**: markers for stashes a run could not restore
//! - **fleet**: the repository/branch loop

pub mod branch;
pub mod config;
pub mod context;
pub mod error;
pub mod fleet;
pub mod process;
pub mod recovery;
pub mod vcs;
