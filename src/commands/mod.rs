//! CLI commands
//!
//! - **release**: check every inventory branch for unreleased changes and
//!   release them (dry run, interactive, or unattended)

pub mod release;

pub use release::{ReleaseArgs, run_release};
