//! Git operations via the system `git` binary
//!
//! `SystemGit` is bound to one repository directory and issues every command
//! through a [`CommandRunner`](crate::core::process::CommandRunner), so tests
//! can substitute a simulated repository.

pub mod system_git;
mod system_git_ops;

pub use system_git::SystemGit;
