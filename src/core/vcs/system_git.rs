//! System git backend
//!
//! Uses porcelain commands with stable output (`branch --show-current`,
//! `status --porcelain`). Every command runs:
//! - in the repository directory (never via a process-wide `chdir`)
//! - with an isolated environment (PATH, HOME and SSH agent only)
//! - with the C locale, so messages can be matched
//! - with terminal prompts disabled

use crate::core::error::{FleetError, FleetResult, GitError};
use crate::core::process::{CommandOutput, CommandRunner, Invocation};
use std::path::{Path, PathBuf};

/// Git backend for a single repository directory
#[derive(Clone, Copy)]
pub struct SystemGit<'a> {
  runner: &'a dyn CommandRunner,
  repo_path: &'a Path,
}

impl<'a> SystemGit<'a> {
  pub fn new(runner: &'a dyn CommandRunner, repo_path: &'a Path) -> Self {
    Self { runner, repo_path }
  }

  pub fn repo_path(&self) -> &Path {
    self.repo_path
  }

  /// Current branch name; empty when HEAD is detached
  pub fn current_branch(&self) -> FleetResult<String> {
    let output = self.run_checked(&["branch", "--show-current"])?;
    Ok(output.stdout.trim().to_string())
  }

  /// Create a safe git invocation with isolated environment
  pub(crate) fn git_cmd(&self) -> Invocation {
    Invocation::new("git", self.repo_path)
      .isolated()
      .env("LC_ALL", "C")
      .env("GIT_TERMINAL_PROMPT", "0")
      // Force safe behavior (override user config)
      .args(["-c", "advice.detachedHead=false"])
      .args(["-c", "core.quotePath=false"])
  }

  /// Run a git subcommand; non-zero exit is returned as output, not error
  pub(crate) fn run(&self, args: &[&str]) -> FleetResult<CommandOutput> {
    let invocation = self.git_cmd().args(args.iter().copied());
    Ok(self.runner.run(&invocation)?)
  }

  /// Run a git subcommand and turn a non-zero exit into `GitError::CommandFailed`
  pub(crate) fn run_checked(&self, args: &[&str]) -> FleetResult<CommandOutput> {
    let output = self.run(args)?;
    if !output.success() {
      return Err(FleetError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: output.failure_summary(),
      }));
    }
    Ok(output)
  }
}

/// Path of a repository checkout under the base directory
pub fn repository_path(base_dir: &Path, local_name: &str) -> PathBuf {
  base_dir.join(local_name)
}
