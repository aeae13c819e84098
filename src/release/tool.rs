//! The external release tool (release-it by default)
//!
//! Three queries run inside an active branch context:
//!
//! | Purpose        | Default invocation            |
//! |----------------|-------------------------------|
//! | changelog      | `release-it --changelog`      |
//! | next version   | `release-it --release-version`|
//! | publish        | `release-it patch --ci`       |
//!
//! Every argument set is configurable under `release-tool` so a wrapper
//! (`npx release-it`, a fork) can stand in.

use crate::core::error::{FleetResult, ProcessError};
use crate::core::process::{CommandOutput, CommandRunner, Invocation};
use serde::Deserialize;
use std::path::Path;

/// How to call the release tool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReleaseTool {
  pub command: String,
  pub changelog_args: Vec<String>,
  pub version_args: Vec<String>,
  pub publish_args: Vec<String>,
  /// Changelog output containing this means there is nothing to release
  pub no_changes_marker: String,
  /// Argument used by the preflight probe
  pub version_flag: String,
}

impl Default for ReleaseTool {
  fn default() -> Self {
    Self {
      command: "release-it".to_string(),
      changelog_args: vec!["--changelog".to_string()],
      version_args: vec!["--release-version".to_string()],
      publish_args: vec!["patch".to_string(), "--ci".to_string()],
      no_changes_marker: "undefined".to_string(),
      version_flag: "--version".to_string(),
    }
  }
}

impl ReleaseTool {
  fn invocation(&self, repo_path: &Path, args: &[String]) -> Invocation {
    Invocation::new(&self.command, repo_path).args(args.iter().cloned())
  }

  pub fn changelog_cmd(&self, repo_path: &Path) -> Invocation {
    self.invocation(repo_path, &self.changelog_args)
  }

  pub fn version_cmd(&self, repo_path: &Path) -> Invocation {
    self.invocation(repo_path, &self.version_args)
  }

  pub fn publish_cmd(&self, repo_path: &Path) -> Invocation {
    self.invocation(repo_path, &self.publish_args)
  }

  /// Empty output, or output carrying the marker, means no unreleased changes
  pub fn is_no_changes(&self, changelog: &str) -> bool {
    changelog.trim().is_empty() || (!self.no_changes_marker.is_empty() && changelog.contains(&self.no_changes_marker))
  }

  /// Raw changelog text for the pending release
  pub fn changelog(&self, runner: &dyn CommandRunner, repo_path: &Path) -> FleetResult<String> {
    let output = checked(runner, &self.changelog_cmd(repo_path))?;
    Ok(output.stdout)
  }

  /// Version the next release would get, trimmed
  pub fn next_version(&self, runner: &dyn CommandRunner, repo_path: &Path) -> FleetResult<String> {
    let output = checked(runner, &self.version_cmd(repo_path))?;
    Ok(output.stdout.trim().to_string())
  }

  /// Tag and publish the release
  pub fn publish(&self, runner: &dyn CommandRunner, repo_path: &Path) -> FleetResult<()> {
    checked(runner, &self.publish_cmd(repo_path))?;
    Ok(())
  }

  /// Preflight probe: the tool must start and answer its version flag
  pub fn version(&self, runner: &dyn CommandRunner, cwd: &Path) -> FleetResult<String> {
    let invocation = Invocation::new(&self.command, cwd).arg(&self.version_flag);
    let unavailable = |stderr: String| ProcessError::Unavailable {
      program: self.command.clone(),
      stderr,
    };

    let output = runner.run(&invocation).map_err(|e| unavailable(e.to_string()))?;
    if !output.success() {
      return Err(unavailable(output.failure_summary()).into());
    }
    Ok(output.stdout.trim().to_string())
  }
}

fn checked(runner: &dyn CommandRunner, invocation: &Invocation) -> FleetResult<CommandOutput> {
  let output = runner.run(invocation)?;
  if !output.success() {
    return Err(
      ProcessError::Failed {
        command: invocation.command_line(),
        detail: output.failure_summary(),
      }
      .into(),
    );
  }
  Ok(output)
}
