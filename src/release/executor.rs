//! Release step for one branch inside an active branch context

use super::prompt::Prompter;
use super::tool::ReleaseTool;
use super::{ReleaseMode, ReleaseOutcome};
use crate::core::process::CommandRunner;
use std::path::Path;
use tracing::{debug, info, warn};

/// Decide, confirm and publish for a single (repository, branch)
pub struct ReleaseStep<'a> {
  runner: &'a dyn CommandRunner,
  tool: &'a ReleaseTool,
  mode: ReleaseMode,
}

impl<'a> ReleaseStep<'a> {
  pub fn new(runner: &'a dyn CommandRunner, tool: &'a ReleaseTool, mode: ReleaseMode) -> Self {
    Self { runner, tool, mode }
  }

  /// Run the workflow; the branch must already be checked out and pulled
  ///
  /// Never fails: every failure is folded into the outcome.
  pub fn execute(&self, repo_path: &Path, repo: &str, branch: &str, prompter: &mut dyn Prompter) -> ReleaseOutcome {
    debug!(
      "Running {} to check if need to make release for {} branch {}",
      self.tool.changelog_cmd(repo_path).command_line(),
      repo,
      branch
    );
    let changelog = match self.tool.changelog(self.runner, repo_path) {
      Ok(changelog) => changelog,
      Err(e) => {
        debug!("{}: changelog query failed on {}: {}", repo, branch, e);
        return ReleaseOutcome::skipped(e.to_string());
      }
    };

    if self.tool.is_no_changes(&changelog) {
      debug!("{} branch {} has no changes, skipping", repo, branch);
      return ReleaseOutcome::NoChanges;
    }

    debug!(
      "Running {} to get next release version {} branch {}",
      self.tool.version_cmd(repo_path).command_line(),
      repo,
      branch
    );
    let version = match self.tool.next_version(self.runner, repo_path) {
      Ok(version) => version,
      Err(e) => {
        debug!("{}: version query failed on {}: {}", repo, branch, e);
        return ReleaseOutcome::skipped(e.to_string());
      }
    };
    debug!("[{}]\n{}", repo, changelog);

    let proceed = match self.mode {
      ReleaseMode::DryRun => return ReleaseOutcome::DryRun { version, changelog },
      ReleaseMode::AutoYes => true,
      ReleaseMode::Interactive => {
        if let Err(e) = prompter.show(&format!("[{}]\n{}", repo, changelog)) {
          debug!("Could not show changelog for {}: {}", repo, e);
        }
        let question = format!("Do you want to make a new release [{}] for {} on branch {}?", version, repo, branch);
        prompter.confirm(&question).unwrap_or_else(|e| {
          warn!("No answer for {} on {} ({}); not releasing", repo, branch, e);
          false
        })
      }
    };

    if !proceed {
      return ReleaseOutcome::Declined { version, changelog };
    }

    debug!(
      "Running {} to make release for {} branch {}",
      self.tool.publish_cmd(repo_path).command_line(),
      repo,
      branch
    );
    match self.tool.publish(self.runner, repo_path) {
      Ok(()) => {
        info!("Released {} {} on {}", repo, version, branch);
        ReleaseOutcome::Released { version, changelog }
      }
      Err(e) => {
        warn!("Failed to make release for {} branch {} with error: {}", repo, branch, e);
        ReleaseOutcome::Failed {
          version,
          changelog,
          error: e.to_string(),
        }
      }
    }
  }
}
