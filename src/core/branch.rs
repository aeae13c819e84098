//! Scoped branch transitions with guaranteed restoration
//!
//! [`BranchContext::enter`] moves a repository onto a release branch:
//!
//! 1. record the branch the operator is on
//! 2. checkout the target branch if it differs
//! 3. stash local changes (untracked files included) if the tree is dirty
//! 4. pull the target branch from origin
//!
//! The context is built right after step 1, so every later failure returns
//! through its `Drop`, which is the only place restoration happens:
//!
//! 1. checkout the original branch if the repository is elsewhere
//! 2. pop the stash if one was created
//!
//! Restoration is best effort. Failures are logged, never raised, and a
//! failed pop leaves the recovery marker in place for the next run to find.
//! Restoration is not signal-safe; the marker is what covers a killed run.

use crate::core::error::{FleetResult, GitError};
use crate::core::recovery::{RecoveryMarker, RecoveryStore};
use crate::core::vcs::SystemGit;
use tracing::{debug, error, warn};

/// What a branch context changed, and what it must put back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchState {
  pub repo: String,
  pub branch: String,
  pub original_branch: String,
  /// A stash entry was created on entry and must be popped on exit
  pub was_dirty: bool,
}

/// Guard holding a repository on a release branch until dropped
pub struct BranchContext<'a> {
  git: SystemGit<'a>,
  recovery: &'a RecoveryStore,
  state: BranchState,
}

impl<'a> BranchContext<'a> {
  /// Acquire: checkout, stash if dirty, pull
  ///
  /// On error the repository has already been restored.
  pub fn enter(git: SystemGit<'a>, recovery: &'a RecoveryStore, repo: &str, branch: &str) -> FleetResult<Self> {
    if let Some((marker, pending)) = recovery.pending(git.repo_path())? {
      return Err(
        GitError::RecoveryPending {
          marker,
          original_branch: pending.original_branch,
        }
        .into(),
      );
    }

    let original_branch = git.current_branch()?;
    if original_branch.is_empty() {
      return Err(
        GitError::DetachedHead {
          path: git.repo_path().to_path_buf(),
        }
        .into(),
      );
    }
    debug!("{}: user branch: {}", repo, original_branch);

    let mut ctx = Self {
      git,
      recovery,
      state: BranchState {
        repo: repo.to_string(),
        branch: branch.to_string(),
        original_branch,
        was_dirty: false,
      },
    };

    if ctx.state.original_branch != branch {
      debug!("{}: checkout branch: {}", repo, branch);
      ctx.git.checkout(branch)?;
    }

    debug!("{}: check if {} is clean", repo, branch);
    if ctx.git.is_dirty()? {
      debug!("{}: {} is dirty, stashing", repo, branch);
      ctx.stash()?;
    }

    debug!("{}: pulling {} from origin", repo, branch);
    ctx.git.pull(branch)?;

    Ok(ctx)
  }

  pub fn state(&self) -> &BranchState {
    &self.state
  }

  fn stash(&mut self) -> FleetResult<()> {
    // Marker goes first so a kill right after the stash still leaves a trace
    let marker = RecoveryMarker::new(self.git.repo_path(), &self.state.original_branch, &self.state.branch);
    if let Err(e) = self.recovery.record(&marker) {
      warn!("{}: could not write recovery marker: {}", self.state.repo, e);
    }

    match self.git.stash() {
      Ok(true) => {
        self.state.was_dirty = true;
        Ok(())
      }
      Ok(false) => {
        self.clear_marker();
        Ok(())
      }
      Err(e) => {
        self.clear_marker();
        Err(e)
      }
    }
  }

  fn clear_marker(&self) {
    if let Err(e) = self.recovery.clear(self.git.repo_path()) {
      warn!("{}: could not remove recovery marker: {}", self.state.repo, e);
    }
  }

  /// Release: checkout the original branch, pop the stash
  fn restore(&self) {
    let BranchState {
      repo,
      original_branch,
      was_dirty,
      ..
    } = &self.state;
    debug!("{}: checkout back to last user branch: {}", repo, original_branch);

    let needs_checkout = match self.git.current_branch() {
      Ok(current) => current != *original_branch,
      Err(e) => {
        warn!("{}: could not read current branch before restoring: {}", repo, e);
        true
      }
    };

    if needs_checkout && let Err(e) = self.git.checkout(original_branch) {
      error!("{}: failed to restore branch {}: {}", repo, original_branch, e);
      if *was_dirty {
        error!("{}: local changes remain stashed; restore them manually", repo);
      }
      return;
    }

    if *was_dirty {
      debug!("{}: popping stash back onto {}", repo, original_branch);
      if let Err(e) = self.git.stash_pop() {
        error!("{}: failed to pop stashed changes: {}", repo, e);
        return;
      }
      self.clear_marker();
    }
  }
}

impl Drop for BranchContext<'_> {
  fn drop(&mut self) {
    self.restore();
  }
}

/// Run `body` with `branch` checked out in the repository, then restore
pub fn with_branch<T>(
  git: SystemGit<'_>,
  recovery: &RecoveryStore,
  repo: &str,
  branch: &str,
  body: impl FnOnce(&BranchState) -> T,
) -> FleetResult<T> {
  let ctx = BranchContext::enter(git, recovery, repo, branch)?;
  Ok(body(ctx.state()))
}
