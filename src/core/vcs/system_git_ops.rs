//! Branch and working-tree operations for SystemGit

use super::system_git::SystemGit;
use crate::core::error::FleetResult;

/// Printed by `git stash` when the tree had nothing to save
const NOTHING_TO_STASH: &str = "No local changes to save";

impl SystemGit<'_> {
  /// Checkout a branch or ref
  pub fn checkout(&self, reference: &str) -> FleetResult<()> {
    self.run_checked(&["checkout", reference])?;
    Ok(())
  }

  /// Porcelain status lines (empty when clean)
  pub fn status_porcelain(&self) -> FleetResult<String> {
    let output = self.run_checked(&["status", "--porcelain"])?;
    Ok(output.stdout)
  }

  /// Check for uncommitted changes, untracked files included
  pub fn is_dirty(&self) -> FleetResult<bool> {
    Ok(!self.status_porcelain()?.trim().is_empty())
  }

  /// Stash all local changes, untracked files included
  ///
  /// Returns whether a stash entry was created.
  pub fn stash(&self) -> FleetResult<bool> {
    let output = self.run_checked(&["stash", "push", "--include-untracked"])?;
    Ok(!output.stdout.contains(NOTHING_TO_STASH))
  }

  /// Pop the most recent stash entry
  pub fn stash_pop(&self) -> FleetResult<()> {
    self.run_checked(&["stash", "pop"])?;
    Ok(())
  }

  /// Pull a branch from origin
  pub fn pull(&self, branch: &str) -> FleetResult<()> {
    self.run_checked(&["pull", "origin", branch])?;
    Ok(())
  }

  /// `git --version`, used as a preflight probe
  pub fn version(&self) -> FleetResult<String> {
    let output = self.run_checked(&["--version"])?;
    Ok(output.stdout.trim().to_string())
  }
}
