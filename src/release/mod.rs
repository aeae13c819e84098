//! Per-branch release decision and execution
//!
//! - **tool**: how the external release tool is invoked
//! - **executor**: changelog -> version -> confirm -> publish, for one branch
//! - **prompt**: operator confirmation

pub mod executor;
pub mod prompt;
pub mod tool;

use serde::Serialize;

pub use executor::ReleaseStep;

/// How publishing is gated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseMode {
  /// Compute changelog and version only
  DryRun,
  /// Publish without asking
  AutoYes,
  /// Ask before every publish
  Interactive,
}

impl ReleaseMode {
  /// Dry run wins over `--yes`
  pub fn from_flags(dry_run: bool, yes: bool) -> Self {
    match (dry_run, yes) {
      (true, _) => ReleaseMode::DryRun,
      (false, true) => ReleaseMode::AutoYes,
      (false, false) => ReleaseMode::Interactive,
    }
  }
}

/// Result of processing one (repository, branch) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReleaseOutcome {
  /// Nothing unreleased on the branch
  NoChanges,
  DryRun {
    version: String,
    changelog: String,
  },
  Declined {
    version: String,
    changelog: String,
  },
  Released {
    version: String,
    changelog: String,
  },
  /// Publish was attempted and failed
  Failed {
    version: String,
    changelog: String,
    error: String,
  },
  /// The branch could not be examined (context or query failure)
  Skipped {
    reason: String,
  },
}

impl ReleaseOutcome {
  pub fn skipped(reason: impl Into<String>) -> Self {
    ReleaseOutcome::Skipped { reason: reason.into() }
  }

  pub fn version(&self) -> Option<&str> {
    match self {
      ReleaseOutcome::DryRun { version, .. }
      | ReleaseOutcome::Declined { version, .. }
      | ReleaseOutcome::Released { version, .. }
      | ReleaseOutcome::Failed { version, .. } => Some(version),
      ReleaseOutcome::NoChanges | ReleaseOutcome::Skipped { .. } => None,
    }
  }

  pub fn changelog(&self) -> Option<&str> {
    match self {
      ReleaseOutcome::DryRun { changelog, .. }
      | ReleaseOutcome::Declined { changelog, .. }
      | ReleaseOutcome::Released { changelog, .. }
      | ReleaseOutcome::Failed { changelog, .. } => Some(changelog),
      ReleaseOutcome::NoChanges | ReleaseOutcome::Skipped { .. } => None,
    }
  }
}
