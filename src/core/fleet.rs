//! Orchestration loop over the inventory
//!
//! Strictly sequential: one repository, one branch at a time, in inventory
//! order. Per-branch failures become report rows; nothing in here aborts
//! the run.

use crate::core::branch::with_branch;
use crate::core::context::RunContext;
use crate::core::error::{FleetError, GitError};
use crate::core::process::CommandRunner;
use crate::core::vcs::SystemGit;
use crate::inventory::{Inventory, RepositoryEntry};
use crate::release::prompt::Prompter;
use crate::release::{ReleaseOutcome, ReleaseStep};
use crate::report::Report;
use crate::ui::progress::FleetProgress;
use tracing::{debug, info, warn};

pub const MISSING_DIRECTORY: &str = "repository directory not found";

pub struct Fleet<'a> {
  runner: &'a dyn CommandRunner,
  ctx: &'a RunContext,
  progress: Option<FleetProgress>,
}

impl<'a> Fleet<'a> {
  pub fn new(runner: &'a dyn CommandRunner, ctx: &'a RunContext) -> Self {
    Self {
      runner,
      ctx,
      progress: None,
    }
  }

  pub fn with_progress(mut self, progress: FleetProgress) -> Self {
    self.progress = Some(progress);
    self
  }

  /// Process every repository in the inventory and collect the report
  pub fn run(&mut self, inventory: &Inventory, prompter: &mut dyn Prompter) -> Report {
    let mut report = Report::new();
    for entry in inventory.iter() {
      self.process_repo(entry, prompter, &mut report);
      if let Some(progress) = &mut self.progress {
        progress.repo_done();
      }
    }
    report
  }

  fn process_repo(&mut self, entry: &RepositoryEntry, prompter: &mut dyn Prompter, report: &mut Report) {
    let ctx = self.ctx;
    let name = entry.name.as_str();
    debug!("Working on {} with branches {:?}", name, entry.branches);

    if let Some(progress) = &mut self.progress {
      progress.start_repo(name, entry.branches.len());
    }

    if !ctx.includes(name) {
      debug!("{} is not in include-repositories, skipping", name);
      return;
    }

    let local = ctx.local_name(name);
    let path = ctx.repository_path(name);
    if !path.is_dir() {
      debug!("{}: {} ({})", name, MISSING_DIRECTORY, path.display());
      for branch in &entry.branches {
        report.push(name, branch, ReleaseOutcome::skipped(MISSING_DIRECTORY));
        self.branch_done();
      }
      return;
    }
    debug!("{}: working in {}", name, path.display());

    let git = SystemGit::new(self.runner, &path);
    let step = ReleaseStep::new(self.runner, &ctx.tool, ctx.mode);

    for branch in &entry.branches {
      let result = with_branch(git, &ctx.recovery, local, branch, |_| {
        step.execute(&path, name, branch, &mut *prompter)
      });

      let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
          debug!("{}: skipping branch {}: {}", name, branch, e);
          if let FleetError::Git(GitError::RecoveryPending { .. }) = &e
            && let Some(help) = e.help_message()
          {
            warn!("{}: {}", name, help);
          }
          ReleaseOutcome::skipped(e.to_string())
        }
      };

      if let ReleaseOutcome::Released { version, .. } = &outcome {
        info!("{} {} released from {}", name, version, branch);
      }
      report.push(name, branch, outcome);
      self.branch_done();
    }
  }

  fn branch_done(&mut self) {
    if let Some(progress) = &mut self.progress {
      progress.branch_done();
    }
  }
}
