//! Progress bars for the repository loop
//!
//! Uses `linya`: one overall bar over repositories, plus one bar per
//! repository over its branches. Bars draw to stderr.

use linya::{Bar, Progress};

pub struct FleetProgress {
  progress: Progress,
  overall: Bar,
  /// Branch bar for the repository in progress, with its total
  current: Option<(Bar, usize)>,
}

impl FleetProgress {
  pub fn new(repositories: usize) -> Self {
    let mut progress = Progress::new();
    let overall = progress.bar(repositories.max(1), "Checking for releases");
    Self {
      progress,
      overall,
      current: None,
    }
  }

  /// Open the branch bar for a repository
  pub fn start_repo(&mut self, name: &str, branches: usize) {
    let total = branches.max(1);
    let bar = self.progress.bar(total, format!("Repository {}", name));
    self.current = Some((bar, total));
  }

  /// One branch of the current repository is done
  pub fn branch_done(&mut self) {
    if let Some((bar, _)) = &self.current {
      self.progress.inc_and_draw(bar, 1);
    }
  }

  /// Fill the current repository bar and advance the overall bar
  pub fn repo_done(&mut self) {
    if let Some((bar, total)) = self.current.take() {
      self.progress.set_and_draw(&bar, total);
    }
    self.progress.inc_and_draw(&self.overall, 1);
  }
}
