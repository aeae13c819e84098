//! Recovery markers for stashes that have not been restored yet
//!
//! A branch context that stashes changes writes a marker before doing
//! anything else to the repository and removes it once the stash is popped
//! back. A marker that survives (restoration failed, or the process was
//! killed) makes later runs refuse to touch the repository until the
//! operator restores it by hand.

use crate::core::error::{FleetResult, ResultExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk record of an outstanding stash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryMarker {
  pub repository: PathBuf,
  pub original_branch: String,
  pub target_branch: String,
  pub created_at: DateTime<Utc>,
}

impl RecoveryMarker {
  pub fn new(repository: &Path, original_branch: &str, target_branch: &str) -> Self {
    Self {
      repository: repository.to_path_buf(),
      original_branch: original_branch.to_string(),
      target_branch: target_branch.to_string(),
      created_at: Utc::now(),
    }
  }
}

/// Directory of recovery markers, one file per repository directory
#[derive(Debug, Clone, Default)]
pub struct RecoveryStore {
  dir: Option<PathBuf>,
}

impl RecoveryStore {
  pub fn new(dir: PathBuf) -> Self {
    Self { dir: Some(dir) }
  }

  /// Store that never writes markers
  pub fn disabled() -> Self {
    Self { dir: None }
  }

  pub fn marker_path(&self, repo_path: &Path) -> Option<PathBuf> {
    let dir = self.dir.as_ref()?;
    let name = repo_path.file_name()?.to_string_lossy();
    Some(dir.join(format!("{}.json", name)))
  }

  /// Marker left behind for this repository, if any
  pub fn pending(&self, repo_path: &Path) -> FleetResult<Option<(PathBuf, RecoveryMarker)>> {
    let Some(path) = self.marker_path(repo_path) else {
      return Ok(None);
    };
    if !path.exists() {
      return Ok(None);
    }

    let content =
      fs::read_to_string(&path).with_context(|| format!("Failed to read recovery marker {}", path.display()))?;
    let marker: RecoveryMarker = serde_json::from_str(&content)
      .with_context(|| format!("Failed to parse recovery marker {}", path.display()))?;
    Ok(Some((path, marker)))
  }

  pub fn record(&self, marker: &RecoveryMarker) -> FleetResult<()> {
    let Some(path) = self.marker_path(&marker.repository) else {
      return Ok(());
    };
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(marker)?;
    fs::write(&path, content).with_context(|| format!("Failed to write recovery marker {}", path.display()))?;
    Ok(())
  }

  pub fn clear(&self, repo_path: &Path) -> FleetResult<()> {
    let Some(path) = self.marker_path(repo_path) else {
      return Ok(());
    };
    if path.exists() {
      fs::remove_file(&path).with_context(|| format!("Failed to remove recovery marker {}", path.display()))?;
    }
    Ok(())
  }
}
