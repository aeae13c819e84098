//! Integration tests for branch and working-tree restoration

use crate::helpers::{BranchSpec, TestFleet};
use anyhow::Result;

#[test]
fn test_dirty_feature_branch_is_restored() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo(
    "repo-a",
    &[BranchSpec::pending("main", "1.4.0"), BranchSpec::pending("release-1", "1.3.9")],
  )?;
  fleet.start_branch("repo-a", "feature")?;
  fleet.make_dirty("repo-a")?;
  let before = fleet.status("repo-a")?;
  assert!(before.contains("?? notes.txt"));
  let config = fleet.write_config(&[("repo-a", &["main", "release-1"])], "")?;

  let output = fleet.run(&["--yes", "--no-progress", "--config", &config.to_string_lossy()])?;
  assert!(output.status.success(), "stderr: {}", crate::helpers::stderr(&output));

  assert_eq!(fleet.publishes()?.len(), 2);
  assert_eq!(fleet.current_branch("repo-a")?, "feature");
  assert_eq!(fleet.status("repo-a")?, before);
  assert_eq!(fleet.stash_count("repo-a")?, 0);
  assert!(!fleet.state.join("recovery").join("repo-a.json").exists());

  Ok(())
}

#[test]
fn test_unknown_branch_is_skipped_and_restored() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo("repo-a", &[BranchSpec::pending("main", "1.4.0")])?;
  fleet.start_branch("repo-a", "feature")?;
  let config = fleet.write_config(&[("repo-a", &["release-9", "main"])], "")?;

  let output = fleet.run(&["--dry-run", "--no-progress", "--config", &config.to_string_lossy()])?;
  assert!(output.status.success());

  let out = crate::helpers::stdout(&output);
  assert!(out.contains("Skipped"));
  assert!(out.contains("Dry Run"), "the next branch is still processed");
  assert_eq!(fleet.current_branch("repo-a")?, "feature");

  Ok(())
}

#[test]
fn test_pending_recovery_marker_blocks_repository() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo("repo-a", &[BranchSpec::pending("main", "1.4.0")])?;
  let marker_dir = fleet.state.join("recovery");
  std::fs::create_dir_all(&marker_dir)?;
  std::fs::write(
    marker_dir.join("repo-a.json"),
    format!(
      r#"{{"repository":"{}","original_branch":"feature","target_branch":"main","created_at":"2026-01-05T10:00:00Z"}}"#,
      fleet.repo_path("repo-a").display()
    ),
  )?;
  let config = fleet.write_config(&[("repo-a", &["main"])], "")?;

  let output = fleet.run(&["--yes", "--no-progress", "--config", &config.to_string_lossy()])?;
  assert!(output.status.success());

  assert!(fleet.release_log()?.iter().all(|line| !line.starts_with("repo-a ")));
  let err = crate::helpers::stderr(&output);
  assert!(err.contains("git stash pop"));
  assert!(crate::helpers::stdout(&output).contains("1 skipped"));

  Ok(())
}
