//! Integration tests for configuration and fatal errors

use crate::helpers::{BranchSpec, TestFleet, stderr};
use anyhow::Result;

#[test]
fn test_missing_base_dir_exits_1() -> Result<()> {
  let fleet = TestFleet::new()?;

  let output = fleet.run(&["--dry-run", "--git-base-dir", "/definitely/not/a/base/dir"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("does not exist"));

  Ok(())
}

#[test]
fn test_unset_base_dir_exits_1() -> Result<()> {
  let fleet = TestFleet::new()?;

  let output = fleet.run(&["--dry-run"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Git base directory is not set"));

  Ok(())
}

#[test]
fn test_unparseable_config_exits_1() -> Result<()> {
  let fleet = TestFleet::new()?;
  let config = fleet.base.join("broken.yaml");
  std::fs::write(&config, "include-repositories: {unclosed: [\n")?;

  let output = fleet.run(&["--config", &config.to_string_lossy()])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Failed to parse config file"));

  Ok(())
}

#[test]
fn test_missing_explicit_config_exits_1() -> Result<()> {
  let fleet = TestFleet::new()?;

  let output = fleet.run(&["--config", "/definitely/not/here.yaml"])?;
  assert_eq!(output.status.code(), Some(1));

  Ok(())
}

#[test]
fn test_default_config_location_is_used() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo("repo-a", &[BranchSpec::pending("main", "0.9.0")])?;
  let written = fleet.write_config(&[("repo-a", &["main"])], "")?;
  let default_dir = fleet.home.join(".config").join("release-it-check");
  std::fs::create_dir_all(&default_dir)?;
  std::fs::copy(&written, default_dir.join("config.yaml"))?;

  let output = fleet.run(&["--dry-run", "--no-progress"])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(crate::helpers::stdout(&output).contains("0.9.0"));

  Ok(())
}

#[test]
fn test_inventory_fetch_failure_is_fatal() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo("repo-a", &[BranchSpec::pending("main", "1.0.0")])?;
  let config = fleet.base.join("url.yaml");
  std::fs::write(
    &config,
    format!(
      "git_base_dir: {}\nrepositories: http://127.0.0.1:9/REPOS_INVENTORY.md\n",
      fleet.base.display()
    ),
  )?;

  let output = fleet.run(&["--yes", "--config", &config.to_string_lossy()])?;
  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("Failed to fetch inventory"));
  assert!(fleet.release_log()?.iter().all(|line| !line.starts_with("repo-a ")));

  Ok(())
}

#[test]
fn test_missing_release_tool_is_fatal() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo("repo-a", &[BranchSpec::pending("main", "1.0.0")])?;
  let config = fleet.write_config(
    &[("repo-a", &["main"])],
    "release-tool:\n  command: definitely-not-release-it\n",
  )?;

  let output = fleet.run(&["--yes", "--config", &config.to_string_lossy()])?;
  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("definitely-not-release-it"));

  Ok(())
}
