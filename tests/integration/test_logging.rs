//! Diagnostics on stderr at each verbosity

use crate::helpers::{BranchSpec, TestFleet, stderr};
use anyhow::Result;

#[test]
fn test_verbose_logs_each_invocation_before_running_it() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo(
    "repo-a",
    &[BranchSpec::clean("main"), BranchSpec::pending("release-1", "1.3.9")],
  )?;
  let config = fleet.write_config(&[("repo-a", &["release-1"])], "")?;

  let output = fleet.run(&["--yes", "-v", "--no-progress", "--config", &config.to_string_lossy()])?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));

  let err = stderr(&output);
  let lines: Vec<&str> = err.lines().collect();
  let position = |needle: &dyn Fn(&str) -> bool| lines.iter().position(|l| needle(l));

  let checkout = position(&|l| l.contains("running git") && l.contains("checkout release-1"));
  let stash_check = position(&|l| l.contains("running git") && l.contains("status --porcelain"));
  let changelog = position(&|l| l.contains("running release-it --changelog"));
  let publish = position(&|l| l.contains("running release-it patch --ci"));
  assert!(checkout.is_some(), "stderr: {}", err);
  assert!(publish.is_some(), "stderr: {}", err);
  assert!(checkout < stash_check && stash_check < changelog && changelog < publish);
  assert!(err.contains("Using config file"));

  assert_eq!(fleet.publishes()?, vec!["repo-a release-1 patch --ci"]);

  Ok(())
}

#[test]
fn test_default_run_keeps_stderr_quiet() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_repo("repo-a", &[BranchSpec::pending("main", "1.4.0")])?;
  let config = fleet.write_config(&[("repo-a", &["main"]), ("repo-missing", &["main"])], "")?;

  let output = fleet.run(&["--dry-run", "--config", &config.to_string_lossy()])?;
  assert!(output.status.success());

  let err = stderr(&output);
  assert!(err.trim().is_empty(), "unexpected diagnostics: {}", err);
  assert!(crate::helpers::stdout(&output).contains("repository directory not found"));

  Ok(())
}
