//! Run context: everything resolved before the first repository is touched
//!
//! Built once from the command line, the config file and the environment,
//! then passed by reference to the orchestration loop.

use crate::core::config::FleetConfig;
use crate::core::error::{ConfigError, FleetResult};
use crate::core::recovery::RecoveryStore;
use crate::inventory::InventorySource;
use crate::inventory::markdown;
use crate::release::ReleaseMode;
use crate::release::tool::ReleaseTool;
use crate::utils;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Per-process timeout when neither flag nor config sets one
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 900;

/// Command-line inputs that shape a run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
  pub git_base_dir: Option<PathBuf>,
  pub dry_run: bool,
  pub yes: bool,
  /// Seconds; 0 disables the timeout
  pub timeout_secs: Option<u64>,
}

/// Resolved settings for one run
#[derive(Debug, Clone)]
pub struct RunContext {
  pub base_dir: PathBuf,
  pub mode: ReleaseMode,
  pub tool: ReleaseTool,
  pub recovery: RecoveryStore,
  pub command_timeout: Option<Duration>,
  pub inventory_source: InventorySource,
  pub released_markers: Vec<String>,
  include: HashSet<String>,
  mapping: HashMap<String, String>,
}

impl RunContext {
  /// Resolve the run settings
  ///
  /// Base directory precedence: `--git-base-dir`, then `git_base_dir` from
  /// the config, then `GIT_BASE_DIR` (passed in as `env_base_dir`).
  pub fn build(options: &RunOptions, config: &FleetConfig, env_base_dir: Option<String>) -> FleetResult<Self> {
    let base_dir = options
      .git_base_dir
      .clone()
      .or_else(|| config.base_dir())
      .or_else(|| env_base_dir.as_deref().map(utils::expand_home))
      .ok_or(ConfigError::BaseDirUnset)?;
    if !base_dir.is_dir() {
      return Err(ConfigError::BaseDirMissing { path: base_dir }.into());
    }
    debug!("Git base directory: {}", base_dir.display());

    let timeout_secs = options
      .timeout_secs
      .or(config.command_timeout_secs)
      .unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS);

    let recovery = match config.state_dir() {
      Some(dir) => RecoveryStore::new(dir.join("recovery")),
      None => RecoveryStore::disabled(),
    };

    Ok(Self {
      base_dir,
      mode: ReleaseMode::from_flags(options.dry_run, options.yes),
      tool: config.release_tool.clone(),
      recovery,
      command_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
      inventory_source: config.repositories.clone().unwrap_or_default(),
      released_markers: config
        .released_markers
        .clone()
        .unwrap_or_else(markdown::default_released_markers),
      include: config.include_repositories.iter().cloned().collect(),
      mapping: config.repositories_mapping.clone(),
    })
  }

  /// Whether the inclusion policy admits this repository (empty admits all)
  pub fn includes(&self, repo: &str) -> bool {
    self.include.is_empty() || self.include.contains(repo)
  }

  /// Local directory name for an inventory name
  pub fn local_name<'a>(&'a self, repo: &'a str) -> &'a str {
    self.mapping.get(repo).map(String::as_str).unwrap_or(repo)
  }

  /// Checkout directory for an inventory name
  pub fn repository_path(&self, repo: &str) -> PathBuf {
    crate::core::vcs::system_git::repository_path(&self.base_dir, self.local_name(repo))
  }
}
