use crate::core::error::{ConfigError, FleetResult, ResultExt};
use crate::inventory::InventorySource;
use crate::release::tool::ReleaseTool;
use crate::utils;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name under `~/.config` and the platform data directory
pub const APP_DIR: &str = "release-it-check";

/// Configuration for release-it-check
///
/// Read from `~/.config/release-it-check/config.yaml` when present, or from
/// the file given with `--config`. YAML is the primary format; a `.toml`
/// extension selects TOML.
///
/// # Example
///
/// ```yaml
/// git_base_dir: ~/git
/// repositories-mapping:
///   openshift-python-wrapper: wrapper
/// include-repositories:
///   - openshift-python-wrapper
/// repositories:
///   https://github.com/org/openshift-python-wrapper: [main, v4.15]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FleetConfig {
  /// Root directory holding one checkout per repository
  #[serde(default, rename = "git_base_dir")]
  pub git_base_dir: Option<String>,

  /// Inventory name -> local directory name
  #[serde(default)]
  pub repositories_mapping: HashMap<String, String>,

  /// Only these repositories are processed (empty = all)
  #[serde(default)]
  pub include_repositories: Vec<String>,

  /// Inventory URL, or an explicit repository -> branches mapping
  #[serde(default)]
  pub repositories: Option<InventorySource>,

  /// External release tool commands
  #[serde(default)]
  pub release_tool: ReleaseTool,

  /// Status markers that flag a listing row as released
  #[serde(default)]
  pub released_markers: Option<Vec<String>>,

  /// Per-process timeout
  #[serde(default)]
  pub command_timeout_secs: Option<u64>,

  /// Where recovery markers are kept
  #[serde(default)]
  pub state_dir: Option<String>,

  /// File this configuration was read from
  #[serde(skip)]
  pub source: Option<PathBuf>,
}

impl FleetConfig {
  /// `~/.config/release-it-check/config.yaml`
  pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join(APP_DIR).join("config.yaml"))
  }

  /// Load the explicit config file, or the default one if it exists
  ///
  /// An explicit path must exist. A missing default file yields the
  /// default configuration.
  pub fn resolve(explicit: Option<&Path>) -> FleetResult<Self> {
    if let Some(path) = explicit {
      if !path.is_file() {
        return Err(ConfigError::NotFound { path: path.to_path_buf() }.into());
      }
      return Self::load(path);
    }

    match Self::default_path() {
      Some(path) if path.is_file() => {
        debug!("Found config file: {}", path.display());
        Self::load(&path)
      }
      Some(path) => {
        debug!("Config file {} does not exist", path.display());
        Ok(Self::default())
      }
      None => Ok(Self::default()),
    }
  }

  /// Load config from a file, expanding `${VAR}` references first
  pub fn load(path: &Path) -> FleetResult<Self> {
    let raw =
      fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;
    let mut config = Self::parse(&raw, path)?;
    config.source = Some(path.to_path_buf());
    debug!("Config data: {:?}", config);
    Ok(config)
  }

  fn parse(raw: &str, path: &Path) -> FleetResult<Self> {
    let content = utils::expand_env_vars(raw);
    if content.trim().is_empty() {
      return Err(ConfigError::Empty { path: path.to_path_buf() }.into());
    }

    let parse_error = |reason: String| ConfigError::Parse {
      path: path.to_path_buf(),
      reason,
    };

    let config = match path.extension().and_then(|ext| ext.to_str()) {
      Some("toml") => toml_edit::de::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
      _ => serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
    };
    Ok(config)
  }

  /// Base directory from the config, with `~/` expanded
  pub fn base_dir(&self) -> Option<PathBuf> {
    self.git_base_dir.as_deref().map(utils::expand_home)
  }

  /// State directory from the config, or the platform default
  pub fn state_dir(&self) -> Option<PathBuf> {
    match &self.state_dir {
      Some(dir) => Some(utils::expand_home(dir)),
      None => dirs::data_local_dir().map(|dir| dir.join(APP_DIR)),
    }
  }
}
