//! Error types for release-it-check with contextual messages and exit codes
//!
//! Every fatal failure of a run is a `FleetError`. Each category maps to an
//! exit code and, where it helps, a suggestion printed after the error.
//! Per-branch failures never become a `FleetError` at the top level; the
//! orchestration loop turns them into report rows instead.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for release-it-check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, base directory, invalid args)
  User = 1,
  /// System error (git, network, missing tools, I/O)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for release-it-check
#[derive(Debug)]
pub enum FleetError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Inventory resolution errors
  Inventory(InventoryError),

  /// External process errors (spawn failures, timeouts)
  Process(ProcessError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl FleetError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    FleetError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      FleetError::Message { message, context, help } => FleetError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      FleetError::Io(err) => FleetError::Message {
        message: ctx_str,
        context: Some(err.to_string()),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      FleetError::Config(_) => ExitCode::User,
      FleetError::Git(_) => ExitCode::System,
      FleetError::Inventory(_) => ExitCode::System,
      FleetError::Process(_) => ExitCode::System,
      FleetError::Io(_) => ExitCode::System,
      FleetError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      FleetError::Config(e) => e.help_message(),
      FleetError::Git(e) => e.help_message(),
      FleetError::Inventory(e) => e.help_message(),
      FleetError::Process(e) => e.help_message(),
      FleetError::Message { help, .. } => help.clone(),
      FleetError::Io(_) => None,
    }
  }
}

impl fmt::Display for FleetError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FleetError::Config(e) => write!(f, "{}", e),
      FleetError::Git(e) => write!(f, "{}", e),
      FleetError::Inventory(e) => write!(f, "{}", e),
      FleetError::Process(e) => write!(f, "{}", e),
      FleetError::Io(e) => write!(f, "I/O error: {}", e),
      FleetError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for FleetError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      FleetError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for FleetError {
  fn from(err: io::Error) -> Self {
    FleetError::Io(err)
  }
}

impl From<serde_json::Error> for FleetError {
  fn from(err: serde_json::Error) -> Self {
    FleetError::message(format!("JSON error: {}", err))
  }
}

impl From<ConfigError> for FleetError {
  fn from(err: ConfigError) -> Self {
    FleetError::Config(err)
  }
}

impl From<GitError> for FleetError {
  fn from(err: GitError) -> Self {
    FleetError::Git(err)
  }
}

impl From<InventoryError> for FleetError {
  fn from(err: InventoryError) -> Self {
    FleetError::Inventory(err)
  }
}

impl From<ProcessError> for FleetError {
  fn from(err: ProcessError) -> Self {
    FleetError::Process(err)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// A config file was named explicitly but does not exist
  NotFound { path: PathBuf },

  /// Config file could not be parsed
  Parse { path: PathBuf, reason: String },

  /// Config file parsed to nothing
  Empty { path: PathBuf },

  /// No base directory from flag, config or environment
  BaseDirUnset,

  /// Base directory does not exist on disk
  BaseDirMissing { path: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Check the path passed to --config.".to_string()),
      ConfigError::Parse { .. } | ConfigError::Empty { .. } => Some(
        "Recognized keys: git_base_dir, repositories, repositories-mapping, include-repositories, release-tool."
          .to_string(),
      ),
      ConfigError::BaseDirUnset => Some(
        "Pass --git-base-dir, set `git_base_dir` in the config file, or export GIT_BASE_DIR.".to_string(),
      ),
      ConfigError::BaseDirMissing { .. } => {
        Some("The base directory must contain one checkout per repository.".to_string())
      }
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => write!(f, "Config file not found: {}", path.display()),
      ConfigError::Parse { path, reason } => {
        write!(f, "Failed to parse config file {}: {}", path.display(), reason)
      }
      ConfigError::Empty { path } => write!(f, "Config file {} is empty", path.display()),
      ConfigError::BaseDirUnset => write!(f, "Git base directory is not set"),
      ConfigError::BaseDirMissing { path } => {
        write!(f, "Git base directory {} does not exist", path.display())
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command exited non-zero
  CommandFailed { command: String, stderr: String },

  /// Repository has no current branch
  DetachedHead { path: PathBuf },

  /// A previous run left stashed changes behind
  RecoveryPending { marker: PathBuf, original_branch: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::CommandFailed { stderr, .. } => {
        if stderr.contains("would be overwritten") {
          Some("Local changes conflict with the target branch. Commit or stash them first.".to_string())
        } else if stderr.contains("did not match any file") || stderr.contains("pathspec") {
          Some("The branch does not exist locally or on origin. Check the inventory.".to_string())
        } else {
          None
        }
      }
      GitError::DetachedHead { .. } => Some("Check out a branch before running release-it-check.".to_string()),
      GitError::RecoveryPending {
        marker,
        original_branch,
      } => Some(format!(
        "Run `git checkout {}` and `git stash pop` in the repository, then delete {}",
        original_branch,
        marker.display()
      )),
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}", command)?;
        let stderr = stderr.trim();
        if !stderr.is_empty() {
          write!(f, "\n{}", stderr)?;
        }
        Ok(())
      }
      GitError::DetachedHead { path } => {
        write!(f, "Repository {} is in detached HEAD state", path.display())
      }
      GitError::RecoveryPending { marker, .. } => {
        write!(f, "Unrestored stash from a previous run (marker {})", marker.display())
      }
    }
  }
}

/// Inventory resolution errors
#[derive(Debug)]
pub enum InventoryError {
  /// Request could not be completed
  Fetch { url: String, reason: String },

  /// Server answered with a non-success status
  Status { url: String, status: u16 },
}

impl InventoryError {
  fn help_message(&self) -> Option<String> {
    Some("Check network access, or set `repositories` to an explicit mapping in the config file.".to_string())
  }
}

impl fmt::Display for InventoryError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      InventoryError::Fetch { url, reason } => write!(f, "Failed to fetch inventory {}: {}", url, reason),
      InventoryError::Status { url, status } => {
        write!(f, "Failed to fetch inventory {}: HTTP {}", url, status)
      }
    }
  }
}

/// External process errors
#[derive(Debug)]
pub enum ProcessError {
  /// Program could not be started
  Spawn { program: String, reason: String },

  /// Program exceeded the configured timeout and was killed
  TimedOut { command: String, secs: u64 },

  /// Program ran but exited unsuccessfully
  Failed { command: String, detail: String },

  /// Program is not usable (preflight)
  Unavailable { program: String, stderr: String },
}

impl ProcessError {
  fn help_message(&self) -> Option<String> {
    match self {
      ProcessError::Spawn { program, .. } | ProcessError::Unavailable { program, .. } => Some(format!(
        "Make sure `{}` is installed and on PATH (or set release-tool.command in the config).",
        program
      )),
      ProcessError::TimedOut { .. } => Some("Raise the limit with --timeout or command-timeout-secs.".to_string()),
      ProcessError::Failed { .. } => None,
    }
  }
}

impl fmt::Display for ProcessError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ProcessError::Spawn { program, reason } => write!(f, "Failed to run {}: {}", program, reason),
      ProcessError::TimedOut { command, secs } => write!(f, "{} timed out after {}s", command, secs),
      ProcessError::Failed { command, detail } => write!(f, "{} failed ({})", command, detail),
      ProcessError::Unavailable { program, stderr } => {
        write!(f, "{} is not usable", program)?;
        let stderr = stderr.trim();
        if !stderr.is_empty() {
          write!(f, ": {}", stderr)?;
        }
        Ok(())
      }
    }
  }
}

/// Result type alias for release-it-check
pub type FleetResult<T> = Result<T, FleetError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> FleetResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<FleetError>,
{
  fn with_context<F>(self, f: F) -> FleetResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &FleetError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
