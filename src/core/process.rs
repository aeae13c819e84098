//! External process execution
//!
//! Every git and release-tool call goes through [`CommandRunner`]. A non-zero
//! exit is not an error here: callers inspect [`CommandOutput`]. Only a
//! failure to start the program, or a timeout, is reported as `Err`.
//!
//! Commands are argument vectors with an explicit working directory. Nothing
//! is ever passed through a shell, and the process-wide current directory is
//! never changed.

use crate::core::error::ProcessError;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Environment variables passed through to isolated invocations
const PASSTHROUGH_ENV: &[&str] = &["PATH", "HOME", "SSH_AUTH_SOCK", "GIT_SSH_COMMAND", "GIT_ASKPASS"];

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A single external command: program, arguments and working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: PathBuf,
  /// Clear the environment except for a small whitelist
  pub isolated: bool,
  pub env: Vec<(String, String)>,
}

impl Invocation {
  pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: cwd.to_path_buf(),
      isolated: false,
      env: Vec::new(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.push((key.into(), value.into()));
    self
  }

  pub fn isolated(mut self) -> Self {
    self.isolated = true;
    self
  }

  /// Human-readable form for logs and error messages
  pub fn command_line(&self) -> String {
    if self.args.is_empty() {
      self.program.clone()
    } else {
      format!("{} {}", self.program, self.args.join(" "))
    }
  }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  /// Exit code; `None` when the process was terminated by a signal
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }

  /// Best single-line description of a failure
  pub fn failure_summary(&self) -> String {
    let detail = if self.stderr.trim().is_empty() {
      self.stdout.trim()
    } else {
      self.stderr.trim()
    };
    match (self.code, detail.is_empty()) {
      (Some(code), true) => format!("exit code {}", code),
      (Some(code), false) => format!("exit code {}: {}", code, detail),
      (None, true) => "terminated by signal".to_string(),
      (None, false) => format!("terminated by signal: {}", detail),
    }
  }
}

/// Runs external commands
pub trait CommandRunner {
  fn run(&self, invocation: &Invocation) -> Result<CommandOutput, ProcessError>;
}

/// Runner backed by `std::process`, with an optional timeout per command
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
  timeout: Option<Duration>,
}

impl SystemRunner {
  pub fn new(timeout: Option<Duration>) -> Self {
    Self { timeout }
  }

  fn command(invocation: &Invocation) -> Command {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args).current_dir(&invocation.cwd);

    if invocation.isolated {
      cmd.env_clear();
      for key in PASSTHROUGH_ENV {
        if let Ok(value) = std::env::var(key) {
          cmd.env(key, value);
        }
      }
    }
    for (key, value) in &invocation.env {
      cmd.env(key, value);
    }

    // Never let a child wait on our terminal
    cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
    cmd
  }

  fn wait(&self, child: &mut Child, invocation: &Invocation) -> Result<Option<i32>, ProcessError> {
    let Some(limit) = self.timeout else {
      return child
        .wait()
        .map(|status| status.code())
        .map_err(|e| spawn_error(invocation, e));
    };

    let deadline = Instant::now() + limit;
    loop {
      match child.try_wait() {
        Ok(Some(status)) => return Ok(status.code()),
        Ok(None) if Instant::now() >= deadline => {
          let _ = child.kill();
          let _ = child.wait();
          return Err(ProcessError::TimedOut {
            command: invocation.command_line(),
            secs: limit.as_secs(),
          });
        }
        Ok(None) => thread::sleep(POLL_INTERVAL),
        Err(e) => return Err(spawn_error(invocation, e)),
      }
    }
  }
}

impl CommandRunner for SystemRunner {
  fn run(&self, invocation: &Invocation) -> Result<CommandOutput, ProcessError> {
    debug!(cwd = %invocation.cwd.display(), "running {}", invocation.command_line());

    let mut child = Self::command(invocation)
      .spawn()
      .map_err(|e| spawn_error(invocation, e))?;

    // Drain both pipes concurrently so a chatty child cannot block on a full pipe
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let code = self.wait(&mut child, invocation)?;

    let output = CommandOutput {
      code,
      stdout: stdout.map(collect).unwrap_or_default(),
      stderr: stderr.map(collect).unwrap_or_default(),
    };
    trace!(
      code = ?output.code,
      stdout = %output.stdout.trim_end(),
      stderr = %output.stderr.trim_end(),
      "finished {}",
      invocation.command_line()
    );
    Ok(output)
  }
}

fn spawn_error(invocation: &Invocation, err: std::io::Error) -> ProcessError {
  ProcessError::Spawn {
    program: invocation.program.clone(),
    reason: err.to_string(),
  }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
  thread::spawn(move || {
    let mut buf = Vec::new();
    let _ = pipe.read_to_end(&mut buf);
    buf
  })
}

fn collect(handle: thread::JoinHandle<Vec<u8>>) -> String {
  handle
    .join()
    .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    .unwrap_or_default()
}
