//! In-memory fakes for unit tests
//!
//! `FakeFleet` is a [`CommandRunner`] that simulates git and release-it for a
//! set of repositories under a temporary base directory. It keeps per-repo
//! branch, working-tree and stash state, and records every invocation so
//! tests can assert on what was (and was not) run.

use crate::core::error::ProcessError;
use crate::core::process::{CommandOutput, CommandRunner, Invocation};
use crate::release::prompt::Prompter;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug, Clone, Default)]
pub struct FakeRelease {
  pub changelog: String,
  pub version: String,
  pub publish_code: i32,
  /// Branch the release tool leaves checked out after publishing
  pub publish_checkout: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeRepo {
  pub current: String,
  pub branches: Vec<String>,
  pub dirty: String,
  pub stashes: Vec<String>,
  pub releases: HashMap<String, FakeRelease>,
  pub failing_pulls: HashSet<String>,
}

pub struct FakeFleet {
  base: TempDir,
  repos: RefCell<HashMap<PathBuf, FakeRepo>>,
  calls: RefCell<Vec<Invocation>>,
  tool_installed: Cell<bool>,
}

impl FakeFleet {
  pub fn new() -> Self {
    Self {
      base: TempDir::new().expect("tempdir"),
      repos: RefCell::new(HashMap::new()),
      calls: RefCell::new(Vec::new()),
      tool_installed: Cell::new(true),
    }
  }

  pub fn base(&self) -> &Path {
    self.base.path()
  }

  pub fn path_of(&self, dir_name: &str) -> PathBuf {
    self.base.path().join(dir_name)
  }

  /// Register a repository directory with its current and known branches
  pub fn add_repo(&self, dir_name: &str, current: &str, branches: &[&str]) -> PathBuf {
    let path = self.path_of(dir_name);
    std::fs::create_dir_all(&path).expect("create repo dir");
    self.repos.borrow_mut().insert(
      path.clone(),
      FakeRepo {
        current: current.to_string(),
        branches: branches.iter().map(|b| b.to_string()).collect(),
        ..Default::default()
      },
    );
    path
  }

  pub fn set_release(&self, dir_name: &str, branch: &str, release: FakeRelease) {
    self.with_repo(dir_name, |repo| {
      repo.releases.insert(branch.to_string(), release);
    });
  }

  pub fn make_dirty(&self, dir_name: &str, porcelain: &str) {
    self.with_repo(dir_name, |repo| repo.dirty = porcelain.to_string());
  }

  pub fn fail_pull(&self, dir_name: &str, branch: &str) {
    self.with_repo(dir_name, |repo| {
      repo.failing_pulls.insert(branch.to_string());
    });
  }

  /// Lose every stash entry, as if the operator cleared them mid-run
  pub fn drop_stashes(&self, dir_name: &str) {
    self.with_repo(dir_name, |repo| repo.stashes.clear());
  }

  pub fn uninstall_tool(&self) {
    self.tool_installed.set(false);
  }

  pub fn repo(&self, dir_name: &str) -> FakeRepo {
    self.repos.borrow()[&self.path_of(dir_name)].clone()
  }

  pub fn calls(&self) -> Vec<Invocation> {
    self.calls.borrow().clone()
  }

  /// Invocations run inside the given repository directory
  pub fn calls_in(&self, dir_name: &str) -> Vec<Invocation> {
    let path = self.path_of(dir_name);
    self.calls.borrow().iter().filter(|c| c.cwd == path).cloned().collect()
  }

  /// Count invocations of `program` whose arguments start with `prefix`
  pub fn count(&self, program: &str, prefix: &[&str]) -> usize {
    self
      .calls
      .borrow()
      .iter()
      .filter(|c| {
        let args = subcommand(c);
        c.program == program && args.len() >= prefix.len() && args.iter().zip(prefix).all(|(a, p)| a == p)
      })
      .count()
  }

  fn with_repo(&self, dir_name: &str, f: impl FnOnce(&mut FakeRepo)) {
    let path = self.path_of(dir_name);
    let mut repos = self.repos.borrow_mut();
    f(repos.get_mut(&path).expect("unknown fake repo"));
  }

  fn git(repo: &mut FakeRepo, args: &[&str]) -> CommandOutput {
    match args {
      ["branch", "--show-current"] => ok(&format!("{}\n", repo.current)),
      ["checkout", target] => {
        if repo.branches.iter().any(|b| b == target) {
          repo.current = target.to_string();
          ok("")
        } else {
          fail(
            1,
            &format!("error: pathspec '{}' did not match any file(s) known to git\n", target),
          )
        }
      }
      ["status", "--porcelain"] => ok(&repo.dirty),
      ["stash", "push", "--include-untracked"] => {
        if repo.dirty.is_empty() {
          ok("No local changes to save\n")
        } else {
          repo.stashes.push(std::mem::take(&mut repo.dirty));
          ok("Saved working directory and index state WIP\n")
        }
      }
      ["stash", "pop"] => match repo.stashes.pop() {
        Some(changes) => {
          repo.dirty = changes;
          ok("")
        }
        None => fail(1, "No stash entries found.\n"),
      },
      ["pull", "origin", branch] => {
        if repo.failing_pulls.contains(*branch) {
          fail(1, &format!("fatal: couldn't find remote ref {}\n", branch))
        } else {
          ok("Already up to date.\n")
        }
      }
      _ => fail(129, &format!("unsupported fake git command: {:?}\n", args)),
    }
  }

  fn release_it(repo: &mut FakeRepo, args: &[&str]) -> CommandOutput {
    let release = repo.releases.get(&repo.current).cloned().unwrap_or_default();
    match args {
      ["--changelog"] => ok(&release.changelog),
      ["--release-version"] => ok(&format!("{}\n", release.version)),
      ["patch", "--ci"] => {
        if let Some(branch) = release.publish_checkout {
          repo.current = branch;
        }
        if release.publish_code == 0 {
          ok("🏁 Done\n")
        } else {
          fail(release.publish_code, "ERROR Remote repository rejected the push\n")
        }
      }
      _ => fail(2, &format!("unsupported fake release-it command: {:?}\n", args)),
    }
  }
}

impl CommandRunner for FakeFleet {
  fn run(&self, invocation: &Invocation) -> Result<CommandOutput, ProcessError> {
    self.calls.borrow_mut().push(invocation.clone());
    let args: Vec<&str> = subcommand(invocation).iter().map(String::as_str).collect();

    if args == ["--version"] {
      return match invocation.program.as_str() {
        "git" => Ok(ok("git version 2.45.0\n")),
        _ if self.tool_installed.get() => Ok(ok("17.11.0\n")),
        _ => Err(spawn_failure(invocation)),
      };
    }

    let mut repos = self.repos.borrow_mut();
    let Some(repo) = repos.get_mut(&invocation.cwd) else {
      return Err(spawn_failure(invocation));
    };

    match invocation.program.as_str() {
      "git" => Ok(Self::git(repo, &args)),
      _ if !self.tool_installed.get() => Err(spawn_failure(invocation)),
      _ => Ok(Self::release_it(repo, &args)),
    }
  }
}

/// Arguments with leading `-c key=value` pairs removed
fn subcommand(invocation: &Invocation) -> &[String] {
  let mut args = invocation.args.as_slice();
  while args.len() >= 2 && args[0] == "-c" {
    args = &args[2..];
  }
  args
}

fn ok(stdout: &str) -> CommandOutput {
  CommandOutput {
    code: Some(0),
    stdout: stdout.to_string(),
    stderr: String::new(),
  }
}

fn fail(code: i32, stderr: &str) -> CommandOutput {
  CommandOutput {
    code: Some(code),
    stdout: String::new(),
    stderr: stderr.to_string(),
  }
}

fn spawn_failure(invocation: &Invocation) -> ProcessError {
  ProcessError::Spawn {
    program: invocation.program.clone(),
    reason: "No such file or directory (os error 2)".to_string(),
  }
}

/// Prompter answering from a fixed script and recording what it was shown
#[derive(Default)]
pub struct ScriptedPrompter {
  answers: VecDeque<bool>,
  pub shown: Vec<String>,
  pub questions: Vec<String>,
}

impl ScriptedPrompter {
  pub fn new(answers: &[bool]) -> Self {
    Self {
      answers: answers.iter().copied().collect(),
      shown: Vec::new(),
      questions: Vec::new(),
    }
  }
}

impl Prompter for ScriptedPrompter {
  fn show(&mut self, text: &str) -> std::io::Result<()> {
    self.shown.push(text.to_string());
    Ok(())
  }

  fn confirm(&mut self, question: &str) -> std::io::Result<bool> {
    self.questions.push(question.to_string());
    self
      .answers
      .pop_front()
      .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "no scripted answer"))
  }
}
