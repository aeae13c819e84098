//! Small string and path helpers shared across modules

use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::warn;

static ENV_REF: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?:!ENV\s+)?\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"));

/// Repository name from an inventory key
///
/// Keys may be plain names, URLs or SSH remotes; the name is the final path
/// segment without a trailing `/` or `.git`:
/// - `https://github.com/org/repo-a` -> `repo-a`
/// - `git@github.com:org/repo-a.git` -> `repo-a`
/// - `repo-a` -> `repo-a`
pub fn repo_name_from_key(key: &str) -> &str {
  let trimmed = key.trim().trim_end_matches('/');
  let last = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
  last.strip_suffix(".git").unwrap_or(last)
}

/// Expand a leading `~/` (or a lone `~`) to the home directory
pub fn expand_home(path: &str) -> PathBuf {
  match (path, dirs::home_dir()) {
    ("~", Some(home)) => home,
    (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
    (p, _) => PathBuf::from(p),
  }
}

/// Replace `${VAR}` (optionally tagged `!ENV`) with the variable's value
///
/// Unset variables are left untouched and reported once each.
pub fn expand_env_vars(text: &str) -> String {
  ENV_REF
    .replace_all(text, |caps: &regex::Captures| {
      let name = &caps[1];
      match std::env::var(name) {
        Ok(value) => value,
        Err(_) => {
          warn!("Environment variable {} is not set; leaving reference as-is", name);
          format!("${{{}}}", name)
        }
      }
    })
    .into_owned()
}
