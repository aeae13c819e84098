//! Lenient parser for the markdown inventory listing
//!
//! Rows look like:
//!
//! ```text
//! | [repo-a](https://github.com/org/repo-a) | ✔ | :heavy_check_mark: | `main` `release-1` |
//! ```
//!
//! Field 0 holds the linked name, field 2 the released marker and field 3 the
//! backtick-quoted branches. Anything that does not fit is dropped.

use super::Inventory;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace};

static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[.*\]\(.*\)").expect("valid regex"));
static NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").expect("valid regex"));

const NAME_FIELD: usize = 0;
const RELEASED_FIELD: usize = 2;
const BRANCHES_FIELD: usize = 3;

/// Markers accepted when the config does not list its own
pub fn default_released_markers() -> Vec<String> {
  vec![":heavy_check_mark:".to_string(), "✔".to_string()]
}

/// Parse a listing into an inventory, keeping only released rows
pub fn parse_listing(text: &str, released_markers: &[String]) -> Inventory {
  let mut inventory = Inventory::default();

  for line in text.lines() {
    if !LINK.is_match(line) {
      continue;
    }

    // Blank cells keep their position; only the outer pipes yield nothing
    let fields: Vec<&str> = line.split('|').filter(|f| !f.is_empty()).map(str::trim).collect();
    if fields.len() <= BRANCHES_FIELD {
      trace!("Skipping short row: {}", line);
      continue;
    }

    if !released_markers.iter().any(|m| fields[RELEASED_FIELD].contains(m.as_str())) {
      trace!("Skipping unreleased row: {}", line);
      continue;
    }

    let Some(name) = NAME.captures(fields[NAME_FIELD]).map(|c| c[1].trim().to_string()) else {
      trace!("Skipping row without a linked name: {}", line);
      continue;
    };
    if name.is_empty() {
      continue;
    }

    let branches: Vec<String> = fields[BRANCHES_FIELD]
      .split_whitespace()
      .map(|b| b.trim_matches('`'))
      .filter(|b| !b.is_empty())
      .map(str::to_string)
      .collect();

    debug!("Found {} with branches {:?}", name, branches);
    inventory.insert(name, branches);
  }

  inventory
}
