//! Log subscriber setup
//!
//! Diagnostics go to stderr so the report on stdout stays clean.

use std::io::IsTerminal;
use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Level for the `-v/--verbose` and `--debug` flags
pub fn level_for(verbose: bool, debug: bool) -> Level {
  match (verbose, debug) {
    (_, true) => Level::TRACE,
    (true, false) => Level::DEBUG,
    (false, false) => Level::WARN,
  }
}

/// Install the global subscriber; `RUST_LOG` takes precedence over `level`
pub fn init_logging(level: Level) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

  tracing_subscriber::registry()
    .with(env_filter)
    .with(
      fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time(),
    )
    .try_init()
    .ok();
}
