//! Integration tests: the compiled binary against real temporary git repositories
#![cfg(unix)]

mod test_config;
mod test_logging;
mod test_restore;
