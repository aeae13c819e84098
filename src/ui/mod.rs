//! Terminal output: logging setup and progress bars

pub mod logging;
pub mod progress;
