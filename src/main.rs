mod commands;
mod core;
mod inventory;
mod release;
mod report;
#[cfg(test)]
mod testing;
mod ui;
mod utils;

use clap::Parser;
use commands::ReleaseArgs;
use crate::core::context::RunOptions;
use crate::core::error::{FleetError, print_error};
use std::path::PathBuf;

/// Check inventory repositories for unreleased changes and release them with release-it
#[derive(Parser)]
#[command(name = "release-it-check")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Make release for all repositories without asking
  #[arg(short, long)]
  yes: bool,

  /// Git base directory holding one checkout per repository [default: config, then $GIT_BASE_DIR]
  #[arg(short, long)]
  git_base_dir: Option<PathBuf>,

  /// Config file (default: ~/.config/release-it-check/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Show what would be released without publishing anything
  #[arg(short, long)]
  dry_run: bool,

  /// Log every external command before it runs
  #[arg(short, long)]
  verbose: bool,

  /// Also log captured command output
  #[arg(long)]
  debug: bool,

  /// Output the report in JSON format
  #[arg(long)]
  json: bool,

  /// Include branches without pending changes in the table
  #[arg(long)]
  show_unchanged: bool,

  /// Disable progress bars
  #[arg(long)]
  no_progress: bool,

  /// Per-command timeout in seconds (0 disables)
  #[arg(long, value_name = "SECS")]
  timeout: Option<u64>,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  ui::logging::init_logging(ui::logging::level_for(cli.verbose, cli.debug));

  let args = ReleaseArgs {
    options: RunOptions {
      git_base_dir: cli.git_base_dir,
      dry_run: cli.dry_run,
      yes: cli.yes,
      timeout_secs: cli.timeout,
    },
    config: cli.config,
    json: cli.json,
    show_unchanged: cli.show_unchanged,
    no_progress: cli.no_progress,
  };

  if let Err(err) = commands::run_release(args) {
    handle_error(err);
  }
}

fn handle_error(err: FleetError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
