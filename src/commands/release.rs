//! The release run: resolve, preflight, loop, report

use crate::core::config::FleetConfig;
use crate::core::context::{RunContext, RunOptions};
use crate::core::error::{FleetResult, ProcessError};
use crate::core::fleet::Fleet;
use crate::core::process::{CommandRunner, SystemRunner};
use crate::core::vcs::SystemGit;
use crate::inventory::{self, HttpFetcher};
use crate::release::prompt::TerminalPrompter;
use crate::ui::progress::FleetProgress;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, info};

/// Everything the release command needs from the command line
#[derive(Debug, Clone, Default)]
pub struct ReleaseArgs {
  pub options: RunOptions,
  pub config: Option<PathBuf>,
  pub json: bool,
  pub show_unchanged: bool,
  pub no_progress: bool,
}

/// Run the release command
pub fn run_release(args: ReleaseArgs) -> FleetResult<()> {
  let config = FleetConfig::resolve(args.config.as_deref())?;
  if let Some(path) = &config.source {
    debug!("Using config file {}", path.display());
  }
  let ctx = RunContext::build(&args.options, &config, std::env::var("GIT_BASE_DIR").ok())?;
  let runner = SystemRunner::new(ctx.command_timeout);

  preflight(&runner, &ctx)?;

  let fetcher = HttpFetcher::new()?;
  let inventory = inventory::resolve(&ctx.inventory_source, &ctx.released_markers, &fetcher)?;
  info!(
    "Inventory: {} repositories, {} branches",
    inventory.len(),
    inventory.branch_count()
  );

  let show_progress = !args.json && !args.no_progress && std::io::stderr().is_terminal();
  let mut fleet = Fleet::new(&runner, &ctx);
  if show_progress {
    fleet = fleet.with_progress(FleetProgress::new(inventory.len()));
  }

  let mut prompter = TerminalPrompter::terminal();
  let report = fleet.run(&inventory, &mut prompter);
  debug!("Processed {} branches", report.rows().len());

  if args.json {
    println!("{}", report.to_json()?);
  } else {
    print!("{}", report.render(args.show_unchanged, std::io::stdout().is_terminal()));
  }

  Ok(())
}

/// Both external tools must answer before any repository is touched
fn preflight(runner: &dyn CommandRunner, ctx: &RunContext) -> FleetResult<()> {
  let git_version = SystemGit::new(runner, &ctx.base_dir)
    .version()
    .map_err(|e| ProcessError::Unavailable {
      program: "git".to_string(),
      stderr: e.to_string(),
    })?;
  debug!("{}", git_version);

  let tool_version = ctx.tool.version(runner, &ctx.base_dir)?;
  debug!("{} {}", ctx.tool.command, tool_version);
  Ok(())
}
