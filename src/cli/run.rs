//! Wires the command line to a provisioning run.

use anyhow::anyhow;

use crate::cli::args::Cli;
use crate::config::{load_config, resolve_home_path};
use crate::error::Result;
use crate::install_log::InstallLog;
use crate::runner::{Orchestrator, RunOptions, RunOutcome};
use crate::shell::{CommandRunner, DryRunRunner, Invoker, SystemRunner};
use crate::steps::SetupContext;
use crate::ui::UserInterface;

/// Resolve identity, config and log, then run the full sequence.
///
/// Errors returned here happen before any step starts; step failures are
/// reported inside the [`RunOutcome`].
pub fn run(cli: &Cli, ui: &mut dyn UserInterface) -> Result<RunOutcome> {
    let invoker =
        Invoker::detect().ok_or_else(|| anyhow!("cannot determine the invoking user or home"))?;
    let home = invoker.home.clone();
    let config = load_config(&home, cli.config.as_deref())?;

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| resolve_home_path(&config.log_file, &home));
    let log = if cli.dry_run {
        InstallLog::in_memory(&log_path)
    } else {
        InstallLog::open(&log_path)?
    };
    tracing::debug!("Install log at {}", log_path.display());

    let runner: Box<dyn CommandRunner> = if cli.dry_run {
        Box::new(DryRunRunner::new())
    } else {
        Box::new(SystemRunner::new())
    };

    // Root working for a sudo caller leaves files owned by that caller.
    let owner = (invoker.via_sudo && runner.is_root()).then(|| invoker.user.clone());
    tracing::debug!("Provisioning for {} (home {})", invoker.user, home.display());

    let mut ctx = SetupContext::new(&config, home, invoker.user, runner.as_ref(), &log)
        .with_dry_run(cli.dry_run)
        .with_owner(owner);
    if log_path.starts_with(&ctx.home) {
        ctx.hand_over(&log_path, false)?;
    }
    let orchestrator = Orchestrator::new(RunOptions {
        assume_yes: cli.yes,
    });
    Ok(orchestrator.run(&mut ctx, ui))
}
