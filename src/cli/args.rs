//! CLI argument definitions.
//!
//! The default invocation takes no arguments and runs the full
//! provisioning sequence. Every flag is optional.

use clap::Parser;
use std::path::PathBuf;

use crate::ui::OutputMode;

/// Provision a Debian 13 (trixie) host for OmniStream.
#[derive(Debug, Default, Parser)]
#[command(name = "omnistream-setup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides ~/.omnistream/setup.yml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the commands that would run without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the welcome confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Use defaults, no prompts
    #[arg(long)]
    pub non_interactive: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Install log location (overrides the configured log file)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Output mode selected by `--quiet` / `--verbose`.
    pub fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_runs_everything() {
        let cli = Cli::try_parse_from(["omnistream-setup"]).unwrap();
        assert!(!cli.dry_run);
        assert!(!cli.yes);
        assert!(cli.config.is_none());
        assert_eq!(cli.output_mode(), OutputMode::Normal);
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "omnistream-setup",
            "--config",
            "/tmp/setup.yml",
            "--dry-run",
            "-y",
            "--non-interactive",
            "-q",
            "--log-file",
            "/tmp/install.log",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/setup.yml")));
        assert!(cli.dry_run && cli.yes && cli.non_interactive);
        assert_eq!(cli.output_mode(), OutputMode::Quiet);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/install.log")));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["omnistream-setup", "-q", "-v"]).is_err());
    }

    #[test]
    fn rejects_subcommands() {
        assert!(Cli::try_parse_from(["omnistream-setup", "run"]).is_err());
    }
}
