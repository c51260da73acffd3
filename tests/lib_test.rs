//! Library integration tests.

use omnistream_setup::config::SetupConfig;
use omnistream_setup::install_log::InstallLog;
use omnistream_setup::runner::{Orchestrator, RunOptions};
use omnistream_setup::shell::MockRunner;
use omnistream_setup::steps::SetupContext;
use omnistream_setup::ui::{MockUI, StepStatus};
use omnistream_setup::SetupError;
use std::fs;
use tempfile::TempDir;

#[test]
fn error_types_are_public() {
    let err = SetupError::TargetNotEmpty {
        path: "/home/u/omnistream".into(),
    };
    assert!(err.to_string().contains("omnistream"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> omnistream_setup::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use omnistream_setup::cli::Cli;

    let cli = Cli::parse_from(["omnistream-setup", "--dry-run", "-y"]);
    assert!(cli.dry_run);
    assert!(cli.yes);
}

#[test]
fn missing_os_release_stops_run() {
    let temp = TempDir::new().unwrap();
    let mut config = SetupConfig::default();
    config.host.os_release_path = temp.path().join("missing-os-release");
    config.host.debian_version_path = temp.path().join("missing-debian_version");

    let runner = MockRunner::new();
    let log = InstallLog::in_memory(&temp.path().join("install.log"));
    let mut ctx = SetupContext::new(&config, temp.path().into(), "stream".into(), &runner, &log);
    let mut ui = MockUI::new();

    let outcome = Orchestrator::new(RunOptions::default()).run(&mut ctx, &mut ui);

    assert!(matches!(
        outcome.error,
        Some(SetupError::HostInfoUnavailable { .. })
    ));
    assert!(runner.commands().is_empty());
    assert_eq!(outcome.summary.step_results[0].status, StepStatus::Failed);
    assert_eq!(ui.failures().len(), 1);
}

#[test]
fn docker_failure_leaves_later_steps_not_run() {
    let temp = TempDir::new().unwrap();
    let mut config = SetupConfig::default();
    config.host.os_release_path = temp.path().join("os-release");
    config.host.debian_version_path = temp.path().join("debian_version");
    fs::write(
        &config.host.os_release_path,
        "ID=debian\nVERSION_ID=\"13\"\nVERSION_CODENAME=trixie\n",
    )
    .unwrap();

    let runner = MockRunner::new();
    runner.fail("curl -fsSL", 22);
    let log = InstallLog::in_memory(&temp.path().join("install.log"));
    let mut ctx = SetupContext::new(&config, temp.path().into(), "stream".into(), &runner, &log);
    let mut ui = MockUI::new();

    let outcome = Orchestrator::new(RunOptions::default()).run(&mut ctx, &mut ui);

    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(ui.failures()[0].exit_code, Some(22));
    let statuses: Vec<_> = outcome
        .summary
        .step_results
        .iter()
        .map(|s| (s.name.as_str(), s.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("preflight", StepStatus::Completed),
            ("packages", StepStatus::Completed),
            ("docker", StepStatus::Failed),
            ("project", StepStatus::NotRun),
            ("environment", StepStatus::NotRun),
        ]
    );
    assert!(!runner.ran("git clone"));
}
