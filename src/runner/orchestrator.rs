//! Fixed-order provisioning run.

use std::time::Instant;

use crate::error::{Result, SetupError};
use crate::progress::{ProgressEvent, ProgressObserver, ProgressReporter};
use crate::steps::{provisioning_steps, PreflightStep, SetupContext, Step, StepReport};
use crate::ui::{ProgressHandle, RunSummary, StepStatus, StepSummary, UserInterface};

const WELCOME_TITLE: &str = "Welcome to OmniStream Setup";
const COMPLETE_TITLE: &str = "OmniStream installation complete";
const DRY_RUN_MARKER: &str = "[dry-run] ";

/// Options for a provisioning run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Skip the welcome confirmation.
    pub assume_yes: bool,
}

/// Result of a provisioning run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Per-step results, in sequence order.
    pub summary: RunSummary,
    /// The error that stopped the run, if any.
    pub error: Option<SetupError>,
}

impl RunOutcome {
    /// Whether every step completed.
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    /// Process exit code: 0 on success, 1 on any failure.
    pub fn exit_code(&self) -> u8 {
        if self.success() {
            0
        } else {
            1
        }
    }
}

/// Runs preflight, the welcome notice, every provisioning step and the
/// completion notice, stopping at the first error.
pub struct Orchestrator {
    preflight: Box<dyn Step>,
    steps: Vec<Box<dyn Step>>,
    options: RunOptions,
}

impl Orchestrator {
    /// Orchestrator over the standard OmniStream sequence.
    pub fn new(options: RunOptions) -> Self {
        Self::with_steps(Box::new(PreflightStep), provisioning_steps(), options)
    }

    /// Orchestrator over an explicit sequence.
    pub fn with_steps(
        preflight: Box<dyn Step>,
        steps: Vec<Box<dyn Step>>,
        options: RunOptions,
    ) -> Self {
        Self {
            preflight,
            steps,
            options,
        }
    }

    fn names(&self) -> Vec<&'static str> {
        std::iter::once(self.preflight.name())
            .chain(self.steps.iter().map(|s| s.name()))
            .collect()
    }

    /// Run the whole sequence.
    pub fn run(&self, ctx: &mut SetupContext<'_>, ui: &mut dyn UserInterface) -> RunOutcome {
        let start = Instant::now();
        let names = self.names();
        let mut results: Vec<StepSummary> = Vec::with_capacity(names.len());

        ctx.log.section("OmniStream setup started");
        tracing::info!("Provisioning as {} in {}", ctx.user, ctx.home.display());
        ui.show_header("OmniStream Setup");
        if ctx.dry_run {
            ui.warning("Dry run: commands are printed, nothing is changed");
        }

        let outcome = self.run_sequence(ctx, ui, &mut results);

        for name in names.iter().skip(results.len()) {
            results.push(StepSummary {
                name: name.to_string(),
                status: StepStatus::NotRun,
                duration: None,
            });
        }

        let error = match outcome {
            Ok(()) => {
                ctx.log.record("Setup completed successfully");
                ui.show_notice(COMPLETE_TITLE, &completion_body(ctx));
                None
            }
            Err(SetupError::Cancelled) => {
                ctx.log.record("Setup cancelled at welcome notice");
                ui.warning("Setup cancelled. Nothing was changed.");
                Some(SetupError::Cancelled)
            }
            Err(e) => {
                ctx.log.record(&format!("Setup failed: {}", e));
                tracing::error!("Setup failed: {}", e);
                ui.show_failure(&e.to_string(), e.exit_code(), ctx.log.path());
                Some(e)
            }
        };

        let summary = RunSummary {
            step_results: results,
            total_duration: start.elapsed(),
            success: error.is_none(),
        };
        ui.show_run_summary(&summary);

        RunOutcome { summary, error }
    }

    fn run_sequence(
        &self,
        ctx: &mut SetupContext<'_>,
        ui: &mut dyn UserInterface,
        results: &mut Vec<StepSummary>,
    ) -> Result<()> {
        run_recorded(self.preflight.as_ref(), ctx, ui, results)?;
        self.welcome(ctx, ui)?;
        for step in &self.steps {
            run_recorded(step.as_ref(), ctx, ui, results)?;
        }
        Ok(())
    }

    fn welcome(&self, ctx: &SetupContext<'_>, ui: &mut dyn UserInterface) -> Result<()> {
        ui.show_notice(WELCOME_TITLE, &welcome_body(ctx));
        if self.options.assume_yes || !ui.is_interactive() {
            return Ok(());
        }
        if ui.confirm("Continue with the installation?", true)? {
            Ok(())
        } else {
            Err(SetupError::Cancelled)
        }
    }
}

fn run_recorded(
    step: &dyn Step,
    ctx: &mut SetupContext<'_>,
    ui: &mut dyn UserInterface,
    results: &mut Vec<StepSummary>,
) -> Result<()> {
    let started = Instant::now();
    let outcome = run_step(step, ctx, ui);
    results.push(StepSummary {
        name: step.name().to_string(),
        status: if outcome.is_ok() {
            StepStatus::Completed
        } else {
            StepStatus::Failed
        },
        duration: Some(started.elapsed()),
    });
    outcome.map(|_| ())
}

/// Run one step inside a progress display and surface its report.
pub fn run_step(
    step: &dyn Step,
    ctx: &mut SetupContext<'_>,
    ui: &mut dyn UserInterface,
) -> Result<StepReport> {
    ctx.log.section(step.title());
    tracing::debug!("Starting step '{}'", step.name());
    let mark = ctx.log.memory_lines().len();

    let mut handle = ui.start_progress(step.title());
    let result = {
        let mut observer = HandleObserver(handle.as_mut());
        let mut reporter = ProgressReporter::new(&mut observer);
        step.run(ctx, &mut reporter)
    };

    if ctx.dry_run {
        for line in planned_commands(&ctx.log.memory_lines()[mark..]) {
            ui.message(&format!("  would run: {}", line));
        }
    }

    match result {
        Ok(report) => {
            handle.finish_success(step.title());
            for note in &report.notes {
                ctx.log.record(note);
                ui.message(&format!("  {}", note));
            }
            for warning in &report.warnings {
                ctx.log.record(&format!("WARNING: {}", warning));
                ui.warning(warning);
            }
            tracing::debug!("Step '{}' completed", step.name());
            Ok(report)
        }
        Err(e) => {
            handle.finish_error(&e.to_string());
            Err(e)
        }
    }
}

/// Feeds reporter events into a UI progress handle.
struct HandleObserver<'a>(&'a mut dyn ProgressHandle);

impl ProgressObserver for HandleObserver<'_> {
    fn on_progress(&mut self, event: &ProgressEvent) {
        self.0.on_progress(event);
    }
}

/// Commands a dry run printed instead of running.
fn planned_commands(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|l| l.split_once(DRY_RUN_MARKER).map(|(_, cmd)| cmd.to_string()))
        .collect()
}

fn welcome_body(ctx: &SetupContext<'_>) -> String {
    let config = ctx.config;
    format!(
        "This will prepare {} for OmniStream:\n\
         - install {} system packages\n\
         - install Docker from the official repository\n\
         - clone {} into {}\n\
         - configure {}\n\
         Output is logged to {}",
        ctx.host
            .as_ref()
            .map(|h| h.label())
            .unwrap_or_else(|| config.host.codename.clone()),
        config.packages.len(),
        config.project.repository_url,
        ctx.resolve(&config.project.target_dir).display(),
        ctx.resolve(&config.environment.profile).display(),
        ctx.log.path().display(),
    )
}

fn completion_body(ctx: &SetupContext<'_>) -> String {
    format!(
        "OmniStream is installed in {}.\n\
         Log out and back in so '{}' group membership takes effect,\n\
         then open a new shell or run: source {}",
        ctx.resolve(&ctx.config.project.target_dir).display(),
        ctx.config.docker.group,
        ctx.resolve(&ctx.config.environment.profile).display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::test_support::{config_in, fixtures, TRIXIE_OS_RELEASE};
    use crate::ui::MockUI;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    const BOOKWORM_OS_RELEASE: &str =
        "PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"\nID=debian\nVERSION_ID=\"12\"\nVERSION_CODENAME=bookworm\n";

    fn write_host(root: &Path, os_release: &str) {
        fs::write(root.join("os-release"), os_release).unwrap();
        fs::write(root.join("debian_version"), "13.1\n").unwrap();
    }

    fn simulate_clone(runner: &crate::shell::MockRunner) {
        runner.on_command("git clone", |spec| {
            let target = Path::new(spec.args.last().unwrap());
            fs::create_dir_all(target.join(".git")).unwrap();
        });
    }

    fn run_once(
        root: &Path,
        setup: impl Fn(&crate::shell::MockRunner),
    ) -> (RunOutcome, MockUI, Vec<String>) {
        let config = config_in(root);
        let (runner, log, home) = fixtures(root);
        setup(&runner);
        let mut ctx = SetupContext::new(&config, home, "stream".into(), &runner, &log);
        let mut ui = MockUI::new();
        let outcome = Orchestrator::new(RunOptions::default()).run(&mut ctx, &mut ui);
        (outcome, ui, runner.commands())
    }

    #[test]
    fn bookworm_host_runs_no_commands() {
        let temp = TempDir::new().unwrap();
        write_host(temp.path(), BOOKWORM_OS_RELEASE);

        let (outcome, ui, commands) = run_once(temp.path(), |_| {});

        assert_eq!(outcome.exit_code(), 1);
        assert!(commands.is_empty());
        assert!(matches!(
            outcome.error,
            Some(SetupError::UnsupportedHost { .. })
        ));
        assert!(ui.failures()[0].error.contains("bookworm"));
        assert!(!ui.has_notice(WELCOME_TITLE));
        assert_eq!(outcome.summary.count(StepStatus::NotRun), 4);
    }

    #[test]
    fn full_run_completes_every_step() {
        let temp = TempDir::new().unwrap();
        write_host(temp.path(), TRIXIE_OS_RELEASE);

        let (outcome, ui, commands) = run_once(temp.path(), simulate_clone);

        assert!(outcome.success(), "{:?}", outcome.error);
        assert_eq!(outcome.summary.count(StepStatus::Completed), 5);
        assert!(ui.has_notice(WELCOME_TITLE));
        assert!(ui.has_notice(COMPLETE_TITLE));
        assert!(ui.has_warning("Log out"));
        assert_eq!(
            ui.progress_titles().len(),
            5,
            "one progress display per step"
        );
        assert!(commands.iter().any(|c| c.starts_with("git clone")));
        assert!(commands.iter().any(|c| c.starts_with("usermod -aG docker stream")));
    }

    #[test]
    fn failed_clone_verification_stops_before_environment() {
        let temp = TempDir::new().unwrap();
        write_host(temp.path(), TRIXIE_OS_RELEASE);

        let (outcome, ui, _) = run_once(temp.path(), |_| {});

        assert!(matches!(
            outcome.error,
            Some(SetupError::VerificationFailed { .. })
        ));
        assert!(!temp.path().join("home/.bashrc").exists());
        assert!(!temp.path().join("home/omnistream/bin").exists());
        let last = outcome.summary.step_results.last().unwrap();
        assert_eq!(last.name, "environment");
        assert_eq!(last.status, StepStatus::NotRun);
        assert!(ui.has_notice(WELCOME_TITLE));
        assert!(!ui.has_notice(COMPLETE_TITLE));
    }

    #[test]
    fn command_failure_reports_exit_code_and_log() {
        let temp = TempDir::new().unwrap();
        write_host(temp.path(), TRIXIE_OS_RELEASE);

        let (outcome, ui, commands) =
            run_once(temp.path(), |r| r.fail("apt-get install -y git", 100));

        assert_eq!(outcome.exit_code(), 1);
        let failure = &ui.failures()[0];
        assert_eq!(failure.exit_code, Some(100));
        assert!(failure.log_path.ends_with("omnistream_install.log"));
        assert!(!commands.iter().any(|c| c.contains("docker")));
    }

    #[test]
    fn second_run_leaves_single_profile_block() {
        let temp = TempDir::new().unwrap();
        write_host(temp.path(), TRIXIE_OS_RELEASE);

        let (first, _, _) = run_once(temp.path(), simulate_clone);
        let (second, _, _) = run_once(temp.path(), simulate_clone);
        assert!(first.success());
        assert!(second.success(), "{:?}", second.error);

        let profile = fs::read_to_string(temp.path().join("home/.bashrc")).unwrap();
        assert_eq!(profile.matches("# OmniStream Configuration").count(), 1);
    }

    #[test]
    fn declined_welcome_cancels_before_packages() {
        let temp = TempDir::new().unwrap();
        write_host(temp.path(), TRIXIE_OS_RELEASE);
        let config = config_in(temp.path());
        let (runner, log, home) = fixtures(temp.path());
        let mut ctx = SetupContext::new(&config, home, "stream".into(), &runner, &log);
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.set_confirm_answer(false);

        let outcome = Orchestrator::new(RunOptions::default()).run(&mut ctx, &mut ui);

        assert!(matches!(outcome.error, Some(SetupError::Cancelled)));
        assert!(!runner.ran("apt-get"));
        assert!(ui.failures().is_empty());
        assert_eq!(outcome.summary.count(StepStatus::Completed), 1);
    }

    #[test]
    fn assume_yes_skips_confirmation() {
        let temp = TempDir::new().unwrap();
        write_host(temp.path(), TRIXIE_OS_RELEASE);
        let config = config_in(temp.path());
        let (runner, log, home) = fixtures(temp.path());
        simulate_clone(&runner);
        let mut ctx = SetupContext::new(&config, home, "stream".into(), &runner, &log);
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.set_confirm_answer(false);

        let outcome = Orchestrator::new(RunOptions { assume_yes: true }).run(&mut ctx, &mut ui);

        assert!(outcome.success(), "{:?}", outcome.error);
        assert!(ui.questions().is_empty());
    }

    #[test]
    fn progress_never_exceeds_hundred() {
        let temp = TempDir::new().unwrap();
        write_host(temp.path(), TRIXIE_OS_RELEASE);

        let (_, ui, _) = run_once(temp.path(), simulate_clone);

        for record in ui.progress() {
            let percents: Vec<u8> = record.events.iter().map(|e| e.percent).collect();
            assert!(percents.iter().all(|p| *p <= 100));
            assert!(percents.windows(2).all(|w| w[0] <= w[1]), "{}", record.title);
        }
    }

    #[test]
    fn planned_commands_extracts_dry_run_lines() {
        let lines = vec![
            "[2026-01-01 00:00:00] $ apt-get update".to_string(),
            "[2026-01-01 00:00:00]   [dry-run] sudo apt-get update".to_string(),
        ];
        assert_eq!(planned_commands(&lines), vec!["sudo apt-get update"]);
    }

    #[test]
    fn exit_code_is_zero_only_on_success() {
        let outcome = RunOutcome {
            summary: RunSummary {
                step_results: Vec::new(),
                total_duration: Duration::ZERO,
                success: true,
            },
            error: None,
        };
        assert_eq!(outcome.exit_code(), 0);
    }
}
