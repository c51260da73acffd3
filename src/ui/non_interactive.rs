//! Non-interactive UI for CI/headless environments.

use std::path::Path;

use crate::error::Result;
use crate::progress::{ProgressEvent, ProgressObserver};

use super::progress::format_duration;
use super::{failure_text, OutputMode, ProgressHandle, RunSummary, StepStatus, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Questions are answered with their default. Percentage updates are only
/// printed in verbose mode and never in CI, where they are log noise.
pub struct NonInteractiveUI {
    mode: OutputMode,
    is_ci: bool,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            is_ci: crate::shell::is_ci(),
        }
    }

    /// Create with explicit CI flag (for testing).
    pub fn with_ci(mode: OutputMode, is_ci: bool) -> Self {
        Self { mode, is_ci }
    }
}

/// Plain-text progress lines.
struct LineProgress {
    title: String,
    verbose: bool,
    quiet: bool,
}

impl ProgressObserver for LineProgress {
    fn on_progress(&mut self, event: &ProgressEvent) {
        if self.verbose {
            println!("  [{:>3}%] {}", event.percent, event.message);
        }
    }
}

impl ProgressHandle for LineProgress {
    fn finish_success(&mut self, msg: &str) {
        if !self.quiet {
            println!("✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}: {}", self.title, msg);
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_notice(&mut self, title: &str, body: &str) {
        if self.mode.shows_status() {
            println!("== {} ==", title);
            for line in body.lines() {
                println!("  {}", line);
            }
        }
    }

    fn confirm(&mut self, _question: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn start_progress(&mut self, title: &str) -> Box<dyn ProgressHandle> {
        if self.mode.shows_status() {
            println!("◆ {}", title);
        }
        Box::new(LineProgress {
            title: title.to_string(),
            verbose: self.mode.shows_command_output() && !self.is_ci,
            quiet: !self.mode.shows_progress(),
        })
    }

    fn show_failure(&mut self, error: &str, exit_code: Option<i32>, log_path: &Path) {
        eprintln!();
        eprintln!("    ┌─ Installation failed ─────────────");
        for line in failure_text(error, exit_code, log_path) {
            eprintln!("    │ {}", line);
        }
        eprintln!("    └────────────────────────────────────");
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        if !self.mode.shows_status() {
            return;
        }
        println!();
        println!("Summary:");
        for step in &summary.step_results {
            let duration = step.duration.map(format_duration).unwrap_or_default();
            println!("  {} {:<20} {}", step.status.icon(), step.name, duration);
        }
        println!(
            "Total: {} · {} completed · {} not run",
            format_duration(summary.total_duration),
            summary.count(StepStatus::Completed),
            summary.count(StepStatus::NotRun),
        );
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_returns_default() {
        let mut ui = NonInteractiveUI::with_ci(OutputMode::Normal, true);
        assert!(ui.confirm("Continue?", true).unwrap());
        assert!(!ui.confirm("Continue?", false).unwrap());
    }

    #[test]
    fn progress_handle_accepts_events() {
        let mut ui = NonInteractiveUI::with_ci(OutputMode::Quiet, true);
        let mut progress = ui.start_progress("Packages");
        progress.on_progress(&ProgressEvent {
            percent: 50,
            message: "halfway".to_string(),
        });
        progress.finish_success("done");
    }

    #[test]
    fn never_interactive() {
        let ui = NonInteractiveUI::with_ci(OutputMode::Normal, false);
        assert!(!ui.is_interactive());
    }
}
