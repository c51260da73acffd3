//! User interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use omnistream_setup::ui::{create_ui, OutputMode};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("OmniStream Setup");
//! ui.success("Setup complete!");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod progress;
pub mod prompts;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use progress::{format_duration, PercentBar};
pub use prompts::confirm;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, SetupTheme};

use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::progress::ProgressObserver;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show a titled notice the user should read (welcome, completion).
    fn show_notice(&mut self, title: &str, body: &str);

    /// Ask a yes/no question.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;

    /// Start a percentage progress display for a step.
    fn start_progress(&mut self, title: &str) -> Box<dyn ProgressHandle>;

    /// Show the terminal failure notice.
    fn show_failure(&mut self, error: &str, exit_code: Option<i32>, log_path: &Path);

    /// Show the end-of-run summary.
    fn show_run_summary(&mut self, summary: &RunSummary);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for a running progress display.
pub trait ProgressHandle: ProgressObserver {
    /// Mark the step as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the step as failed.
    fn finish_error(&mut self, msg: &str);
}

/// Final state of one step in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Failed,
    NotRun,
}

impl StepStatus {
    /// Status icon.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Completed => "✓",
            Self::Failed => "✗",
            Self::NotRun => "○",
        }
    }

    /// Status icon in theme colors.
    pub fn styled(&self, theme: &SetupTheme) -> String {
        let style = match self {
            Self::Completed => &theme.success,
            Self::Failed => &theme.error,
            Self::NotRun => &theme.dim,
        };
        style.apply_to(self.icon()).to_string()
    }
}

/// One row of the run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSummary {
    pub name: String,
    pub status: StepStatus,
    pub duration: Option<Duration>,
}

/// Summary of a complete run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub step_results: Vec<StepSummary>,
    pub total_duration: Duration,
    pub success: bool,
}

impl RunSummary {
    /// Number of steps with the given status.
    pub fn count(&self, status: StepStatus) -> usize {
        self.step_results
            .iter()
            .filter(|s| s.status == status)
            .count()
    }
}

/// Text of the failure notice, shared by all UIs.
pub fn failure_text(error: &str, exit_code: Option<i32>, log_path: &Path) -> Vec<String> {
    let mut lines = vec![format!("Setup failed: {}", error)];
    if let Some(code) = exit_code {
        lines.push(format!("Exit code: {}", code));
    }
    lines.push(format!("See {} for details.", log_path.display()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn failure_text_names_code_and_log() {
        let lines = failure_text("apt broke", Some(100), &PathBuf::from("/home/u/install.log"));
        assert_eq!(lines[0], "Setup failed: apt broke");
        assert_eq!(lines[1], "Exit code: 100");
        assert!(lines[2].contains("/home/u/install.log"));
    }

    #[test]
    fn failure_text_without_code() {
        let lines = failure_text("wrong host", None, &PathBuf::from("/tmp/x.log"));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn summary_counts_by_status() {
        let summary = RunSummary {
            step_results: vec![
                StepSummary {
                    name: "packages".into(),
                    status: StepStatus::Completed,
                    duration: None,
                },
                StepSummary {
                    name: "docker".into(),
                    status: StepStatus::Failed,
                    duration: None,
                },
                StepSummary {
                    name: "project".into(),
                    status: StepStatus::NotRun,
                    duration: None,
                },
            ],
            total_duration: Duration::ZERO,
            success: false,
        };
        assert_eq!(summary.count(StepStatus::Completed), 1);
        assert_eq!(summary.count(StepStatus::NotRun), 1);
    }

    #[test]
    fn status_icons() {
        assert_eq!(StepStatus::Completed.icon(), "✓");
        assert_eq!(StepStatus::Failed.icon(), "✗");
        assert_eq!(StepStatus::NotRun.icon(), "○");
    }
}
