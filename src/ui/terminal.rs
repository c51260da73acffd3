//! Interactive terminal UI.

use console::Term;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

use super::progress::format_duration;
use super::{
    confirm, failure_text, should_use_colors, NonInteractiveUI, OutputMode, PercentBar,
    ProgressHandle, RunSummary, SetupTheme, StepStatus, UserInterface,
};

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    theme: SetupTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            SetupTheme::new()
        } else {
            SetupTheme::plain()
        };

        Self {
            term: Term::stdout(),
            theme,
            mode,
        }
    }

    fn progress_bar(&self, title: &str) -> PercentBar {
        if self.mode.shows_progress() {
            PercentBar::new(title, self.theme.clone())
        } else {
            PercentBar::hidden()
        }
    }

    fn boxed(&mut self, title: &str, lines: &[String]) {
        let b = &self.theme.border;
        writeln!(
            self.term,
            "  {} {}",
            b.apply_to("┌─"),
            self.theme.highlight.apply_to(title)
        )
        .ok();
        for line in lines {
            writeln!(self.term, "  {} {}", b.apply_to("│"), line).ok();
        }
        writeln!(
            self.term,
            "  {}",
            b.apply_to("└────────────────────────────────────")
        )
        .ok();
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_notice(&mut self, title: &str, body: &str) {
        if self.mode.shows_status() {
            let lines: Vec<String> = body.lines().map(str::to_string).collect();
            writeln!(self.term).ok();
            self.boxed(title, &lines);
        }
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        confirm(question, default, &self.term)
    }

    fn start_progress(&mut self, title: &str) -> Box<dyn ProgressHandle> {
        Box::new(self.progress_bar(title))
    }

    fn show_failure(&mut self, error: &str, exit_code: Option<i32>, log_path: &Path) {
        let lines: Vec<String> = failure_text(error, exit_code, log_path)
            .into_iter()
            .map(|l| self.theme.error.apply_to(l).to_string())
            .collect();
        writeln!(self.term).ok();
        self.boxed("Installation failed", &lines);
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        if !self.mode.shows_status() {
            return;
        }

        let b = &self.theme.border;

        writeln!(self.term).ok();
        writeln!(
            self.term,
            "  {} {}",
            b.apply_to("┌─"),
            b.apply_to("Summary ──────────────────────────")
        )
        .ok();

        for step in &summary.step_results {
            let icon = step.status.styled(&self.theme);
            let duration_str = step.duration.map(format_duration).unwrap_or_default();
            writeln!(
                self.term,
                "  {} {} {:<20} {}",
                b.apply_to("│"),
                icon,
                step.name,
                self.theme.duration.apply_to(duration_str),
            )
            .ok();
        }

        writeln!(
            self.term,
            "  {}",
            b.apply_to("├────────────────────────────────────")
        )
        .ok();
        writeln!(
            self.term,
            "  {} Total: {} {} {} completed {} {} not run",
            b.apply_to("│"),
            self.theme
                .duration
                .apply_to(format_duration(summary.total_duration)),
            self.theme.dim.apply_to("·"),
            summary.count(StepStatus::Completed),
            self.theme.dim.apply_to("·"),
            summary.count(StepStatus::NotRun),
        )
        .ok();
        writeln!(
            self.term,
            "  {}",
            b.apply_to("└────────────────────────────────────")
        )
        .ok();
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_ui_output_mode() {
        let ui = TerminalUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn quiet_mode_hides_progress_bar() {
        let ui = TerminalUI::new(OutputMode::Quiet);
        assert!(ui.progress_bar("Installing system packages").is_hidden());
    }

    #[test]
    fn create_ui_non_interactive() {
        let ui = create_ui(false, OutputMode::Normal);
        assert!(!ui.is_interactive());
    }

    #[test]
    fn create_ui_respects_mode() {
        let ui = create_ui(false, OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }
}
