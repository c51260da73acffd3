//! Step progress bars.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::theme::SetupTheme;
use super::ProgressHandle;
use crate::progress::{ProgressEvent, ProgressObserver};

/// A 0-100 progress bar for a running step.
pub struct PercentBar {
    bar: ProgressBar,
    theme: SetupTheme,
}

impl PercentBar {
    /// Create a visible bar titled `title`.
    pub fn new(title: &str, theme: SetupTheme) -> Self {
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{prefix:.bold} [{bar:30.cyan/blue}] {pos:>3}% {msg}")
        {
            bar.set_style(style.progress_chars("█▓░"));
        }
        bar.set_prefix(title.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar, theme }
    }

    /// Create a bar that draws nothing (quiet mode).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            theme: SetupTheme::plain(),
        }
    }

    /// Whether the bar draws nothing.
    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    /// Current position (0-100).
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    fn finish_with(&mut self, line: String) {
        if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(line);
    }
}

impl ProgressObserver for PercentBar {
    fn on_progress(&mut self, event: &ProgressEvent) {
        self.bar.set_position(u64::from(event.percent));
        self.bar.set_message(event.message.clone());
    }
}

impl ProgressHandle for PercentBar {
    fn finish_success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.finish_with(line);
    }

    fn finish_error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.finish_with(line);
    }
}

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}
