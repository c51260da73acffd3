//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use omnistream_setup::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Starting setup");
//! ui.success("Done!");
//!
//! assert!(ui.has_message("Starting setup"));
//! assert!(ui.successes().contains(&"Done!".to_string()));
//! ```

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::Result;
use crate::progress::{ProgressEvent, ProgressObserver};

use super::{OutputMode, ProgressHandle, RunSummary, UserInterface};

/// A failure notice as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureNotice {
    pub error: String,
    pub exit_code: Option<i32>,
    pub log_path: PathBuf,
}

/// Shared record of one progress display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressRecord {
    pub title: String,
    pub events: Vec<ProgressEvent>,
    pub finished: Option<ProgressEnd>,
}

/// How a progress display ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEnd {
    Success(String),
    Error(String),
}

struct MockProgress {
    record: Rc<RefCell<ProgressRecord>>,
}

impl ProgressObserver for MockProgress {
    fn on_progress(&mut self, event: &ProgressEvent) {
        self.record.borrow_mut().events.push(event.clone());
    }
}

impl ProgressHandle for MockProgress {
    fn finish_success(&mut self, msg: &str) {
        self.record.borrow_mut().finished = Some(ProgressEnd::Success(msg.to_string()));
    }

    fn finish_error(&mut self, msg: &str) {
        self.record.borrow_mut().finished = Some(ProgressEnd::Error(msg.to_string()));
    }
}

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    confirm_answer: Option<bool>,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    notices: Vec<(String, String)>,
    questions: Vec<String>,
    failures: Vec<FailureNotice>,
    summaries: Vec<RunSummary>,
    progress: Vec<Rc<RefCell<ProgressRecord>>>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            ..Default::default()
        }
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Answer every confirmation with `answer` instead of the default.
    pub fn set_confirm_answer(&mut self, answer: bool) {
        self.confirm_answer = Some(answer);
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all captured notices as (title, body).
    pub fn notices(&self) -> &[(String, String)] {
        &self.notices
    }

    /// Get all confirmation questions asked.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Get all failure notices.
    pub fn failures(&self) -> &[FailureNotice] {
        &self.failures
    }

    /// Get all captured run summaries.
    pub fn summaries(&self) -> &[RunSummary] {
        &self.summaries
    }

    /// Snapshot of every progress display started, in order.
    pub fn progress(&self) -> Vec<ProgressRecord> {
        self.progress.iter().map(|r| r.borrow().clone()).collect()
    }

    /// Titles of progress displays started, in order.
    pub fn progress_titles(&self) -> Vec<String> {
        self.progress
            .iter()
            .map(|r| r.borrow().title.clone())
            .collect()
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a notice with this title was shown.
    pub fn has_notice(&self, title: &str) -> bool {
        self.notices.iter().any(|(t, _)| t.contains(title))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_notice(&mut self, title: &str, body: &str) {
        self.notices.push((title.to_string(), body.to_string()));
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        self.questions.push(question.to_string());
        Ok(self.confirm_answer.unwrap_or(default))
    }

    fn start_progress(&mut self, title: &str) -> Box<dyn ProgressHandle> {
        let record = Rc::new(RefCell::new(ProgressRecord {
            title: title.to_string(),
            ..Default::default()
        }));
        self.progress.push(Rc::clone(&record));
        Box::new(MockProgress { record })
    }

    fn show_failure(&mut self, error: &str, exit_code: Option<i32>, log_path: &Path) {
        self.failures.push(FailureNotice {
            error: error.to_string(),
            exit_code,
            log_path: log_path.to_path_buf(),
        });
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        self.summaries.push(summary.clone());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
