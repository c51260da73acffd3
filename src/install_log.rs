//! Append-only install log.
//!
//! Every command line, its output and its exit status are appended to a
//! plain-text file under the user's home directory. The file is never
//! truncated or rotated, so successive runs accumulate.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::Result;
use crate::shell::OutputLine;

enum Sink {
    File(File),
    Memory(Vec<String>),
}

/// Timestamped, append-only log of a provisioning run.
pub struct InstallLog {
    path: PathBuf,
    sink: Mutex<Sink>,
}

impl InstallLog {
    /// Open (or create) the log file in append mode.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            sink: Mutex::new(Sink::File(file)),
        })
    }

    /// A log that keeps lines in memory and never touches `path`.
    ///
    /// Used for dry runs and tests.
    pub fn in_memory(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            sink: Mutex::new(Sink::Memory(Vec::new())),
        }
    }

    /// Path reported to the user in failure notices.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line.
    pub fn record(&self, line: &str) {
        let stamped = format!("[{}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), line);
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        match &mut *sink {
            Sink::File(file) => {
                if let Err(e) = writeln!(file, "{}", stamped) {
                    tracing::warn!("Failed to write install log {}: {}", self.path.display(), e);
                }
            }
            Sink::Memory(lines) => lines.push(stamped),
        }
    }

    /// Mark the start of a step.
    pub fn section(&self, title: &str) {
        self.record(&format!("==== {} ====", title));
    }

    /// Record a command about to run.
    pub fn command(&self, command: &str) {
        self.record(&format!("$ {}", command));
    }

    /// Record one line of command output.
    pub fn output(&self, line: &OutputLine) {
        match line {
            OutputLine::Stdout(s) => self.record(&format!("  {}", s)),
            OutputLine::Stderr(s) => self.record(&format!("! {}", s)),
        }
    }

    /// Lines held by an in-memory log (empty for file-backed logs).
    pub fn memory_lines(&self) -> Vec<String> {
        match self.sink.lock().as_deref() {
            Ok(Sink::Memory(lines)) => lines.clone(),
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Debug for InstallLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallLog")
            .field("path", &self.path)
            .finish()
    }
}
