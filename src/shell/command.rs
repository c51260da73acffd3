//! External command execution.

use crate::error::{Result, SetupError};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// An external command, described as argv rather than a shell string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandSpec {
    /// Executable name or path.
    pub program: String,

    /// Arguments.
    pub args: Vec<String>,

    /// Extra environment variables.
    pub env: Vec<(String, String)>,

    /// Data written to the child's stdin, then closed.
    pub stdin: Option<String>,

    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Needs root; escalated with `sudo` when not already root.
    pub privileged: bool,

    /// Only inspects the system, so it is safe to run during a dry run.
    pub read_only: bool,
}

impl CommandSpec {
    /// Create a command for `program` with no arguments.
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            ..Default::default()
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    /// Feed `input` on stdin.
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Run in `dir`.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Mark as requiring root.
    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    /// Mark as a pure query.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Rewrite as `sudo env K=V program args...` (or `sudo program args...`).
    pub fn escalated(&self) -> Self {
        let mut args = Vec::new();
        if !self.env.is_empty() {
            args.push("env".to_string());
            args.extend(self.env.iter().map(|(k, v)| format!("{}={}", k, v)));
        }
        args.push(self.program.clone());
        args.extend(self.args.iter().cloned());

        Self {
            program: "sudo".to_string(),
            args,
            env: Vec::new(),
            stdin: self.stdin.clone(),
            cwd: self.cwd.clone(),
            privileged: false,
            read_only: self.read_only,
        }
    }

    /// Human-readable command line for logs and error messages.
    pub fn display(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(quote(&self.program));
        parts.extend(self.args.iter().map(|a| quote(a)));
        parts.join(" ")
    }
}

fn quote(s: &str) -> String {
    if !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@+,$[]{}".contains(c))
    {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Result of executing an external command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Output line from command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Callback for streaming output. Invoked on the calling thread.
pub type OutputCallback<'a> = &'a dyn Fn(OutputLine);

/// Execute a command, streaming each output line to `callback`.
///
/// Stdout and stderr are drained by two reader threads which end when the
/// child closes its pipes; lines are delivered to `callback` on the
/// calling thread.
pub fn execute_streaming(spec: &CommandSpec, callback: OutputCallback<'_>) -> Result<CommandResult> {
    let start = Instant::now();
    let spawn_failed = |_| SetupError::CommandFailed {
        command: spec.display(),
        code: None,
    };

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args);
    if let Some(cwd) = &spec.cwd {
        cmd.current_dir(cwd);
    }
    for (key, value) in &spec.env {
        cmd.env(key, value);
    }
    cmd.stdin(if spec.stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(spawn_failed)?;

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Err(SetupError::CommandFailed {
            command: spec.display(),
            code: None,
        });
    };

    let (tx, rx) = mpsc::channel();
    let tx_stdout = tx.clone();
    let tx_stderr = tx;

    let stdout_handle = thread::spawn(move || {
        let reader = BufReader::new(stdout);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx_stdout.send(OutputLine::Stdout(line));
        }
        output
    });

    let stderr_handle = thread::spawn(move || {
        let reader = BufReader::new(stderr);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx_stderr.send(OutputLine::Stderr(line));
        }
        output
    });

    // Readers are already draining, so a child that writes before it reads
    // cannot block on a full pipe.
    let stdin_handle = match (&spec.stdin, child.stdin.take()) {
        (Some(input), Some(mut pipe)) => {
            let input = input.clone();
            Some(thread::spawn(move || pipe.write_all(input.as_bytes())))
        }
        _ => None,
    };

    for line in rx {
        callback(line);
    }

    if let Some(handle) = stdin_handle {
        match handle.join() {
            Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                tracing::warn!("Failed to write stdin of {}: {}", spec.display(), e);
            }
            _ => {}
        }
    }

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();

    let status = child.wait().map_err(spawn_failed)?;
    let duration = start.elapsed();

    if status.success() {
        Ok(CommandResult::success(
            stdout_output,
            stderr_output,
            duration,
        ))
    } else {
        Ok(CommandResult::failure(
            status.code(),
            stdout_output,
            stderr_output,
            duration,
        ))
    }
}
