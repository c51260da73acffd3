//! Command runners.
//!
//! Steps never spawn processes directly; they go through a
//! [`CommandRunner`] so tests can script results and dry runs can skip
//! mutations.

use std::time::Duration;

use super::command::{execute_streaming, CommandResult, CommandSpec, OutputCallback, OutputLine};
use super::platform::{is_elevated, tool_on_path};
use crate::error::Result;

/// Runs external commands on behalf of provisioning steps.
pub trait CommandRunner {
    /// Run `spec`, streaming output lines to `on_output`.
    ///
    /// A non-zero exit is reported through [`CommandResult::success`], not
    /// as an error. `Err` means the command could not be run at all.
    fn run(&self, spec: &CommandSpec, on_output: OutputCallback<'_>) -> Result<CommandResult>;

    /// Whether `program` is available.
    fn tool_exists(&self, program: &str) -> bool;

    /// Whether privileged commands run directly, without `sudo`.
    fn is_root(&self) -> bool;
}

/// Runs commands on the real system, escalating with `sudo` when needed.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    root: bool,
}

impl SystemRunner {
    /// Detect whether the process is already root.
    pub fn new() -> Self {
        Self {
            root: is_elevated(),
        }
    }

    /// The exact argv that will be spawned for `spec`.
    pub fn resolve(&self, spec: &CommandSpec) -> CommandSpec {
        if spec.privileged && !self.root {
            spec.escalated()
        } else {
            spec.clone()
        }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec, on_output: OutputCallback<'_>) -> Result<CommandResult> {
        let resolved = self.resolve(spec);
        tracing::debug!("Running: {}", resolved.display());
        execute_streaming(&resolved, on_output)
    }

    fn tool_exists(&self, program: &str) -> bool {
        tool_on_path(program)
    }

    fn is_root(&self) -> bool {
        self.root
    }
}

/// Prints mutating commands instead of running them.
///
/// Read-only queries still run so the plan reflects the real host.
#[derive(Debug, Clone, Default)]
pub struct DryRunRunner {
    inner: SystemRunner,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self {
            inner: SystemRunner::new(),
        }
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&self, spec: &CommandSpec, on_output: OutputCallback<'_>) -> Result<CommandResult> {
        if spec.read_only {
            return self.inner.run(spec, on_output);
        }
        let resolved = self.inner.resolve(spec);
        on_output(OutputLine::Stdout(format!(
            "[dry-run] {}",
            resolved.display()
        )));
        Ok(CommandResult::success(
            String::new(),
            String::new(),
            Duration::ZERO,
        ))
    }

    fn tool_exists(&self, program: &str) -> bool {
        self.inner.tool_exists(program)
    }

    fn is_root(&self) -> bool {
        self.inner.is_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn resolve_escalates_only_privileged_when_not_root() {
        let runner = SystemRunner { root: false };
        let plain = CommandSpec::new("git").arg("clone");
        let privileged = CommandSpec::new("apt-get").arg("update").privileged();

        assert_eq!(runner.resolve(&plain).program, "git");
        assert_eq!(runner.resolve(&privileged).program, "sudo");
    }

    #[test]
    fn resolve_keeps_privileged_when_root() {
        let runner = SystemRunner { root: true };
        let privileged = CommandSpec::new("apt-get").arg("update").privileged();
        assert_eq!(runner.resolve(&privileged).program, "apt-get");
    }

    #[test]
    fn system_runner_reports_exit_code() {
        let runner = SystemRunner { root: false };
        let spec = CommandSpec::new("sh").args(["-c", "exit 7"]);
        let result = runner.run(&spec, &|_| {}).unwrap();
        assert_eq!(result.exit_code, Some(7));
    }

    #[test]
    fn dry_run_skips_mutations() {
        let runner = DryRunRunner {
            inner: SystemRunner { root: true },
        };
        let lines = RefCell::new(Vec::new());
        let spec = CommandSpec::new("sh").args(["-c", "exit 1"]);

        let result = runner
            .run(&spec, &|line| lines.borrow_mut().push(line))
            .unwrap();

        assert!(result.success);
        assert_eq!(
            lines.into_inner(),
            vec![OutputLine::Stdout("[dry-run] sh -c 'exit 1'".to_string())]
        );
    }

    #[test]
    fn dry_run_executes_read_only_queries() {
        let runner = DryRunRunner::new();
        let spec = CommandSpec::new("echo").arg("query").read_only();
        let result = runner.run(&spec, &|_| {}).unwrap();
        assert!(result.stdout.contains("query"));
    }
}
