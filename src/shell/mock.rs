//! Scriptable command runner for testing.
//!
//! `MockRunner` records every command it is asked to run and answers from
//! a list of rules matched against the command line. Unmatched commands
//! succeed with empty output.
//!
//! # Example
//!
//! ```
//! use omnistream_setup::shell::{CommandRunner, CommandSpec, MockRunner};
//!
//! let runner = MockRunner::new();
//! runner.respond("dpkg-query -W -f=${Status} jq", 0, "install ok installed");
//! runner.fail("apt-get install -y htop", 100);
//!
//! let jq = CommandSpec::new("dpkg-query").args(["-W", "-f=${Status}", "jq"]);
//! assert!(runner.run(&jq, &|_| {}).unwrap().stdout.contains("installed"));
//! assert_eq!(runner.commands(), vec!["dpkg-query -W -f=${Status} jq".to_string()]);
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::time::Duration;

use super::command::{CommandResult, CommandSpec, OutputCallback, OutputLine};
use super::runner::CommandRunner;
use crate::error::Result;

type SideEffect = Box<dyn Fn(&CommandSpec)>;

struct Rule {
    prefix: String,
    exit_code: i32,
    stdout: String,
}

/// Mock runner implementation for testing.
pub struct MockRunner {
    rules: RefCell<Vec<Rule>>,
    effects: RefCell<Vec<(String, SideEffect)>>,
    history: RefCell<Vec<CommandSpec>>,
    tools: RefCell<HashSet<String>>,
    root: bool,
}

impl MockRunner {
    /// A runner that behaves as root with `sudo` available.
    pub fn new() -> Self {
        let mut tools = HashSet::new();
        tools.insert("sudo".to_string());
        Self {
            rules: RefCell::new(Vec::new()),
            effects: RefCell::new(Vec::new()),
            history: RefCell::new(Vec::new()),
            tools: RefCell::new(tools),
            root: true,
        }
    }

    /// Behave as an unprivileged user.
    pub fn unprivileged(mut self) -> Self {
        self.root = false;
        self
    }

    /// Answer commands starting with `prefix` with `exit_code` and `stdout`.
    ///
    /// Later rules take precedence over earlier ones.
    pub fn respond(&self, prefix: &str, exit_code: i32, stdout: &str) {
        self.rules.borrow_mut().push(Rule {
            prefix: prefix.to_string(),
            exit_code,
            stdout: stdout.to_string(),
        });
    }

    /// Make commands starting with `prefix` exit with `exit_code`.
    pub fn fail(&self, prefix: &str, exit_code: i32) {
        self.respond(prefix, exit_code, "");
    }

    /// Mark packages as installed for `dpkg-query` status checks.
    pub fn installed(&self, packages: &[&str]) {
        for pkg in packages {
            self.respond(
                &format!("dpkg-query -W -f=${{Status}} {}", pkg),
                0,
                "install ok installed",
            );
        }
    }

    /// Run `effect` whenever a command starting with `prefix` runs.
    pub fn on_command(&self, prefix: &str, effect: impl Fn(&CommandSpec) + 'static) {
        self.effects
            .borrow_mut()
            .push((prefix.to_string(), Box::new(effect)));
    }

    /// Set whether `program` is reported as available.
    pub fn set_tool(&self, program: &str, present: bool) {
        let mut tools = self.tools.borrow_mut();
        if present {
            tools.insert(program.to_string());
        } else {
            tools.remove(program);
        }
    }

    /// Command lines run so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.history.borrow().iter().map(|c| c.display()).collect()
    }

    /// Specs run so far, in order.
    pub fn specs(&self) -> Vec<CommandSpec> {
        self.history.borrow().clone()
    }

    /// Whether any command line starts with `prefix`.
    pub fn ran(&self, prefix: &str) -> bool {
        self.commands().iter().any(|c| c.starts_with(prefix))
    }

    /// Number of command lines starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.commands()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, spec: &CommandSpec, on_output: OutputCallback<'_>) -> Result<CommandResult> {
        let line = spec.display();
        self.history.borrow_mut().push(spec.clone());

        for (prefix, effect) in self.effects.borrow().iter() {
            if line.starts_with(prefix.as_str()) {
                effect(spec);
            }
        }

        let rules = self.rules.borrow();
        let rule = rules.iter().rev().find(|r| line.starts_with(&r.prefix));
        let (code, stdout) = match rule {
            Some(r) => (r.exit_code, r.stdout.clone()),
            None => (0, String::new()),
        };

        for out in stdout.lines() {
            on_output(OutputLine::Stdout(out.to_string()));
        }

        if code == 0 {
            Ok(CommandResult::success(stdout, String::new(), Duration::ZERO))
        } else {
            Ok(CommandResult::failure(
                Some(code),
                stdout,
                String::new(),
                Duration::ZERO,
            ))
        }
    }

    fn tool_exists(&self, program: &str) -> bool {
        self.tools.borrow().contains(program)
    }

    fn is_root(&self) -> bool {
        self.root
    }
}
