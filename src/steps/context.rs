//! Shared state passed into every provisioning step.

use std::path::{Path, PathBuf};

use crate::config::{resolve_home_path, SetupConfig};
use crate::error::{Result, SetupError};
use crate::host::HostDescriptor;
use crate::install_log::InstallLog;
use crate::shell::{CommandResult, CommandRunner, CommandSpec};

/// Everything a step needs: settings, identity, and how to run commands.
pub struct SetupContext<'a> {
    /// Active configuration.
    pub config: &'a SetupConfig,

    /// Filled in by the preflight step.
    pub host: Option<HostDescriptor>,

    /// The invoking user's home directory.
    pub home: PathBuf,

    /// The invoking user's login name.
    pub user: String,

    /// Executes external commands.
    pub runner: &'a dyn CommandRunner,

    /// Append-only install log.
    pub log: &'a InstallLog,

    /// Skip filesystem writes and mutating commands.
    pub dry_run: bool,

    /// Login that should own files created under its home when the run
    /// itself is root on that user's behalf.
    pub owner: Option<String>,
}

impl<'a> SetupContext<'a> {
    pub fn new(
        config: &'a SetupConfig,
        home: PathBuf,
        user: String,
        runner: &'a dyn CommandRunner,
        log: &'a InstallLog,
    ) -> Self {
        Self {
            config,
            host: None,
            home,
            user,
            runner,
            log,
            dry_run: false,
            owner: None,
        }
    }

    /// Enable or disable dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Give files created as root back to the invoking user.
    pub fn with_owner(mut self, owner: Option<String>) -> Self {
        self.owner = owner;
        self
    }

    /// `chown` `path` (recursively if asked) to [`Self::owner`].
    ///
    /// No-op without an owner or during a dry run.
    pub fn hand_over(&self, path: &Path, recursive: bool) -> Result<()> {
        let Some(owner) = self.owner.as_deref() else {
            return Ok(());
        };
        if self.dry_run {
            return Ok(());
        }
        let mut spec = CommandSpec::new("chown");
        if recursive {
            spec = spec.arg("-R");
        }
        let spec = spec
            .arg(format!("{}:", owner))
            .arg(path.display().to_string())
            .privileged();
        self.run(&spec)?;
        Ok(())
    }

    /// Resolve a configured path against the home directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        resolve_home_path(path, &self.home)
    }

    /// Codename of the detected host, or the required one before preflight.
    pub fn codename(&self) -> &str {
        self.host
            .as_ref()
            .map(|h| h.codename.as_str())
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.config.host.codename)
    }

    /// Run a command and log it, without judging the exit status.
    pub fn query(&self, spec: &CommandSpec) -> Result<CommandResult> {
        self.log.command(&spec.display());
        let log = self.log;
        let result = self.runner.run(spec, &|line| log.output(&line))?;
        if !result.success {
            self.log
                .record(&format!("exit status {:?}", result.exit_code));
        }
        Ok(result)
    }

    /// Run a command; a non-zero exit becomes [`SetupError::CommandFailed`].
    pub fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        let result = self.query(spec)?;
        if result.success {
            Ok(result)
        } else {
            tracing::error!("Command failed ({:?}): {}", result.exit_code, spec.display());
            Err(SetupError::CommandFailed {
                command: spec.display(),
                code: result.exit_code,
            })
        }
    }

    /// `apt-get <args>` as root, never prompting.
    pub fn apt_get<I, S>(&self, args: I) -> Result<CommandResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run(&apt_get(args))
    }
}

/// Build a non-interactive, privileged `apt-get` invocation.
pub fn apt_get<I, S>(args: I) -> CommandSpec
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    CommandSpec::new("apt-get")
        .args(args)
        .env("DEBIAN_FRONTEND", "noninteractive")
        .privileged()
}
