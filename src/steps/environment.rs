//! Working directories and shell profile patch.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::EnvironmentConfig;
use crate::error::Result;
use crate::progress::{scaled_percent, ProgressReporter};

use super::{SetupContext, Step, StepReport};

/// Creates working directories and installs the shell profile block.
pub struct EnvironmentStep;

/// A block of shell configuration guarded by a marker string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePatch {
    marker: String,
    block: String,
}

impl ProfilePatch {
    /// Build the OmniStream block from settings.
    ///
    /// The block extends `PATH` and, at login, runs the init executable if it
    /// exists and is executable.
    pub fn from_config(env: &EnvironmentConfig) -> Self {
        let block = format!(
            "# {marker}\n\
             export PATH=\"{path}:$PATH\"\n\
             if [ -x \"{init}\" ]; then\n\
             \x20   \"{init}\"\n\
             fi\n",
            marker = env.marker,
            path = env.path_entry,
            init = env.init_executable,
        );
        Self {
            marker: env.marker.clone(),
            block,
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn block(&self) -> &str {
        &self.block
    }

    /// Whether `content` already carries the block.
    ///
    /// Matches on bytes, so profiles in any encoding are accepted.
    pub fn is_present(&self, content: impl AsRef<[u8]>) -> bool {
        let marker = self.marker.as_bytes();
        marker.is_empty()
            || content
                .as_ref()
                .windows(marker.len())
                .any(|window| window == marker)
    }

    /// Append the block to `profile` unless the marker is already there.
    ///
    /// Returns `true` if the file was written. A missing profile is created.
    pub fn apply(&self, profile: &Path) -> Result<bool> {
        let existing = read_profile(profile)?;
        self.apply_to(profile, &existing)
    }

    /// Like [`apply`](Self::apply), with `existing` already read from
    /// `profile`.
    pub fn apply_to(&self, profile: &Path, existing: &[u8]) -> Result<bool> {
        if self.is_present(existing) {
            return Ok(false);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(profile)?;
        if !existing.is_empty() && !existing.ends_with(b"\n") {
            writeln!(file)?;
        }
        writeln!(file)?;
        file.write_all(self.block.as_bytes())?;
        Ok(true)
    }
}

/// Raw profile contents; a missing file reads as empty.
pub fn read_profile(profile: &Path) -> Result<Vec<u8>> {
    match fs::read(profile) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Outermost ancestor of `path` (itself included) that does not exist yet.
fn outermost_missing(path: &Path) -> PathBuf {
    path.ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
        .last()
        .unwrap_or(path)
        .to_path_buf()
}

impl Step for EnvironmentStep {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn title(&self) -> &'static str {
        "Configuring the OmniStream environment"
    }

    fn run(
        &self,
        ctx: &mut SetupContext<'_>,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<StepReport> {
        let mut report = StepReport::default();
        let env = &ctx.config.environment;
        let total = env.directories.len();

        for (i, dir) in env.directories.iter().enumerate() {
            let path = ctx.resolve(dir);
            progress.report(
                scaled_percent(i, total, 0, 60),
                &format!("Checking {}", path.display()),
            );
            if path.is_dir() {
                continue;
            }
            if ctx.dry_run {
                report.note(format!("Would create directory {}", path.display()));
                continue;
            }
            let created = outermost_missing(&path);
            fs::create_dir_all(&path)?;
            if created.starts_with(&ctx.home) {
                ctx.hand_over(&created, true)?;
            }
            ctx.log.record(&format!("Created directory {}", path.display()));
            report.note(format!("Created directory {}", path.display()));
        }

        progress.report(70, "Updating shell profile");
        let profile = ctx.resolve(&env.profile);
        let patch = ProfilePatch::from_config(env);

        let content = read_profile(&profile)?;
        if patch.is_present(&content) {
            ctx.log
                .record(&format!("{} already configured", profile.display()));
        } else if ctx.dry_run {
            report.note(format!("Would add OmniStream block to {}", profile.display()));
        } else {
            patch.apply_to(&profile, &content)?;
            if profile.starts_with(&ctx.home) {
                ctx.hand_over(&profile, false)?;
            }
            ctx.log
                .record(&format!("Added OmniStream block to {}", profile.display()));
            report.note(format!("Added OmniStream block to {}", profile.display()));
        }

        progress.report(100, "Environment configured");
        Ok(report)
    }
}
