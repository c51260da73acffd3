//! Repository checkout.
//!
//! `git clone` exiting zero is not trusted on its own: the `.git`
//! directory must exist afterwards or the run stops.

use std::fs;
use std::path::Path;

use crate::error::{Result, SetupError};
use crate::progress::ProgressReporter;
use crate::shell::CommandSpec;

use super::{SetupContext, Step, StepReport};

/// Clones the OmniStream repository.
pub struct ProjectStep;

/// State of the clone target before cloning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// Does not exist or is an empty directory.
    Empty,
    /// Already holds a git checkout.
    Checkout,
    /// Holds files but no `.git`.
    Occupied,
}

/// Inspect the clone target.
pub fn target_state(dir: &Path) -> Result<TargetState> {
    if dir.join(".git").is_dir() {
        return Ok(TargetState::Checkout);
    }
    if !dir.exists() {
        return Ok(TargetState::Empty);
    }
    let mut entries = fs::read_dir(dir)?;
    if entries.next().is_none() {
        Ok(TargetState::Empty)
    } else {
        Ok(TargetState::Occupied)
    }
}

impl Step for ProjectStep {
    fn name(&self) -> &'static str {
        "project"
    }

    fn title(&self) -> &'static str {
        "Cloning the OmniStream repository"
    }

    fn run(
        &self,
        ctx: &mut SetupContext<'_>,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<StepReport> {
        let mut report = StepReport::default();
        let project = &ctx.config.project;
        let target = ctx.resolve(&project.target_dir);

        progress.report(10, &format!("Preparing {}", target.display()));
        match target_state(&target)? {
            TargetState::Checkout => {
                ctx.log
                    .record(&format!("{} already cloned, skipping", target.display()));
                progress.report(100, "Repository already present");
                report.note(format!("Repository already present at {}", target.display()));
                return Ok(report);
            }
            TargetState::Occupied => {
                return Err(SetupError::TargetNotEmpty { path: target });
            }
            TargetState::Empty => {}
        }

        if !ctx.dry_run {
            fs::create_dir_all(&target)?;
        }

        progress.report(30, &format!("Cloning {}", project.repository_url));
        ctx.run(
            &CommandSpec::new("git")
                .arg("clone")
                .arg(project.repository_url.as_str())
                .arg(target.display().to_string()),
        )?;

        progress.report(90, "Verifying checkout");
        if ctx.dry_run {
            progress.report(100, "Checkout verification skipped (dry run)");
            return Ok(report);
        }
        if !target.join(".git").is_dir() {
            return Err(SetupError::VerificationFailed {
                path: target,
                message: "clone finished but no .git directory was created".to_string(),
            });
        }

        ctx.hand_over(&target, true)?;
        progress.report(100, "Repository cloned");
        report.note(format!("Repository cloned into {}", target.display()));
        Ok(report)
    }
}
