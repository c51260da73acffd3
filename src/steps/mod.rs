//! Provisioning steps.
//!
//! Each step implements [`Step`]. Steps report progress through a
//! [`ProgressReporter`], return user-facing notes in a [`StepReport`], and
//! signal failure with a typed [`SetupError`](crate::error::SetupError).
//! None of them talk to the terminal.
//!
//! - [`preflight`] - Host release gate and bootstrap tools
//! - [`packages`] - System package installation
//! - [`docker`] - Container runtime repository and packages
//! - [`project`] - Repository checkout
//! - [`environment`] - Working directories and shell profile patch

pub mod context;
pub mod docker;
pub mod environment;
pub mod packages;
pub mod preflight;
pub mod project;

pub use context::{apt_get, SetupContext};
pub use docker::ContainerRuntimeStep;
pub use environment::{EnvironmentStep, ProfilePatch};
pub use packages::PackagesStep;
pub use preflight::PreflightStep;
pub use project::ProjectStep;

use crate::error::Result;
use crate::progress::ProgressReporter;

/// One stage of the provisioning sequence.
pub trait Step {
    /// Short identifier (used in logs and summaries).
    fn name(&self) -> &'static str;

    /// Title shown above the progress display.
    fn title(&self) -> &'static str;

    /// Perform the step.
    fn run(
        &self,
        ctx: &mut SetupContext<'_>,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<StepReport>;
}

/// What a successful step wants the user to know.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Informational notes.
    pub notes: Vec<String>,
    /// Things the user must act on.
    pub warnings: Vec<String>,
}

impl StepReport {
    pub fn note(&mut self, msg: impl Into<String>) {
        self.notes.push(msg.into());
    }

    pub fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

/// The fixed provisioning sequence after preflight.
pub fn provisioning_steps() -> Vec<Box<dyn Step>> {
    vec![
        Box::new(PackagesStep),
        Box::new(ContainerRuntimeStep),
        Box::new(ProjectStep),
        Box::new(EnvironmentStep),
    ]
}
