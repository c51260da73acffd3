//! Host release gate and bootstrap tools.
//!
//! The release check runs before anything else so that an unsupported host
//! is rejected without a single package-manager invocation.

use crate::error::{Result, SetupError};
use crate::host::HostDescriptor;
use crate::progress::ProgressReporter;

use super::{apt_get, SetupContext, Step, StepReport};

/// Validates the host and ensures privilege escalation is possible.
pub struct PreflightStep;

impl Step for PreflightStep {
    fn name(&self) -> &'static str {
        "preflight"
    }

    fn title(&self) -> &'static str {
        "Checking system requirements"
    }

    fn run(
        &self,
        ctx: &mut SetupContext<'_>,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<StepReport> {
        let mut report = StepReport::default();
        let requirement = &ctx.config.host;

        progress.report(10, "Reading host release");
        let host = HostDescriptor::load(requirement)?;
        ctx.log.record(&format!(
            "Detected host: {} (debian_version {})",
            host.label(),
            host.debian_version.as_deref().unwrap_or("unknown")
        ));
        tracing::info!("Detected host {}", host.label());

        host.require(requirement)?;
        report.note(format!("Host is {}", host.label()));
        ctx.host = Some(host);

        let tools = &ctx.config.bootstrap_tools;
        let missing: Vec<&String> = tools
            .iter()
            .filter(|tool| !ctx.runner.tool_exists(tool))
            .collect();

        if !ctx.runner.is_root() && missing.iter().any(|t| *t == "sudo") {
            return Err(SetupError::PrivilegeUnavailable {
                message: "not running as root and 'sudo' is not installed".to_string(),
            });
        }

        if missing.is_empty() {
            progress.report(100, "Bootstrap tools present");
            return Ok(report);
        }

        progress.report(40, "Refreshing package index");
        ctx.run(&apt_get(["update"]))?;

        for (i, tool) in missing.iter().enumerate() {
            progress.report(
                crate::progress::scaled_percent(i, missing.len(), 50, 100),
                &format!("Installing {}", tool),
            );
            ctx.run(&apt_get(["install", "-y", tool.as_str()]))?;
            report.note(format!("Installed {}", tool));
        }

        progress.report(100, "Bootstrap tools installed");
        Ok(report)
    }
}
