//! System package installation.

use crate::error::Result;
use crate::progress::{scaled_percent, ProgressReporter};
use crate::shell::CommandSpec;

use super::{SetupContext, Step, StepReport};

/// Installs the configured package list, then upgrades and cleans up.
pub struct PackagesStep;

/// Whether `package` is installed, according to `dpkg-query`.
///
/// Any failure to query (unknown package, missing dpkg) counts as absent.
pub fn is_installed(ctx: &SetupContext<'_>, package: &str) -> bool {
    let spec = CommandSpec::new("dpkg-query")
        .args(["-W", "-f=${Status}", package])
        .read_only();
    match ctx.query(&spec) {
        Ok(result) => result.success && result.stdout.contains("install ok installed"),
        Err(e) => {
            tracing::debug!("dpkg-query for {} failed: {}", package, e);
            false
        }
    }
}

impl Step for PackagesStep {
    fn name(&self) -> &'static str {
        "packages"
    }

    fn title(&self) -> &'static str {
        "Installing system packages"
    }

    fn run(
        &self,
        ctx: &mut SetupContext<'_>,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<StepReport> {
        let mut report = StepReport::default();
        let packages = &ctx.config.packages;
        let total = packages.len();

        progress.report(5, "Updating package index");
        ctx.apt_get(["update"])?;

        let mut installed = 0;
        for (i, package) in packages.iter().enumerate() {
            let percent = scaled_percent(i + 1, total, 10, 90);
            if is_installed(ctx, package) {
                progress.report(percent, &format!("{} already installed", package));
                ctx.log.record(&format!("{} already installed, skipping", package));
                continue;
            }
            progress.report(percent, &format!("Installing {}", package));
            ctx.apt_get(["install", "-y", package.as_str()])?;
            installed += 1;
        }

        progress.report(92, "Upgrading system");
        ctx.apt_get(["full-upgrade", "-y"])?;

        progress.report(97, "Removing unused packages");
        ctx.apt_get(["autoremove", "-y"])?;

        progress.report(100, "System packages ready");
        report.note(format!(
            "{} of {} packages installed, {} already present",
            installed,
            total,
            total - installed
        ));
        Ok(report)
    }
}
