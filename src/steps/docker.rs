//! Container runtime installation.
//!
//! Adds Docker's apt repository (trust key plus a source line pinned to the
//! host architecture and codename), installs the engine and its plugins, and
//! grants the invoking user access to the daemon socket.

use crate::config::DockerConfig;
use crate::error::{Result, SetupError};
use crate::progress::ProgressReporter;
use crate::shell::CommandSpec;

use super::{SetupContext, Step, StepReport};

/// Installs Docker Engine and the Compose plugin.
pub struct ContainerRuntimeStep;

/// Build the apt source line for the runtime repository.
pub fn source_line(docker: &DockerConfig, arch: &str, codename: &str) -> String {
    format!(
        "deb [arch={} signed-by={}] {} {} {}",
        arch,
        docker.keyring_path.display(),
        docker.repository_url,
        codename,
        docker.channel
    )
}

/// Map a Rust target architecture to its Debian name.
fn debian_arch(rust_arch: &str) -> Option<&'static str> {
    match rust_arch {
        "x86_64" => Some("amd64"),
        "aarch64" => Some("arm64"),
        "arm" => Some("armhf"),
        "x86" => Some("i386"),
        "powerpc64" => Some("ppc64el"),
        "s390x" => Some("s390x"),
        _ => None,
    }
}

/// Debian architecture of the host.
///
/// Asks dpkg first; falls back to the architecture this binary was built
/// for when dpkg is unavailable.
pub fn detect_architecture(ctx: &SetupContext<'_>) -> Result<String> {
    let spec = CommandSpec::new("dpkg")
        .arg("--print-architecture")
        .read_only();
    if let Ok(result) = ctx.query(&spec) {
        let arch = result.stdout.trim();
        if result.success && !arch.is_empty() {
            return Ok(arch.to_string());
        }
    }

    debian_arch(std::env::consts::ARCH)
        .map(str::to_string)
        .ok_or_else(|| SetupError::CommandFailed {
            command: spec.display(),
            code: None,
        })
}

impl Step for ContainerRuntimeStep {
    fn name(&self) -> &'static str {
        "docker"
    }

    fn title(&self) -> &'static str {
        "Installing Docker and Docker Compose"
    }

    fn run(
        &self,
        ctx: &mut SetupContext<'_>,
        progress: &mut ProgressReporter<'_>,
    ) -> Result<StepReport> {
        let mut report = StepReport::default();
        let docker = &ctx.config.docker;
        let keyring = docker.keyring_path.display().to_string();

        progress.report(5, "Updating package index");
        ctx.apt_get(["update"])?;

        progress.report(15, "Installing prerequisites");
        let mut install = vec!["install".to_string(), "-y".to_string()];
        install.extend(docker.prerequisites.iter().cloned());
        ctx.apt_get(install)?;

        progress.report(25, "Adding Docker GPG key");
        if let Some(dir) = docker.keyring_path.parent() {
            ctx.run(
                &CommandSpec::new("install")
                    .args(["-m", "0755", "-d"])
                    .arg(dir.display().to_string())
                    .privileged(),
            )?;
        }
        ctx.run(
            &CommandSpec::new("curl")
                .args(["-fsSL", docker.key_url.as_str(), "-o", keyring.as_str()])
                .privileged(),
        )?;
        ctx.run(
            &CommandSpec::new("chmod")
                .args(["a+r", keyring.as_str()])
                .privileged(),
        )?;

        progress.report(40, "Adding Docker repository");
        let arch = detect_architecture(ctx)?;
        let line = source_line(docker, &arch, ctx.codename());
        ctx.log.record(&format!("Repository source: {}", line));
        ctx.run(
            &CommandSpec::new("tee")
                .arg(docker.source_list_path.display().to_string())
                .stdin(format!("{}\n", line))
                .privileged(),
        )?;

        progress.report(50, "Updating package index");
        ctx.apt_get(["update"])?;

        progress.report(60, "Installing Docker packages");
        let mut install = vec!["install".to_string(), "-y".to_string()];
        install.extend(docker.packages.iter().cloned());
        ctx.apt_get(install)?;

        progress.report(90, &format!("Adding {} to the {} group", ctx.user, docker.group));
        ctx.run(
            &CommandSpec::new("usermod")
                .args(["-aG", docker.group.as_str(), ctx.user.as_str()])
                .privileged(),
        )?;
        report.warn(format!(
            "Log out and back in for '{}' group membership to take effect",
            docker.group
        ));

        progress.report(100, "Docker installed");
        report.note(format!("Docker repository added for {} ({})", ctx.codename(), arch));
        Ok(report)
    }
}
