//! Host identification.
//!
//! The [`HostDescriptor`] is read once from the os-release and
//! debian_version files and never changes during a run.

pub mod os_release;

pub use os_release::parse_os_release;

use crate::config::HostRequirement;
use crate::error::{Result, SetupError};
use std::fs;
use std::path::Path;

/// Identity of the machine being provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostDescriptor {
    /// `ID` from os-release (e.g. `debian`).
    pub id: String,
    /// `VERSION_CODENAME` from os-release (e.g. `trixie`).
    pub codename: String,
    /// `VERSION_ID` from os-release (e.g. `13`).
    pub version_id: String,
    /// `PRETTY_NAME` from os-release.
    pub pretty_name: String,
    /// Contents of `/etc/debian_version`, if present.
    pub debian_version: Option<String>,
}

impl HostDescriptor {
    /// Read the descriptor from the files named in `requirement`.
    ///
    /// A missing os-release is fatal; a missing debian_version is not.
    pub fn load(requirement: &HostRequirement) -> Result<Self> {
        let content = fs::read_to_string(&requirement.os_release_path).map_err(|e| {
            SetupError::HostInfoUnavailable {
                path: requirement.os_release_path.clone(),
                message: e.to_string(),
            }
        })?;

        let debian_version = read_debian_version(&requirement.debian_version_path);
        Ok(Self::from_os_release(&content, debian_version))
    }

    /// Build a descriptor from os-release content.
    pub fn from_os_release(content: &str, debian_version: Option<String>) -> Self {
        let fields = parse_os_release(content);
        let get = |key: &str| fields.get(key).cloned().unwrap_or_default();

        Self {
            id: get("ID"),
            codename: get("VERSION_CODENAME"),
            version_id: get("VERSION_ID"),
            pretty_name: get("PRETTY_NAME"),
            debian_version,
        }
    }

    /// Check against the accepted release.
    pub fn matches(&self, requirement: &HostRequirement) -> bool {
        self.id == requirement.id && self.codename == requirement.codename
    }

    /// Ensure the host is the accepted release.
    pub fn require(&self, requirement: &HostRequirement) -> Result<()> {
        if self.matches(requirement) {
            Ok(())
        } else {
            Err(SetupError::UnsupportedHost {
                detected: self.label(),
                required: format!("{} {}", requirement.id, requirement.codename),
            })
        }
    }

    /// Short human label, e.g. `debian bookworm (12)`.
    pub fn label(&self) -> String {
        let id = if self.id.is_empty() { "unknown" } else { &self.id };
        let codename = if self.codename.is_empty() {
            "unknown"
        } else {
            &self.codename
        };
        if self.version_id.is_empty() {
            format!("{} {}", id, codename)
        } else {
            format!("{} {} ({})", id, codename, self.version_id)
        }
    }
}

fn read_debian_version(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TRIXIE: &str = r#"PRETTY_NAME="Debian GNU/Linux 13 (trixie)"
NAME="Debian GNU/Linux"
VERSION_ID="13"
VERSION="13 (trixie)"
VERSION_CODENAME=trixie
ID=debian
"#;

    const BOOKWORM: &str = r#"PRETTY_NAME="Debian GNU/Linux 12 (bookworm)"
VERSION_ID="12"
VERSION_CODENAME=bookworm
ID=debian
"#;

    fn requirement_in(temp: &TempDir) -> HostRequirement {
        HostRequirement {
            os_release_path: temp.path().join("os-release"),
            debian_version_path: temp.path().join("debian_version"),
            ..Default::default()
        }
    }

    #[test]
    fn trixie_matches_default_requirement() {
        let host = HostDescriptor::from_os_release(TRIXIE, None);
        assert_eq!(host.codename, "trixie");
        assert_eq!(host.version_id, "13");
        assert!(host.matches(&HostRequirement::default()));
    }

    #[test]
    fn bookworm_is_rejected_by_name() {
        let host = HostDescriptor::from_os_release(BOOKWORM, None);
        let err = host.require(&HostRequirement::default()).unwrap_err();
        assert!(matches!(err, SetupError::UnsupportedHost { .. }));
        assert!(err.to_string().contains("bookworm"));
    }

    #[test]
    fn different_id_is_rejected() {
        let host = HostDescriptor::from_os_release("ID=ubuntu\nVERSION_CODENAME=trixie\n", None);
        assert!(!host.matches(&HostRequirement::default()));
    }

    #[test]
    fn load_reads_both_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("os-release"), TRIXIE).unwrap();
        fs::write(temp.path().join("debian_version"), "13.1\n").unwrap();

        let host = HostDescriptor::load(&requirement_in(&temp)).unwrap();
        assert_eq!(host.debian_version.as_deref(), Some("13.1"));
        assert_eq!(host.pretty_name, "Debian GNU/Linux 13 (trixie)");
    }

    #[test]
    fn load_without_os_release_fails() {
        let temp = TempDir::new().unwrap();
        let err = HostDescriptor::load(&requirement_in(&temp)).unwrap_err();
        assert!(matches!(err, SetupError::HostInfoUnavailable { .. }));
    }

    #[test]
    fn label_handles_missing_fields() {
        let host = HostDescriptor::default();
        assert_eq!(host.label(), "unknown unknown");
    }
}
