//! Configuration schema definitions.
//!
//! Every field has a default, so an empty or absent config file yields the
//! stock OmniStream provisioning plan.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for `setup.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupConfig {
    /// Which host release is accepted.
    pub host: HostRequirement,

    /// Tools that must exist before anything else runs.
    pub bootstrap_tools: Vec<String>,

    /// System packages installed by the package provisioner, in order.
    pub packages: Vec<String>,

    /// Container runtime repository and packages.
    pub docker: DockerConfig,

    /// Repository to clone.
    pub project: ProjectConfig,

    /// Working directories and shell profile patch.
    pub environment: EnvironmentConfig,

    /// Install log path (relative paths resolve against `$HOME`)
    pub log_file: PathBuf,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            host: HostRequirement::default(),
            bootstrap_tools: vec!["sudo".to_string()],
            packages: DEFAULT_PACKAGES.iter().map(|p| p.to_string()).collect(),
            docker: DockerConfig::default(),
            project: ProjectConfig::default(),
            environment: EnvironmentConfig::default(),
            log_file: PathBuf::from("omnistream_install.log"),
        }
    }
}

/// Utilities every OmniStream host gets.
pub const DEFAULT_PACKAGES: &[&str] = &[
    "curl",
    "wget",
    "git",
    "unzip",
    "zip",
    "jq",
    "htop",
    "tmux",
    "vim",
    "nano",
    "build-essential",
    "python3",
    "python3-pip",
    "python3-venv",
    "ffmpeg",
    "net-tools",
    "ca-certificates",
    "gnupg",
    "lsb-release",
    "apt-transport-https",
    "rsync",
    "tree",
    "screen",
    "ufw",
];

/// Accepted host release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostRequirement {
    /// Required `ID` from os-release.
    pub id: String,

    /// Required `VERSION_CODENAME` from os-release.
    pub codename: String,

    pub os_release_path: PathBuf,

    pub debian_version_path: PathBuf,
}

impl Default for HostRequirement {
    fn default() -> Self {
        Self {
            id: "debian".to_string(),
            codename: "trixie".to_string(),
            os_release_path: PathBuf::from("/etc/os-release"),
            debian_version_path: PathBuf::from("/etc/debian_version"),
        }
    }
}

/// Docker apt repository settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DockerConfig {
    /// Packages needed to fetch the repository key.
    pub prerequisites: Vec<String>,

    /// HTTPS URL of the repository's GPG public key.
    pub key_url: String,

    /// Where the key is stored.
    pub keyring_path: PathBuf,

    /// Base URL of the apt repository.
    pub repository_url: String,

    /// Repository component (e.g. `stable`).
    pub channel: String,

    /// apt sources file written for the repository.
    pub source_list_path: PathBuf,

    /// Runtime engine, CLI, shim and plugins.
    pub packages: Vec<String>,

    /// Group granting access to the runtime socket.
    pub group: String,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            prerequisites: vec!["ca-certificates".to_string(), "curl".to_string()],
            key_url: "https://download.docker.com/linux/debian/gpg".to_string(),
            keyring_path: PathBuf::from("/etc/apt/keyrings/docker.asc"),
            repository_url: "https://download.docker.com/linux/debian".to_string(),
            channel: "stable".to_string(),
            source_list_path: PathBuf::from("/etc/apt/sources.list.d/docker.list"),
            packages: [
                "docker-ce",
                "docker-ce-cli",
                "containerd.io",
                "docker-buildx-plugin",
                "docker-compose-plugin",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
            group: "docker".to_string(),
        }
    }
}

/// Project checkout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub repository_url: String,

    /// Clone destination (relative paths resolve against `$HOME`)
    pub target_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            repository_url: "https://github.com/omnistream/omnistream.git".to_string(),
            target_dir: PathBuf::from("omnistream"),
        }
    }
}

/// Working directories and shell profile settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Directories created if missing (relative paths resolve against `$HOME`)
    pub directories: Vec<PathBuf>,

    /// Shell profile that receives the configuration block.
    pub profile: PathBuf,

    /// Substring whose presence means the block is already installed.
    pub marker: String,

    /// Directory prepended to `PATH` (shell syntax, expanded at login)
    pub path_entry: String,

    /// Executable invoked at login if present.
    pub init_executable: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            directories: vec![
                PathBuf::from("omnistream/bin"),
                PathBuf::from("omnistream/config"),
                PathBuf::from("omnistream/data"),
                PathBuf::from("omnistream/logs"),
            ],
            profile: PathBuf::from(".bashrc"),
            marker: "OmniStream Configuration".to_string(),
            path_entry: "$HOME/omnistream/bin".to_string(),
            init_executable: "$HOME/omnistream/bin/omni_init".to_string(),
        }
    }
}

/// Resolve a configured path against the user's home directory.
///
/// Absolute paths are returned unchanged; `~/x` and bare relative paths
/// are joined onto `home`.
pub fn resolve_home_path(path: &Path, home: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        return home.join(rest);
    }
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        home.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_targets_trixie() {
        let config = SetupConfig::default();
        assert_eq!(config.host.id, "debian");
        assert_eq!(config.host.codename, "trixie");
    }

    #[test]
    fn default_package_list_has_no_duplicates() {
        let config = SetupConfig::default();
        let mut sorted = config.packages.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), config.packages.len());
        assert_eq!(config.packages.len(), 24);
    }

    #[test]
    fn default_docker_packages_include_compose() {
        let config = DockerConfig::default();
        assert!(config.packages.contains(&"docker-compose-plugin".to_string()));
        assert_eq!(config.group, "docker");
    }

    #[test]
    fn default_marker_is_omnistream_configuration() {
        assert_eq!(
            EnvironmentConfig::default().marker,
            "OmniStream Configuration"
        );
    }

    #[test]
    fn resolve_home_path_joins_relative() {
        let home = Path::new("/home/alice");
        assert_eq!(
            resolve_home_path(Path::new(".bashrc"), home),
            PathBuf::from("/home/alice/.bashrc")
        );
    }

    #[test]
    fn resolve_home_path_expands_tilde() {
        let home = Path::new("/home/alice");
        assert_eq!(
            resolve_home_path(Path::new("~/omnistream"), home),
            PathBuf::from("/home/alice/omnistream")
        );
    }

    #[test]
    fn resolve_home_path_keeps_absolute() {
        let home = Path::new("/home/alice");
        assert_eq!(
            resolve_home_path(Path::new("/opt/omni"), home),
            PathBuf::from("/opt/omni")
        );
    }
}
