//! Configuration file discovery and loading.

use crate::config::schema::SetupConfig;
use crate::error::{Result, SetupError};
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the per-user config file: `~/.omnistream/setup.yml`
pub fn user_config_path(home: &Path) -> PathBuf {
    home.join(".omnistream").join("setup.yml")
}

/// Load a single config file and parse it into [`SetupConfig`].
pub fn load_config_file(path: &Path) -> Result<SetupConfig> {
    let content = fs::read_to_string(path).map_err(|e| SetupError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into [`SetupConfig`].
///
/// Empty content yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<SetupConfig> {
    if content.trim().is_empty() {
        return Ok(SetupConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| SetupError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load config with optional path override.
///
/// An explicit path must exist. Without one, the user config is used when
/// present, otherwise the built-in defaults.
pub fn load_config(home: &Path, config_override: Option<&Path>) -> Result<SetupConfig> {
    if let Some(override_path) = config_override {
        return load_config_file(override_path);
    }

    let user_path = user_config_path(home);
    if user_path.exists() {
        tracing::debug!("Loading config from {}", user_path.display());
        load_config_file(&user_path)
    } else {
        Ok(SetupConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_user_config_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config, SetupConfig::default());
    }

    #[test]
    fn user_config_overrides_fields() {
        let temp = TempDir::new().unwrap();
        let path = user_config_path(temp.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "packages: [jq, htop]\n").unwrap();

        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config.packages, vec!["jq", "htop"]);
        assert_eq!(config.host.codename, "trixie");
    }

    #[test]
    fn explicit_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let result = load_config(temp.path(), Some(&temp.path().join("nope.yml")));
        assert!(matches!(result, Err(SetupError::ConfigParseError { .. })));
    }

    #[test]
    fn nested_sections_parse() {
        let yaml = r#"
host:
  codename: forky
project:
  repository_url: https://example.com/repo.git
  target_dir: /srv/omni
"#;
        let config = parse_config(yaml, Path::new("setup.yml")).unwrap();
        assert_eq!(config.host.codename, "forky");
        assert_eq!(config.host.id, "debian");
        assert_eq!(config.project.target_dir, PathBuf::from("/srv/omni"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = parse_config("pakages: [jq]\n", Path::new("setup.yml"));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("setup.yml"));
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("   \n", Path::new("setup.yml")).unwrap();
        assert_eq!(config, SetupConfig::default());
    }
}
