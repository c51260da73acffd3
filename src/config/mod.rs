//! Configuration loading and schema.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use omnistream_setup::config::{parse_config, SetupConfig};
//! use std::path::Path;
//!
//! let config = parse_config("packages: [jq]", Path::new("setup.yml")).unwrap();
//! assert_eq!(config.packages, vec!["jq".to_string()]);
//! assert_eq!(config.host, SetupConfig::default().host);
//! ```
//!
//! # Configuration File Location
//!
//! `--config <PATH>` wins; otherwise `~/.omnistream/setup.yml` is read if
//! it exists; otherwise the built-in defaults apply.

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_file, parse_config, user_config_path};
pub use schema::{
    resolve_home_path, DockerConfig, EnvironmentConfig, HostRequirement, ProjectConfig,
    SetupConfig, DEFAULT_PACKAGES,
};
