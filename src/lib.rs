//! omnistream-setup - provisions a Debian 13 (trixie) host for OmniStream.
//!
//! One run checks the host release, installs the system packages and the
//! Docker engine, clones the OmniStream repository and wires the user's
//! shell profile. Every command is appended to an install log; the first
//! failure stops the run.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading and schema
//! - [`error`] - Error types and result aliases
//! - [`host`] - Host release detection
//! - [`install_log`] - Append-only install log
//! - [`progress`] - Step progress events
//! - [`runner`] - Fixed-order run orchestration
//! - [`shell`] - External command execution
//! - [`steps`] - The provisioning steps
//! - [`ui`] - Notices, progress bars and prompts
//!
//! # Example
//!
//! ```
//! use omnistream_setup::config::SetupConfig;
//! use omnistream_setup::steps::ProfilePatch;
//!
//! let config = SetupConfig::default();
//! let patch = ProfilePatch::from_config(&config.environment);
//! assert!(patch.block().contains("omni_init"));
//! assert!(patch.is_present(patch.block()));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod install_log;
pub mod progress;
pub mod runner;
pub mod shell;
pub mod steps;
pub mod ui;

pub use error::{Result, SetupError};
