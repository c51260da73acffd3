//! Error types for provisioning operations.
//!
//! This module defines [`SetupError`], the error type returned by every
//! provisioning step, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Environment mismatches (wrong OS, missing privileges) are detected
//!   explicitly before any system mutation
//! - External command failures carry the command line and its exit code
//! - Post-hoc verification failures name the path that was checked
//!
//! Steps only detect and return errors. Presenting them is the job of the
//! orchestrator and the [`UserInterface`](crate::ui::UserInterface).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for provisioning operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Host is not the required OS release.
    #[error("Unsupported host: detected '{detected}', required '{required}'")]
    UnsupportedHost { detected: String, required: String },

    /// Host identification files could not be read.
    #[error("Cannot read host information from {path}: {message}")]
    HostInfoUnavailable { path: PathBuf, message: String },

    /// Not running as root and no way to escalate.
    #[error("Privilege escalation unavailable: {message}")]
    PrivilegeUnavailable { message: String },

    /// External command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Clone target exists and holds something other than a checkout.
    #[error("Target directory is not empty: {path}")]
    TargetNotEmpty { path: PathBuf },

    /// An external tool reported success but its side effect is missing.
    #[error("Verification failed for {path}: {message}")]
    VerificationFailed { path: PathBuf, message: String },

    /// User declined to continue.
    #[error("Setup cancelled by user")]
    Cancelled,

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SetupError {
    /// Exit code of the failing external command, if one is known.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::CommandFailed { code, .. } => *code,
            _ => None,
        }
    }
}

/// Result type alias for provisioning operations.
pub type Result<T> = std::result::Result<T, SetupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_host_displays_both_codenames() {
        let err = SetupError::UnsupportedHost {
            detected: "debian bookworm".into(),
            required: "debian trixie".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("bookworm"));
        assert!(msg.contains("trixie"));
    }

    #[test]
    fn host_info_unavailable_displays_path() {
        let err = SetupError::HostInfoUnavailable {
            path: PathBuf::from("/etc/os-release"),
            message: "No such file".into(),
        };
        assert!(err.to_string().contains("/etc/os-release"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = SetupError::CommandFailed {
            command: "apt-get install -y jq".into(),
            code: Some(100),
        };
        let msg = err.to_string();
        assert!(msg.contains("apt-get install -y jq"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn exit_code_only_for_command_failures() {
        let failed = SetupError::CommandFailed {
            command: "git clone".into(),
            code: Some(128),
        };
        assert_eq!(failed.exit_code(), Some(128));
        assert_eq!(SetupError::Cancelled.exit_code(), None);
    }

    #[test]
    fn verification_failed_displays_path_and_message() {
        let err = SetupError::VerificationFailed {
            path: PathBuf::from("/home/u/omnistream"),
            message: "missing .git".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/home/u/omnistream"));
        assert!(msg.contains("missing .git"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SetupError = io_err.into();
        assert!(matches!(err, SetupError::Io(_)));
    }
}
