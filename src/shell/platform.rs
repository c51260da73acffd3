//! Process environment queries.

use std::path::PathBuf;

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode in `main()` and to suppress progress
/// bars in [`NonInteractiveUI`](crate::ui::NonInteractiveUI).
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Check if running as root.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// The user a run provisions for, and where their files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoker {
    /// Login name.
    pub user: String,
    /// Home directory.
    pub home: PathBuf,
    /// Started through `sudo`: files created as root belong to `user`.
    pub via_sudo: bool,
}

impl Invoker {
    /// Detect the invoker from the process environment and the passwd
    /// database.
    pub fn detect() -> Option<Self> {
        Self::resolve(|key| std::env::var(key).ok(), passwd_home)
    }

    /// Resolve the invoker from `env` lookups.
    ///
    /// Under `sudo`, `$SUDO_USER` names the real user and `$HOME` usually
    /// points at root's home, so the home directory comes from `passwd`.
    /// Otherwise `$USER` (then `$LOGNAME`) and `$HOME` are used.
    pub fn resolve(
        env: impl Fn(&str) -> Option<String>,
        passwd: impl Fn(&str) -> Option<PathBuf>,
    ) -> Option<Self> {
        let var = |key: &str| env(key).filter(|v| !v.is_empty());

        if let Some(user) = var("SUDO_USER").filter(|u| u != "root") {
            let home = passwd(&user)?;
            return Some(Self {
                user,
                home,
                via_sudo: true,
            });
        }

        let user = var("USER").or_else(|| var("LOGNAME"))?;
        let home = var("HOME")
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .or_else(|| passwd(&user))?;
        Some(Self {
            user,
            home,
            via_sudo: false,
        })
    }
}

/// Home directory of `user` from the passwd database.
#[cfg(unix)]
pub fn passwd_home(user: &str) -> Option<PathBuf> {
    use std::ffi::{CStr, CString, OsStr};
    use std::os::unix::ffi::OsStrExt;

    let name = CString::new(user).ok()?;
    let mut buf: Vec<libc::c_char> = vec![0; 1024];
    loop {
        // SAFETY: a zeroed passwd is a valid out-parameter for getpwnam_r.
        let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
        let mut found: *mut libc::passwd = std::ptr::null_mut();
        // SAFETY: every pointer is valid for the call; `buf.len()` is its size.
        let rc = unsafe {
            libc::getpwnam_r(
                name.as_ptr(),
                &mut pwd,
                buf.as_mut_ptr(),
                buf.len(),
                &mut found,
            )
        };
        if rc == libc::ERANGE && buf.len() < (1 << 20) {
            buf.resize(buf.len() * 2, 0);
            continue;
        }
        if rc != 0 || found.is_null() || pwd.pw_dir.is_null() {
            return None;
        }
        // SAFETY: on success pw_dir is a NUL-terminated string inside `buf`.
        let dir = unsafe { CStr::from_ptr(pwd.pw_dir) };
        return Some(PathBuf::from(OsStr::from_bytes(dir.to_bytes())));
    }
}

#[cfg(not(unix))]
pub fn passwd_home(_user: &str) -> Option<PathBuf> {
    None
}

/// Whether `program` resolves on `PATH`.
pub fn tool_on_path(program: &str) -> bool {
    which::which(program).is_ok()
}
