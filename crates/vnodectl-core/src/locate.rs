//! Console executable settings and lookup

use crate::controller::{ControllerOptions, DEFAULT_TIMEOUT_SECS};
use crate::error::{Error, Result};
use crate::response::CursorPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for starting and driving the console utility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetutilConfig {
    /// Installation root (conventionally `II_SYSTEM`)
    #[serde(default)]
    pub install_root: Option<PathBuf>,
    /// Utility path; relative paths resolve against `install_root`
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
    /// Act on behalf of this user (`-u<user>`)
    #[serde(default)]
    pub user: Option<String>,
    /// Text the console prints when it is ready for input
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Bound on waiting for each prompt
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Cursor behaviour at end of listing
    #[serde(default)]
    pub cursor_policy: CursorPolicy,
}

fn default_binary() -> PathBuf {
    PathBuf::from("ingres/bin/netutil")
}

fn default_prompt() -> String {
    "netutil>".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for NetutilConfig {
    fn default() -> Self {
        Self {
            install_root: None,
            binary: default_binary(),
            user: None,
            prompt: default_prompt(),
            timeout_secs: default_timeout_secs(),
            cursor_policy: CursorPolicy::default(),
        }
    }
}

impl NetutilConfig {
    /// Controller settings derived from this config
    #[must_use]
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            cursor_policy: self.cursor_policy,
        }
    }

    /// Command-line arguments for the utility
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        match self.user.as_deref().map(str::trim) {
            Some(user) if !user.is_empty() => vec![format!("-u{}", user)],
            _ => Vec::new(),
        }
    }
}

/// Resolve and check the utility path.
///
/// An absolute `binary` is used as is; otherwise `install_root` is
/// required.
pub fn locate_executable(config: &NetutilConfig) -> Result<PathBuf> {
    let path = if config.binary.is_absolute() {
        config.binary.clone()
    } else {
        let root = config.install_root.as_ref().ok_or_else(|| {
            Error::Configuration(
                "install root is not set (configure netutil.install_root or II_SYSTEM)"
                    .to_string(),
            )
        })?;
        if root.as_os_str().is_empty() {
            return Err(Error::Configuration("install root is empty".to_string()));
        }
        root.join(&config.binary)
    };

    if is_executable(&path) {
        Ok(path)
    } else {
        Err(Error::ExecutableNotFound(path))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
