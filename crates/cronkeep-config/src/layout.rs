//! Derives the fixed service layout shared by the daemon and the installer.
//!
//! Every path hangs off a single root, normally the process working
//! directory. Resolution is pure: nothing is created or checked here, so
//! callers decide how missing directories are reported.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

/// Configuration directory name.
pub const CONF_DIR: &str = "conf";
/// Log directory name.
pub const LOG_DIR: &str = "log";
/// Data directory name (session files and other runtime data).
pub const DATA_DIR: &str = "data";
/// Main configuration file inside [`CONF_DIR`].
pub const APP_CONFIG_FILE: &str = "app.ini";
/// Host inventory file inside [`CONF_DIR`].
pub const HOSTS_FILE: &str = "ansible_hosts.ini";
/// Installation marker inside [`CONF_DIR`].
pub const INSTALL_MARKER_FILE: &str = "install.lock";

/// Canonical directory and file layout of a service installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    root_dir: PathBuf,
    conf_dir: PathBuf,
    log_dir: PathBuf,
    data_dir: PathBuf,
    app_config: PathBuf,
    hosts_file: PathBuf,
    install_marker: PathBuf,
}

impl RuntimePaths {
    /// Derives the layout beneath `root`.
    #[must_use]
    pub fn resolve(root: impl Into<PathBuf>) -> Self {
        let root_dir = root.into();
        let conf_dir = root_dir.join(CONF_DIR);
        Self {
            log_dir: root_dir.join(LOG_DIR),
            data_dir: root_dir.join(DATA_DIR),
            app_config: conf_dir.join(APP_CONFIG_FILE),
            hosts_file: conf_dir.join(HOSTS_FILE),
            install_marker: conf_dir.join(INSTALL_MARKER_FILE),
            conf_dir,
            root_dir,
        }
    }

    /// Derives the layout beneath the process working directory.
    ///
    /// # Errors
    ///
    /// Returns the error reported by [`std::env::current_dir`].
    pub fn from_current_dir() -> io::Result<Self> {
        env::current_dir().map(Self::resolve)
    }

    /// Service root directory.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        self.root_dir.as_path()
    }

    /// Directory holding `app.ini`, the host inventory, and the marker.
    #[must_use]
    pub fn conf_dir(&self) -> &Path {
        self.conf_dir.as_path()
    }

    /// Directory receiving log files.
    #[must_use]
    pub fn log_dir(&self) -> &Path {
        self.log_dir.as_path()
    }

    /// Directory for runtime data.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.as_path()
    }

    /// Path to the main configuration file.
    #[must_use]
    pub fn app_config(&self) -> &Path {
        self.app_config.as_path()
    }

    /// Path to the host inventory consumed by the orchestration tool.
    #[must_use]
    pub fn hosts_file(&self) -> &Path {
        self.hosts_file.as_path()
    }

    /// Path to the installation marker.
    #[must_use]
    pub fn install_marker(&self) -> &Path {
        self.install_marker.as_path()
    }

    /// Directories that must exist before bootstrap continues, in check order.
    #[must_use]
    pub fn required_directories(&self) -> [&Path; 3] {
        [self.conf_dir(), self.log_dir(), self.data_dir()]
    }
}
