//! Shared configuration surface for the cronkeep daemon.
//!
//! The crate owns everything the daemon and the installation workflow must
//! agree on: the layered daemon [`Config`], the fixed on-disk layout rooted at
//! the service directory ([`RuntimePaths`]), the installation marker
//! ([`InstallMarker`]), and the database connection settings read from the
//! `db` section of `conf/app.ini` ([`DbSettings`]).
//!
//! Daemon configuration is resolved with `ortho_config`, layering built-in
//! defaults, configuration files, `CRONKEEP_*` environment variables, and
//! command-line flags. The `app.ini` grammar itself belongs to `rust-ini`;
//! this crate only extracts the fixed set of fields the bootstrap needs.

use std::path::Path;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod database;
mod defaults;
mod install;
mod layout;
mod logging;

pub use database::{ConfigReadError, DB_SECTION, DbField, DbSettings};
pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_ORCHESTRATOR, ORCHESTRATOR_CONFIG_ENV, default_log_filter,
    default_log_filter_string, default_log_format, default_orchestrator_string,
};
pub use install::{InstallLockError, InstallMarker, InstallStateError};
pub use layout::{
    APP_CONFIG_FILE, CONF_DIR, DATA_DIR, HOSTS_FILE, INSTALL_MARKER_FILE, LOG_DIR, RuntimePaths,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Daemon configuration resolved from defaults, files, environment, and CLI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "CRONKEEP")]
pub struct Config {
    /// Tracing filter expression applied to the daemon subscriber.
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Output format used by the daemon subscriber.
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
    /// Service root directory; the process working directory when unset.
    pub root_dir: Option<Utf8PathBuf>,
    /// Executable of the remote orchestration tool probed at startup.
    #[ortho_config(default = defaults::default_orchestrator_string())]
    pub orchestrator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            root_dir: None,
            orchestrator: default_orchestrator_string(),
        }
    }
}

impl Config {
    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Subscriber output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Explicit service root, when one was configured.
    #[must_use]
    pub fn root_dir(&self) -> Option<&Path> {
        self.root_dir.as_deref().map(camino::Utf8Path::as_std_path)
    }

    /// Orchestration tool executable name or path.
    #[must_use]
    pub fn orchestrator(&self) -> &str {
        self.orchestrator.as_str()
    }
}
