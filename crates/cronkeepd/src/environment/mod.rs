//! Host environment validation performed before any other bootstrap work.
//!
//! [`EnvironmentProbes`] bundles every check that touches the host: the
//! platform capability, the orchestration tool probe, the directory checks,
//! and the export of the tool's configuration location. Each piece sits
//! behind a trait so tests can substitute deterministic doubles.

mod directories;
mod export;
mod platform;
mod probe;

use std::path::Path;

use cronkeep_config::{ORCHESTRATOR_CONFIG_ENV, RuntimePaths};
use thiserror::Error;
use tracing::{debug, info};

pub use self::directories::{DirectoryAccess, PathError, SystemDirectoryAccess};
pub use self::export::{EnvironmentExport, ProcessEnvironment};
pub use self::platform::{ControllerCapability, HostPlatform, NamedPlatform};
pub use self::probe::{CommandProbe, ToolProbe, ToolProbeError};

pub(crate) const ENVIRONMENT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::environment");

/// Errors raised while validating the host.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    /// The host cannot act as an orchestration controller.
    #[error("platform '{platform}' cannot act as an orchestration controller")]
    UnsupportedPlatform {
        /// Platform name reported by the capability check.
        platform: String,
    },
    /// The orchestration tool is missing or failed its probe.
    #[error("orchestration tool is unavailable: {source}")]
    ToolUnavailable {
        /// Probe failure.
        #[source]
        source: ToolProbeError,
    },
}

/// Host checks used by bootstrap.
pub struct EnvironmentProbes {
    capability: Box<dyn ControllerCapability>,
    tool: Box<dyn ToolProbe>,
    directories: Box<dyn DirectoryAccess>,
    exporter: Box<dyn EnvironmentExport>,
}

impl EnvironmentProbes {
    /// Probes backed by the running host, checking `orchestrator`.
    #[must_use]
    pub fn system(orchestrator: &str) -> Self {
        Self {
            capability: Box::new(HostPlatform),
            tool: Box::new(CommandProbe::version(orchestrator)),
            directories: Box::new(SystemDirectoryAccess),
            exporter: Box::new(ProcessEnvironment),
        }
    }

    /// Replaces the platform capability check.
    #[must_use]
    pub fn with_capability(mut self, capability: impl ControllerCapability + 'static) -> Self {
        self.capability = Box::new(capability);
        self
    }

    /// Replaces the orchestration tool probe.
    #[must_use]
    pub fn with_tool_probe(mut self, tool: impl ToolProbe + 'static) -> Self {
        self.tool = Box::new(tool);
        self
    }

    /// Replaces the directory checks.
    #[must_use]
    pub fn with_directory_access(mut self, directories: impl DirectoryAccess + 'static) -> Self {
        self.directories = Box::new(directories);
        self
    }

    /// Replaces the environment exporter.
    #[must_use]
    pub fn with_exporter(mut self, exporter: impl EnvironmentExport + 'static) -> Self {
        self.exporter = Box::new(exporter);
        self
    }

    /// Confirms the host can run the orchestration tool.
    ///
    /// The platform is checked first; the tool is never probed on an
    /// unsupported platform.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError`] naming the first failed check.
    pub fn check_host(&self) -> Result<(), EnvironmentError> {
        if !self.capability.can_control_hosts() {
            return Err(EnvironmentError::UnsupportedPlatform {
                platform: self.capability.platform().to_owned(),
            });
        }
        self.tool
            .probe()
            .map_err(|source| EnvironmentError::ToolUnavailable { source })?;
        info!(
            target: ENVIRONMENT_TARGET,
            platform = self.capability.platform(),
            tool = self.tool.tool(),
            "host environment validated"
        );
        Ok(())
    }

    /// Verifies the required directories in order, stopping at the first
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns the [`PathError`] for the first unusable directory.
    pub fn verify_layout(&self, paths: &RuntimePaths) -> Result<(), PathError> {
        for dir in paths.required_directories() {
            self.directories.check(dir)?;
            debug!(
                target: ENVIRONMENT_TARGET,
                path = %dir.display(),
                "required directory verified"
            );
        }
        Ok(())
    }

    /// Points the orchestration tool at the configuration directory.
    pub fn export_orchestrator_config(&self, paths: &RuntimePaths) {
        let conf_dir: &Path = paths.conf_dir();
        self.exporter
            .export(ORCHESTRATOR_CONFIG_ENV, conf_dir.as_os_str());
        debug!(
            target: ENVIRONMENT_TARGET,
            variable = ORCHESTRATOR_CONFIG_ENV,
            value = %conf_dir.display(),
            "exported orchestration tool configuration"
        );
    }
}

impl std::fmt::Debug for EnvironmentProbes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentProbes")
            .field("platform", &self.capability.platform())
            .field("tool", &self.tool.tool())
            .finish_non_exhaustive()
    }
}
