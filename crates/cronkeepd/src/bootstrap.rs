//! Service bootstrap orchestration.
//!
//! Bootstrap is a linear state machine:
//!
//! ```text
//! Start -> EnvironmentChecked -> PathsVerified -> InstallationDetermined
//!       -> NotInstalled
//!       -> ResourcesInitialized -> Ready
//! ```
//!
//! Any failure leaves the machine in a fatal state. The error records the
//! last stage reached, is reported once through the [`HealthReporter`], and
//! is returned to the caller rather than terminating the process.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use cronkeep_config::{ConfigReadError, DbSettings, InstallMarker, InstallStateError, RuntimePaths};

use crate::environment::{EnvironmentError, EnvironmentProbes, PathError};
use crate::health::HealthReporter;
use crate::resources::{ResourceError, ResourceProvider, Resources};

const BOOTSTRAP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bootstrap");

/// Stages of the bootstrap state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootstrapStage {
    /// Nothing has been checked yet.
    Start,
    /// The platform and orchestration tool passed their checks.
    EnvironmentChecked,
    /// Required directories exist and the tool's configuration is exported.
    PathsVerified,
    /// The installation marker has been read.
    InstallationDetermined,
    /// Terminal: the service has not been installed.
    NotInstalled,
    /// Every resource was constructed.
    ResourcesInitialized,
    /// Terminal: the service is ready.
    Ready,
}

impl fmt::Display for BootstrapStage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Start => "start",
            Self::EnvironmentChecked => "environment_checked",
            Self::PathsVerified => "paths_verified",
            Self::InstallationDetermined => "installation_determined",
            Self::NotInstalled => "not_installed",
            Self::ResourcesInitialized => "resources_initialized",
            Self::Ready => "ready",
        };
        formatter.write_str(label)
    }
}

/// Immutable facts established during bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapContext {
    paths: RuntimePaths,
    installed: bool,
}

impl BootstrapContext {
    /// Service layout.
    #[must_use]
    pub fn paths(&self) -> &RuntimePaths {
        &self.paths
    }

    /// Whether the installation marker was present when bootstrap read it.
    #[must_use]
    pub const fn installed(&self) -> bool {
        self.installed
    }
}

/// Fatal errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The host cannot run the service.
    #[error("environment check failed: {source}")]
    Environment {
        /// Underlying environment error.
        #[source]
        source: EnvironmentError,
    },
    /// A required directory is missing or unusable.
    #[error("{source}")]
    Path {
        /// Underlying directory error.
        #[source]
        source: PathError,
    },
    /// The installation state could not be determined.
    #[error("{source}")]
    Installation {
        /// Underlying marker error.
        #[source]
        source: InstallStateError,
    },
    /// The main configuration file could not be read.
    #[error("{source}")]
    ConfigRead {
        /// Underlying configuration error.
        #[source]
        source: ConfigReadError,
    },
    /// A resource failed to initialise.
    #[error("{source}")]
    Resource {
        /// Underlying resource error.
        #[source]
        source: ResourceError,
    },
}

impl BootstrapError {
    /// Last stage reached before the failure.
    #[must_use]
    pub const fn stage(&self) -> BootstrapStage {
        match self {
            Self::Environment { .. } => BootstrapStage::Start,
            Self::Path { .. } => BootstrapStage::EnvironmentChecked,
            Self::Installation { .. } => BootstrapStage::PathsVerified,
            Self::ConfigRead { .. } | Self::Resource { .. } => {
                BootstrapStage::InstallationDetermined
            }
        }
    }
}

impl From<EnvironmentError> for BootstrapError {
    fn from(source: EnvironmentError) -> Self {
        Self::Environment { source }
    }
}

impl From<PathError> for BootstrapError {
    fn from(source: PathError) -> Self {
        Self::Path { source }
    }
}

impl From<InstallStateError> for BootstrapError {
    fn from(source: InstallStateError) -> Self {
        Self::Installation { source }
    }
}

impl From<ConfigReadError> for BootstrapError {
    fn from(source: ConfigReadError) -> Self {
        Self::ConfigRead { source }
    }
}

impl From<ResourceError> for BootstrapError {
    fn from(source: ResourceError) -> Self {
        Self::Resource { source }
    }
}

/// A fully bootstrapped service.
pub struct Daemon<P: ResourceProvider> {
    context: BootstrapContext,
    resources: Resources<P>,
}

impl<P: ResourceProvider> Daemon<P> {
    /// Facts established during bootstrap.
    #[must_use]
    pub fn context(&self) -> &BootstrapContext {
        &self.context
    }

    /// Constructed subsystems.
    #[must_use]
    pub fn resources(&self) -> &Resources<P> {
        &self.resources
    }

    /// Stops the service, releasing resources in reverse order.
    pub fn stop(self) {
        info!(
            target: BOOTSTRAP_TARGET,
            root = %self.context.paths().root_dir().display(),
            "stopping service"
        );
        self.resources.release();
    }
}

impl<P: ResourceProvider> fmt::Debug for Daemon<P> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Daemon")
            .field("context", &self.context)
            .field("resources", &self.resources)
            .finish()
    }
}

/// Terminal states of a successful bootstrap.
pub enum BootstrapOutcome<P: ResourceProvider> {
    /// The service has not been installed; no resources exist.
    NotInstalled(BootstrapContext),
    /// The service is installed and every resource is running.
    Ready(Daemon<P>),
}

impl<P: ResourceProvider> BootstrapOutcome<P> {
    /// Facts established during bootstrap.
    #[must_use]
    pub fn context(&self) -> &BootstrapContext {
        match self {
            Self::NotInstalled(context) => context,
            Self::Ready(daemon) => daemon.context(),
        }
    }

    /// Terminal stage the outcome represents.
    #[must_use]
    pub const fn stage(&self) -> BootstrapStage {
        match self {
            Self::NotInstalled(_) => BootstrapStage::NotInstalled,
            Self::Ready(_) => BootstrapStage::Ready,
        }
    }
}

impl<P: ResourceProvider> fmt::Debug for BootstrapOutcome<P> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInstalled(context) => {
                formatter.debug_tuple("NotInstalled").field(context).finish()
            }
            Self::Ready(daemon) => formatter.debug_tuple("Ready").field(daemon).finish(),
        }
    }
}

/// Bootstraps the service rooted at `root` using the supplied collaborators.
///
/// # Errors
///
/// Returns the first fatal [`BootstrapError`]; it has already been passed to
/// [`HealthReporter::bootstrap_failed`].
pub fn bootstrap_with<P>(
    root: &Path,
    probes: &EnvironmentProbes,
    reporter: Arc<dyn HealthReporter>,
    provider: &P,
) -> Result<BootstrapOutcome<P>, BootstrapError>
where
    P: ResourceProvider,
{
    reporter.bootstrap_starting(root);
    let result = advance(root, probes, reporter.as_ref(), provider);
    if let Err(error) = &result {
        reporter.bootstrap_failed(error);
    }
    result
}

fn advance<P>(
    root: &Path,
    probes: &EnvironmentProbes,
    reporter: &dyn HealthReporter,
    provider: &P,
) -> Result<BootstrapOutcome<P>, BootstrapError>
where
    P: ResourceProvider,
{
    reporter.stage_reached(BootstrapStage::Start);

    probes.check_host()?;
    reporter.stage_reached(BootstrapStage::EnvironmentChecked);

    let paths = RuntimePaths::resolve(root);
    probes.verify_layout(&paths)?;
    probes.export_orchestrator_config(&paths);
    reporter.stage_reached(BootstrapStage::PathsVerified);

    let installed = InstallMarker::for_paths(&paths).is_installed()?;
    let context = BootstrapContext { paths, installed };
    reporter.stage_reached(BootstrapStage::InstallationDetermined);

    if !context.installed {
        reporter.stage_reached(BootstrapStage::NotInstalled);
        reporter.bootstrap_not_installed(&context);
        return Ok(BootstrapOutcome::NotInstalled(context));
    }

    let settings = DbSettings::load(context.paths.app_config())?;
    let resources = Resources::initialise(provider, &settings, &context.paths, reporter)?;
    reporter.stage_reached(BootstrapStage::ResourcesInitialized);

    reporter.stage_reached(BootstrapStage::Ready);
    reporter.bootstrap_succeeded(&context);
    Ok(BootstrapOutcome::Ready(Daemon { context, resources }))
}
