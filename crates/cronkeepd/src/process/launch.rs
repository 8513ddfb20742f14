//! Sequences configuration, telemetry, bootstrap, and shutdown.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use tracing::info;

use cronkeep_config::Config;

use crate::bootstrap::{BootstrapOutcome, bootstrap_with};
use crate::environment::EnvironmentProbes;
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::resources::ResourceProvider;
use crate::system_resources::SystemResourceProvider;
use crate::telemetry;

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, StopSignal, SystemShutdownSignal};

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The service is not installed; nothing was started.
    AwaitingInstallation,
    /// The service ran until a termination signal arrived.
    Stopped {
        /// Signal that ended the run.
        signal: StopSignal,
    },
}

/// Process-level collaborators.
pub(crate) struct ProcessControl<S> {
    pub(crate) root: PathBuf,
    pub(crate) shutdown: S,
}

/// Collaborators used by bootstrap.
pub(crate) struct ServiceDeps<P> {
    pub(crate) probes: EnvironmentProbes,
    pub(crate) reporter: Arc<dyn HealthReporter>,
    pub(crate) provider: P,
}

/// Everything a run needs once configuration is known.
pub(crate) struct LaunchPlan<P, S> {
    pub(crate) process: ProcessControl<S>,
    pub(crate) services: ServiceDeps<P>,
}

/// Runs the daemon using the production collaborators.
///
/// # Errors
///
/// Returns [`LaunchError`] for configuration, telemetry, bootstrap, or
/// signal-handling failures.
pub fn run() -> Result<LaunchOutcome, LaunchError> {
    let config = Config::load()?;
    telemetry::initialise(&config)?;
    let root = match config.root_dir() {
        Some(root) => root.to_path_buf(),
        None => env::current_dir().map_err(|source| LaunchError::WorkingDirectory { source })?,
    };
    let shutdown = SystemShutdownSignal::install()?;
    let plan = LaunchPlan {
        process: ProcessControl { root, shutdown },
        services: ServiceDeps {
            probes: EnvironmentProbes::system(config.orchestrator()),
            reporter: Arc::new(StructuredHealthReporter::new()),
            provider: SystemResourceProvider::new(),
        },
    };
    run_with(plan)
}

/// Runs the daemon with injected collaborators.
pub(crate) fn run_with<P, S>(plan: LaunchPlan<P, S>) -> Result<LaunchOutcome, LaunchError>
where
    P: ResourceProvider,
    S: ShutdownSignal,
{
    let LaunchPlan { process, services } = plan;
    let ProcessControl { root, shutdown } = process;
    let ServiceDeps {
        probes,
        reporter,
        provider,
    } = services;

    info!(
        target: PROCESS_TARGET,
        root = %root.display(),
        "starting service"
    );
    match bootstrap_with(&root, &probes, reporter, &provider)? {
        BootstrapOutcome::NotInstalled(context) => {
            info!(
                target: PROCESS_TARGET,
                marker = %context.paths().install_marker().display(),
                "service awaits installation; exiting"
            );
            Ok(LaunchOutcome::AwaitingInstallation)
        }
        BootstrapOutcome::Ready(daemon) => {
            let signal = shutdown.wait()?;
            info!(
                target: PROCESS_TARGET,
                signal = %signal,
                "termination signal received"
            );
            daemon.stop();
            info!(target: PROCESS_TARGET, "shutdown sequence completed");
            Ok(LaunchOutcome::Stopped { signal })
        }
    }
}
