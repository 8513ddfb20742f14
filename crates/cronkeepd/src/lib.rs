//! Bootstrap orchestration for the cronkeep scheduling service.
//!
//! `cronkeepd` establishes a validated runtime before any job machinery
//! starts. Bootstrap checks that the host can drive the orchestration tool,
//! that the fixed directory layout beneath the service root exists and is
//! usable, and whether the service has been installed. Only an installed
//! service goes on to construct its storage handle, host inventory,
//! scheduler, and background task runner, always in that order.
//!
//! Every outcome is a value. [`bootstrap_with`] returns either
//! [`BootstrapOutcome::NotInstalled`] or a ready [`Daemon`], and failures are
//! [`BootstrapError`]s tagged with the last [`BootstrapStage`] reached. The
//! process entry in [`run`] is the single place that turns an error into a
//! failing exit code.
//!
//! Each collaborator that touches the host sits behind a trait
//! ([`ControllerCapability`], [`ToolProbe`], [`DirectoryAccess`],
//! [`EnvironmentExport`], [`ResourceProvider`], [`HealthReporter`]) so the
//! state machine can be exercised without a real orchestration tool or
//! database.

mod bootstrap;
mod environment;
mod health;
mod process;
mod resources;
mod system_resources;
mod telemetry;

pub use bootstrap::{
    BootstrapContext, BootstrapError, BootstrapOutcome, BootstrapStage, Daemon, bootstrap_with,
};
pub use environment::{
    CommandProbe, ControllerCapability, DirectoryAccess, EnvironmentError, EnvironmentExport,
    EnvironmentProbes, HostPlatform, NamedPlatform, PathError, ProcessEnvironment,
    SystemDirectoryAccess, ToolProbe, ToolProbeError,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{
    LaunchError, LaunchOutcome, SHUTDOWN_SIGNALS, ShutdownError, ShutdownSignal, StopSignal,
    SystemShutdownSignal, run,
};
pub use resources::{
    ResourceError, ResourceKind, ResourceKindParseError, ResourceProvider, Resources,
};
pub use system_resources::{
    DEFAULT_MAINTENANCE_INTERVAL, HostInventory, JobScheduler, MaintenanceRunner, StorageEngine,
    StorageHandle, StorageSettingsError, SystemResourceProvider,
};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
