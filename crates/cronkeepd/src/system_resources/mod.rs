//! Production resource provider.
//!
//! Each handle is deliberately thin: it validates its inputs and records
//! what the owning subsystem needs, leaving database access, inventory
//! parsing, and job execution to those subsystems.

mod inventory;
mod runner;
mod scheduler;
mod storage;

use std::path::Path;
use std::time::Duration;

use cronkeep_config::DbSettings;

use crate::resources::{ResourceError, ResourceKind, ResourceProvider};

pub use self::inventory::HostInventory;
pub use self::runner::MaintenanceRunner;
pub use self::scheduler::JobScheduler;
pub use self::storage::{StorageEngine, StorageHandle, StorageSettingsError};

pub(crate) const RESOURCES_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::resources");

/// Default interval between maintenance ticks.
pub const DEFAULT_MAINTENANCE_INTERVAL: Duration = Duration::from_secs(60);

/// Provider building the real subsystem handles.
#[derive(Debug, Clone, Copy)]
pub struct SystemResourceProvider {
    maintenance_interval: Duration,
}

impl SystemResourceProvider {
    /// Builds a provider with the default maintenance interval.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            maintenance_interval: DEFAULT_MAINTENANCE_INTERVAL,
        }
    }

    /// Overrides the maintenance interval.
    #[must_use]
    pub const fn with_maintenance_interval(mut self, interval: Duration) -> Self {
        self.maintenance_interval = interval;
        self
    }
}

impl Default for SystemResourceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceProvider for SystemResourceProvider {
    type Storage = StorageHandle;
    type Inventory = HostInventory;
    type Scheduler = JobScheduler;
    type Runner = MaintenanceRunner;

    fn open_storage(&self, settings: &DbSettings) -> Result<StorageHandle, ResourceError> {
        let handle = StorageHandle::from_settings(settings).map_err(|source| {
            ResourceError::with_source(ResourceKind::Storage, "invalid db settings", source)
        })?;
        tracing::info!(
            target: RESOURCES_TARGET,
            dsn = %handle,
            "storage handle prepared"
        );
        Ok(handle)
    }

    fn load_inventory(&self, hosts_file: &Path) -> Result<HostInventory, ResourceError> {
        Ok(HostInventory::bind(hosts_file))
    }

    fn create_scheduler(&self) -> Result<JobScheduler, ResourceError> {
        Ok(JobScheduler::new())
    }

    fn start_task_runner(
        &self,
        _storage: &StorageHandle,
        scheduler: &JobScheduler,
    ) -> Result<MaintenanceRunner, ResourceError> {
        MaintenanceRunner::start(self.maintenance_interval, scheduler.clone()).map_err(|source| {
            ResourceError::with_source(
                ResourceKind::TaskRunner,
                "failed to spawn maintenance thread",
                source,
            )
        })
    }
}
