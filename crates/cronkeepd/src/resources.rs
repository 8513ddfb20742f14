//! Ordered construction of the subsystems an installed service depends on.
//!
//! Resources are built once, after the installation gate has opened, in a
//! fixed order: storage, inventory, scheduler, and finally the background
//! task runner. The first failure aborts the sequence. Handles built before
//! the failure are dropped without further cleanup.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use cronkeep_config::{DbSettings, RuntimePaths};

use crate::health::HealthReporter;

/// Subsystems constructed during bootstrap, in construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Persistent storage handle built from the `db` settings.
    Storage,
    /// Remote-host inventory bound to the hosts file.
    Inventory,
    /// Job-scheduling engine.
    Scheduler,
    /// Background task runner.
    TaskRunner,
}

impl ResourceKind {
    /// Every kind, in the order bootstrap constructs them.
    pub const ALL: [Self; 4] = [
        Self::Storage,
        Self::Inventory,
        Self::Scheduler,
        Self::TaskRunner,
    ];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Storage => "storage",
            Self::Inventory => "inventory",
            Self::Scheduler => "scheduler",
            Self::TaskRunner => "task_runner",
        };
        formatter.write_str(label)
    }
}

/// Error returned when parsing a resource kind fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported resource kind: {0}")]
pub struct ResourceKindParseError(String);

impl ResourceKindParseError {
    /// Creates a parse error describing the unsupported value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the offending value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for ResourceKind {
    type Err = ResourceKindParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "storage" => Ok(Self::Storage),
            "inventory" => Ok(Self::Inventory),
            "scheduler" => Ok(Self::Scheduler),
            "task_runner" => Ok(Self::TaskRunner),
            other => Err(ResourceKindParseError::new(other)),
        }
    }
}

/// Raised when a resource cannot be constructed.
#[derive(Debug, Error)]
#[error("resource {kind} failed to initialise: {message}")]
pub struct ResourceError {
    /// Resource that failed.
    pub kind: ResourceKind,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ResourceError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(kind: ResourceKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        kind: ResourceKind,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-readable message describing the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Builds the concrete subsystems.
///
/// The associated types let a provider choose its handle types; bootstrap
/// only sequences the calls and owns the results.
pub trait ResourceProvider {
    /// Persistent storage handle.
    type Storage: fmt::Debug;
    /// Remote-host inventory.
    type Inventory: fmt::Debug;
    /// Job scheduler.
    type Scheduler: fmt::Debug;
    /// Running background task runner.
    type Runner: fmt::Debug;

    /// Opens the storage handle from the connection parameters.
    fn open_storage(&self, settings: &DbSettings) -> Result<Self::Storage, ResourceError>;

    /// Binds the inventory to the hosts file.
    fn load_inventory(&self, hosts_file: &Path) -> Result<Self::Inventory, ResourceError>;

    /// Creates the scheduling engine.
    fn create_scheduler(&self) -> Result<Self::Scheduler, ResourceError>;

    /// Constructs and starts the background task runner.
    fn start_task_runner(
        &self,
        storage: &Self::Storage,
        scheduler: &Self::Scheduler,
    ) -> Result<Self::Runner, ResourceError>;
}

/// Subsystems owned by a ready daemon.
///
/// Fields are declared in reverse construction order so dropping the value
/// stops the runner before the handles it may use.
pub struct Resources<P: ResourceProvider> {
    runner: P::Runner,
    scheduler: P::Scheduler,
    inventory: P::Inventory,
    storage: P::Storage,
}

impl<P: ResourceProvider> Resources<P> {
    /// Constructs every resource in order, reporting each step.
    ///
    /// # Errors
    ///
    /// Returns the first [`ResourceError`]; later resources are never
    /// attempted.
    pub fn initialise(
        provider: &P,
        settings: &DbSettings,
        paths: &RuntimePaths,
        reporter: &dyn HealthReporter,
    ) -> Result<Self, ResourceError> {
        let storage = construct(reporter, ResourceKind::Storage, || {
            provider.open_storage(settings)
        })?;
        let inventory = construct(reporter, ResourceKind::Inventory, || {
            provider.load_inventory(paths.hosts_file())
        })?;
        let scheduler = construct(reporter, ResourceKind::Scheduler, || {
            provider.create_scheduler()
        })?;
        let runner = construct(reporter, ResourceKind::TaskRunner, || {
            provider.start_task_runner(&storage, &scheduler)
        })?;
        Ok(Self {
            runner,
            scheduler,
            inventory,
            storage,
        })
    }

    /// Storage handle.
    #[must_use]
    pub fn storage(&self) -> &P::Storage {
        &self.storage
    }

    /// Host inventory.
    #[must_use]
    pub fn inventory(&self) -> &P::Inventory {
        &self.inventory
    }

    /// Job scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &P::Scheduler {
        &self.scheduler
    }

    /// Background task runner.
    #[must_use]
    pub fn runner(&self) -> &P::Runner {
        &self.runner
    }

    /// Releases the resources in reverse construction order.
    pub fn release(self) {
        let Self {
            runner,
            scheduler,
            inventory,
            storage,
        } = self;
        drop(runner);
        drop(scheduler);
        drop(inventory);
        drop(storage);
    }
}

impl<P: ResourceProvider> fmt::Debug for Resources<P> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Resources")
            .field("storage", &self.storage)
            .field("inventory", &self.inventory)
            .field("scheduler", &self.scheduler)
            .field("runner", &self.runner)
            .finish()
    }
}

fn construct<T>(
    reporter: &dyn HealthReporter,
    kind: ResourceKind,
    build: impl FnOnce() -> Result<T, ResourceError>,
) -> Result<T, ResourceError> {
    reporter.resource_starting(kind);
    match build() {
        Ok(resource) => {
            reporter.resource_ready(kind);
            Ok(resource)
        }
        Err(error) => {
            reporter.resource_failed(&error);
            Err(error)
        }
    }
}
