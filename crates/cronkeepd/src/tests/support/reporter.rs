//! Test double for [`HealthReporter`] that records lifecycle events.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::bootstrap::{BootstrapContext, BootstrapError, BootstrapStage};
use crate::health::HealthReporter;
use crate::resources::{ResourceError, ResourceKind};

/// Structured health events tracked during tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    /// Bootstrap started beneath the root.
    BootstrapStarting(PathBuf),
    /// A stage was reached.
    StageReached(BootstrapStage),
    /// Bootstrap stopped because the service is not installed.
    NotInstalled,
    /// Bootstrap completed.
    BootstrapSucceeded,
    /// Bootstrap failed.
    BootstrapFailed {
        stage: BootstrapStage,
        message: String,
    },
    /// Resource construction began.
    ResourceStarting(ResourceKind),
    /// Resource construction finished.
    ResourceReady(ResourceKind),
    /// Resource construction failed.
    ResourceFailed {
        kind: ResourceKind,
        message: String,
    },
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    /// Stages reached, in order.
    #[must_use]
    pub fn stages(&self) -> Vec<BootstrapStage> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HealthEvent::StageReached(stage) => Some(stage),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self, root: &Path) {
        self.record(HealthEvent::BootstrapStarting(root.to_path_buf()));
    }

    fn stage_reached(&self, stage: BootstrapStage) {
        self.record(HealthEvent::StageReached(stage));
    }

    fn bootstrap_not_installed(&self, _context: &BootstrapContext) {
        self.record(HealthEvent::NotInstalled);
    }

    fn bootstrap_succeeded(&self, _context: &BootstrapContext) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed {
            stage: error.stage(),
            message: error.to_string(),
        });
    }

    fn resource_starting(&self, kind: ResourceKind) {
        self.record(HealthEvent::ResourceStarting(kind));
    }

    fn resource_ready(&self, kind: ResourceKind) {
        self.record(HealthEvent::ResourceReady(kind));
    }

    fn resource_failed(&self, error: &ResourceError) {
        self.record(HealthEvent::ResourceFailed {
            kind: error.kind,
            message: error.message().to_owned(),
        });
    }
}
