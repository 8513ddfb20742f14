//! BDD test world: a service root, fake host, and recorded bootstrap result.

use std::cell::RefCell;
use std::sync::Arc;

use crate::bootstrap::{BootstrapError, BootstrapOutcome, bootstrap_with};

use super::environment::FakeEnvironment;
use super::reporter::RecordingHealthReporter;
use super::resource_provider::RecordingResourceProvider;
use super::service_root::ServiceRoot;

/// Scenario world shared across BDD steps.
pub struct TestWorld {
    pub root: ServiceRoot,
    pub environment: FakeEnvironment,
    pub reporter: Arc<RecordingHealthReporter>,
    pub provider: RecordingResourceProvider,
    outcome: Option<BootstrapOutcome<RecordingResourceProvider>>,
    error: Option<BootstrapError>,
}

impl TestWorld {
    /// Builds a world around an empty service root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: ServiceRoot::empty(),
            environment: FakeEnvironment::default(),
            reporter: Arc::new(RecordingHealthReporter::default()),
            provider: RecordingResourceProvider::default(),
            outcome: None,
            error: None,
        }
    }

    /// Runs bootstrap once against the current root.
    pub fn bootstrap(&mut self) {
        if self.outcome.is_some() || self.error.is_some() {
            return;
        }
        let probes = self.environment.probes();
        match bootstrap_with(
            self.root.path(),
            &probes,
            self.reporter.clone(),
            &self.provider,
        ) {
            Ok(outcome) => self.outcome = Some(outcome),
            Err(error) => self.error = Some(error),
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&BootstrapOutcome<RecordingResourceProvider>> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&BootstrapError> {
        self.error.as_ref()
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Default test world fixture.
#[must_use]
pub fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new())
}
