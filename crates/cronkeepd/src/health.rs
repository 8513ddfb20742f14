//! Structured health reporting for bootstrap lifecycle events.

use std::path::Path;
use std::sync::Arc;

use crate::bootstrap::{BootstrapContext, BootstrapError, BootstrapStage};
use crate::resources::{ResourceError, ResourceKind};

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before the environment is checked.
    fn bootstrap_starting(&self, root: &Path);

    /// Invoked each time bootstrap reaches a new stage.
    fn stage_reached(&self, stage: BootstrapStage);

    /// Invoked when bootstrap stops because the service is not installed.
    fn bootstrap_not_installed(&self, context: &BootstrapContext);

    /// Invoked after every resource has been constructed.
    fn bootstrap_succeeded(&self, context: &BootstrapContext);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked before a resource is constructed.
    fn resource_starting(&self, kind: ResourceKind);

    /// Invoked after a resource is constructed.
    fn resource_ready(&self, kind: ResourceKind);

    /// Invoked when a resource cannot be constructed.
    fn resource_failed(&self, error: &ResourceError);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self, root: &Path) {
        (**self).bootstrap_starting(root);
    }

    fn stage_reached(&self, stage: BootstrapStage) {
        (**self).stage_reached(stage);
    }

    fn bootstrap_not_installed(&self, context: &BootstrapContext) {
        (**self).bootstrap_not_installed(context);
    }

    fn bootstrap_succeeded(&self, context: &BootstrapContext) {
        (**self).bootstrap_succeeded(context);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn resource_starting(&self, kind: ResourceKind) {
        (**self).resource_starting(kind);
    }

    fn resource_ready(&self, kind: ResourceKind) {
        (**self).resource_ready(kind);
    }

    fn resource_failed(&self, error: &ResourceError) {
        (**self).resource_failed(error);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self, root: &Path) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            root = %root.display(),
            "starting service bootstrap"
        );
    }

    fn stage_reached(&self, stage: BootstrapStage) {
        tracing::debug!(
            target: HEALTH_TARGET,
            event = "stage_reached",
            %stage,
            "bootstrap stage reached"
        );
    }

    fn bootstrap_not_installed(&self, context: &BootstrapContext) {
        tracing::warn!(
            target: HEALTH_TARGET,
            event = "bootstrap_not_installed",
            marker = %context.paths().install_marker().display(),
            "service is not installed; skipping resource initialisation"
        );
    }

    fn bootstrap_succeeded(&self, context: &BootstrapContext) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            root = %context.paths().root_dir().display(),
            "service bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            stage = %error.stage(),
            error = %error,
            "service bootstrap failed"
        );
    }

    fn resource_starting(&self, kind: ResourceKind) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "resource_starting",
            resource = %kind,
            "initialising resource"
        );
    }

    fn resource_ready(&self, kind: ResourceKind) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "resource_ready",
            resource = %kind,
            "resource ready"
        );
    }

    fn resource_failed(&self, error: &ResourceError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "resource_failed",
            resource = %error.kind,
            message = %error.message(),
            error = ?error,
            "resource failed to initialise"
        );
    }
}
