//! Resource provider double that records construction and release order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use cronkeep_config::DbSettings;

use crate::resources::{ResourceError, ResourceKind, ResourceProvider};

/// Lifecycle step observed by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceCall {
    Constructed(ResourceKind),
    Released(ResourceKind),
}

type CallLog = Arc<Mutex<Vec<ResourceCall>>>;

/// Handle that logs its own release.
#[derive(Debug)]
pub struct RecordedHandle<T> {
    pub kind: ResourceKind,
    pub value: T,
    log: CallLog,
}

impl<T> Drop for RecordedHandle<T> {
    fn drop(&mut self) {
        if let Ok(mut calls) = self.log.lock() {
            calls.push(ResourceCall::Released(self.kind));
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecordingResourceProvider {
    calls: CallLog,
    failures: Arc<Mutex<HashMap<ResourceKind, String>>>,
}

impl RecordingResourceProvider {
    /// Makes construction of `kind` fail with `message`.
    pub fn fail_on(&self, kind: ResourceKind, message: impl Into<String>) {
        self.failures
            .lock()
            .expect("failures mutex poisoned")
            .insert(kind, message.into());
    }

    /// Resources constructed so far, in order.
    #[must_use]
    pub fn constructed(&self) -> Vec<ResourceKind> {
        self.filtered(|call| match call {
            ResourceCall::Constructed(kind) => Some(kind),
            ResourceCall::Released(_) => None,
        })
    }

    /// Resources released so far, in order.
    #[must_use]
    pub fn released(&self) -> Vec<ResourceKind> {
        self.filtered(|call| match call {
            ResourceCall::Released(kind) => Some(kind),
            ResourceCall::Constructed(_) => None,
        })
    }

    fn filtered(&self, select: impl Fn(ResourceCall) -> Option<ResourceKind>) -> Vec<ResourceKind> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .iter()
            .copied()
            .filter_map(select)
            .collect()
    }

    fn build<T>(&self, kind: ResourceKind, value: T) -> Result<RecordedHandle<T>, ResourceError> {
        let failure = self
            .failures
            .lock()
            .expect("failures mutex poisoned")
            .get(&kind)
            .cloned();
        if let Some(message) = failure {
            return Err(ResourceError::new(kind, message));
        }
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(ResourceCall::Constructed(kind));
        Ok(RecordedHandle {
            kind,
            value,
            log: Arc::clone(&self.calls),
        })
    }
}

impl ResourceProvider for RecordingResourceProvider {
    type Storage = RecordedHandle<DbSettings>;
    type Inventory = RecordedHandle<PathBuf>;
    type Scheduler = RecordedHandle<()>;
    type Runner = RecordedHandle<()>;

    fn open_storage(&self, settings: &DbSettings) -> Result<Self::Storage, ResourceError> {
        self.build(ResourceKind::Storage, settings.clone())
    }

    fn load_inventory(&self, hosts_file: &Path) -> Result<Self::Inventory, ResourceError> {
        self.build(ResourceKind::Inventory, hosts_file.to_path_buf())
    }

    fn create_scheduler(&self) -> Result<Self::Scheduler, ResourceError> {
        self.build(ResourceKind::Scheduler, ())
    }

    fn start_task_runner(
        &self,
        _storage: &Self::Storage,
        _scheduler: &Self::Scheduler,
    ) -> Result<Self::Runner, ResourceError> {
        self.build(ResourceKind::TaskRunner, ())
    }
}
