use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Registry of scheduled jobs keyed by job identifier.
///
/// Clones share the registry, so the background runner observes jobs the
/// service registers after bootstrap.
#[derive(Debug, Clone, Default)]
pub struct JobScheduler {
    jobs: Arc<Mutex<BTreeMap<String, String>>>,
}

impl JobScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `spec` under `id`, returning the schedule it replaced.
    pub fn register(&self, id: impl Into<String>, spec: impl Into<String>) -> Option<String> {
        self.lock().insert(id.into(), spec.into())
    }

    /// Removes the job registered under `id`.
    pub fn remove(&self, id: &str) -> Option<String> {
        self.lock().remove(id)
    }

    /// Number of registered jobs.
    #[must_use]
    pub fn job_count(&self) -> usize {
        self.lock().len()
    }

    // Entries are plain strings, so a panic mid-update cannot leave them
    // half written.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
