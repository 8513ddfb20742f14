//! Process environment exports consumed by the orchestration tool.

use std::env;
use std::ffi::OsStr;

/// Sets variables in the environment inherited by child processes.
pub trait EnvironmentExport: Send + Sync {
    /// Publishes `key=value` for later child processes.
    fn export(&self, key: &str, value: &OsStr);
}

/// Writes directly to the daemon's own process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl EnvironmentExport for ProcessEnvironment {
    fn export(&self, key: &str, value: &OsStr) {
        // SAFETY: bootstrap runs on the main thread before the task runner or
        // any other thread is spawned, so nothing reads the environment
        // concurrently.
        unsafe { env::set_var(key, value) };
    }
}
