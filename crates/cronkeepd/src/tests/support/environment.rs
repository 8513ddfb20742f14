//! Deterministic stand-ins for the host environment checks.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::environment::{
    DirectoryAccess, EnvironmentExport, EnvironmentProbes, NamedPlatform, PathError,
    SystemDirectoryAccess, ToolProbe, ToolProbeError,
};

pub const FAKE_TOOL: &str = "fake-orchestrator";

#[derive(Debug)]
struct FakeState {
    platform: String,
    tool_missing: bool,
    denied: HashSet<PathBuf>,
    probes: usize,
    checked: Vec<PathBuf>,
    exports: Vec<(String, OsString)>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            platform: String::from("linux"),
            tool_missing: false,
            denied: HashSet::new(),
            probes: 0,
            checked: Vec::new(),
            exports: Vec::new(),
        }
    }
}

/// Shared fake implementing every environment trait.
///
/// Directory checks hit the real filesystem unless the path was denied, so
/// tests control presence with a temporary root and permissions here.
#[derive(Clone, Debug, Default)]
pub struct FakeEnvironment {
    state: Arc<Mutex<FakeState>>,
}

impl FakeEnvironment {
    /// Probes wired to this fake, using the platform set so far.
    #[must_use]
    pub fn probes(&self) -> EnvironmentProbes {
        EnvironmentProbes::system(FAKE_TOOL)
            .with_capability(NamedPlatform::new(self.lock().platform.clone()))
            .with_tool_probe(self.clone())
            .with_directory_access(self.clone())
            .with_exporter(self.clone())
    }

    pub fn set_platform(&self, platform: &str) {
        self.lock().platform = platform.to_owned();
    }

    pub fn remove_tool(&self) {
        self.lock().tool_missing = true;
    }

    pub fn deny(&self, path: impl Into<PathBuf>) {
        self.lock().denied.insert(path.into());
    }

    #[must_use]
    pub fn probe_count(&self) -> usize {
        self.lock().probes
    }

    #[must_use]
    pub fn checked(&self) -> Vec<PathBuf> {
        self.lock().checked.clone()
    }

    #[must_use]
    pub fn exports(&self) -> Vec<(String, OsString)> {
        self.lock().exports.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake environment mutex poisoned")
    }
}

impl ToolProbe for FakeEnvironment {
    fn tool(&self) -> &str {
        FAKE_TOOL
    }

    fn probe(&self) -> Result<(), ToolProbeError> {
        let mut state = self.lock();
        state.probes += 1;
        if state.tool_missing {
            return Err(ToolProbeError::Spawn {
                tool: FAKE_TOOL.to_owned(),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }
        Ok(())
    }
}

impl DirectoryAccess for FakeEnvironment {
    fn check(&self, path: &Path) -> Result<(), PathError> {
        let denied = {
            let mut state = self.lock();
            state.checked.push(path.to_path_buf());
            state.denied.contains(path)
        };
        if denied {
            return Err(PathError::from_io(
                path,
                io::Error::from(io::ErrorKind::PermissionDenied),
            ));
        }
        SystemDirectoryAccess.check(path)
    }
}

impl EnvironmentExport for FakeEnvironment {
    fn export(&self, key: &str, value: &OsStr) {
        self.lock()
            .exports
            .push((key.to_owned(), value.to_os_string()));
    }
}
