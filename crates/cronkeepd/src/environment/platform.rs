//! Capability query deciding whether this host may drive remote hosts.

use std::env;

/// Operating system family that cannot run the orchestration controller.
const UNSUPPORTED_CONTROLLER_OS: &str = "windows";

/// Answers whether the host can act as an orchestration controller.
pub trait ControllerCapability: Send + Sync {
    /// Name of the host platform, used in diagnostics.
    fn platform(&self) -> &str;

    /// Returns `true` when the orchestration tool can run here as controller.
    fn can_control_hosts(&self) -> bool;
}

/// Capability derived from the compile-time target operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostPlatform;

impl ControllerCapability for HostPlatform {
    fn platform(&self) -> &str {
        env::consts::OS
    }

    fn can_control_hosts(&self) -> bool {
        supports_controller(env::consts::OS)
    }
}

/// Capability fixed to an explicit platform name.
///
/// Useful for simulating hosts other than the one running the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedPlatform {
    name: String,
}

impl NamedPlatform {
    /// Builds a capability for the named operating system.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ControllerCapability for NamedPlatform {
    fn platform(&self) -> &str {
        self.name.as_str()
    }

    fn can_control_hosts(&self) -> bool {
        supports_controller(&self.name)
    }
}

fn supports_controller(os: &str) -> bool {
    !os.eq_ignore_ascii_case(UNSUPPORTED_CONTROLLER_OS)
}
