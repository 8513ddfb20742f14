//! Process entry: configuration, telemetry, bootstrap, and shutdown.

mod errors;
pub(crate) mod launch;
pub(crate) mod shutdown;

pub use errors::LaunchError;
pub use launch::{LaunchOutcome, run};
pub use shutdown::{
    SHUTDOWN_SIGNALS, ShutdownError, ShutdownSignal, StopSignal, SystemShutdownSignal,
};

pub(crate) const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");
