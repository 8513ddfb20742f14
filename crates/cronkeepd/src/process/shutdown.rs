//! Termination signals that stop a ready service.
//!
//! Handlers are installed before bootstrap starts, so a signal delivered
//! while resources are still being constructed is queued rather than
//! killing the process half-initialised.

use std::fmt;
use std::io;
use std::sync::{Mutex, PoisonError};

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;

/// Raw signal numbers that end a ready service.
pub const SHUTDOWN_SIGNALS: [i32; 4] = [SIGTERM, SIGINT, SIGQUIT, SIGHUP];

/// Termination signal that ended a ready service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopSignal {
    /// `SIGTERM`.
    Terminate,
    /// `SIGINT`.
    Interrupt,
    /// `SIGQUIT`.
    Quit,
    /// `SIGHUP`.
    Hangup,
}

impl StopSignal {
    /// Maps a raw signal number, returning `None` for signals that do not
    /// stop the service.
    #[must_use]
    pub const fn from_raw(signal: i32) -> Option<Self> {
        match signal {
            SIGTERM => Some(Self::Terminate),
            SIGINT => Some(Self::Interrupt),
            SIGQUIT => Some(Self::Quit),
            SIGHUP => Some(Self::Hangup),
            _ => None,
        }
    }

    /// Raw signal number.
    #[must_use]
    pub const fn raw(self) -> i32 {
        match self {
            Self::Terminate => SIGTERM,
            Self::Interrupt => SIGINT,
            Self::Quit => SIGQUIT,
            Self::Hangup => SIGHUP,
        }
    }

    /// Conventional signal name, for example `SIGTERM`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Terminate => "SIGTERM",
            Self::Interrupt => "SIGINT",
            Self::Quit => "SIGQUIT",
            Self::Hangup => "SIGHUP",
        }
    }
}

impl fmt::Display for StopSignal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Blocks a ready service until it should stop.
pub trait ShutdownSignal: Send + Sync {
    /// Waits for the next termination signal.
    fn wait(&self) -> Result<StopSignal, ShutdownError>;
}

/// Errors raised while listening for termination signals.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Registering the signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The listener was closed before any termination signal arrived.
    #[error("signal listener closed before a termination signal arrived")]
    Closed,
}

/// Listener backed by process signal handlers.
pub struct SystemShutdownSignal {
    signals: Mutex<Signals>,
}

impl SystemShutdownSignal {
    /// Registers handlers for every signal in [`SHUTDOWN_SIGNALS`].
    ///
    /// # Errors
    ///
    /// Returns [`ShutdownError::Install`] when registration fails.
    pub fn install() -> Result<Self, ShutdownError> {
        let signals =
            Signals::new(SHUTDOWN_SIGNALS).map_err(|source| ShutdownError::Install { source })?;
        Ok(Self {
            signals: Mutex::new(signals),
        })
    }
}

impl ShutdownSignal for SystemShutdownSignal {
    fn wait(&self) -> Result<StopSignal, ShutdownError> {
        let mut signals = self.signals.lock().unwrap_or_else(PoisonError::into_inner);
        signals
            .forever()
            .find_map(StopSignal::from_raw)
            .ok_or(ShutdownError::Closed)
    }
}

impl fmt::Debug for SystemShutdownSignal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SystemShutdownSignal")
            .field("signals", &SHUTDOWN_SIGNALS)
            .finish()
    }
}
