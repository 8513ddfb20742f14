//! Background maintenance thread started as the last bootstrap step.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{JobScheduler, RESOURCES_TARGET};

const THREAD_NAME: &str = "cronkeep-maintenance";

/// Handle to the running maintenance thread.
///
/// Dropping the handle stops the thread and waits for it to exit.
#[derive(Debug)]
pub struct MaintenanceRunner {
    interval: Duration,
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<u64>>,
}

impl MaintenanceRunner {
    /// Spawns the thread, which ticks every `interval` until stopped.
    ///
    /// # Errors
    ///
    /// Returns the IO error reported when the thread cannot be spawned.
    pub fn start(interval: Duration, scheduler: JobScheduler) -> io::Result<Self> {
        let (stop, stopped) = mpsc::channel::<()>();
        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_owned())
            .spawn(move || {
                let mut ticks = 0_u64;
                loop {
                    match stopped.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            ticks += 1;
                            debug!(
                                target: RESOURCES_TARGET,
                                tick = ticks,
                                jobs = scheduler.job_count(),
                                "maintenance tick"
                            );
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break ticks,
                    }
                }
            })?;
        info!(
            target: RESOURCES_TARGET,
            interval_ms = interval.as_millis(),
            "maintenance runner started"
        );
        Ok(Self {
            interval,
            stop: Some(stop),
            thread: Some(thread),
        })
    }

    /// Tick interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` while the thread has not exited.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
    }

    /// Stops the thread and returns how many ticks it ran.
    pub fn stop(mut self) -> u64 {
        self.shutdown()
    }

    fn shutdown(&mut self) -> u64 {
        // Dropping the sender wakes the thread even if it already exited.
        self.stop.take();
        let Some(thread) = self.thread.take() else {
            return 0;
        };
        match thread.join() {
            Ok(ticks) => {
                info!(target: RESOURCES_TARGET, ticks, "maintenance runner stopped");
                ticks
            }
            Err(_) => {
                warn!(target: RESOURCES_TARGET, "maintenance runner panicked");
                0
            }
        }
    }
}

impl Drop for MaintenanceRunner {
    fn drop(&mut self) {
        self.shutdown();
    }
}
