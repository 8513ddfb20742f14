//! Installation marker read at startup and written by the install workflow.
//!
//! The marker's existence is the only record that first-time setup has
//! completed. Reading it distinguishes "absent" from "could not tell": the
//! latter is surfaced so callers never mistake an unreadable configuration
//! directory for a fresh installation.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info};

use crate::layout::RuntimePaths;

const INSTALL_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::install");

/// Sentinel file recording that installation has completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallMarker {
    path: PathBuf,
}

impl InstallMarker {
    /// Binds the marker to an explicit path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Binds the marker to its location inside the service layout.
    #[must_use]
    pub fn for_paths(paths: &RuntimePaths) -> Self {
        Self::new(paths.install_marker())
    }

    /// Marker file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Reports whether the marker exists.
    ///
    /// # Errors
    ///
    /// Returns [`InstallStateError`] when the filesystem reports anything
    /// other than "not found", leaving the installation state indeterminate.
    pub fn is_installed(&self) -> Result<bool, InstallStateError> {
        match fs::metadata(&self.path) {
            Ok(_) => Ok(true),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(InstallStateError {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Creates the marker, declaring the service installed.
    ///
    /// Failures are recoverable: the install workflow may retry or prompt.
    ///
    /// # Errors
    ///
    /// Returns [`InstallLockError::AlreadyInstalled`] when the marker is
    /// already present and [`InstallLockError::Create`] for any other
    /// filesystem failure.
    pub fn create(&self) -> Result<(), InstallLockError> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        match options.open(&self.path) {
            Ok(file) => {
                file.sync_all().map_err(|source| self.creation_failed(source))?;
                info!(
                    target: INSTALL_TARGET,
                    file = %self.path.display(),
                    "installation marker created"
                );
                Ok(())
            }
            Err(source) if source.kind() == io::ErrorKind::AlreadyExists => {
                let error = InstallLockError::AlreadyInstalled {
                    path: self.path.clone(),
                };
                error!(target: INSTALL_TARGET, error = %error, "installation marker not created");
                Err(error)
            }
            Err(source) => Err(self.creation_failed(source)),
        }
    }

    fn creation_failed(&self, source: io::Error) -> InstallLockError {
        let error = InstallLockError::Create {
            path: self.path.clone(),
            source,
        };
        error!(
            target: INSTALL_TARGET,
            error = %error,
            "failed to create installation marker"
        );
        error
    }
}

/// The marker's presence could not be determined.
#[derive(Debug, Error)]
#[error("cannot determine installation state from '{}': {source}", .path.display())]
pub struct InstallStateError {
    /// Marker path that could not be inspected.
    pub path: PathBuf,
    /// Underlying filesystem error.
    #[source]
    pub source: io::Error,
}

/// Errors returned to the install workflow when the marker cannot be written.
#[derive(Debug, Error)]
pub enum InstallLockError {
    /// The marker already exists.
    #[error("installation marker '{}' already exists", .path.display())]
    AlreadyInstalled {
        /// Existing marker path.
        path: PathBuf,
    },
    /// Creating or syncing the marker failed.
    #[error("failed to create installation marker '{}': {source}", .path.display())]
    Create {
        /// Marker path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}
