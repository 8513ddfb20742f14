//! Verifies that the required service directories exist and are usable.
//!
//! Directories are never created here. A missing directory and a directory
//! the process may not use are different operator mistakes, so they are
//! reported as different errors.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Checks a single required directory.
pub trait DirectoryAccess: Send + Sync {
    /// Confirms `path` is an existing directory the process can use.
    fn check(&self, path: &Path) -> Result<(), PathError>;
}

/// Errors raised for a required directory.
#[derive(Debug, Error)]
pub enum PathError {
    /// The directory does not exist.
    #[error("required directory '{}' does not exist", .path.display())]
    Missing {
        /// Directory that was expected.
        path: PathBuf,
    },
    /// The directory exists but the process lacks permission to use it.
    #[error("required directory '{}' is not accessible: permission denied", .path.display())]
    PermissionDenied {
        /// Directory that could not be used.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The path exists but is not a directory.
    #[error("required directory '{}' is not a directory", .path.display())]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },
    /// Any other failure while inspecting the directory.
    #[error("failed to inspect required directory '{}': {source}", .path.display())]
    Inaccessible {
        /// Directory that could not be inspected.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl PathError {
    /// Classifies an IO error raised while inspecting `path`.
    #[must_use]
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::Missing { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            _ => Self::Inaccessible { path, source },
        }
    }

    /// Directory the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Missing { path }
            | Self::PermissionDenied { path, .. }
            | Self::NotADirectory { path }
            | Self::Inaccessible { path, .. } => path.as_path(),
        }
    }
}

/// Directory checks backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDirectoryAccess;

impl DirectoryAccess for SystemDirectoryAccess {
    fn check(&self, path: &Path) -> Result<(), PathError> {
        let metadata = fs::metadata(path).map_err(|source| PathError::from_io(path, source))?;
        if !metadata.is_dir() {
            return Err(PathError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        probe_permissions(path)
    }
}

/// Requires read, write, and search permission for the effective user.
#[cfg(unix)]
fn probe_permissions(path: &Path) -> Result<(), PathError> {
    use nix::unistd::{AccessFlags, access};

    access(path, AccessFlags::R_OK | AccessFlags::W_OK | AccessFlags::X_OK)
        .map_err(|errno| access_error(path, errno))
}

/// Maps an `access(2)` failure; `EACCES` and `EPERM` both mean denied.
#[cfg(unix)]
fn access_error(path: &Path, errno: nix::errno::Errno) -> PathError {
    PathError::from_io(path, io::Error::from(errno))
}

#[cfg(not(unix))]
fn probe_permissions(path: &Path) -> Result<(), PathError> {
    fs::read_dir(path)
        .map(drop)
        .map_err(|source| PathError::from_io(path, source))
}
