use std::path::{Path, PathBuf};

/// Remote-host inventory handed to the orchestration tool.
///
/// The inventory grammar belongs to the tool, so the handle only records
/// where the file lives. The file may not exist until the first host is
/// added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInventory {
    path: PathBuf,
}

impl HostInventory {
    /// Binds the inventory to `path`.
    #[must_use]
    pub fn bind(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the hosts file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Returns `true` once the hosts file has been written.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.path.is_file()
    }
}
