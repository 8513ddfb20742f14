//! Temporary service roots laid out on disk for bootstrap tests.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use cronkeep_config::{InstallMarker, RuntimePaths};

/// `app.ini` with every connection field set.
pub const APP_CONFIG: &str = "\
[server]
http_port = 5920

[db]
engine = mysql
host = 127.0.0.1
port = 3306
user = cron
password = hunter2
database = cronkeep
charset = utf8
prefix = ck_
";

/// A service root inside a temporary directory.
pub struct ServiceRoot {
    dir: TempDir,
    paths: RuntimePaths,
}

impl ServiceRoot {
    /// An empty root with no directories.
    #[must_use]
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("create temporary service root");
        let paths = RuntimePaths::resolve(dir.path());
        Self { dir, paths }
    }

    /// A root with `conf`, `log`, and `data` created.
    #[must_use]
    pub fn with_layout() -> Self {
        let root = Self::empty();
        for dir in root.paths.required_directories() {
            fs::create_dir_all(dir).expect("create required directory");
        }
        root
    }

    /// An installed root whose `app.ini` holds [`APP_CONFIG`].
    #[must_use]
    pub fn installed() -> Self {
        let root = Self::with_layout();
        root.write_app_config(APP_CONFIG);
        root.mark_installed();
        root
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> &RuntimePaths {
        &self.paths
    }

    /// Joins a directory name such as `log` onto the root.
    #[must_use]
    pub fn dir(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    pub fn remove_dir(&self, name: &str) {
        fs::remove_dir_all(self.dir(name)).expect("remove directory");
    }

    pub fn write_app_config(&self, contents: &str) {
        fs::write(self.paths.app_config(), contents).expect("write app.ini");
    }

    pub fn remove_app_config(&self) {
        fs::remove_file(self.paths.app_config()).expect("remove app.ini");
    }

    pub fn mark_installed(&self) {
        InstallMarker::for_paths(&self.paths)
            .create()
            .expect("create install marker");
    }

    pub fn remove_marker(&self) {
        fs::remove_file(self.paths.install_marker()).expect("remove install marker");
    }
}
