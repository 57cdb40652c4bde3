//! [`TestHome`] sandbox for backup, restore and prune scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use confsync_fs::{HomeDirs, NormalizedPath};
use tempfile::TempDir;

/// A temporary directory laid out as:
///
/// ```text
/// <tmp>/home           home directory
/// <tmp>/home/.config   XDG config directory
/// <tmp>/store          backup store
/// <tmp>/logs           operation logs
/// <tmp>/apps           user catalogs
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use confsync_test_utils::TestHome;
///
/// let sandbox = TestHome::new();
/// sandbox.write_home(".bashrc", "export A=1");
/// sandbox.assert_home_exists(".bashrc");
/// ```
pub struct TestHome {
    temp_dir: TempDir,
}

impl Default for TestHome {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHome {
    /// Create the sandbox with the home and XDG directories in place.
    /// The store is not created.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("home/.config")).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn home(&self) -> PathBuf {
        self.root().join("home")
    }

    pub fn xdg(&self) -> PathBuf {
        self.home().join(".config")
    }

    pub fn store(&self) -> PathBuf {
        self.root().join("store")
    }

    pub fn logs(&self) -> PathBuf {
        self.root().join("logs")
    }

    pub fn apps(&self) -> PathBuf {
        self.root().join("apps")
    }

    /// Home and XDG directories of the sandbox.
    pub fn dirs(&self) -> HomeDirs {
        HomeDirs::new(self.home(), self.xdg())
    }

    pub fn store_root(&self) -> NormalizedPath {
        NormalizedPath::new(self.store())
    }

    pub fn logs_dir(&self) -> NormalizedPath {
        NormalizedPath::new(self.logs())
    }

    /// Create the store directory.
    pub fn init_store(&self) {
        fs::create_dir_all(self.store()).unwrap();
    }

    pub fn write_home(&self, rel: &str, content: &str) -> PathBuf {
        write(&self.home().join(rel), content)
    }

    pub fn write_xdg(&self, rel: &str, content: &str) -> PathBuf {
        write(&self.xdg().join(rel), content)
    }

    pub fn write_store(&self, rel: &str, content: &str) -> PathBuf {
        write(&self.store().join(rel), content)
    }

    /// Write a user catalog into the sandbox's catalog directory.
    pub fn write_catalog(&self, file_name: &str, content: &str) -> PathBuf {
        write(&self.apps().join(file_name), content)
    }

    /// Write a config file at `<tmp>/config.toml`.
    pub fn write_config(&self, content: &str) -> PathBuf {
        write(&self.root().join("config.toml"), content)
    }

    pub fn mkdir_home(&self, rel: &str) -> PathBuf {
        let path = self.home().join(rel);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Create a symbolic link at `rel` in the home directory pointing at `target`.
    #[cfg(unix)]
    pub fn symlink_home(&self, rel: &str, target: &str) -> PathBuf {
        let link = self.home().join(rel);
        if let Some(parent) = link.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        std::os::unix::fs::symlink(target, &link).unwrap();
        link
    }

    pub fn read_home(&self, rel: &str) -> String {
        fs::read_to_string(self.home().join(rel)).unwrap()
    }

    pub fn read_store(&self, rel: &str) -> String {
        fs::read_to_string(self.store().join(rel)).unwrap()
    }

    pub fn remove_home(&self, rel: &str) {
        let path = self.home().join(rel);
        if path.is_dir() {
            fs::remove_dir_all(path).unwrap();
        } else {
            fs::remove_file(path).unwrap();
        }
    }

    /// Every `*.jsonl` file in the logs directory, oldest first.
    pub fn log_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.logs()) else {
            return Vec::new();
        };
        let mut files: Vec<_> = entries
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "jsonl"))
            .collect();
        files.sort();
        files
    }

    /// Assert that `rel` exists under the home directory.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_home_exists(&self, rel: &str) {
        assert_exists(&self.home().join(rel));
    }

    pub fn assert_home_not_exists(&self, rel: &str) {
        assert_not_exists(&self.home().join(rel));
    }

    pub fn assert_store_exists(&self, rel: &str) {
        assert_exists(&self.store().join(rel));
    }

    pub fn assert_store_not_exists(&self, rel: &str) {
        assert_not_exists(&self.store().join(rel));
    }
}

fn write(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

fn assert_exists(path: &Path) {
    assert!(
        fs::symlink_metadata(path).is_ok(),
        "Expected path to exist: {}",
        path.display()
    );
}

fn assert_not_exists(path: &Path) {
    assert!(
        fs::symlink_metadata(path).is_err(),
        "Expected path NOT to exist: {}",
        path.display()
    );
}
