use std::fs;

use confsync_fs::{HomeDirs, NormalizedPath, ReservedName, io, is_path_inside};
use walkdir::WalkDir;

use super::valid_set::ValidSet;
use crate::catalog::AppConfig;
use crate::config::Config;
use crate::oplog::{LogRecord, RecordSink};
use crate::{Error, Result};

/// Summary of a prune run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub pruned: usize,
    pub failed: usize,
    pub directories_removed: usize,
}

/// Removes store files no catalog references any more.
///
/// The three phases always run over the full catalog set and in order:
/// [`mark`](Self::mark) completes before [`sweep`](Self::sweep) looks at a
/// single file, and [`cleanup`](Self::cleanup) runs last.
pub struct Pruner {
    dirs: HomeDirs,
    store_root: NormalizedPath,
    excluded: Vec<NormalizedPath>,
}

impl Pruner {
    pub fn new(dirs: HomeDirs, store_root: NormalizedPath) -> Self {
        Self {
            dirs,
            store_root: store_root.absolute(),
            excluded: Vec::new(),
        }
    }

    /// Pruner for the store and logs directory named by `config`.
    pub fn from_config(dirs: HomeDirs, config: &Config) -> Self {
        let logs_dir = config.logs_dir(&dirs);
        let store_root = config.store_root(&dirs);
        Self::new(dirs, store_root).excluding(logs_dir)
    }

    /// Never sweep or clean up anything at or below `path`.
    ///
    /// Only has an effect when `path` lies inside the store root.
    pub fn excluding(mut self, path: impl Into<NormalizedPath>) -> Self {
        let path = path.into().absolute();
        if is_path_inside(&path, &self.store_root) {
            self.excluded.push(path);
        }
        self
    }

    pub fn store_root(&self) -> &NormalizedPath {
        &self.store_root
    }

    /// Run mark, sweep and cleanup.
    ///
    /// Removal failures are recorded and the sweep carries on; only a failure
    /// to write a record is reported through the sink's own logging.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreOverlapsLive`] without touching anything when the
    /// store root is, or contains, the home directory, the XDG config directory
    /// or a live declared source.
    pub fn prune(&self, apps: &[&AppConfig], sink: &mut dyn RecordSink) -> Result<PruneReport> {
        if !self.store_root.is_dir() {
            tracing::warn!(store = %self.store_root, "Backup store does not exist, nothing to prune");
            return Ok(PruneReport::default());
        }

        self.check_store_is_separate(apps)?;

        let valid = self.mark(apps);
        tracing::debug!(
            files = valid.files().len(),
            directories = valid.directories().len(),
            "Mark phase complete"
        );

        let mut report = self.sweep(&valid, sink)?;

        match self.cleanup() {
            Ok(removed) => report.directories_removed = removed,
            Err(e) => tracing::error!(store = %self.store_root, "Failed to remove empty directories: {e}"),
        }

        tracing::info!(
            pruned = report.pruned,
            failed = report.failed,
            directories = report.directories_removed,
            "Prune complete"
        );
        Ok(report)
    }

    /// Compute the store paths that are still backed by a live source.
    ///
    /// Entries whose source is gone are left out, which makes their store
    /// copy eligible for removal.
    pub fn mark(&self, apps: &[&AppConfig]) -> ValidSet {
        let mut valid = ValidSet::new();

        for app in apps {
            for entry in app.resolved_entries(&self.dirs, &self.store_root) {
                let Ok(meta) = fs::symlink_metadata(entry.home_path.to_native()) else {
                    tracing::trace!(app = %app.id, source = %entry.home_path, "Source gone, not marked");
                    continue;
                };

                if meta.is_dir() {
                    valid.insert_directory(entry.store_path);
                } else {
                    valid.insert_file(entry.store_path);
                }
            }
        }

        valid
    }

    /// Delete every store file `valid` does not retain.
    pub fn sweep(&self, valid: &ValidSet, sink: &mut dyn RecordSink) -> Result<PruneReport> {
        let mut report = PruneReport::default();

        for path in self.store_files() {
            if valid.retains(&path) {
                continue;
            }

            match io::remove_file(&path) {
                Ok(()) => {
                    tracing::info!(%path, "Pruned orphaned file");
                    report.pruned += 1;
                    record(sink, LogRecord::pruned(&path));
                }
                Err(e) => {
                    let err = Error::Removal {
                        path: path.to_string(),
                        reason: e.to_string(),
                    };
                    tracing::error!("{err}");
                    report.failed += 1;
                    record(sink, LogRecord::prune_failed(&path));
                }
            }
        }

        Ok(report)
    }

    /// Remove directories left empty, deepest first. The store root, `.git`
    /// and excluded paths are kept.
    pub fn cleanup(&self) -> Result<usize> {
        let removed = io::remove_empty_dirs(&self.store_root, |path| {
            let path = NormalizedPath::new(path);
            path.file_name() == Some(ReservedName::GitDir.as_str()) || self.is_excluded(&path)
        })?;
        Ok(removed)
    }

    /// Every non-directory entry under the store root, minus reserved names
    /// and excluded subtrees.
    fn store_files(&self) -> Vec<NormalizedPath> {
        let walker = WalkDir::new(self.store_root.to_native())
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let name = entry.file_name().to_string_lossy();
                !ReservedName::is_reserved(&name, entry.depth())
                    && !self.is_excluded(&NormalizedPath::new(entry.path()))
            });

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) if !entry.file_type().is_dir() => files.push(NormalizedPath::new(entry.path())),
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping unreadable store entry: {e}"),
            }
        }
        files
    }

    /// Refuse a store root that would make the sweep walk live files.
    pub fn check_store_is_separate(&self, apps: &[&AppConfig]) -> Result<()> {
        let live_sources = apps
            .iter()
            .flat_map(|app| app.resolved_entries(&self.dirs, &self.store_root))
            .map(|entry| entry.home_path)
            .filter(|path| fs::symlink_metadata(path.to_native()).is_ok());

        let overlapping = [self.dirs.home().clone(), self.dirs.xdg_config().clone()]
            .into_iter()
            .chain(live_sources)
            .find(|path| *path == self.store_root || is_path_inside(path, &self.store_root));

        match overlapping {
            Some(path) => Err(Error::StoreOverlapsLive {
                store: self.store_root.to_string(),
                path: path.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn is_excluded(&self, path: &NormalizedPath) -> bool {
        self.excluded
            .iter()
            .any(|excluded| path == excluded || is_path_inside(path, excluded))
    }
}

fn record(sink: &mut dyn RecordSink, record: LogRecord) {
    let target = record.target.clone();
    if let Err(e) = sink.record(record) {
        tracing::error!(%target, "Failed to write operation log record: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn setup() -> (TempDir, HomeDirs, NormalizedPath) {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        fs::create_dir_all(home.join(".config")).unwrap();
        let store = temp.path().join("store");
        fs::create_dir_all(&store).unwrap();
        let dirs = HomeDirs::with_home(home.as_path());
        (temp, dirs, NormalizedPath::new(&store))
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_mark_only_includes_live_sources() {
        let (_temp, dirs, store) = setup();
        write(&dirs.home().to_native().join(".rc"), "x");
        fs::create_dir_all(dirs.home().to_native().join(".tool")).unwrap();

        let app = AppConfig::new("tool")
            .with_file(".rc", true)
            .with_file(".tool", true)
            .with_file(".gone", true)
            .with_file(".off", false);
        let valid = Pruner::new(dirs, store.clone()).mark(&[&app]);

        assert!(valid.files().contains(&store.join(".rc")));
        assert_eq!(valid.directories(), &[store.join(".tool")]);
        assert_eq!(valid.files().len(), 1);
    }

    #[test]
    fn test_sweep_skips_reserved_names() {
        let (_temp, dirs, store) = setup();
        let root = store.to_native();
        write(&root.join("README.md"), "readme");
        write(&root.join("LICENSE"), "license");
        write(&root.join(".git/HEAD"), "ref");
        write(&root.join("sub/.DS_Store"), "");
        write(&root.join("sub/README.md"), "nested readme");

        let mut records = Vec::new();
        let report = Pruner::new(dirs, store)
            .sweep(&ValidSet::new(), &mut records)
            .unwrap();

        assert_eq!(report.pruned, 1);
        assert!(root.join("README.md").exists());
        assert!(root.join("LICENSE").exists());
        assert!(root.join(".git/HEAD").exists());
        assert!(root.join("sub/.DS_Store").exists());
        assert!(!root.join("sub/README.md").exists());
    }

    #[test]
    fn test_logs_inside_store_are_never_swept() {
        let (_temp, dirs, store) = setup();
        let logs = store.join("logs");
        write(&logs.to_native().join("1-backup.jsonl"), "{}");

        let mut records = Vec::new();
        let report = Pruner::new(dirs, store)
            .excluding(logs.clone())
            .prune(&[], &mut records)
            .unwrap();

        assert_eq!(report.pruned, 0);
        assert!(logs.to_native().join("1-backup.jsonl").exists());
    }

    #[test]
    fn test_cleanup_keeps_root_and_git() {
        let (_temp, dirs, store) = setup();
        let root = store.to_native();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::create_dir_all(root.join(".git/objects")).unwrap();

        let removed = Pruner::new(dirs, store).cleanup().unwrap();

        assert_eq!(removed, 2);
        assert!(root.exists());
        assert!(root.join(".git/objects").exists());
    }

    #[test]
    fn test_missing_store_is_a_noop() {
        let temp = TempDir::new().unwrap();
        let pruner = Pruner::new(
            HomeDirs::with_home(temp.path()),
            NormalizedPath::new(temp.path()).join("absent"),
        );

        let mut records = Vec::new();
        let report = pruner.prune(&[], &mut records).unwrap();

        assert_eq!(report, PruneReport::default());
        assert!(records.is_empty());
    }
}
