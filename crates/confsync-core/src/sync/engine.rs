//! SyncEngine implementation
//!
//! The SyncEngine copies one application's included entries between the home
//! environment and the store. Backup copies home -> store, restore copies
//! store -> home. Every entry is processed on its own: a failure is recorded
//! and the next entry is attempted. The one exception is an overwrite that
//! needs confirmation when no answer can be obtained, which aborts the run.

use std::fs;

use confsync_fs::{HomeDirs, NormalizedPath, io, is_path_inside};

use super::confirm::{Answer, Confirm};
use crate::catalog::{AppConfig, ResolvedEntry};
use crate::oplog::{EntryKind, LogRecord, RecordSink, RunKind, Status};
use crate::{Error, Result};

/// Direction of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// home -> store
    Backup,
    /// store -> home
    Restore,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backup => "backup",
            Self::Restore => "restore",
        }
    }

    pub fn run_kind(&self) -> RunKind {
        match self {
            Self::Backup => RunKind::Backup,
            Self::Restore => RunKind::Restore,
        }
    }
}

/// Options for a sync run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub mode: SyncMode,

    /// Overwrite existing destinations without asking.
    pub force: bool,

    /// Second authorization required before `force` applies to a restore.
    /// Without it a restore keeps asking even when `force` is set.
    pub restore_overwrite_authorized: bool,

    /// Home directory the store was captured under, when different from the
    /// local one. Only consulted on restore.
    pub upstream_home: Option<NormalizedPath>,
}

impl SyncOptions {
    pub fn backup() -> Self {
        Self {
            mode: SyncMode::Backup,
            force: false,
            restore_overwrite_authorized: false,
            upstream_home: None,
        }
    }

    pub fn restore() -> Self {
        Self {
            mode: SyncMode::Restore,
            ..Self::backup()
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn authorize_restore_overwrite(mut self, authorized: bool) -> Self {
        self.restore_overwrite_authorized = authorized;
        self
    }

    pub fn with_upstream_home(mut self, home: Option<NormalizedPath>) -> Self {
        self.upstream_home = home;
        self
    }
}

/// Source and destination of one entry for the current direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPathPair {
    pub source: NormalizedPath,
    pub destination: NormalizedPath,
    pub kind: EntryKind,
}

/// What happened to a single entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Source absent; nothing to do
    Missing,
    /// Copied successfully
    Copied(EntryKind),
    /// Overwrite declined by the user
    Declined(EntryKind),
}

/// Summary of one application's sync
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub application: String,
    pub copied: usize,
    pub skipped: usize,
    pub failed: usize,
    pub missing: usize,
    /// Messages for the failed entries
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn new(application: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            ..Self::default()
        }
    }

    fn tally(&mut self, outcome: &EntryOutcome) {
        match outcome {
            EntryOutcome::Missing => self.missing += 1,
            EntryOutcome::Copied(_) => self.copied += 1,
            EntryOutcome::Declined(_) => self.skipped += 1,
        }
    }

    fn fail(&mut self, error: &Error) {
        self.failed += 1;
        self.errors.push(error.to_string());
    }

    /// Whether every attempted entry succeeded or was skipped by choice.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Add another report's counters to this one.
    pub fn absorb(&mut self, other: &SyncReport) {
        self.copied += other.copied;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.missing += other.missing;
        self.errors.extend(other.errors.iter().cloned());
    }
}

/// Engine for backing up and restoring catalog entries
pub struct SyncEngine {
    dirs: HomeDirs,
    store_root: NormalizedPath,
    options: SyncOptions,
}

impl SyncEngine {
    /// Create a new SyncEngine
    ///
    /// # Arguments
    ///
    /// * `dirs` - The local home and XDG directories
    /// * `store_root` - The effective store root (directory plus prefix)
    /// * `options` - Direction and overwrite policy
    pub fn new(dirs: HomeDirs, store_root: NormalizedPath, options: SyncOptions) -> Self {
        if options.mode == SyncMode::Restore && options.force && !options.restore_overwrite_authorized {
            tracing::warn!(
                "Forced restore was requested without overwrite authorization; existing files will still be confirmed"
            );
        }

        Self {
            dirs,
            store_root: store_root.absolute(),
            options,
        }
    }

    pub fn mode(&self) -> SyncMode {
        self.options.mode
    }

    pub fn store_root(&self) -> &NormalizedPath {
        &self.store_root
    }

    /// Whether existing destinations are overwritten without asking.
    pub fn overwrites_without_asking(&self) -> bool {
        match self.options.mode {
            SyncMode::Backup => self.options.force,
            SyncMode::Restore => self.options.force && self.options.restore_overwrite_authorized,
        }
    }

    /// Back up or restore every included entry of `app`.
    ///
    /// # Errors
    ///
    /// Only [`Error::OverwriteUnanswerable`] is returned; it means the run
    /// must stop. All other per-entry failures are counted in the report.
    pub fn sync_app(
        &self,
        app: &AppConfig,
        confirm: &mut dyn Confirm,
        sink: &mut dyn RecordSink,
    ) -> Result<SyncReport> {
        let mut report = SyncReport::new(app.id.clone());

        if app.is_empty() {
            tracing::warn!(app = %app.id, "No configuration files to {}", self.mode().as_str());
            return Ok(report);
        }

        for entry in app.resolved_entries(&self.dirs, &self.store_root) {
            match self.sync_entry(app, &entry, confirm, sink) {
                Ok(outcome) => report.tally(&outcome),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::error!(app = %app.id, entry = %entry.key, "{e}");
                    report.fail(&e);
                }
            }
        }

        Ok(report)
    }

    /// Source and destination of `entry` for this run's direction.
    pub fn paths_for(&self, entry: &ResolvedEntry) -> (NormalizedPath, NormalizedPath) {
        match self.options.mode {
            SyncMode::Backup => (entry.home_path.clone(), entry.store_path.clone()),
            SyncMode::Restore => (self.remap_upstream(&entry.store_path), entry.home_path.clone()),
        }
    }

    /// Rewrite `<store>/<local home>/...` to `<store>/<upstream home>/...`.
    ///
    /// Paths not under `<store>/<local home>`, and runs without a distinct
    /// upstream home, are returned unchanged.
    pub fn remap_upstream(&self, path: &NormalizedPath) -> NormalizedPath {
        let Some(upstream) = &self.options.upstream_home else {
            return path.clone();
        };
        let local = self.dirs.home();
        if upstream == local {
            return path.clone();
        }

        let from = self.store_root.join(local.as_str());
        let to = self.store_root.join(upstream.as_str());
        match path.replace_prefix(&from, &to) {
            Some(remapped) => {
                tracing::debug!(%path, %remapped, "Remapped to upstream home");
                remapped
            }
            None => path.clone(),
        }
    }

    fn sync_entry(
        &self,
        app: &AppConfig,
        entry: &ResolvedEntry,
        confirm: &mut dyn Confirm,
        sink: &mut dyn RecordSink,
    ) -> Result<EntryOutcome> {
        let action = self.mode().as_str();
        let (source, destination) = self.paths_for(entry);

        if !source.exists() {
            tracing::debug!(%source, "Source does not exist, no {action} required");
            return Ok(EntryOutcome::Missing);
        }

        if source == destination {
            return Err(Error::SamePath {
                path: source.to_string(),
            });
        }

        if is_path_inside(&destination, &source) || is_path_inside(&source, &destination) {
            return Err(Error::NestedPath {
                source_path: source.to_string(),
                destination: destination.to_string(),
            });
        }

        let meta = fs::symlink_metadata(source.to_native())?;
        let kind = if meta.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        let pair = ResolvedPathPair {
            source,
            destination,
            kind,
        };

        match kind {
            EntryKind::File => self.copy_file(app, &pair, confirm, sink),
            EntryKind::Directory => self.copy_directory(app, &pair, confirm, sink),
        }
    }

    fn copy_file(
        &self,
        app: &AppConfig,
        pair: &ResolvedPathPair,
        confirm: &mut dyn Confirm,
        sink: &mut dyn RecordSink,
    ) -> Result<EntryOutcome> {
        let action = self.mode().as_str();

        if pair.destination.exists() && !self.overwrites_without_asking() {
            tracing::warn!(destination = %pair.destination, "{action} file already exists");
            let message = format!(
                "{action} file {} already exists, do you want to overwrite it?",
                pair.destination
            );
            if !self.ask(&message, &pair.destination, confirm)? {
                tracing::debug!(destination = %pair.destination, "{action} file already exists, skip");
                self.write_record(sink, app, pair, Status::Skip);
                return Ok(EntryOutcome::Declined(EntryKind::File));
            }
            tracing::debug!(destination = %pair.destination, "{action} file already exists, overwrite");
        }

        match io::copy_file(&pair.source, &pair.destination) {
            Ok(()) => {
                tracing::info!("File {action} success: {} -> {}", pair.source, pair.destination);
                self.write_record(sink, app, pair, Status::Success);
                Ok(EntryOutcome::Copied(EntryKind::File))
            }
            Err(e) => {
                self.write_record(sink, app, pair, Status::Error);
                Err(copy_error(pair, e))
            }
        }
    }

    fn copy_directory(
        &self,
        app: &AppConfig,
        pair: &ResolvedPathPair,
        confirm: &mut dyn Confirm,
        sink: &mut dyn RecordSink,
    ) -> Result<EntryOutcome> {
        let action = self.mode().as_str();

        let occupied = if !pair.destination.exists() {
            tracing::warn!(destination = %pair.destination, "{action} directory does not exist, creating it");
            if let Err(e) = io::ensure_dir(&pair.destination) {
                self.write_record(sink, app, pair, Status::Error);
                return Err(copy_error(pair, e));
            }
            false
        } else if pair.destination.is_dir() && !pair.destination.is_symlink() {
            match io::is_dir_empty(&pair.destination) {
                Ok(empty) => !empty,
                Err(e) => {
                    self.write_record(sink, app, pair, Status::Error);
                    return Err(copy_error(pair, e));
                }
            }
        } else {
            // a file or link is in the way
            true
        };

        if occupied && !self.overwrites_without_asking() {
            let message = format!(
                "{action} directory {} not empty, do you want to overwrite it?",
                pair.destination
            );
            if !self.ask(&message, &pair.destination, confirm)? {
                tracing::debug!(destination = %pair.destination, "{action} directory not empty, skip");
                self.write_record(sink, app, pair, Status::Skip);
                return Ok(EntryOutcome::Declined(EntryKind::Directory));
            }
            tracing::debug!(destination = %pair.destination, "{action} directory not empty, overwrite");
        }

        match io::copy_tree(&pair.source, &pair.destination) {
            Ok(files) => {
                tracing::info!(files, "Directory {action} success: {} -> {}", pair.source, pair.destination);
                self.write_record(sink, app, pair, Status::Success);
                Ok(EntryOutcome::Copied(EntryKind::Directory))
            }
            Err(e) => {
                self.write_record(sink, app, pair, Status::Error);
                Err(copy_error(pair, e))
            }
        }
    }

    /// Ask for overwrite permission. `Unavailable` is fatal to the run.
    fn ask(&self, message: &str, destination: &NormalizedPath, confirm: &mut dyn Confirm) -> Result<bool> {
        match confirm.confirm(message) {
            Answer::Yes => Ok(true),
            Answer::No => Ok(false),
            Answer::Unavailable => Err(Error::OverwriteUnanswerable {
                path: destination.to_string(),
            }),
        }
    }

    fn write_record(
        &self,
        sink: &mut dyn RecordSink,
        app: &AppConfig,
        pair: &ResolvedPathPair,
        status: Status,
    ) {
        let record = LogRecord::new(&pair.source, &pair.destination, pair.kind, status, app.id.clone());
        if let Err(e) = sink.record(record) {
            tracing::error!(source = %pair.source, "Failed to write operation log record: {e}");
        }
    }
}

fn copy_error(pair: &ResolvedPathPair, error: confsync_fs::Error) -> Error {
    Error::Copy {
        source_path: pair.source.to_string(),
        destination: pair.destination.to_string(),
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(options: SyncOptions) -> SyncEngine {
        SyncEngine::new(
            HomeDirs::new("/home/alice", "/home/alice/.config"),
            NormalizedPath::new("/backup"),
            options,
        )
    }

    fn entry(key: &str) -> ResolvedEntry {
        let dirs = HomeDirs::new("/home/alice", "/home/alice/.config");
        ResolvedEntry {
            key: key.to_string(),
            home_path: dirs.resolve_home(key),
            store_path: NormalizedPath::new("/backup").join(key),
        }
    }

    #[test]
    fn test_backup_direction_is_home_to_store() {
        let (source, destination) = engine(SyncOptions::backup()).paths_for(&entry(".bashrc"));
        assert_eq!(source.as_str(), "/home/alice/.bashrc");
        assert_eq!(destination.as_str(), "/backup/.bashrc");
    }

    #[test]
    fn test_restore_direction_is_store_to_home() {
        let (source, destination) = engine(SyncOptions::restore()).paths_for(&entry(".bashrc"));
        assert_eq!(source.as_str(), "/backup/.bashrc");
        assert_eq!(destination.as_str(), "/home/alice/.bashrc");
    }

    #[test]
    fn test_restore_remaps_upstream_home() {
        let options = SyncOptions::restore().with_upstream_home(Some("/Users/alice".into()));
        let (source, destination) =
            engine(options).paths_for(&entry("/home/alice/.config/starship.toml"));

        assert_eq!(source.as_str(), "/backup/Users/alice/.config/starship.toml");
        assert_eq!(destination.as_str(), "/home/alice/.config/starship.toml");
    }

    #[test]
    fn test_remap_ignores_partial_segment_match() {
        let options = SyncOptions::restore().with_upstream_home(Some("/home/bob".into()));
        let engine = engine(options);
        let path = NormalizedPath::new("/backup/home/alice2/.config/x");
        assert_eq!(engine.remap_upstream(&path), path);
    }

    #[test]
    fn test_remap_is_noop_for_same_home() {
        let options = SyncOptions::restore().with_upstream_home(Some("/home/alice".into()));
        let engine = engine(options);
        let path = NormalizedPath::new("/backup/home/alice/.config/x");
        assert_eq!(engine.remap_upstream(&path), path);
    }

    #[test]
    fn test_backup_does_not_remap() {
        let options = SyncOptions::backup().with_upstream_home(Some("/home/bob".into()));
        let (source, _) = engine(options).paths_for(&entry("/home/alice/.config/x"));
        assert_eq!(source.as_str(), "/home/alice/.config/x");
    }

    #[test]
    fn test_restore_force_requires_authorization() {
        assert!(engine(SyncOptions::backup().with_force(true)).overwrites_without_asking());
        assert!(!engine(SyncOptions::restore().with_force(true)).overwrites_without_asking());
        assert!(
            engine(
                SyncOptions::restore()
                    .with_force(true)
                    .authorize_restore_overwrite(true)
            )
            .overwrites_without_asking()
        );
        assert!(
            !engine(SyncOptions::restore().authorize_restore_overwrite(true))
                .overwrites_without_asking()
        );
    }
}
