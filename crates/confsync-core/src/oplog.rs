//! Append-only operation log
//!
//! Every mutating action a run attempts is written as one JSON line the
//! moment its outcome is known. One file per run, named
//! `<unix-millis>-<run>.jsonl`. The store-side path of each record is written
//! relative to the log's base directory so a log stays meaningful when the
//! store is moved to another machine.

use std::fmt;

use chrono::Utc;
use confsync_fs::{NormalizedPath, io};
use serde::{Deserialize, Serialize};

use crate::Result;

/// `source` of a pruned record: the file had no live counterpart.
pub const ORPHAN_SOURCE: &str = "ORPHAN";

/// `application` of records not attributable to one application.
pub const SYSTEM_APPLICATION: &str = "SYSTEM";

/// What kind of filesystem object an entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// Outcome of one entry-level operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
    Skip,
    Pruned,
}

/// The kind of run a log file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Backup,
    Restore,
    Prune,
}

impl RunKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backup => "backup",
            Self::Restore => "restore",
            Self::Prune => "prune",
        }
    }

    /// Whether the store-side path of a record is its `source` (restore)
    /// rather than its `target` (backup, prune).
    fn store_is_source(&self) -> bool {
        matches!(self, Self::Restore)
    }
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the operation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub target: String,
    pub source: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub status: Status,
    pub application: String,
}

impl LogRecord {
    pub fn new(
        source: &NormalizedPath,
        target: &NormalizedPath,
        kind: EntryKind,
        status: Status,
        application: impl Into<String>,
    ) -> Self {
        Self {
            target: target.as_str().to_string(),
            source: source.as_str().to_string(),
            kind,
            status,
            application: application.into(),
        }
    }

    /// Record for an orphaned store file removed by prune.
    pub fn pruned(target: &NormalizedPath) -> Self {
        Self {
            target: target.as_str().to_string(),
            source: ORPHAN_SOURCE.to_string(),
            kind: EntryKind::File,
            status: Status::Pruned,
            application: SYSTEM_APPLICATION.to_string(),
        }
    }

    /// Record for an orphaned store file prune failed to remove.
    pub fn prune_failed(target: &NormalizedPath) -> Self {
        Self {
            status: Status::Error,
            ..Self::pruned(target)
        }
    }
}

/// Destination for log records
pub trait RecordSink {
    /// Persist one record before returning.
    fn record(&mut self, record: LogRecord) -> Result<()>;
}

/// In-memory sink, used by tests and dry inspection.
impl RecordSink for Vec<LogRecord> {
    fn record(&mut self, record: LogRecord) -> Result<()> {
        self.push(record);
        Ok(())
    }
}

/// The on-disk operation log for one run
#[derive(Debug, Clone)]
pub struct OperationLog {
    path: NormalizedPath,
    base: NormalizedPath,
    run: RunKind,
}

impl OperationLog {
    /// Prepare a new log file in `logs_dir`.
    ///
    /// Nothing is written until the first record, so a run that does nothing
    /// leaves no file behind. `base` is the directory store-side paths are
    /// made relative to, normally the store root.
    pub fn create(logs_dir: &NormalizedPath, base: &NormalizedPath, run: RunKind) -> Self {
        let file_name = format!("{}-{}.jsonl", Utc::now().timestamp_millis(), run);
        Self {
            path: logs_dir.join(&file_name),
            base: base.clone(),
            run,
        }
    }

    /// Path of the log file.
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn run(&self) -> RunKind {
        self.run
    }

    /// Express `path` relative to the base directory when it lies below it.
    fn relativize(&self, path: &str) -> String {
        match NormalizedPath::new(path).relative_to(&self.base) {
            Some(rest) if rest.is_empty() => ".".to_string(),
            Some(rest) => rest,
            None => path.to_string(),
        }
    }
}

impl RecordSink for OperationLog {
    fn record(&mut self, mut record: LogRecord) -> Result<()> {
        if self.run.store_is_source() {
            record.source = self.relativize(&record.source);
        } else {
            record.target = self.relativize(&record.target);
        }

        let line = serde_json::to_string(&record)?;
        io::append_line(&self.path, &line)?;
        Ok(())
    }
}

/// Read a log file back, one record per line.
pub fn read_log(path: &NormalizedPath) -> Result<Vec<LogRecord>> {
    let content = io::read_text(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Ok(serde_json::from_str(line)?))
        .collect()
}
