//! Core engine for confsync
//!
//! This crate implements the three store operations on top of `confsync-fs`:
//!
//! - **Catalogs**: per-application declarations of which paths are synced
//! - **Configuration**: defaults merged with the user's config file
//! - **SyncEngine**: backup (home -> store) and restore (store -> home)
//! - **Pruner**: mark-and-sweep removal of orphaned store files
//! - **Operation log**: one JSON line per entry-level action
//!
//! # Architecture
//!
//! ```text
//!                 confsync-cli
//!                      |
//!                confsync-core
//!      +--------+------+------+-------+
//!      |        |      |      |       |
//!   catalog  config  sync  prune  oplog
//!                      |
//!                 confsync-fs
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod oplog;
pub mod prune;
pub mod sync;

pub use catalog::{AppConfig, Catalog, CatalogLoader, ResolvedEntry, flatten_catalog};
pub use config::{Config, ConfigResolver, Storage};
pub use error::{Error, Result};
pub use oplog::{EntryKind, LogRecord, OperationLog, RecordSink, RunKind, Status, read_log};
pub use prune::{PruneReport, Pruner, ValidSet};
pub use sync::{
    Answer, Confirm, FixedAnswer, ScriptedAnswers, SyncEngine, SyncMode, SyncOptions, SyncReport,
};
