//! Backup and restore of one application's declared entries
//!
//! This module provides:
//! - **confirm**: the yes/no capability consulted before overwriting
//! - **engine**: per-entry resolution, safety checks and copying

mod confirm;
mod engine;

pub use confirm::{Answer, Confirm, FixedAnswer, ScriptedAnswers};
pub use engine::{EntryOutcome, ResolvedPathPair, SyncEngine, SyncMode, SyncOptions, SyncReport};
