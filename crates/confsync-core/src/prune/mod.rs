//! Mark-and-sweep removal of orphaned store files
//!
//! A prune run marks every store path that a catalog currently declares and
//! whose live source still exists, then deletes every other file in the store
//! and finally removes the directories that were left empty.

mod pruner;
mod valid_set;

pub use pruner::{PruneReport, Pruner};
pub use valid_set::ValidSet;
