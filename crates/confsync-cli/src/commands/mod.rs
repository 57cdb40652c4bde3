//! Command implementations for confsync-cli

pub mod config;
pub mod list;
pub mod prune;
pub mod sync;

pub use config::run_config;
pub use list::run_list;
pub use prune::run_prune;
pub use sync::{run_backup, run_restore};
