//! Filesystem layer for confsync
//!
//! Provides path normalization, home/XDG path resolution, the containment
//! predicate used as the safety discipline for every copy and deletion, and
//! the copy primitives shared by backup, restore and prune.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod resolver;

pub use config::ConfigStore;
pub use constants::ReservedName;
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use resolver::{HomeDirs, is_path_inside};
