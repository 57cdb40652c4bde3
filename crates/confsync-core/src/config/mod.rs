//! User configuration
//!
//! Configuration is an immutable defaults value with the user's file merged
//! on top:
//!
//! 1. **Defaults** - [`Config::defaults`]
//! 2. **User file** - `$CONFSYNC_CONFIG_FILE`, or `~/.confsync/config.toml`
//!
//! The merge is structural: tables merge key by key, any other value in the
//! user file replaces the default.

mod merge;
mod resolver;
mod settings;

pub use merge::merge_values;
pub use resolver::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, ConfigResolver};
pub use settings::{Config, Storage};
