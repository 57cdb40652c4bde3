//! Configuration values and defaults

use std::collections::BTreeMap;

use confsync_fs::{HomeDirs, NormalizedPath};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::merge::merge_values;
use crate::{Error, Result};

fn default_directory() -> String {
    "backup".to_string()
}

fn default_logs() -> String {
    ".confsync/logs".to_string()
}

/// Where the backup store and the operation logs live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    /// Store directory, resolved under the home directory unless absolute
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Prefix inside `directory` under which entries are kept
    #[serde(default)]
    pub path: String,

    /// Directory for operation logs, resolved under the home directory
    /// unless absolute
    #[serde(default = "default_logs")]
    pub logs: String,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            path: String::new(),
            logs: default_logs(),
        }
    }
}

/// Global settings for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: Storage,

    /// When present, only applications mapped to `true` are synced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applications_to_sync: Option<BTreeMap<String, bool>>,

    /// Applications mapped to `true` are never synced
    #[serde(default)]
    pub applications_to_ignore: BTreeMap<String, bool>,
}

impl Config {
    /// The built-in defaults every user file is merged over.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Merge `overrides` over `defaults` and validate the result.
    ///
    /// Neither input is modified.
    pub fn from_overrides(defaults: &Config, overrides: Value) -> Result<Self> {
        let mut merged = serde_json::to_value(defaults)?;
        merge_values(&mut merged, overrides);
        serde_json::from_value(merged).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// The effective store root: `storage.directory` joined with `storage.path`.
    pub fn store_root(&self, dirs: &HomeDirs) -> NormalizedPath {
        dirs.resolve_home(&self.storage.directory)
            .join(&self.storage.path)
    }

    /// Directory the operation log files are written to.
    pub fn logs_dir(&self, dirs: &HomeDirs) -> NormalizedPath {
        dirs.resolve_home(&self.storage.logs)
    }

    /// Whether an application passes the allow/deny filters.
    pub fn wants(&self, app: &str) -> bool {
        if self.applications_to_ignore.get(app).copied().unwrap_or(false) {
            return false;
        }
        match &self.applications_to_sync {
            Some(allowed) => allowed.get(app).copied().unwrap_or(false),
            None => true,
        }
    }
}
