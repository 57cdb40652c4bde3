//! Locating and loading the user configuration file

use confsync_fs::{ConfigStore, HomeDirs, NormalizedPath};
use serde_json::Value;

use super::settings::Config;
use crate::Result;

/// Directory under the home directory holding confsync's own files.
pub const CONFIG_DIR_NAME: &str = ".confsync";

/// Default configuration file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolves the effective configuration for a run.
pub struct ConfigResolver {
    dirs: HomeDirs,

    /// Explicit config file (`CONFSYNC_CONFIG_FILE`). When `None`,
    /// `~/.confsync/config.toml` is used.
    config_file: Option<NormalizedPath>,
}

impl ConfigResolver {
    pub fn new(dirs: HomeDirs) -> Self {
        Self {
            dirs,
            config_file: None,
        }
    }

    /// Use a specific configuration file instead of the default location.
    pub fn with_config_file(mut self, path: impl Into<NormalizedPath>) -> Self {
        self.config_file = Some(path.into().absolute());
        self
    }

    /// Path of the configuration file this resolver reads.
    pub fn config_path(&self) -> NormalizedPath {
        match &self.config_file {
            Some(path) => path.clone(),
            None => self
                .dirs
                .home()
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        }
    }

    /// Load the user file and merge it over [`Config::defaults`].
    ///
    /// A missing file is not an error: the defaults are used as they are.
    /// A file that exists but fails to parse is.
    pub fn resolve(&self) -> Result<Config> {
        let path = self.config_path();

        if !path.is_file() {
            if self.config_file.is_some() {
                tracing::warn!(%path, "Config file not found, using defaults");
            } else {
                tracing::debug!(%path, "Config file not found, using defaults");
            }
            return Ok(Config::defaults());
        }

        tracing::debug!(%path, "Loading config file");
        let overrides: Value = ConfigStore::new().load(&path)?;
        let config = Config::from_overrides(&Config::defaults(), overrides)?;
        tracing::debug!(?config, "Resolved config");
        Ok(config)
    }
}
