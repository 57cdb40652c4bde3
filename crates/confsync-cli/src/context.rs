//! Run context shared by every command
//!
//! Resolves the home directories, the merged configuration and the catalog
//! set once, before a command touches the filesystem.

use std::path::Path;

use confsync_core::{AppConfig, Catalog, CatalogLoader, Config, ConfigResolver};
use confsync_fs::{HomeDirs, NormalizedPath};

use crate::error::Result;

/// Everything a command needs to know about the environment
pub struct RunContext {
    pub dirs: HomeDirs,
    pub config_path: NormalizedPath,
    pub config: Config,
    pub catalog_dir: NormalizedPath,
    pub catalog: Catalog,
}

impl RunContext {
    /// Resolve from the process environment.
    pub fn load(config_file: Option<&Path>, apps_dir: Option<&Path>) -> Result<Self> {
        let dirs = HomeDirs::from_env()?;
        Self::load_with(dirs, config_file, apps_dir)
    }

    /// Resolve against explicit home directories.
    pub fn load_with(dirs: HomeDirs, config_file: Option<&Path>, apps_dir: Option<&Path>) -> Result<Self> {
        let mut resolver = ConfigResolver::new(dirs.clone());
        if let Some(path) = config_file {
            resolver = resolver.with_config_file(path);
        }
        let config_path = resolver.config_path();
        let config = resolver.resolve()?;

        let mut loader = CatalogLoader::new(&dirs);
        if let Some(dir) = apps_dir {
            loader = loader.with_catalog_dir(dir);
        }
        let catalog_dir = loader.catalog_dir().clone();
        let catalog = loader.load()?;

        Ok(Self {
            dirs,
            config_path,
            config,
            catalog_dir,
            catalog,
        })
    }

    pub fn store_root(&self) -> NormalizedPath {
        self.config.store_root(&self.dirs)
    }

    pub fn logs_dir(&self) -> NormalizedPath {
        self.config.logs_dir(&self.dirs)
    }

    /// Catalogs that pass the config's allow/deny filters.
    pub fn selected_apps(&self) -> Vec<&AppConfig> {
        self.catalog.selected(&self.config).collect()
    }
}
