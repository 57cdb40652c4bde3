//! Discovering and loading catalogs from disk

use std::collections::BTreeMap;
use std::fs;

use confsync_fs::{ConfigStore, HomeDirs, NormalizedPath};

use super::app::AppConfig;
use super::builtin::builtin_catalogs;
use crate::config::{CONFIG_DIR_NAME, Config};
use crate::{Error, Result};

/// Default directory for user catalogs inside [`CONFIG_DIR_NAME`].
pub const CATALOG_DIR_NAME: &str = "apps";

/// Every known catalog, keyed by id
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    apps: BTreeMap<String, AppConfig>,
}

impl Catalog {
    pub fn from_apps(apps: impl IntoIterator<Item = AppConfig>) -> Self {
        Self {
            apps: apps.into_iter().map(|app| (app.id.clone(), app)).collect(),
        }
    }

    /// All catalog ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }

    pub fn get(&self, id: &str) -> Option<&AppConfig> {
        self.apps.get(id)
    }

    pub fn all(&self) -> impl Iterator<Item = &AppConfig> {
        self.apps.values()
    }

    /// Catalogs that pass the config's allow/deny filters.
    pub fn selected<'a>(&'a self, config: &'a Config) -> impl Iterator<Item = &'a AppConfig> + 'a {
        self.apps.values().filter(|app| config.wants(&app.id))
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

/// Loads builtin catalogs and user catalogs from a directory.
///
/// A user catalog replaces a builtin one with the same file stem.
pub struct CatalogLoader {
    catalog_dir: NormalizedPath,
    include_builtin: bool,
}

impl CatalogLoader {
    /// Loader reading user catalogs from `~/.confsync/apps`.
    pub fn new(dirs: &HomeDirs) -> Self {
        Self {
            catalog_dir: dirs.home().join(CONFIG_DIR_NAME).join(CATALOG_DIR_NAME),
            include_builtin: true,
        }
    }

    /// Read user catalogs from a custom directory (`CONFSYNC_APPS_DIR`).
    pub fn with_catalog_dir(mut self, dir: impl Into<NormalizedPath>) -> Self {
        self.catalog_dir = dir.into().absolute();
        self
    }

    /// Skip the catalogs compiled into the binary.
    pub fn without_builtin(mut self) -> Self {
        self.include_builtin = false;
        self
    }

    pub fn catalog_dir(&self) -> &NormalizedPath {
        &self.catalog_dir
    }

    /// Load every catalog.
    ///
    /// # Errors
    ///
    /// Fails if the catalog directory cannot be read or any catalog file is
    /// malformed. A missing catalog directory is not an error.
    pub fn load(&self) -> Result<Catalog> {
        let mut apps = BTreeMap::new();

        if self.include_builtin {
            for app in builtin_catalogs()? {
                apps.insert(app.id.clone(), app);
            }
        }

        for app in self.load_user_catalogs()? {
            if apps.contains_key(&app.id) {
                tracing::debug!(app = %app.id, "User catalog overrides builtin");
            }
            apps.insert(app.id.clone(), app);
        }

        tracing::debug!(count = apps.len(), "Loaded catalogs");
        Ok(Catalog { apps })
    }

    fn load_user_catalogs(&self) -> Result<Vec<AppConfig>> {
        if !self.catalog_dir.is_dir() {
            tracing::debug!(dir = %self.catalog_dir, "No user catalog directory");
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(self.catalog_dir.to_native())? {
            let path = NormalizedPath::new(entry?.path());
            if path.is_file() && ConfigStore::supports(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let store = ConfigStore::new();
        paths
            .into_iter()
            .map(|path| {
                let id = catalog_id(&path);
                let mut app: AppConfig = store.load(&path).map_err(|e| Error::InvalidCatalog {
                    app: id.clone(),
                    message: e.to_string(),
                })?;
                tracing::debug!(app = %id, %path, "Parsed catalog");
                app.id = id;
                Ok(app)
            })
            .collect()
    }
}

/// File stem of a catalog path.
fn catalog_id(path: &NormalizedPath) -> String {
    let name = path.file_name().unwrap_or_default();
    match path.extension() {
        Some(ext) => name[..name.len() - ext.len() - 1].to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_catalog_id_strips_extension() {
        assert_eq!(catalog_id(&NormalizedPath::new("/apps/git.toml")), "git");
        assert_eq!(catalog_id(&NormalizedPath::new("/apps/my.tool.yaml")), "my.tool");
    }

    #[test]
    fn test_user_catalog_overrides_builtin() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("git.toml"),
            "[application]\nname = \"Custom Git\"\n\n[configuration_files]\n\".gitconfig\" = true\n",
        )
        .unwrap();

        let catalog = CatalogLoader::new(&HomeDirs::with_home(temp.path()))
            .with_catalog_dir(temp.path())
            .load()
            .unwrap();

        let git = catalog.get("git").unwrap();
        assert_eq!(git.name(), "Custom Git");
        assert!(git.xdg_configuration_files.is_empty());
        assert!(catalog.get("bash").is_some());
    }

    #[test]
    fn test_unsupported_files_are_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.txt"), "not a catalog").unwrap();
        fs::write(
            temp.path().join("tool.json"),
            r#"{"configuration_files": {".toolrc": true}}"#,
        )
        .unwrap();

        let catalog = CatalogLoader::new(&HomeDirs::with_home(temp.path()))
            .with_catalog_dir(temp.path())
            .without_builtin()
            .load()
            .unwrap();

        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["tool"]);
    }

    #[test]
    fn test_malformed_catalog_names_the_app() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("broken.toml"), "[configuration_files\n").unwrap();

        let err = CatalogLoader::new(&HomeDirs::with_home(temp.path()))
            .with_catalog_dir(temp.path())
            .without_builtin()
            .load()
            .unwrap_err();

        assert!(matches!(err, Error::InvalidCatalog { ref app, .. } if app == "broken"));
    }

    #[test]
    fn test_selected_applies_filters() {
        let catalog = Catalog::from_apps([AppConfig::new("git"), AppConfig::new("vim")]);
        let mut config = Config::defaults();
        config.applications_to_ignore.insert("vim".into(), true);

        let selected: Vec<_> = catalog.selected(&config).map(|a| a.id.as_str()).collect();
        assert_eq!(selected, vec!["git"]);
    }
}
