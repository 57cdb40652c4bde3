//! Catalog data model and flattening

use std::collections::BTreeMap;

use confsync_fs::{HomeDirs, NormalizedPath};
use serde::{Deserialize, Serialize};

/// The `[application]` section of a catalog file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSection {
    /// Human readable name, e.g. "Git"
    #[serde(default)]
    pub name: String,
}

/// One application's catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog identifier, taken from the file stem. Used for allow/deny
    /// filtering and in operation log records.
    #[serde(skip)]
    pub id: String,

    #[serde(default)]
    pub application: ApplicationSection,

    /// Home-relative path -> included
    #[serde(default)]
    pub configuration_files: BTreeMap<String, bool>,

    /// XDG-config-relative path -> included
    #[serde(default)]
    pub xdg_configuration_files: BTreeMap<String, bool>,
}

/// Which base directory an entry is declared against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Home,
    XdgConfig,
}

/// A single declared path with its inclusion flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub application: String,
    pub relative_path: String,
    pub included: bool,
    pub namespace: Namespace,
}

/// An included entry with both of its locations worked out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// Key in the flattened mapping
    pub key: String,
    /// Location in the live home environment
    pub home_path: NormalizedPath,
    /// Location inside the store
    pub store_path: NormalizedPath,
}

impl AppConfig {
    /// Build a catalog in code, mainly for tests and builtin definitions.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            application: ApplicationSection { name: id.clone() },
            id,
            ..Self::default()
        }
    }

    /// Declare a home-relative entry.
    pub fn with_file(mut self, path: impl Into<String>, included: bool) -> Self {
        self.configuration_files.insert(path.into(), included);
        self
    }

    /// Declare an XDG-config-relative entry.
    pub fn with_xdg_file(mut self, path: impl Into<String>, included: bool) -> Self {
        self.xdg_configuration_files.insert(path.into(), included);
        self
    }

    /// Display name, falling back to the catalog id.
    pub fn name(&self) -> &str {
        if self.application.name.is_empty() {
            &self.id
        } else {
            &self.application.name
        }
    }

    /// Whether the catalog declares anything at all.
    pub fn is_empty(&self) -> bool {
        self.configuration_files.is_empty() && self.xdg_configuration_files.is_empty()
    }

    /// Every declaration, home entries first.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        let home = self
            .configuration_files
            .iter()
            .map(|(path, included)| (path, included, Namespace::Home));
        let xdg = self
            .xdg_configuration_files
            .iter()
            .map(|(path, included)| (path, included, Namespace::XdgConfig));

        home.chain(xdg)
            .map(|(path, &included, namespace)| CatalogEntry {
                application: self.id.clone(),
                relative_path: path.clone(),
                included,
                namespace,
            })
            .collect()
    }

    /// Included entries with their home and store locations.
    ///
    /// This is the single place where the store layout is decided, so backup,
    /// restore and the prune mark phase always agree on it.
    pub fn resolved_entries(&self, dirs: &HomeDirs, store_root: &NormalizedPath) -> Vec<ResolvedEntry> {
        flatten_catalog(self, dirs)
            .into_iter()
            .filter(|(_, included)| *included)
            .map(|(key, _)| ResolvedEntry {
                home_path: dirs.resolve_home(&key),
                store_path: store_root.join(&key),
                key,
            })
            .collect()
    }
}

/// Merge home and XDG declarations into one `path -> included` mapping.
///
/// Home entries are keyed by their normalized relative path. XDG entries are
/// expanded to absolute paths under the XDG config directory; an XDG entry
/// declared with an absolute path is unsupported, reported and skipped. When
/// both namespaces name the same location the XDG declaration wins.
pub fn flatten_catalog(app: &AppConfig, dirs: &HomeDirs) -> BTreeMap<String, bool> {
    let mut flattened = BTreeMap::new();

    for entry in app.entries() {
        let key = match entry.namespace {
            Namespace::Home => NormalizedPath::new(&entry.relative_path),
            Namespace::XdgConfig => match dirs.resolve_xdg_config(&entry.relative_path) {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(app = %app.id, path = %entry.relative_path, "{e}, skipping");
                    continue;
                }
            },
        };

        if key.as_str().is_empty() {
            tracing::warn!(app = %app.id, path = %entry.relative_path, "Entry resolves to the base directory itself, skipping");
            continue;
        }

        if has_parent_segment(&entry.relative_path) {
            tracing::warn!(
                app = %app.id,
                path = %entry.relative_path,
                normalized = %key,
                "Entry cannot climb out of its base directory, using the normalized path"
            );
        }

        flattened.insert(key.as_str().to_string(), entry.included);
    }

    flattened
}

fn has_parent_segment(declared: &str) -> bool {
    declared.split(['/', '\\']).any(|segment| segment == "..")
}
