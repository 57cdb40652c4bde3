//! Application catalogs
//!
//! A catalog declares, per application, which paths take part in backup and
//! restore. Entries are either relative to the home directory
//! (`configuration_files`) or to the XDG config directory
//! (`xdg_configuration_files`).

mod app;
mod builtin;
mod loader;

pub use app::{AppConfig, ApplicationSection, CatalogEntry, Namespace, ResolvedEntry, flatten_catalog};
pub use builtin::builtin_catalogs;
pub use loader::{CATALOG_DIR_NAME, Catalog, CatalogLoader};
