//! Catalogs shipped with the binary

use confsync_fs::{ConfigStore, NormalizedPath};

use super::app::AppConfig;
use crate::{Error, Result};

const BUILTIN: &[(&str, &str)] = &[
    ("bash", include_str!("builtin/bash.toml")),
    ("git", include_str!("builtin/git.toml")),
    ("starship", include_str!("builtin/starship.toml")),
    ("tmux", include_str!("builtin/tmux.toml")),
    ("vim", include_str!("builtin/vim.toml")),
    ("zsh", include_str!("builtin/zsh.toml")),
];

/// Parse the builtin catalogs.
pub fn builtin_catalogs() -> Result<Vec<AppConfig>> {
    let store = ConfigStore::new();
    BUILTIN
        .iter()
        .map(|(id, content)| {
            let origin = NormalizedPath::new(format!("builtin/{id}.toml"));
            let mut app: AppConfig =
                store
                    .parse(content, "toml", &origin)
                    .map_err(|e| Error::InvalidCatalog {
                        app: id.to_string(),
                        message: e.to_string(),
                    })?;
            app.id = id.to_string();
            Ok(app)
        })
        .collect()
}
