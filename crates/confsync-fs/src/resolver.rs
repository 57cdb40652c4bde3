//! Home and XDG path resolution
//!
//! Catalog entries are declared relative to either the home directory or the
//! XDG config directory. `HomeDirs` turns those declarations into absolute
//! paths, and [`is_path_inside`] is the containment test every copy and
//! every sweep decision goes through.

use crate::{Error, NormalizedPath, Result};

/// Environment variable naming the XDG config base directory.
pub const XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";

/// The base directories catalog entries are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeDirs {
    home: NormalizedPath,
    xdg_config: NormalizedPath,
}

impl HomeDirs {
    /// Build from explicit directories.
    pub fn new(home: impl Into<NormalizedPath>, xdg_config: impl Into<NormalizedPath>) -> Self {
        Self {
            home: home.into().absolute(),
            xdg_config: xdg_config.into().absolute(),
        }
    }

    /// Build with the XDG config directory defaulting to `<home>/.config`.
    pub fn with_home(home: impl Into<NormalizedPath>) -> Self {
        let home = home.into().absolute();
        let xdg_config = home.join(".config");
        Self { home, xdg_config }
    }

    /// Resolve from the process environment.
    ///
    /// The home directory comes from the platform (`$HOME`, `%USERPROFILE%`).
    /// `$XDG_CONFIG_HOME` is honoured when set to an absolute path, otherwise
    /// `<home>/.config` is used.
    pub fn from_env() -> Result<Self> {
        let home = dirs::home_dir().ok_or(Error::HomeNotFound)?;
        let mut dirs = Self::with_home(home);

        if let Some(xdg) = std::env::var_os(XDG_CONFIG_HOME).filter(|v| !v.is_empty()) {
            let xdg = NormalizedPath::new(std::path::PathBuf::from(xdg));
            if xdg.is_absolute() {
                dirs.xdg_config = xdg;
            } else {
                tracing::debug!(%xdg, "Ignoring relative XDG_CONFIG_HOME");
            }
        }

        tracing::debug!(home = %dirs.home, xdg_config = %dirs.xdg_config, "Resolved home directories");
        Ok(dirs)
    }

    pub fn home(&self) -> &NormalizedPath {
        &self.home
    }

    pub fn xdg_config(&self) -> &NormalizedPath {
        &self.xdg_config
    }

    /// Resolve a path declared relative to the home directory.
    ///
    /// Already-absolute paths are returned normalized but otherwise unchanged.
    pub fn resolve_home(&self, relative: &str) -> NormalizedPath {
        let path = NormalizedPath::new(relative);
        if path.is_absolute() {
            path
        } else {
            self.home.join(path.as_str())
        }
    }

    /// Resolve a path declared relative to the XDG config directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AbsoluteXdgPath`] when the declaration is absolute;
    /// XDG entries are defined to be relative only.
    pub fn resolve_xdg_config(&self, relative: &str) -> Result<NormalizedPath> {
        let path = NormalizedPath::new(relative);
        if path.is_absolute() {
            return Err(Error::AbsoluteXdgPath {
                path: relative.to_string(),
            });
        }
        Ok(self.xdg_config.join(path.as_str()))
    }
}

/// True iff `child` lies strictly below `parent`.
///
/// Both paths are made absolute first. The relative path from `parent` to
/// `child` must be non-empty and must not climb out through `..`, so a path is
/// never inside itself and siblings sharing a string prefix (`/a/bc` vs
/// `/a/b`) are not inside each other.
pub fn is_path_inside(child: &NormalizedPath, parent: &NormalizedPath) -> bool {
    match child.absolute().relative_to(&parent.absolute()) {
        Some(rest) => !rest.is_empty(),
        None => false,
    }
}
