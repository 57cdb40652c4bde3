//! Reserved bookkeeping names inside the backup store.

use std::path::Path;

/// Names inside the store that never belong to a catalog entry.
///
/// The store is commonly a git checkout with a README, so these are left alone
/// by the prune sweep and by empty-directory cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedName {
    /// The `.git` directory (version-control metadata)
    GitDir,
    /// macOS Finder metadata
    DsStore,
    /// Top-level `README.md`
    Readme,
    /// Top-level `LICENSE`
    License,
}

impl ReservedName {
    pub const ALL: [ReservedName; 4] = [Self::GitDir, Self::DsStore, Self::Readme, Self::License];

    /// Get the string representation of the name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitDir => ".git",
            Self::DsStore => ".DS_Store",
            Self::Readme => "README.md",
            Self::License => "LICENSE",
        }
    }

    /// Whether the name is reserved at any depth, or only directly under
    /// the store root.
    pub fn applies_at_any_depth(&self) -> bool {
        matches!(self, Self::GitDir | Self::DsStore)
    }

    /// Check whether a directory entry name at `depth` (1 = directly under the
    /// store root) is reserved.
    pub fn is_reserved(name: &str, depth: usize) -> bool {
        Self::ALL
            .iter()
            .any(|r| r.as_str() == name && (depth == 1 || r.applies_at_any_depth()))
    }
}

impl AsRef<Path> for ReservedName {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ReservedName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ReservedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
