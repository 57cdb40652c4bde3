//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Provides consistent path handling across platforms by normalizing
/// all paths to forward slashes internally and converting to
/// platform-native format only at I/O boundaries.
///
/// Normalization also resolves `.` and `..` segments lexically. A `..` that
/// would climb above the start of the path is dropped, so a relative path can
/// never escape the base it is later joined onto.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str.replace('\\', "/")),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    ///
    /// The segment is always treated as relative: a leading separator does
    /// not reset the path to the filesystem root. This is what maps an
    /// absolute source path to its location inside the store.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let joined = if self.inner.is_empty() {
            segment_normalized.trim_start_matches('/').to_string()
        } else if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self {
            inner: clean(&joined),
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) if trimmed.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Whether the path is rooted (`/...` or a drive prefix like `C:/...`).
    pub fn is_absolute(&self) -> bool {
        let bytes = self.inner.as_bytes();
        self.inner.starts_with('/')
            || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
    }

    /// Resolve a relative path against the current working directory.
    ///
    /// Absolute paths are returned unchanged. If the working directory cannot
    /// be read the path is returned as is.
    pub fn absolute(&self) -> Self {
        if self.is_absolute() {
            return self.clone();
        }
        match std::env::current_dir() {
            Ok(cwd) => Self::new(dunce::simplified(&cwd)).join(&self.inner),
            Err(_) => self.clone(),
        }
    }

    /// Iterate over the non-empty segments of the path.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|s| !s.is_empty())
    }

    /// The path of `self` relative to `base`, or `None` if `self` does not
    /// lie at or below `base`.
    ///
    /// Matching is done on whole segments, so `/a/bc` is not below `/a/b`.
    /// Returns `Some("")` when both paths are equal.
    pub fn relative_to(&self, base: &NormalizedPath) -> Option<String> {
        if self.is_absolute() != base.is_absolute() {
            return None;
        }
        let mut own = self.segments();
        for expected in base.segments() {
            if own.next() != Some(expected) {
                return None;
            }
        }
        Some(own.collect::<Vec<_>>().join("/"))
    }

    /// Replace a leading `from` prefix with `to`.
    ///
    /// Returns `None` when `self` does not start with `from` on a segment
    /// boundary.
    pub fn replace_prefix(&self, from: &NormalizedPath, to: &NormalizedPath) -> Option<Self> {
        let rest = self.relative_to(from)?;
        if rest.is_empty() {
            Some(to.clone())
        } else {
            Some(to.join(&rest))
        }
    }

    /// Check if this path exists on the filesystem.
    ///
    /// A dangling symbolic link counts as existing.
    pub fn exists(&self) -> bool {
        std::fs::symlink_metadata(self.to_native()).is_ok()
    }

    /// Check if this is a directory (following symlinks).
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file (following symlinks).
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Check if this is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        self.to_native().is_symlink()
    }
}

/// Collapse separators and resolve `.`/`..` lexically.
fn clean(raw: &str) -> String {
    let is_network = raw.starts_with("//") && !raw.starts_with("///");
    let is_rooted = raw.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    if is_network {
        format!("//{body}")
    } else if is_rooted {
        format!("/{body}")
    } else {
        body
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
