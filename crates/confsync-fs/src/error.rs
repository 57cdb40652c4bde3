//! Error types for confsync-fs

use std::path::PathBuf;

/// Result type for confsync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in confsync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Could not determine the home directory")]
    HomeNotFound,

    #[error("XDG config entries must be relative, got absolute path: {path}")]
    AbsoluteXdgPath { path: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
