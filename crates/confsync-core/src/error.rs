//! Error types for confsync-core

/// Result type for confsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in confsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration values could not be merged into a valid config
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Catalog file could not be loaded
    #[error("Invalid catalog for {app}: {message}")]
    InvalidCatalog { app: String, message: String },

    /// Source and destination resolve to the same path
    #[error("Source and destination are the same path: {path}")]
    SamePath { path: String },

    /// Source and destination are nested, so copying would write into its own tree
    #[error("Source {source_path} and destination {destination} are nested inside one another")]
    NestedPath {
        source_path: String,
        destination: String,
    },

    /// An overwrite needed confirmation and none could be obtained
    #[error("Cannot confirm overwrite of {path}: no interactive answer available")]
    OverwriteUnanswerable { path: String },

    /// Copying an entry failed
    #[error("Failed to copy {source_path} to {destination}: {reason}")]
    Copy {
        source_path: String,
        destination: String,
        reason: String,
    },

    /// The store root overlaps a live location, so sweeping it could delete live files
    #[error("Refusing to prune {store}: it contains the live path {path}")]
    StoreOverlapsLive { store: String, path: String },

    /// Removing an orphaned store file failed
    #[error("Failed to remove {path}: {reason}")]
    Removal { path: String, reason: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from confsync-fs
    #[error(transparent)]
    Fs(#[from] confsync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error must abort the whole run rather than a single entry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::OverwriteUnanswerable { .. })
    }
}
