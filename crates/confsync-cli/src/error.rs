//! Error types for confsync-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Process exit code for any failure other than an unanswerable prompt
pub const EXIT_FAILURE: i32 = 1;

/// Process exit code when an overwrite needed confirmation and none could be
/// obtained
pub const EXIT_UNANSWERABLE: i32 = 3;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from confsync-core
    #[error(transparent)]
    Core(#[from] confsync_core::Error),

    /// Error from confsync-fs
    #[error(transparent)]
    Fs(#[from] confsync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Exit code the process should terminate with.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Core(e) if e.is_fatal() => EXIT_UNANSWERABLE,
            _ => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unanswerable_prompt_has_distinct_exit_code() {
        let err = CliError::from(confsync_core::Error::OverwriteUnanswerable {
            path: "/home/alice/.bashrc".into(),
        });
        assert_eq!(err.exit_code(), EXIT_UNANSWERABLE);
        assert_eq!(CliError::user("nope").exit_code(), EXIT_FAILURE);
    }
}
