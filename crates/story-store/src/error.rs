//! Store errors

use std::path::PathBuf;
use story_model::ProjectId;

/// Errors from project store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Project rejected because its identifier is empty
    #[error("project identifier must not be empty")]
    InvalidProject,

    /// No project with this identifier
    #[error("project with identifier '{0}' not found")]
    NotFound(ProjectId),

    /// Snapshot file exists but cannot be decoded
    #[error("corrupt snapshot {path}: {source}")]
    CorruptSnapshot {
        /// Snapshot file
        path: PathBuf,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the snapshot failed
    #[error("io error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Encoding the snapshot failed
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// Store has been stopped
    #[error("store is stopped")]
    Stopped,

    /// `stop` was called more than once
    #[error("store already stopped")]
    AlreadyStopped,
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this is a lookup miss
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = StoreError::NotFound(ProjectId::from("p-9"));
        assert_eq!(err.to_string(), "project with identifier 'p-9' not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn io_error_names_path() {
        let err = StoreError::io_error(
            "/x",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("/x"));
    }
}
