//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The process lacks permission to read or write the snapshot.
    #[error("permission denied accessing {path}")]
    PermissionDenied {
        /// The path that could not be accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The atomic replace could not be completed.
    #[error("replace failed for {path}: {source}")]
    ReplaceFailed {
        /// The snapshot path that was being replaced.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Classifies an I/O error against a path, surfacing permission
    /// failures as their own variant.
    pub fn from_io(path: &std::path::Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                path: path.to_path_buf(),
                source,
            }
        } else {
            Self::Io(source)
        }
    }

    /// Returns true if this error is a permission failure.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}
