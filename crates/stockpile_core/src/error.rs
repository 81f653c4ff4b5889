//! Error types for Stockpile core.

use crate::item::ItemId;
use crate::validate::ValidationError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The persist-protocol step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistStage {
    /// Encoding the proposed collection.
    Encode,
    /// Backing up the current durable file.
    Backup,
    /// Writing and atomically replacing the durable file.
    Write,
}

impl std::fmt::Display for PersistStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Encode => "encode",
            Self::Backup => "backup",
            Self::Write => "write",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in Stockpile store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A candidate item or patch failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No item with the given id exists.
    #[error("no item with id '{id}'")]
    NotFound {
        /// The id that was looked up.
        id: ItemId,
    },

    /// The durable file cannot be read or written at all (permissions,
    /// missing directory). The operation did not start.
    #[error("storage unavailable at {path}: {message}")]
    StorageUnavailable {
        /// Path of the durable file or store directory.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// The persist protocol failed after validation passed. The durable
    /// file and the in-memory collection are unchanged; the caller may
    /// retry the operation.
    #[error("persist failed during {stage}: {message}")]
    Persistence {
        /// The protocol step that failed.
        stage: PersistStage,
        /// Description of the failure.
        message: String,
    },

    /// A backup or quarantine file could not be written.
    #[error("backup failed in {dir}: {source}")]
    Backup {
        /// The backup directory.
        dir: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Another process holds the store lock.
    #[error("store locked: another process has exclusive access to {path}")]
    StoreLocked {
        /// The store directory.
        path: PathBuf,
    },

    /// The store path exists but is not usable as a store directory.
    #[error("invalid store layout: {message}")]
    InvalidLayout {
        /// Description of the layout problem.
        message: String,
    },

    /// An I/O error outside the persist protocol.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Creates a not-found error.
    pub fn not_found(id: impl Into<ItemId>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a storage-unavailable error.
    pub fn storage_unavailable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a persistence error for the given protocol stage.
    pub fn persistence(stage: PersistStage, message: impl Into<String>) -> Self {
        Self::Persistence {
            stage,
            message: message.into(),
        }
    }

    /// Creates an invalid-layout error.
    pub fn invalid_layout(message: impl Into<String>) -> Self {
        Self::InvalidLayout {
            message: message.into(),
        }
    }

    /// Returns true if the failed operation can simply be retried later
    /// (transient persistence failure with state intact).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}
