//! In-memory snapshot backend for testing.

use crate::backend::SnapshotBackend;
use crate::error::StorageResult;

/// An in-memory snapshot backend.
///
/// Holds the snapshot in a `Vec<u8>`. Used for tests and ephemeral stores;
/// data does not survive the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    snapshot: Option<Vec<u8>>,
}

impl MemoryBackend {
    /// Creates an empty backend with no snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-seeded with a snapshot.
    ///
    /// Useful for tests that need an existing (possibly corrupt) file.
    #[must_use]
    pub fn with_snapshot(data: Vec<u8>) -> Self {
        Self {
            snapshot: Some(data),
        }
    }
}

impl SnapshotBackend for MemoryBackend {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.snapshot.clone())
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        self.snapshot = Some(data.to_vec());
        Ok(())
    }
}
