//! Snapshot backend trait definition.

use crate::error::StorageResult;

/// A low-level snapshot store for Stockpile.
///
/// Backends are **opaque byte stores** holding a single snapshot. They
/// provide two operations: read the whole snapshot, and atomically replace
/// it. Stockpile owns all format interpretation - backends do not understand
/// inventory records or JSON.
///
/// # Invariants
///
/// - `read_all` returns `None` until the first successful `replace`
/// - After `replace(data)` succeeds, `read_all` returns exactly `data`
/// - If `replace` fails, a subsequent `read_all` returns the prior snapshot
///   unchanged - never a partial write
///
/// # Implementors
///
/// - [`super::MemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait SnapshotBackend: Send {
    /// Reads the entire current snapshot.
    ///
    /// Returns `None` if no snapshot has ever been written (first run).
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot exists but cannot be read, including
    /// permission failures.
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Atomically replaces the snapshot with `data`.
    ///
    /// After this returns successfully the new snapshot is durable. On
    /// failure the prior snapshot is left intact.
    ///
    /// # Errors
    ///
    /// Returns an error if the write or the atomic swap fails.
    fn replace(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Returns true if a snapshot currently exists.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self) -> StorageResult<bool> {
        Ok(self.read_all()?.is_some())
    }
}
