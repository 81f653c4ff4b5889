//! Failure-injecting storage backends.
//!
//! Used to verify the persist protocol's no-partial-effect guarantee: a
//! replace or read failure at a chosen point must leave both the durable
//! snapshot and the in-memory collection exactly as they were.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use stockpile_storage::{SnapshotBackend, StorageError, StorageResult};

/// Shared control handle for a [`FailingBackend`].
///
/// The backend itself is moved into the store under test; tests keep a
/// clone of the `Arc` to flip failures on and off mid-run.
#[derive(Debug, Default)]
pub struct Failpoints {
    fail_reads: AtomicBool,
    replaces_allowed: AtomicUsize,
    unlimited: AtomicBool,
    replaces_seen: AtomicUsize,
}

impl Failpoints {
    fn new() -> Arc<Self> {
        let points = Self::default();
        points.unlimited.store(true, Ordering::SeqCst);
        Arc::new(points)
    }

    /// Makes every subsequent read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Allows `count` more successful replaces, then fails the rest.
    pub fn fail_replaces_after(&self, count: usize) {
        self.unlimited.store(false, Ordering::SeqCst);
        self.replaces_allowed.store(count, Ordering::SeqCst);
    }

    /// Makes the next replace fail immediately.
    pub fn fail_next_replace(&self) {
        self.fail_replaces_after(0);
    }

    /// Clears all injected failures.
    pub fn reset(&self) {
        self.fail_reads.store(false, Ordering::SeqCst);
        self.unlimited.store(true, Ordering::SeqCst);
    }

    /// Number of replace attempts observed so far.
    pub fn replaces_seen(&self) -> usize {
        self.replaces_seen.load(Ordering::SeqCst)
    }

    fn take_replace_permit(&self) -> bool {
        if self.unlimited.load(Ordering::SeqCst) {
            return true;
        }
        loop {
            let allowed = self.replaces_allowed.load(Ordering::SeqCst);
            if allowed == 0 {
                return false;
            }
            if self
                .replaces_allowed
                .compare_exchange(allowed, allowed - 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return true;
            }
        }
    }
}

fn injected(what: &str) -> StorageError {
    StorageError::Io(io::Error::new(
        io::ErrorKind::Other,
        format!("injected {what} failure"),
    ))
}

/// A backend wrapper that fails reads or replaces on command.
pub struct FailingBackend {
    inner: Box<dyn SnapshotBackend>,
    points: Arc<Failpoints>,
}

impl FailingBackend {
    /// Wraps `inner`, returning the backend and its control handle.
    pub fn new(inner: Box<dyn SnapshotBackend>) -> (Self, Arc<Failpoints>) {
        let points = Failpoints::new();
        (
            Self {
                inner,
                points: Arc::clone(&points),
            },
            points,
        )
    }
}

impl SnapshotBackend for FailingBackend {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        if self.points.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("read"));
        }
        self.inner.read_all()
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        self.points.replaces_seen.fetch_add(1, Ordering::SeqCst);
        if !self.points.take_replace_permit() {
            return Err(injected("replace"));
        }
        self.inner.replace(data)
    }
}

/// A memory backend whose contents can be inspected from outside the
/// store that owns it.
#[derive(Debug, Clone, Default)]
pub struct SharedMemoryBackend {
    snapshot: Arc<Mutex<Option<Vec<u8>>>>,
}

impl SharedMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-seeded with snapshot bytes.
    pub fn with_snapshot(data: Vec<u8>) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(Some(data))),
        }
    }

    /// Returns the current snapshot bytes, if any.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.snapshot.lock().expect("snapshot lock poisoned").clone()
    }
}

impl SnapshotBackend for SharedMemoryBackend {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        *self.snapshot.lock().expect("snapshot lock poisoned") = Some(data.to_vec());
        Ok(())
    }
}
