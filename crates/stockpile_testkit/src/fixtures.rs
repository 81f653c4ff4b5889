//! Test fixtures and store helpers.

use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use stockpile_core::{Config, ItemDraft, Store};
use tempfile::TempDir;

/// A store in a temporary directory with automatic cleanup.
pub struct TestStore {
    /// The store instance.
    pub store: Store,
    /// Kept alive so the directory survives until drop.
    temp_dir: TempDir,
}

impl TestStore {
    /// Creates a store in a fresh temporary directory.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a store with a custom configuration.
    pub fn with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let store = Store::open_with_config(&temp_dir.path().join("store"), config)
            .expect("failed to open test store");
        Self { store, temp_dir }
    }

    /// The store root directory.
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("store")
    }

    /// Drops the store handle but keeps the directory, then reopens.
    ///
    /// Simulates a clean process restart.
    pub fn reopen(self) -> Self {
        let Self { store, temp_dir } = self;
        drop(store);
        let reopened = Store::open(&temp_dir.path().join("store"))
            .expect("failed to reopen test store");
        Self {
            store: reopened,
            temp_dir,
        }
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for TestStore {
    type Target = Store;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl DerefMut for TestStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

/// Shorthand for building an [`ItemDraft`].
pub fn draft(id: &str, name: &str, quantity: i64, price: f64) -> ItemDraft {
    ItemDraft::new(id, name, quantity, price)
}

/// Adds `count` distinct items to a store.
pub fn seed(store: &mut Store, count: usize) {
    for i in 0..count {
        store
            .add(draft(
                &format!("id-{i}"),
                &format!("Item {i}"),
                i as i64,
                f64::from(i as u32) / 4.0,
            ))
            .expect("failed to seed item");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_round_trips_through_reopen() {
        let mut store = TestStore::new();
        seed(&mut store, 3);

        let store = store.reopen();
        assert_eq!(store.len(), 3);
        assert_eq!(store.find_by_id("id-1").unwrap().name(), "Item 1");
    }
}
