//! Store orchestration: load, validate, mutate, backup, save.

use crate::backup::{BackupId, BackupManager};
use crate::collection::Collection;
use crate::config::Config;
use crate::dir::StoreDir;
use crate::error::{PersistStage, StoreError, StoreResult};
use crate::item::{Item, ItemDraft, ItemPatch};
use crate::report::InventoryReport;
use crate::validate::{validate_new, validate_update};
use std::path::{Path, PathBuf};
use stockpile_codec::CodecError;
use stockpile_storage::{FileBackend, SnapshotBackend};
use tracing::{debug, info, warn};

/// How the collection came to be after a load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// No durable file existed; an empty one was created.
    FirstRun,
    /// The durable file decoded cleanly (or was empty).
    Loaded,
    /// The durable file was unreadable: its bytes were quarantined and the
    /// store reset to an empty collection.
    Recovered {
        /// Name of the quarantine file holding the original bytes.
        backup: BackupId,
        /// Why decoding failed.
        cause: CodecError,
    },
}

/// Result of a [`Store::open`] or [`Store::reload`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    /// What happened during the load.
    pub outcome: LoadOutcome,
    /// Number of items in the collection afterwards.
    pub items: usize,
}

impl LoadReport {
    /// True if the load fell back to an empty collection after quarantining
    /// corrupt content.
    #[must_use]
    pub fn recovered_from_corruption(&self) -> bool {
        matches!(self.outcome, LoadOutcome::Recovered { .. })
    }
}

/// The inventory store: owns the collection and sequences every mutation
/// through the persist protocol.
///
/// # Persist protocol
///
/// Each mutating operation: (1) encodes the proposed collection, (2)
/// snapshots the current durable file into the backup directory, (3) writes
/// the encoding to a temporary location, (4) atomically replaces the
/// durable file, and (5) only then commits the proposed collection in
/// memory. A failure at any step returns an error with both the durable
/// file and the in-memory collection unchanged.
///
/// # Example
///
/// ```no_run
/// use stockpile_core::{ItemDraft, Store};
/// use std::path::Path;
///
/// let mut store = Store::open(Path::new("my_inventory"))?;
/// let item = store.add(ItemDraft::new("SKU-1", "Widget", 5, 2.5))?;
/// assert_eq!(item.name(), "Widget");
/// # Ok::<(), stockpile_core::StoreError>(())
/// ```
pub struct Store {
    config: Config,
    /// Directory handle; holds the advisory lock. `None` when the store
    /// was built over an injected backend.
    _dir: Option<StoreDir>,
    backend: Box<dyn SnapshotBackend>,
    backups: BackupManager,
    durable_path: PathBuf,
    items: Collection,
    last_load: LoadReport,
}

impl Store {
    /// Opens a store rooted at `path` with default configuration.
    ///
    /// Creates the directory, durable file, and backup directory on first
    /// run. Loads (and if necessary recovers) the collection before
    /// returning; inspect [`Store::last_load`] for the outcome.
    ///
    /// # Errors
    ///
    /// - `StoreLocked` if another process owns the store
    /// - `StorageUnavailable` if the durable file cannot be read or created
    pub fn open(path: &Path) -> StoreResult<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Opens a store rooted at `path` with a custom configuration.
    pub fn open_with_config(path: &Path, config: Config) -> StoreResult<Self> {
        let dir = StoreDir::open(path, &config)?;
        let backend = FileBackend::new(dir.durable_file());
        let backups = BackupManager::open(dir.backups_dir())?;
        let durable_path = dir.durable_file().to_path_buf();

        let mut store = Self {
            config,
            _dir: Some(dir),
            backend: Box::new(backend),
            backups,
            durable_path,
            items: Collection::new(),
            last_load: LoadReport {
                outcome: LoadOutcome::FirstRun,
                items: 0,
            },
        };
        store.load()?;
        Ok(store)
    }

    /// Opens a store over an injected backend, with backups in
    /// `backup_dir`.
    ///
    /// No directory layout is created and no lock is taken; intended for
    /// tests that need a memory or failure-injecting backend.
    pub fn open_with_backend(
        config: Config,
        backend: Box<dyn SnapshotBackend>,
        backup_dir: &Path,
    ) -> StoreResult<Self> {
        let backups = BackupManager::open(backup_dir)?;
        let durable_path = PathBuf::from(&config.durable_file_name);

        let mut store = Self {
            config,
            _dir: None,
            backend,
            backups,
            durable_path,
            items: Collection::new(),
            last_load: LoadReport {
                outcome: LoadOutcome::FirstRun,
                items: 0,
            },
        };
        store.load()?;
        Ok(store)
    }

    /// Re-reads the durable file, replacing the in-memory collection.
    ///
    /// Same recovery semantics as the initial load: corrupt content is
    /// quarantined and the collection resets to empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the file cannot be read; the
    /// in-memory collection is left unchanged in that case.
    pub fn reload(&mut self) -> StoreResult<LoadReport> {
        self.load()?;
        Ok(self.last_load.clone())
    }

    fn load(&mut self) -> StoreResult<()> {
        let bytes = self.backend.read_all().map_err(|e| {
            StoreError::storage_unavailable(&self.durable_path, e.to_string())
        })?;

        let (collection, outcome) = match bytes {
            None => {
                // First run: materialize an empty durable file so later
                // saves have a prior state to back up.
                let empty = Collection::new();
                self.write_snapshot(&empty).map_err(|e| {
                    StoreError::storage_unavailable(&self.durable_path, e.to_string())
                })?;
                info!(path = %self.durable_path.display(), "created empty inventory");
                (empty, LoadOutcome::FirstRun)
            }
            Some(raw) if raw.iter().all(u8::is_ascii_whitespace) => {
                // An empty file is a valid empty inventory, not corruption.
                (Collection::new(), LoadOutcome::Loaded)
            }
            Some(raw) => match stockpile_codec::decode(&raw) {
                Ok(records) => {
                    let collection = Collection::from_records(records);
                    info!(items = collection.len(), "inventory loaded");
                    (collection, LoadOutcome::Loaded)
                }
                Err(cause) => {
                    let backup = self.backups.quarantine(&raw)?;
                    warn!(
                        quarantine = %backup,
                        error = %cause,
                        "durable file unreadable; starting from empty collection"
                    );
                    let empty = Collection::new();
                    // Recovery rewrite: the quarantine file is its backup.
                    self.write_snapshot(&empty).map_err(|e| {
                        StoreError::storage_unavailable(&self.durable_path, e.to_string())
                    })?;
                    (empty, LoadOutcome::Recovered { backup, cause })
                }
            },
        };

        self.last_load = LoadReport {
            outcome,
            items: collection.len(),
        };
        self.items = collection;
        Ok(())
    }

    /// Writes `collection` to the backend without taking a backup.
    ///
    /// Only used for the first-run file and the post-quarantine reset; all
    /// mutations go through [`Store::persist`].
    fn write_snapshot(&mut self, collection: &Collection) -> StoreResult<()> {
        let encoded = stockpile_codec::encode(&collection.to_records())
            .map_err(|e| StoreError::persistence(PersistStage::Encode, e.to_string()))?;
        self.backend
            .replace(&encoded)
            .map_err(|e| StoreError::persistence(PersistStage::Write, e.to_string()))?;
        Ok(())
    }

    /// Runs the persist protocol for a proposed collection, committing it
    /// in memory only after the durable file has been replaced.
    fn persist(&mut self, working: Collection) -> StoreResult<()> {
        let encoded = stockpile_codec::encode(&working.to_records())
            .map_err(|e| StoreError::persistence(PersistStage::Encode, e.to_string()))?;

        let current = self.backend.read_all().map_err(|e| {
            StoreError::persistence(
                PersistStage::Backup,
                format!("cannot read current snapshot: {e}"),
            )
        })?;
        if let Some(bytes) = current {
            // The overwrite must not proceed unless the prior state is
            // recoverable.
            let backup = self
                .backups
                .snapshot(&bytes)
                .map_err(|e| StoreError::persistence(PersistStage::Backup, e.to_string()))?;
            debug!(%backup, "pre-save backup written");
        }

        self.backend
            .replace(&encoded)
            .map_err(|e| StoreError::persistence(PersistStage::Write, e.to_string()))?;

        self.items = working;
        debug!(items = self.items.len(), "collection persisted");
        Ok(())
    }

    /// Validates and adds a new item, returning the stored (normalized)
    /// item.
    ///
    /// # Errors
    ///
    /// - [`crate::ValidationError`] variants for a rejected draft (the
    ///   collection is unchanged)
    /// - `Persistence` if the save failed (the collection is unchanged and
    ///   the call may be retried)
    pub fn add(&mut self, draft: ItemDraft) -> StoreResult<Item> {
        let item = validate_new(&draft, &self.items.ids())?;
        let mut working = self.items.clone();
        working.push(item.clone());
        self.persist(working)?;
        info!(id = %item.id(), name = item.name(), "item added");
        Ok(item)
    }

    /// Removes the item with the given id, returning it.
    ///
    /// # Errors
    ///
    /// `NotFound` if no item has that id; `Persistence` on save failure.
    pub fn remove(&mut self, id: &str) -> StoreResult<Item> {
        let index = self
            .items
            .position(id)
            .ok_or_else(|| StoreError::not_found(id))?;
        let mut working = self.items.clone();
        let removed = working.remove_at(index);
        self.persist(working)?;
        info!(id = %removed.id(), name = removed.name(), "item removed");
        Ok(removed)
    }

    /// Applies a patch to the item with the given id, returning the updated
    /// item.
    ///
    /// The id and creation timestamp are immutable; only fields present in
    /// the patch are validated and changed.
    ///
    /// # Errors
    ///
    /// `NotFound` if no item has that id; validation errors for bad patch
    /// fields; `Persistence` on save failure.
    pub fn update(&mut self, id: &str, patch: &ItemPatch) -> StoreResult<Item> {
        let index = self
            .items
            .position(id)
            .ok_or_else(|| StoreError::not_found(id))?;
        let updated = validate_update(&self.items.items()[index], patch)?;
        let mut working = self.items.clone();
        working.replace_at(index, updated.clone());
        self.persist(working)?;
        info!(id = %updated.id(), "item updated");
        Ok(updated)
    }

    /// Case-insensitive substring search over item names.
    ///
    /// Matches are returned in collection order; an empty query matches
    /// every item. An empty result is not an error.
    #[must_use]
    pub fn find_by_name(&self, query: &str) -> Vec<Item> {
        self.items
            .find_by_name(query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Looks up an item by exact id.
    ///
    /// # Errors
    ///
    /// `NotFound` if no item has that id.
    pub fn find_by_id(&self, id: &str) -> StoreResult<Item> {
        self.items
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    /// Items with `quantity <= threshold`, in collection order.
    #[must_use]
    pub fn low_stock(&self, threshold: u64) -> Vec<Item> {
        self.items.low_stock(threshold).into_iter().cloned().collect()
    }

    /// Builds the report aggregate at the given low-stock threshold.
    #[must_use]
    pub fn report(&self, threshold: u64) -> InventoryReport {
        InventoryReport::build(&self.items, threshold)
    }

    /// Re-persists the committed collection through the full protocol.
    ///
    /// A successful call is a no-op for readers of the durable file but
    /// still takes a backup first; used by callers that save on exit.
    pub fn save(&mut self) -> StoreResult<()> {
        let working = self.items.clone();
        self.persist(working)
    }

    /// Outcome of the most recent load or reload.
    #[must_use]
    pub fn last_load(&self) -> &LoadReport {
        &self.last_load
    }

    /// Borrows the items in collection order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        self.items.items()
    }

    /// Number of distinct items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The store configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The backup manager (for listing backup artifacts).
    #[must_use]
    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Path of the durable snapshot file.
    #[must_use]
    pub fn durable_path(&self) -> &Path {
        &self.durable_path
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("durable_path", &self.durable_path)
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open(root: &Path) -> Store {
        Store::open(root).unwrap()
    }

    #[test]
    fn first_run_creates_empty_file() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("store");

        let store = open(&root);
        assert_eq!(store.last_load().outcome, LoadOutcome::FirstRun);
        assert!(store.is_empty());
        assert!(root.join("inventory.json").exists());
    }

    #[test]
    fn add_normalizes_and_persists() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("store");

        {
            let mut store = open(&root);
            let item = store
                .add(ItemDraft::new("1", "  Widget  ", 5, 2.5))
                .unwrap();
            assert_eq!(item.name(), "Widget");
        }

        let store = open(&root);
        assert_eq!(store.last_load().outcome, LoadOutcome::Loaded);
        assert_eq!(store.find_by_id("1").unwrap().name(), "Widget");
    }

    #[test]
    fn duplicate_add_leaves_collection_unchanged() {
        let dir = tempdir().unwrap();
        let mut store = open(&dir.path().join("store"));

        store.add(ItemDraft::new("1", "Widget", 5, 2.5)).unwrap();
        let err = store
            .add(ItemDraft::new("1", "Other", 1, 1.0))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(crate::ValidationError::DuplicateId { .. })
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_id("1").unwrap().name(), "Widget");
    }

    #[test]
    fn invalid_update_leaves_item_unchanged() {
        let dir = tempdir().unwrap();
        let mut store = open(&dir.path().join("store"));
        store.add(ItemDraft::new("1", "Widget", 5, 2.5)).unwrap();

        let err = store
            .update("1", &ItemPatch::empty().quantity(-1))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(crate::ValidationError::InvalidQuantity { .. })
        ));
        assert_eq!(store.find_by_id("1").unwrap().quantity(), 5);
    }

    #[test]
    fn remove_then_lookup_is_not_found() {
        let dir = tempdir().unwrap();
        let mut store = open(&dir.path().join("store"));
        store.add(ItemDraft::new("1", "Widget", 5, 2.5)).unwrap();

        let removed = store.remove("1").unwrap();
        assert_eq!(removed.name(), "Widget");
        assert!(matches!(
            store.find_by_id("1"),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.remove("1"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn update_preserves_id_and_created_at() {
        let dir = tempdir().unwrap();
        let mut store = open(&dir.path().join("store"));
        let original = store.add(ItemDraft::new("1", "Widget", 5, 2.5)).unwrap();

        let updated = store
            .update("1", &ItemPatch::empty().name("Gadget").unit_price(3.0))
            .unwrap();
        assert_eq!(updated.id(), original.id());
        assert_eq!(updated.created_at(), original.created_at());
        assert_eq!(updated.name(), "Gadget");
        assert_eq!(updated.quantity(), 5);
    }

    #[test]
    fn every_mutation_takes_a_backup_first() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("store");
        let mut store = open(&root);

        store.add(ItemDraft::new("1", "A", 1, 1.0)).unwrap();
        store.add(ItemDraft::new("2", "B", 2, 2.0)).unwrap();
        store.remove("1").unwrap();

        assert_eq!(store.backups().list().unwrap().len(), 3);
    }

    #[test]
    fn corruption_is_quarantined_and_store_resets() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("store");

        {
            let mut store = open(&root);
            store.add(ItemDraft::new("1", "Widget", 5, 2.5)).unwrap();
        }

        std::fs::write(root.join("inventory.json"), b"{ not json !!").unwrap();

        let store = open(&root);
        assert!(store.last_load().recovered_from_corruption());
        assert!(store.is_empty());

        // Exactly one quarantine file, holding the exact corrupt bytes.
        let quarantined: Vec<_> = store
            .backups()
            .list()
            .unwrap()
            .into_iter()
            .filter(|n| n.starts_with("corrupt_"))
            .collect();
        assert_eq!(quarantined.len(), 1);
        let bytes = std::fs::read(root.join("backups").join(&quarantined[0])).unwrap();
        assert_eq!(bytes, b"{ not json !!");
    }

    #[test]
    fn schema_violation_also_recovers() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("store");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(
            root.join("inventory.json"),
            br#"[{"id":"1","name":"","quantity":1,"unit_price":1.0,
                "created_at":"2026-08-30 10:15:00"}]"#,
        )
        .unwrap();

        let store = open(&root);
        match &store.last_load().outcome {
            LoadOutcome::Recovered { cause, .. } => assert!(cause.is_schema_mismatch()),
            other => panic!("expected recovery, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_is_a_valid_empty_inventory() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("store");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("inventory.json"), b"  \n").unwrap();

        let store = open(&root);
        assert_eq!(store.last_load().outcome, LoadOutcome::Loaded);
        assert!(store.is_empty());
        assert!(store.backups().list().unwrap().is_empty());
    }

    #[test]
    fn reload_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut store = open(&dir.path().join("store"));
        store.add(ItemDraft::new("1", "Widget", 5, 2.5)).unwrap();
        store.add(ItemDraft::new("2", "Bolt", 9, 0.1)).unwrap();

        let before: Vec<Item> = store.items().to_vec();
        store.reload().unwrap();
        let once: Vec<Item> = store.items().to_vec();
        store.reload().unwrap();
        let twice: Vec<Item> = store.items().to_vec();

        assert_eq!(before, once);
        assert_eq!(once, twice);
    }

    #[test]
    fn save_takes_backup_and_keeps_content() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("store");
        let mut store = open(&root);
        store.add(ItemDraft::new("1", "Widget", 5, 2.5)).unwrap();

        let before = std::fs::read(root.join("inventory.json")).unwrap();
        store.save().unwrap();
        let after = std::fs::read(root.join("inventory.json")).unwrap();

        assert_eq!(before, after);
        assert_eq!(store.backups().list().unwrap().len(), 2);
    }

    #[test]
    fn low_stock_scenario() {
        let dir = tempdir().unwrap();
        let mut store = open(&dir.path().join("store"));
        for (id, quantity) in [("1", 0), ("2", 2), ("3", 3), ("4", 4)] {
            store
                .add(ItemDraft::new(id, format!("Item {id}"), quantity, 1.0))
                .unwrap();
        }

        let low: Vec<_> = store
            .low_stock(3)
            .iter()
            .map(|i| i.id().as_str().to_string())
            .collect();
        assert_eq!(low, vec!["1", "2", "3"]);
    }

    #[test]
    fn report_aggregates() {
        let dir = tempdir().unwrap();
        let mut store = open(&dir.path().join("store"));
        store.add(ItemDraft::new("1", "A", 2, 1.5)).unwrap();
        store.add(ItemDraft::new("2", "B", 3, 2.0)).unwrap();

        let report = store.report(2);
        assert_eq!(report.total_items, 2);
        assert_eq!(report.total_units, 5);
        assert!((report.total_value - 9.0).abs() < f64::EPSILON);
        assert_eq!(report.low_stock.len(), 1);
        assert_eq!(report.low_stock[0].id().as_str(), "1");
    }
}
