//! Atomicity of the persist protocol under injected failures.
//!
//! The contract: if any step of encode -> backup -> write -> replace fails,
//! the durable snapshot and the in-memory collection are both left exactly
//! as they were before the operation.

use stockpile_core::{Config, Store, StoreError};
use stockpile_testkit::prelude::*;
use tempfile::tempdir;

fn store_over_failing_backend() -> (Store, std::sync::Arc<Failpoints>, SharedMemoryBackend, tempfile::TempDir) {
    let backups = tempdir().unwrap();
    let shared = SharedMemoryBackend::new();
    let (backend, points) = FailingBackend::new(Box::new(shared.clone()));
    let store = Store::open_with_backend(
        Config::default(),
        Box::new(backend),
        &backups.path().join("backups"),
    )
    .unwrap();
    (store, points, shared, backups)
}

#[test]
fn failed_write_leaves_durable_file_and_collection_untouched() {
    let (mut store, points, shared, _backups) = store_over_failing_backend();

    store.add(draft("1", "Widget", 5, 2.5)).unwrap();
    let durable_before = shared.contents().unwrap();
    let items_before = store.items().to_vec();

    // Fail the replace step of the next persist, after the backup is taken.
    points.fail_next_replace();
    let err = store.add(draft("2", "Bolt", 3, 0.1)).unwrap_err();
    assert!(matches!(err, StoreError::Persistence { .. }));
    assert!(err.is_retryable());

    assert_eq!(shared.contents().unwrap(), durable_before);
    assert_eq!(store.items(), items_before.as_slice());

    // The failed operation can simply be retried.
    points.reset();
    store.add(draft("2", "Bolt", 3, 0.1)).unwrap();
    assert_eq!(store.len(), 2);
    assert_ne!(shared.contents().unwrap(), durable_before);
}

#[test]
fn failed_backup_read_aborts_before_any_overwrite() {
    let (mut store, points, shared, _backups) = store_over_failing_backend();

    store.add(draft("1", "Widget", 5, 2.5)).unwrap();
    let durable_before = shared.contents().unwrap();

    points.fail_reads(true);
    let err = store.remove("1").unwrap_err();
    assert!(matches!(err, StoreError::Persistence { .. }));

    assert_eq!(shared.contents().unwrap(), durable_before);
    assert_eq!(store.len(), 1);
}

#[test]
fn failed_remove_and_update_leave_state_intact() {
    let (mut store, points, shared, _backups) = store_over_failing_backend();

    store.add(draft("1", "Widget", 5, 2.5)).unwrap();
    let durable_before = shared.contents().unwrap();

    points.fail_next_replace();
    assert!(store.remove("1").is_err());
    assert_eq!(store.find_by_id("1").unwrap().quantity(), 5);
    assert_eq!(shared.contents().unwrap(), durable_before);

    points.fail_next_replace();
    assert!(store
        .update("1", &stockpile_core::ItemPatch::empty().quantity(9))
        .is_err());
    assert_eq!(store.find_by_id("1").unwrap().quantity(), 5);
    assert_eq!(shared.contents().unwrap(), durable_before);
}

#[test]
fn backup_is_taken_before_every_overwrite_attempt() {
    let (mut store, points, _shared, backups) = store_over_failing_backend();
    let backup_dir = backups.path().join("backups");

    store.add(draft("1", "Widget", 5, 2.5)).unwrap();
    let count_after_first = std::fs::read_dir(&backup_dir).unwrap().count();

    points.fail_next_replace();
    let _ = store.add(draft("2", "Bolt", 3, 0.1));

    // The failed attempt still snapshotted the prior state first.
    let count_after_failure = std::fs::read_dir(&backup_dir).unwrap().count();
    assert_eq!(count_after_failure, count_after_first + 1);
}
