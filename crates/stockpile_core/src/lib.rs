//! # Stockpile Core
//!
//! Core inventory engine for Stockpile.
//!
//! This crate provides:
//! - [`Item`] - immutable inventory record, built only through validation
//! - [`Collection`] - the insertion-ordered in-memory item set
//! - [`BackupManager`] - timestamped snapshots and corruption quarantine
//! - [`Store`] - the orchestrator: load, validate, mutate, backup, save
//!
//! ## Guarantees
//!
//! Every mutation follows the persist protocol: encode the proposed state,
//! back up the current durable file, write to a temporary location, replace
//! atomically, and only then commit in memory. A failure at any step leaves
//! both the durable file and the in-memory collection untouched.
//!
//! A durable file that cannot be decoded at load time is quarantined into
//! the backup directory and the store starts from an empty collection,
//! reporting the recovery rather than failing.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backup;
mod collection;
mod config;
mod dir;
mod error;
mod item;
mod report;
mod store;
mod validate;

pub use backup::{BackupId, BackupManager};
pub use collection::Collection;
pub use config::Config;
pub use dir::StoreDir;
pub use error::{PersistStage, StoreError, StoreResult};
pub use item::{Item, ItemDraft, ItemId, ItemPatch};
pub use report::InventoryReport;
pub use store::{LoadOutcome, LoadReport, Store};
pub use validate::{validate_new, validate_update, ValidationError};

// Re-exported so callers can construct stores over custom backends without
// depending on the storage crate directly.
pub use stockpile_storage::{FileBackend, MemoryBackend, SnapshotBackend};
