//! Store directory management.
//!
//! File system layout for a Stockpile store:
//!
//! ```text
//! <store_root>/
//! ├─ inventory.json    # durable snapshot of the collection
//! ├─ LOCK              # advisory lock for single-process access
//! └─ backups/          # timestamped snapshots and quarantined files
//! ```
//!
//! The LOCK file ensures only one process owns the store at a time, which
//! preserves the no-partial-effect guarantee of the persist protocol on
//! multi-process hosts.

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = "LOCK";

/// Manages the store directory structure and file locking.
///
/// Holds an exclusive advisory lock for its lifetime; dropping the
/// `StoreDir` releases the lock.
#[derive(Debug)]
pub struct StoreDir {
    path: PathBuf,
    durable_file: PathBuf,
    backups_dir: PathBuf,
    /// Lock file handle, held for exclusive access.
    _lock_file: File,
}

impl StoreDir {
    /// Opens or creates a store directory and acquires its lock.
    ///
    /// # Errors
    ///
    /// - `InvalidLayout` if the path exists but is not a directory, or is
    ///   missing and `config.create_if_missing` is false
    /// - `StoreLocked` if another process holds the lock
    /// - `StorageUnavailable` if the directory or lock file cannot be
    ///   created
    pub fn open(path: &Path, config: &Config) -> StoreResult<Self> {
        if !path.exists() {
            if config.create_if_missing {
                fs::create_dir_all(path).map_err(|e| {
                    StoreError::storage_unavailable(path, format!("cannot create: {e}"))
                })?;
            } else {
                return Err(StoreError::invalid_layout(format!(
                    "store directory does not exist: {}",
                    path.display()
                )));
            }
        }

        if !path.is_dir() {
            return Err(StoreError::invalid_layout(format!(
                "path is not a directory: {}",
                path.display()
            )));
        }

        let lock_path = path.join(LOCK_FILE);
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                StoreError::storage_unavailable(&lock_path, format!("cannot open lock: {e}"))
            })?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| StoreError::StoreLocked {
                path: path.to_path_buf(),
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            durable_file: path.join(&config.durable_file_name),
            backups_dir: path.join(&config.backup_dir_name),
            _lock_file: lock_file,
        })
    }

    /// The store root directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the durable snapshot file.
    #[must_use]
    pub fn durable_file(&self) -> &Path {
        &self.durable_file
    }

    /// Path of the backup directory.
    #[must_use]
    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }
}
