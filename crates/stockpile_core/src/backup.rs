//! Backup snapshots and corruption quarantine.
//!
//! Every mutating save is preceded by a timestamped copy of the current
//! durable file, and an unreadable file found at load time is preserved the
//! same way before the store resets. Backup files are append-only artifacts:
//! the store never reads, prunes, or consolidates them - recovery from a
//! backup is a manual operator action.

use crate::error::{StoreError, StoreResult};
use chrono::{Local, NaiveDateTime};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Timestamp format for backup file names, second resolution.
const NAME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// File-name prefix for pre-save snapshots.
const SNAPSHOT_PREFIX: &str = "inventory";

/// File-name prefix for quarantined corrupt files.
const QUARANTINE_PREFIX: &str = "corrupt";

/// Identifier of a written backup: its file name within the backup
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupId(String);

impl BackupId {
    /// The backup's file name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BackupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Writes timestamped, immutable copies of durable-file content.
///
/// Names carry the operation timestamp at second resolution; on collision a
/// counter suffix is appended, so every call yields a distinct file.
#[derive(Debug)]
pub struct BackupManager {
    dir: PathBuf,
}

impl BackupManager {
    /// Creates a manager writing into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(dir).map_err(|source| StoreError::Backup {
            dir: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// The backup directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `current` unmodified as a new pre-save snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written. The
    /// caller must not overwrite the durable file when this fails.
    pub fn snapshot(&self, current: &[u8]) -> StoreResult<BackupId> {
        self.write_unique(SNAPSHOT_PREFIX, current, Local::now().naive_local())
    }

    /// Preserves unreadable durable-file content for inspection.
    ///
    /// Same mechanism as [`snapshot`](Self::snapshot), under a name that
    /// marks the content as corrupt.
    pub fn quarantine(&self, corrupt: &[u8]) -> StoreResult<BackupId> {
        self.write_unique(QUARANTINE_PREFIX, corrupt, Local::now().naive_local())
    }

    fn write_unique(
        &self,
        prefix: &str,
        data: &[u8],
        at: NaiveDateTime,
    ) -> StoreResult<BackupId> {
        let stamp = at.format(NAME_FORMAT);
        let mut counter = 0u32;

        loop {
            let name = if counter == 0 {
                format!("{prefix}_{stamp}.json")
            } else {
                format!("{prefix}_{stamp}_{counter}.json")
            };
            let path = self.dir.join(&name);

            // create_new makes the name claim atomic; a collision within
            // the same second bumps the counter and retries.
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    let write = file.write_all(data).and_then(|()| file.sync_all());
                    if let Err(source) = write {
                        let _ = std::fs::remove_file(&path);
                        return Err(StoreError::Backup {
                            dir: self.dir.clone(),
                            source,
                        });
                    }
                    debug!(backup = %name, bytes = data.len(), "backup written");
                    return Ok(BackupId(name));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    counter += 1;
                }
                Err(source) => {
                    return Err(StoreError::Backup {
                        dir: self.dir.clone(),
                        source,
                    });
                }
            }
        }
    }

    /// Lists backup file names, sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn list(&self) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(|source| StoreError::Backup {
            dir: self.dir.clone(),
            source,
        })? {
            let entry = entry.map_err(|source| StoreError::Backup {
                dir: self.dir.clone(),
                source,
            })?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}
