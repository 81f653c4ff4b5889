//! File-based snapshot backend.

use crate::backend::SnapshotBackend;
use crate::error::{StorageError, StorageResult};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// A file-based snapshot backend.
///
/// The snapshot lives at a fixed path. Replacement is implemented as
/// write-to-temp followed by an atomic rename onto the target path, so a
/// crash or failure mid-write leaves the prior snapshot intact.
///
/// # Durability
///
/// The temporary file is `sync_all`'d before the rename, so a snapshot that
/// `replace` reported as written survives process termination.
///
/// # Example
///
/// ```no_run
/// use stockpile_storage::{SnapshotBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::new(Path::new("inventory.json"));
/// backend.replace(b"[]").unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Creates a backend for the snapshot at `path`.
    ///
    /// The file is not touched until the first `read_all` or `replace`.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Creates a backend at `path`, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directories cannot be created.
    pub fn with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::from_io(parent, e))?;
        }
        Ok(Self::new(path))
    }

    /// Returns the path to the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SnapshotBackend for FileBackend {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::from_io(&self.path, e)),
        };

        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| StorageError::from_io(&self.path, e))?;
        Ok(Some(data))
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        let temp = self.temp_path();

        let write_temp = || -> std::io::Result<()> {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp)?;
            file.write_all(data)?;
            file.sync_all()
        };

        if let Err(e) = write_temp() {
            // Leave no stray temp file behind.
            let _ = fs::remove_file(&temp);
            return Err(StorageError::from_io(&temp, e));
        }

        fs::rename(&temp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            if e.kind() == ErrorKind::PermissionDenied {
                StorageError::PermissionDenied {
                    path: self.path.clone(),
                    source: e,
                }
            } else {
                StorageError::ReplaceFailed {
                    path: self.path.clone(),
                    source: e,
                }
            }
        })
    }

    fn exists(&self) -> StorageResult<bool> {
        Ok(self.path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absent_file_reads_none() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(&dir.path().join("inv.json"));

        assert!(backend.read_all().unwrap().is_none());
        assert!(!backend.exists().unwrap());
    }

    #[test]
    fn replace_then_read() {
        let dir = tempdir().unwrap();
        let mut backend = FileBackend::new(&dir.path().join("inv.json"));

        backend.replace(b"first").unwrap();
        assert_eq!(backend.read_all().unwrap().as_deref(), Some(&b"first"[..]));

        backend.replace(b"second").unwrap();
        assert_eq!(backend.read_all().unwrap().as_deref(), Some(&b"second"[..]));
    }

    #[test]
    fn replace_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inv.json");
        let mut backend = FileBackend::new(&path);

        backend.replace(b"data").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![path.file_name().unwrap()]);
    }

    #[test]
    fn snapshot_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inv.json");

        {
            let mut backend = FileBackend::new(&path);
            backend.replace(b"persistent").unwrap();
        }

        let backend = FileBackend::new(&path);
        assert_eq!(
            backend.read_all().unwrap().as_deref(),
            Some(&b"persistent"[..])
        );
    }

    #[test]
    fn with_create_dirs_builds_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("inv.json");

        let mut backend = FileBackend::with_create_dirs(&path).unwrap();
        backend.replace(b"x").unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("inv.json");
        fs::write(&path, b"secret").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

        let backend = FileBackend::new(&path);
        let result = backend.read_all();

        // Restore permissions so the tempdir can be cleaned up.
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        match result {
            Err(e) => assert!(e.is_permission_denied()),
            // Mode bits do not apply when running as root.
            Ok(_) => {}
        }
    }
}
