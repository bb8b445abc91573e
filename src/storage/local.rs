//! Local filesystem storage backend
//!
//! Thin wrapper over std::fs with paths relative to a base directory.

use super::StorageError;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// Base directory for relative paths
    base_dir: PathBuf,
}

impl LocalStorage {
    /// Create a local storage backend with a custom base directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Full path for a relative one
    pub fn path_of(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }

    pub fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        Ok(std::fs::read(self.path_of(path))?)
    }

    /// Write a file, creating parent directories as needed.
    /// Goes through a temporary file so a crash never leaves half a save.
    pub fn write(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.path_of(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = full_path.with_extension("tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &full_path)?;
        Ok(())
    }

    /// Delete a file. Not found is OK.
    pub fn delete(&self, path: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_of(path)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, LocalStorage) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::with_base_dir(dir.path());
        (dir, storage)
    }

    #[test]
    fn test_write_and_read() {
        let (dir, storage) = setup_test_dir();

        storage.write("saves/test.json", b"hello world").unwrap();
        assert_eq!(storage.read("saves/test.json").unwrap(), b"hello world");
        assert!(!dir.path().join("saves/test.tmp").exists());
    }

    #[test]
    fn test_read_not_found() {
        let (_dir, storage) = setup_test_dir();
        assert!(matches!(storage.read("nonexistent.txt"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_delete() {
        let (dir, storage) = setup_test_dir();
        std::fs::write(dir.path().join("delete_me.txt"), "x").unwrap();

        storage.delete("delete_me.txt").unwrap();
        assert!(!dir.path().join("delete_me.txt").exists());

        // Deleting again should be OK
        storage.delete("delete_me.txt").unwrap();
    }
}
