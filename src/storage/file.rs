//! Directory-backed storage: one file per key

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Storage, StorageError};

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Store entries under `dir`, created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::Backend(format!("invalid storage key '{key}'")));
        }
        Ok(self.dir.join(key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(path, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)?) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_in_nested_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path().join("state"));
        assert_eq!(storage.get("block_flow_autosave").unwrap(), None);
        storage.set("block_flow_autosave", "{}").unwrap();
        assert_eq!(storage.get("block_flow_autosave").unwrap().as_deref(), Some("{}"));
        storage.remove("block_flow_autosave").unwrap();
        storage.remove("block_flow_autosave").unwrap();
        assert_eq!(storage.get("block_flow_autosave").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path());
        assert!(matches!(storage.set("../escape", "x"), Err(StorageError::Backend(_))));
        assert!(storage.get("a/b").is_err());
    }
}
