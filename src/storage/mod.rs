//! Workspace persistence
//!
//! A [`Storage`] backend is a plain string key-value store. [`WorkspaceStore`]
//! layers the three persisted slots on top of it: the explicit save, its
//! timestamp, and the silent autosave.

pub mod file;
pub mod memory;

#[cfg(target_arch = "wasm32")]
pub mod browser;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::node::Workspace;

pub use file::FileStorage;
pub use memory::MemoryStorage;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage;

/// Shown when a save carries no timestamp
pub const UNKNOWN_SAVE_TIME: &str = "Unknown";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Trait for key-value storage backends.
/// Implementations must be thread-safe (Send + Sync).
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Keys of the persisted slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageKeys {
    pub saved_key: String,
    pub saved_time_key: String,
    pub autosave_key: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            saved_key: "block_flow_workflow".to_string(),
            saved_time_key: "block_flow_saved_time".to_string(),
            autosave_key: "block_flow_autosave".to_string(),
        }
    }
}

/// A workspace read back from the saved slot
#[derive(Debug, Clone, PartialEq)]
pub struct SavedWorkflow {
    pub workspace: Workspace,
    /// Human-readable save time, or "Unknown"
    pub saved_at: String,
}

pub struct WorkspaceStore {
    backend: Box<dyn Storage>,
    keys: StorageKeys,
}

impl WorkspaceStore {
    pub fn new(backend: Box<dyn Storage>, keys: StorageKeys) -> Self {
        Self { backend, keys }
    }

    /// A store backed by memory only
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()), StorageKeys::default())
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Write the saved slot and stamp it with the local time.
    /// Returns the stamp.
    pub fn save(&self, workspace: &Workspace) -> Result<String, StorageError> {
        let stamp = chrono::Local::now()
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string();
        self.save_stamped(workspace, &stamp)?;
        Ok(stamp)
    }

    pub fn save_stamped(&self, workspace: &Workspace, stamp: &str) -> Result<(), StorageError> {
        let json = workspace.to_json()?;
        self.backend.set(&self.keys.saved_key, &json)?;
        self.backend.set(&self.keys.saved_time_key, stamp)?;
        info!(nodes = workspace.node_count(), %stamp, "workflow saved");
        Ok(())
    }

    /// Read the saved slot; `None` when nothing (or an empty string) was saved
    pub fn load(&self) -> Result<Option<SavedWorkflow>, StorageError> {
        let Some(json) = self
            .backend
            .get(&self.keys.saved_key)?
            .filter(|json| !json.is_empty())
        else {
            return Ok(None);
        };
        let workspace = Workspace::from_json(&json)?;
        let saved_at = self
            .backend
            .get(&self.keys.saved_time_key)?
            .unwrap_or_else(|| UNKNOWN_SAVE_TIME.to_string());
        Ok(Some(SavedWorkflow {
            workspace,
            saved_at,
        }))
    }

    /// Write the autosave slot. Failures are logged and dropped.
    pub fn autosave(&self, workspace: &Workspace) {
        let result = workspace
            .to_json()
            .map_err(StorageError::from)
            .and_then(|json| self.backend.set(&self.keys.autosave_key, &json));
        if let Err(e) = result {
            debug!(error = %e, "autosave failed");
        }
    }

    /// Read the autosave slot. Failures are logged and read as nothing saved.
    pub fn load_autosave(&self) -> Option<Workspace> {
        let result = self
            .backend
            .get(&self.keys.autosave_key)
            .and_then(|json| match json {
                Some(json) => Ok(Some(Workspace::from_json(&json)?)),
                None => Ok(None),
            });
        match result {
            Ok(workspace) => workspace,
            Err(e) => {
                debug!(error = %e, "autosave restore failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::Node;

    /// Backend that fails every call
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Backend("storage unavailable".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("quota exceeded".into()))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("storage unavailable".into()))
        }
    }

    fn sample() -> Workspace {
        Workspace::new().with_block(
            Node::trigger()
                .at(20.0, 20.0)
                .then(vec![Node::output(Node::text("hi"))]),
        )
    }

    #[test]
    fn test_save_then_load() {
        let store = WorkspaceStore::in_memory();
        store.save_stamped(&sample(), "1/2/2026, 3:04:05 PM").unwrap();
        let saved = store.load().unwrap().unwrap();
        assert_eq!(saved.workspace, sample());
        assert_eq!(saved.saved_at, "1/2/2026, 3:04:05 PM");
    }

    #[test]
    fn test_load_without_save() {
        assert!(WorkspaceStore::in_memory().load().unwrap().is_none());
    }

    #[test]
    fn test_empty_save_reads_as_missing() {
        let backend = MemoryStorage::new();
        backend.set("block_flow_workflow", "").unwrap();
        let store = WorkspaceStore::new(Box::new(backend), StorageKeys::default());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_missing_timestamp_reads_unknown() {
        let backend = MemoryStorage::new();
        backend
            .set("block_flow_workflow", &sample().to_json().unwrap())
            .unwrap();
        let store = WorkspaceStore::new(Box::new(backend), StorageKeys::default());
        assert_eq!(store.load().unwrap().unwrap().saved_at, UNKNOWN_SAVE_TIME);
    }

    #[test]
    fn test_save_stamp_format() {
        let store = WorkspaceStore::in_memory();
        let stamp = store.save(&sample()).unwrap();
        assert!(stamp.ends_with(" AM") || stamp.ends_with(" PM"));
        assert_eq!(stamp.matches('/').count(), 2);
    }

    #[test]
    fn test_autosave_round_trip() {
        let store = WorkspaceStore::in_memory();
        assert!(store.load_autosave().is_none());
        store.autosave(&sample());
        assert_eq!(store.load_autosave(), Some(sample()));
    }

    #[test]
    fn test_autosave_errors_are_swallowed() {
        let store = WorkspaceStore::new(Box::new(BrokenStorage), StorageKeys::default());
        store.autosave(&sample());
        assert!(store.load_autosave().is_none());
        assert!(store.save(&sample()).is_err());
        assert!(store.load().is_err());
    }

    #[test]
    fn test_corrupt_save_is_an_error() {
        let backend = MemoryStorage::new();
        backend.set("block_flow_workflow", "{not json").unwrap();
        let store = WorkspaceStore::new(Box::new(backend), StorageKeys::default());
        assert!(matches!(store.load(), Err(StorageError::Serialization(_))));
    }
}
