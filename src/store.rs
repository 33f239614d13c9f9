//! Namespaced key/value persistence with per-entry expiry.
//!
//! Used to keep the last editor contents across sessions. Entries carry an
//! absolute expiry (unix seconds); an expired entry reads as absent and is
//! dropped the next time the store is written.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Namespace for everything mdlive stores.
pub const NAMESPACE: &str = "com.mdlive";
/// Key holding the last editor contents.
pub const LAST_STATE_KEY: &str = "last_state";
/// 2099-02-01T00:00:00Z.
pub const LAST_STATE_EXPIRES_AT: u64 = 4_073_587_200;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Entry {
    value: String,
    expires_at: u64,
}

type Namespaces = BTreeMap<String, BTreeMap<String, Entry>>;

/// Storage backend.
pub trait KeyValueStore {
    /// Read a live entry. `now` is unix seconds.
    fn get(&self, namespace: &str, key: &str, now: u64) -> Option<String>;

    /// Write an entry that expires at `expires_at` (unix seconds).
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend cannot persist the write.
    fn set(
        &mut self,
        namespace: &str,
        key: &str,
        value: &str,
        expires_at: u64,
    ) -> Result<(), StoreError>;

    /// # Errors
    /// Returns [`StoreError`] when the backend cannot persist the removal.
    fn remove(&mut self, namespace: &str, key: &str) -> Result<(), StoreError>;
}

/// Current time in unix seconds.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

fn lookup(data: &Namespaces, namespace: &str, key: &str, now: u64) -> Option<String> {
    data.get(namespace)?
        .get(key)
        .filter(|entry| entry.expires_at > now)
        .map(|entry| entry.value.clone())
}

fn insert(data: &mut Namespaces, namespace: &str, key: &str, value: &str, expires_at: u64) {
    data.entry(namespace.to_string()).or_default().insert(
        key.to_string(),
        Entry {
            value: value.to_string(),
            expires_at,
        },
    );
}

fn prune(data: &mut Namespaces, now: u64) {
    for entries in data.values_mut() {
        entries.retain(|_, entry| entry.expires_at > now);
    }
    data.retain(|_, entries| !entries.is_empty());
}

/// JSON file backend.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: Namespaces,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    /// Fails when the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Namespaces::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Namespaces::new(),
            Err(err) => return Err(err.into()),
        };
        tracing::debug!(path = %path.display(), namespaces = data.len(), "store opened");
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        prune(&mut self.data, now_secs());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::trace!(path = %self.path.display(), "store written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, namespace: &str, key: &str, now: u64) -> Option<String> {
        lookup(&self.data, namespace, key, now)
    }

    fn set(
        &mut self,
        namespace: &str,
        key: &str,
        value: &str,
        expires_at: u64,
    ) -> Result<(), StoreError> {
        insert(&mut self.data, namespace, key, value, expires_at);
        self.flush()
    }

    fn remove(&mut self, namespace: &str, key: &str) -> Result<(), StoreError> {
        if let Some(entries) = self.data.get_mut(namespace) {
            entries.remove(key);
        }
        self.flush()
    }
}

/// In-memory backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Namespaces,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, namespace: &str, key: &str, now: u64) -> Option<String> {
        lookup(&self.data, namespace, key, now)
    }

    fn set(
        &mut self,
        namespace: &str,
        key: &str,
        value: &str,
        expires_at: u64,
    ) -> Result<(), StoreError> {
        insert(&mut self.data, namespace, key, value, expires_at);
        Ok(())
    }

    fn remove(&mut self, namespace: &str, key: &str) -> Result<(), StoreError> {
        if let Some(entries) = self.data.get_mut(namespace) {
            entries.remove(key);
        }
        Ok(())
    }
}

/// Load the last editor contents.
pub fn load_last_state(store: &dyn KeyValueStore) -> Option<String> {
    store.get(NAMESPACE, LAST_STATE_KEY, now_secs())
}

/// Persist the editor contents as the last state.
///
/// # Errors
/// Propagates the backend's write failure.
pub fn save_last_state(store: &mut dyn KeyValueStore, content: &str) -> Result<(), StoreError> {
    store.set(NAMESPACE, LAST_STATE_KEY, content, LAST_STATE_EXPIRES_AT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.set("ns", "k", "v", 100).unwrap();
        assert_eq!(store.get("ns", "k", 50).as_deref(), Some("v"));
        assert_eq!(store.get("ns", "other", 50), None);
        assert_eq!(store.get("other", "k", 50), None);
    }

    #[test]
    fn test_expired_entry_reads_as_absent() {
        let mut store = MemoryStore::new();
        store.set("ns", "k", "v", 100).unwrap();
        assert_eq!(store.get("ns", "k", 100), None);
        assert_eq!(store.get("ns", "k", 200), None);
    }

    #[test]
    fn test_remove_deletes_entry() {
        let mut store = MemoryStore::new();
        store.set("ns", "k", "v", 100).unwrap();
        store.remove("ns", "k").unwrap();
        assert_eq!(store.get("ns", "k", 0), None);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        {
            let mut store = FileStore::open(&path).unwrap();
            save_last_state(&mut store, "# saved\n").unwrap();
        }
        let store = FileStore::open(&path).unwrap();
        assert_eq!(load_last_state(&store).as_deref(), Some("# saved\n"));
    }

    #[test]
    fn test_file_store_layout_is_namespaced_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = FileStore::open(&path).unwrap();
        save_last_state(&mut store, "hi").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["com.mdlive"]["last_state"]["value"], "hi");
        assert_eq!(
            raw["com.mdlive"]["last_state"]["expires_at"],
            LAST_STATE_EXPIRES_AT
        );
    }

    #[test]
    fn test_file_store_prunes_expired_entries_on_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = FileStore::open(&path).unwrap();
        store.set("old", "k", "stale", 1).unwrap();
        store.set("new", "k", "fresh", u64::MAX).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("stale"));
        assert!(raw.contains("fresh"));
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("absent.json")).unwrap();
        assert_eq!(load_last_state(&store), None);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(FileStore::open(&path), Err(StoreError::Json(_))));
    }
}
