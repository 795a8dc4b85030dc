//! Client-side cache persistence.
//!
//! A small sled database holds everything the pet session needs to survive a
//! restart: the chat transcript, the selected scene, the status record, and
//! the timestamp of the last persisted decay. Entries are string-keyed and
//! JSON-encoded. The adventure session keeps no local state and does not use
//! this store.

use std::path::Path;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

const TREE_PET: &str = "pet";

/// Key for the serialized transcript (JSON array of stored messages).
pub const KEY_MESSAGES: &str = "messages";
/// Key for the selected scene id (JSON string).
pub const KEY_CURRENT_SCENE: &str = "current_scene";
/// Key for the status record (JSON object).
pub const KEY_STATUS: &str = "status";
/// Key for the last persisted decay timestamp (JSON integer, epoch ms).
pub const KEY_LAST_UPDATE: &str = "last_update";

/// Errors that can arise while interacting with the cache store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around JSON serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sled-backed cache for pet session state.
///
/// Cloning is cheap (sled handles are shared), which lets the decay ticker
/// persist independently of the session that opened the store.
#[derive(Clone)]
pub struct CacheStore {
    _db: sled::Db,
    pet: sled::Tree,
}

impl CacheStore {
    /// Open (or create) the cache store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let pet = db.open_tree(TREE_PET)?;
        Ok(Self { _db: db, pet })
    }

    /// Store `value` under `key` as JSON and flush.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.pet.insert(key, bytes)?;
        self.pet.flush()?;
        Ok(())
    }

    /// Fetch the value stored under `key`. An entry whose bytes fail to parse
    /// is logged and reported as absent; it is never an error.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(bytes) = self.pet.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!("discarding unreadable cache entry '{}': {}", key, err);
                Ok(None)
            }
        }
    }

    /// Delete the entry under `key`. Removing a missing key is not an error.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.pet.remove(key)?;
        self.pet.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Marker {
        name: String,
        count: u32,
    }

    fn open_store(dir: &TempDir) -> CacheStore {
        CacheStore::open(dir.path().join("cache")).expect("open store")
    }

    #[test]
    fn round_trips_typed_values() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.put(KEY_LAST_UPDATE, &1_700_000_000_000_i64).unwrap();
        assert_eq!(
            store.get::<i64>(KEY_LAST_UPDATE).unwrap(),
            Some(1_700_000_000_000)
        );

        let marker = Marker {
            name: "bedroom".into(),
            count: 3,
        };
        store.put("marker", &marker).unwrap();
        assert_eq!(store.get::<Marker>("marker").unwrap(), Some(marker));
    }

    #[test]
    fn missing_key_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert_eq!(store.get::<i64>("nope").unwrap(), None);
    }

    #[test]
    fn unreadable_entry_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store.pet.insert(KEY_STATUS, &b"definitely not json"[..]).unwrap();
        assert_eq!(store.get::<Marker>(KEY_STATUS).unwrap(), None);
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store.put(KEY_CURRENT_SCENE, &"bedroom").unwrap();
        store.remove(KEY_CURRENT_SCENE).unwrap();
        store.remove(KEY_CURRENT_SCENE).unwrap();
        assert_eq!(store.get::<String>(KEY_CURRENT_SCENE).unwrap(), None);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir);
            store.put(KEY_CURRENT_SCENE, &"mcp_studio").unwrap();
        }
        let store = open_store(&dir);
        assert_eq!(
            store.get::<String>(KEY_CURRENT_SCENE).unwrap(),
            Some("mcp_studio".to_string())
        );
    }
}
