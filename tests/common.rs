//! Test utilities shared by the integration suite.

use chrono::{DateTime, Utc};
use petshell::store::CacheStore;
use tempfile::TempDir;

/// Open a throwaway cache store. Keep the returned `TempDir` alive for the
/// test's duration or sled loses its backing files.
pub fn temp_store() -> (TempDir, CacheStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CacheStore::open(dir.path().join("cache")).expect("open store");
    (dir, store)
}

/// Fixed reference instant plus an offset in seconds, for deterministic
/// decay math.
#[allow(dead_code)] // Not every integration file does time arithmetic.
pub fn at(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + seconds, 0).expect("valid timestamp")
}
