//! Persistent status cache.
//!
//! Wraps the live [`StatusRecord`] and its two store entries. Loading
//! charges the pet, in memory only, for the time since the last persisted
//! stamp; nothing is written until the next [`StatusCache::persist`]. The
//! running session persists on every ticker firing and on every
//! authoritative server update, so the stored stamp is never older than
//! one tick while a session is open.

use chrono::{DateTime, Utc};

use crate::api::types::StatusValues;
use crate::pet::status::{clamp_stat, StatusRecord};
use crate::store::{CacheStore, StoreError, KEY_LAST_UPDATE, KEY_STATUS};

pub struct StatusCache {
    store: CacheStore,
    status: StatusRecord,
}

impl StatusCache {
    /// Load the persisted record and apply catch-up decay for the time
    /// since it was written. A missing or unreadable record starts a fresh
    /// pet. Read-only: callers decide when the caught-up state is worth
    /// persisting.
    pub fn load(store: CacheStore, now: DateTime<Utc>) -> Result<StatusCache, StoreError> {
        let mut status: StatusRecord = store.get(KEY_STATUS)?.unwrap_or_default();
        if let Some(stamp) = store
            .get::<i64>(KEY_LAST_UPDATE)?
            .and_then(DateTime::from_timestamp_millis)
        {
            let minutes = (now - stamp).num_milliseconds() as f64 / 60_000.0;
            if minutes > 0.0 {
                status = status.after_decay(minutes);
            }
        }
        Ok(StatusCache { store, status })
    }

    pub fn status(&self) -> StatusRecord {
        self.status
    }

    /// In-memory decay by a fixed number of minutes. The periodic ticker
    /// always passes its own interval, not elapsed wall time.
    pub fn apply_decay(&mut self, minutes: f64) {
        self.status = self.status.after_decay(minutes);
    }

    /// Write the record and `now` as the last-update stamp, back to back.
    pub fn persist(&self, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.store.put(KEY_STATUS, &self.status)?;
        self.store.put(KEY_LAST_UPDATE, &now.timestamp_millis())
    }

    /// Adopt the server's authoritative values wholesale and persist.
    /// Returns `false` without touching anything when the set is
    /// incomplete.
    pub fn reconcile(
        &mut self,
        values: &StatusValues,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let (hunger, energy, happiness, health) = match (
            values.hunger,
            values.energy,
            values.happiness,
            values.health,
        ) {
            (Some(hu), Some(en), Some(ha), Some(he)) => (hu, en, ha, he),
            _ => return Ok(false),
        };

        self.status = StatusRecord {
            hunger: clamp_stat(hunger),
            energy: clamp_stat(energy),
            happiness: clamp_stat(happiness),
            health: clamp_stat(health),
        };
        self.persist(now)?;
        Ok(true)
    }
}
