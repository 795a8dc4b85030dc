//! Background decay loop.
//!
//! Runs beside the chat prompt. Each firing charges the cache for exactly
//! one interval of decay and persists, fresh stamp included, even when
//! rounding eats the whole interval. Missed or late firings are not made
//! up here; catch-up at the next load covers them.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::pet::cache::StatusCache;

pub enum TickerCommand {
    Shutdown(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct TickerHandle {
    tx: mpsc::UnboundedSender<TickerCommand>,
}

impl TickerHandle {
    pub async fn shutdown(&self) {
        let (tx, rx) = oneshot::channel();
        let _ = self.tx.send(TickerCommand::Shutdown(tx));
        let _ = rx.await;
    }
}

pub fn start_ticker(cache: Arc<Mutex<StatusCache>>, interval: Duration) -> TickerHandle {
    let (tx, mut rx) = mpsc::unbounded_channel::<TickerCommand>();
    let handle = TickerHandle { tx };
    let minutes = interval.as_secs_f64() / 60.0;

    tokio::spawn(async move {
        loop {
            tokio::select! {
                cmd = rx.recv() => {
                    match cmd {
                        Some(TickerCommand::Shutdown(done)) => {
                            let _ = done.send(());
                            break;
                        }
                        None => break,
                    }
                }
                _ = tokio::time::sleep(interval) => {
                    let mut cache = cache.lock().await;
                    cache.apply_decay(minutes);
                    if let Err(e) = cache.persist(Utc::now()) {
                        log::warn!("status tick not persisted: {e}");
                    }
                }
            }
        }
        log::debug!("decay ticker terminated");
    });

    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pet::status::StatusRecord;
    use crate::store::{CacheStore, KEY_LAST_UPDATE, KEY_STATUS};
    use tempfile::tempdir;

    #[tokio::test]
    async fn ticks_persist_and_shutdown_is_acknowledged() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(dir.path().join("cache")).unwrap();
        let cache = StatusCache::load(store.clone(), Utc::now()).unwrap();
        let baseline = cache.status();

        let shared = Arc::new(Mutex::new(cache));
        let handle = start_ticker(shared.clone(), Duration::from_millis(25));
        tokio::time::sleep(Duration::from_millis(150)).await;
        handle.shutdown().await;

        // Nothing was stored before the ticker ran; each firing persists
        // both entries. Sub-second decay rounds away entirely.
        let saved: StatusRecord = store.get(KEY_STATUS).unwrap().unwrap();
        assert_eq!(saved, baseline);
        assert!(store.get::<i64>(KEY_LAST_UPDATE).unwrap().is_some());
        assert_eq!(shared.lock().await.status(), baseline);
    }

    #[tokio::test]
    async fn dropping_the_handle_stops_the_loop() {
        let dir = tempdir().unwrap();
        let store = CacheStore::open(dir.path().join("cache")).unwrap();
        let cache = StatusCache::load(store, Utc::now()).unwrap();

        let shared = Arc::new(Mutex::new(cache));
        let handle = start_ticker(shared.clone(), Duration::from_millis(10));
        drop(handle);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(Arc::strong_count(&shared), 1);
    }
}
