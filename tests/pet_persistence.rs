//! What a pet session leaves behind for the next one.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{at, temp_store};
use petshell::pet::cache::StatusCache;
use petshell::pet::history::{ChatHistory, CONTEXT_WINDOW};
use petshell::pet::ticker::start_ticker;
use petshell::pet::StatusRecord;
use petshell::store::{CacheStore, KEY_CURRENT_SCENE, KEY_LAST_UPDATE, KEY_STATUS};
use serde_json::json;
use tokio::sync::Mutex;

#[test]
fn transcript_survives_a_restart_in_order() {
    let (dir, store) = temp_store();
    {
        let mut history = ChatHistory::load(store).unwrap();
        history.push_user("are you hungry?").unwrap();
        history
            .push_assistant("starving!", Some(json!({"output": "fed the pet"})))
            .unwrap();
        history.push_user("good night").unwrap();
    }

    let store = CacheStore::open(dir.path().join("cache")).unwrap();
    let history = ChatHistory::load(store).unwrap();
    let messages = history.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].content, "are you hungry?");
    assert_eq!(messages[1].content, "starving!");
    assert_eq!(messages[1].mcp_output, Some(json!({"output": "fed the pet"})));
    assert_eq!(messages[2].content, "good night");
}

#[test]
fn context_window_trims_the_request_but_not_the_record() {
    let (_dir, store) = temp_store();
    let mut history = ChatHistory::load(store).unwrap();
    for i in 0..15 {
        history.push_user(&format!("message {i}")).unwrap();
    }

    assert_eq!(history.messages().len(), 15);
    let window = history.context_window();
    assert_eq!(window.len(), CONTEXT_WINDOW);
    assert_eq!(window[0].message, "message 5");
    assert_eq!(window[9].message, "message 14");
}

#[test]
fn cleared_transcript_stays_cleared_after_restart() {
    let (dir, store) = temp_store();
    {
        let mut history = ChatHistory::load(store).unwrap();
        history.push_user("forget this").unwrap();
        history.clear().unwrap();
    }
    let store = CacheStore::open(dir.path().join("cache")).unwrap();
    let history = ChatHistory::load(store).unwrap();
    assert!(history.messages().is_empty());
}

#[test]
fn decay_resumes_from_the_persisted_point_after_restart() {
    let (dir, store) = temp_store();
    {
        let mut cache = StatusCache::load(store, at(0)).unwrap();
        cache.apply_decay(10.0);
        cache.persist(at(600)).unwrap();
    }

    // Ten more minutes pass while the program is closed.
    let store = CacheStore::open(dir.path().join("cache")).unwrap();
    let cache = StatusCache::load(store, at(1200)).unwrap();
    assert_eq!(
        cache.status(),
        StatusRecord::default().after_decay(10.0).after_decay(10.0)
    );
}

#[test]
fn scene_selection_survives_a_restart() {
    let (dir, store) = temp_store();
    store.put(KEY_CURRENT_SCENE, &"mcp_studio").unwrap();
    drop(store);

    let store = CacheStore::open(dir.path().join("cache")).unwrap();
    assert_eq!(
        store.get::<String>(KEY_CURRENT_SCENE).unwrap(),
        Some("mcp_studio".to_string())
    );
}

#[tokio::test]
async fn background_ticker_refreshes_the_stored_stamp() {
    let (_dir, store) = temp_store();
    let cache = Arc::new(Mutex::new(
        StatusCache::load(store.clone(), chrono::Utc::now()).unwrap(),
    ));

    let ticker = start_ticker(cache, Duration::from_millis(25));
    tokio::time::sleep(Duration::from_millis(150)).await;
    ticker.shutdown().await;

    // Sub-minute ticks round away on default stats, but every tick persists
    // a fresh stamp.
    assert_eq!(
        store.get::<StatusRecord>(KEY_STATUS).unwrap(),
        Some(StatusRecord::default())
    );
    assert!(store.get::<i64>(KEY_LAST_UPDATE).unwrap().is_some());
}
