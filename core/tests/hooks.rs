mod common;

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::json;
use statesync_core::hooks::{sync_transform, transform_fn, Transform};
use statesync_core::state::{StateContainer, Store};
use statesync_core::{PersistOptions, PersistedState, SyncError};

use common::{
    add_prefix, add_prefix_async, advance, increasingly_slow, prefixed, strip_prefix,
    strip_prefix_async, RecordingStorage,
};

#[tokio::test(start_paused = true)]
async fn after_load_receives_the_raw_stored_value() {
    let raw = prefixed(r#"{"persisted":"json"}"#);
    let storage = RecordingStorage::with_item("vuex", &raw);
    let store = Store::new(json!({ "original": "state" }));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_hook = seen.clone();
    let strip = strip_prefix();
    let recording_strip = transform_fn(move |s: String| {
        seen_by_hook.lock().unwrap().push(s.clone());
        let strip = strip.clone();
        async move { strip.apply(s).await }
    });

    let plugin = PersistedState::new(
        PersistOptions::new(Arc::new(storage))
            .with_after_load(recording_strip)
            .with_before_save(add_prefix()),
    )
    .unwrap();
    let _handle = plugin.activate(Arc::new(store.clone())).await.unwrap();

    assert_eq!(
        store.state().await,
        json!({ "original": "state", "persisted": "json" })
    );
    assert_eq!(*seen.lock().unwrap(), vec![raw]);
}

#[tokio::test(start_paused = true)]
async fn async_after_load_rehydrates() {
    let storage = RecordingStorage::with_item("vuex", &prefixed(r#"{"persisted":"json"}"#));
    let store = Store::new(json!({ "original": "state" }));
    let plugin = PersistedState::new(
        PersistOptions::new(Arc::new(storage))
            .with_after_load(strip_prefix_async())
            .with_before_save(add_prefix_async()),
    )
    .unwrap();

    let _handle = plugin.activate(Arc::new(store.clone())).await.unwrap();

    assert_eq!(
        store.state().await,
        json!({ "original": "state", "persisted": "json" })
    );
}

#[tokio::test(start_paused = true)]
async fn failing_after_load_aborts_activation() {
    let storage = RecordingStorage::with_item("vuex", &prefixed(r#"{"persisted":"json"}"#));
    let store = Store::new(json!({ "original": "state" }));
    let plugin = PersistedState::new(
        PersistOptions::new(Arc::new(storage))
            .with_after_load(sync_transform(|_| anyhow::bail!("corrupt")))
            .with_before_save(add_prefix()),
    )
    .unwrap();

    let err = plugin.activate(Arc::new(store.clone())).await.err().unwrap();

    assert!(matches!(err, SyncError::Decode(_)));
    assert_eq!(store.state().await, json!({ "original": "state" }));
    assert_eq!(store.subscriber_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn failing_initial_write_aborts_activation() {
    let storage = RecordingStorage::with_item("vuex", r#"{"persisted":"json"}"#);
    let store = Store::new(json!({ "original": "state" }));
    let plugin = PersistedState::new(
        PersistOptions::new(Arc::new(storage.clone()))
            .with_before_save(sync_transform(|_| anyhow::bail!("cannot encode")))
            .with_initial_set(true),
    )
    .unwrap();

    let err = plugin.activate(Arc::new(store.clone())).await.err().unwrap();

    assert!(matches!(err, SyncError::Encode(_)));
    assert_eq!(store.state().await, json!({ "original": "state" }));
    assert_eq!(store.subscriber_count(), 0);
    assert!(storage.writes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn sync_hooks_wrap_written_snapshot() {
    let storage = RecordingStorage::new();
    let store = Store::new(json!({ "original": "state" }));
    let plugin = PersistedState::new(
        PersistOptions::new(Arc::new(storage.clone()))
            .with_after_load(strip_prefix())
            .with_before_save(add_prefix()),
    )
    .unwrap();
    let _handle = plugin.activate(Arc::new(store.clone())).await.unwrap();

    store
        .commit("mutation", None, |s| s["original"] = json!("newState"))
        .await;
    advance(1).await;

    assert_eq!(
        storage.raw("vuex").await,
        Some(prefixed(r#"{"original":"newState"}"#))
    );
}

#[tokio::test(start_paused = true)]
async fn async_hooks_wrap_written_snapshot() {
    let storage = RecordingStorage::new();
    let store = Store::new(json!({ "original": "state" }));
    let plugin = PersistedState::new(
        PersistOptions::new(Arc::new(storage.clone()))
            .with_after_load(strip_prefix_async())
            .with_before_save(add_prefix_async()),
    )
    .unwrap();
    let _handle = plugin.activate(Arc::new(store.clone())).await.unwrap();

    store
        .commit("mutation", None, |s| s["original"] = json!("newState"))
        .await;
    advance(20).await;

    assert_eq!(
        storage.raw("vuex").await,
        Some(prefixed(r#"{"original":"newState"}"#))
    );
}

#[tokio::test(start_paused = true)]
async fn encode_failure_does_not_stop_later_writes() {
    let storage = RecordingStorage::new();
    let store = Store::default();
    let plugin = PersistedState::new(
        PersistOptions::new(Arc::new(storage.clone())).with_before_save(sync_transform(|s| {
            if s.contains("poison") {
                anyhow::bail!("cannot encode");
            }
            Ok(s)
        })),
    )
    .unwrap();
    let _handle = plugin.activate(Arc::new(store.clone())).await.unwrap();

    store
        .commit("mutation", None, |s| s["value"] = json!("poison"))
        .await;
    advance(1).await;
    assert_eq!(storage.raw("vuex").await, None);

    store
        .commit("mutation", None, |s| s["value"] = json!("fine"))
        .await;
    advance(1).await;
    assert_eq!(
        storage.raw("vuex").await.as_deref(),
        Some(r#"{"value":"fine"}"#)
    );
}

#[tokio::test(start_paused = true)]
async fn slow_stale_encode_never_overwrites_newer_state() {
    common::init_tracing();
    let storage = RecordingStorage::new();
    let store = Store::new(json!({ "original": "state" }));
    let plugin = PersistedState::new(
        PersistOptions::new(Arc::new(storage.clone())).with_before_save(increasingly_slow(5, 25)),
    )
    .unwrap();
    let _handle = plugin.activate(Arc::new(store.clone())).await.unwrap();

    store
        .commit("mutation", None, |s| s["original"] = json!("stateWithRace"))
        .await;
    store
        .commit("mutation", None, |s| s["original"] = json!("stateFinal"))
        .await;

    advance(1).await;
    assert_eq!(storage.raw("vuex").await, None);

    // First encode (5ms) has resolved and was discarded.
    advance(10).await;
    assert_eq!(storage.raw("vuex").await, None);

    advance(35).await;
    assert_eq!(
        storage.raw("vuex").await.as_deref(),
        Some(r#"{"original":"stateFinal"}"#)
    );
    assert_eq!(storage.writes(), vec![r#"{"original":"stateFinal"}"#.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn hook_round_trip_restores_reduced_snapshot() {
    let storage = RecordingStorage::new();
    let options = PersistOptions::new(Arc::new(storage.clone()))
        .with_paths(["profile.name", "cart"])
        .with_after_load(strip_prefix())
        .with_before_save(add_prefix());

    let first = Store::new(json!({
        "profile": { "name": "ada", "token": "secret" },
        "cart": [1, 2, 3],
    }));
    let plugin = PersistedState::new(options.clone()).unwrap();
    let handle = plugin.activate(Arc::new(first.clone())).await.unwrap();
    handle.write_now().await.unwrap();
    drop(handle);

    let second = Store::new(json!({ "profile": { "token": "fresh" }, "cart": [] }));
    let plugin = PersistedState::new(options).unwrap();
    let _handle = plugin.activate(Arc::new(second.clone())).await.unwrap();

    assert_eq!(
        second.state().await,
        json!({ "profile": { "name": "ada", "token": "fresh" }, "cart": [1, 2, 3] })
    );
}
