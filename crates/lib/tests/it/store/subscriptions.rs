use std::sync::{Arc, Mutex};

use serde_json::json;
use tooldeck::{Doc, DocPath, Entry, ToolKind, UserProfile};

use crate::helpers::test_store;

fn doc(value: serde_json::Value) -> Doc {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn subscribe_delivers_current_snapshot_immediately() {
    let (store, _backend) = test_store();
    let path = DocPath::user("u1");
    store
        .set_document(&path, doc(json!({"displayName": "Ada"})))
        .await
        .unwrap();

    let seen: Arc<Mutex<Vec<Option<Doc>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _watch = store
        .subscribe(&path, move |snapshot| {
            sink.lock().unwrap().push(snapshot);
        })
        .await
        .unwrap();

    let snapshots = seen.lock().unwrap();
    assert_eq!(snapshots.len(), 1);
    let snapshot = snapshots[0].as_ref().unwrap();
    assert_eq!(snapshot.get("displayName"), Some(&json!("Ada")));
}

#[tokio::test]
async fn subscribe_to_absent_document_delivers_none() {
    let (store, _backend) = test_store();
    let seen: Arc<Mutex<Vec<Option<Doc>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _watch = store
        .subscribe(&DocPath::user("ghost"), move |snapshot| {
            sink.lock().unwrap().push(snapshot);
        })
        .await
        .unwrap();

    let snapshots = seen.lock().unwrap();
    assert_eq!(snapshots.len(), 1);
    assert!(snapshots[0].is_none());
}

#[tokio::test]
async fn subscribe_sees_writes_in_commit_order() {
    let (store, _backend) = test_store();
    let path = DocPath::user("u1");

    let seen: Arc<Mutex<Vec<i64>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _watch = store
        .subscribe(&path, move |snapshot| {
            if let Some(n) = snapshot.as_ref().and_then(|d| d.get("n")).and_then(|v| v.as_i64()) {
                sink.lock().unwrap().push(n);
            }
        })
        .await
        .unwrap();

    for n in 1..=5i64 {
        store.set_document(&path, doc(json!({"n": n}))).await.unwrap();
    }

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn cancelled_subscription_stops_delivery() {
    let (store, _backend) = test_store();
    let path = DocPath::user("u1");

    let count = Arc::new(Mutex::new(0usize));
    let counted = count.clone();
    let watch = store
        .subscribe(&path, move |_snapshot| {
            *counted.lock().unwrap() += 1;
        })
        .await
        .unwrap();

    watch.cancel();
    store.set_document(&path, doc(json!({"n": 1}))).await.unwrap();

    // Only the immediate snapshot from registration.
    assert_eq!(*count.lock().unwrap(), 1);
}

#[tokio::test]
async fn listen_entries_delivers_empty_for_absent_document() {
    let (store, _backend) = test_store();

    let seen: Arc<Mutex<Vec<Vec<Entry>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _watch = store
        .listen_entries("u1", ToolKind::PaymentTracker, move |entries| {
            sink.lock().unwrap().push(entries);
        })
        .await
        .unwrap();

    let collections = seen.lock().unwrap();
    assert_eq!(collections.len(), 1);
    assert!(collections[0].is_empty());
}

#[tokio::test]
async fn listen_entries_follows_the_collection() {
    let (store, _backend) = test_store();

    let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _watch = store
        .listen_entries("u1", ToolKind::ExpenseTracker, move |entries| {
            sink.lock().unwrap().push(entries.len());
        })
        .await
        .unwrap();

    store
        .add_entry("u1", ToolKind::ExpenseTracker, Entry::new().field("n", 1))
        .await
        .unwrap();
    store
        .add_entry("u1", ToolKind::ExpenseTracker, Entry::new().field("n", 2))
        .await
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
}

#[tokio::test]
async fn listen_entries_ignores_other_tools() {
    let (store, _backend) = test_store();

    let count = Arc::new(Mutex::new(0usize));
    let counted = count.clone();
    let _watch = store
        .listen_entries("u1", ToolKind::ExpenseTracker, move |_entries| {
            *counted.lock().unwrap() += 1;
        })
        .await
        .unwrap();

    store
        .add_entry("u1", ToolKind::IncomeTracker, Entry::new().field("n", 1))
        .await
        .unwrap();

    assert_eq!(*count.lock().unwrap(), 1);
}

#[tokio::test]
async fn subscribe_profile_delivers_profile_slice() {
    let (store, _backend) = test_store();

    let seen: Arc<Mutex<Vec<Option<UserProfile>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _watch = store
        .subscribe_profile("u1", move |profile| {
            sink.lock().unwrap().push(profile);
        })
        .await
        .unwrap();

    store
        .set_profile(
            "u1",
            &UserProfile {
                display_name: Some("Ada".to_string()),
                ..UserProfile::default()
            },
        )
        .await
        .unwrap();

    let profiles = seen.lock().unwrap();
    assert_eq!(profiles.len(), 2);
    assert!(profiles[0].is_none());
    assert_eq!(
        profiles[1].as_ref().unwrap().display_name.as_deref(),
        Some("Ada")
    );
}
