use serde_json::json;
use tooldeck::{Doc, DocPath, UserProfile};

use crate::helpers::test_store;

fn doc(value: serde_json::Value) -> Doc {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn set_then_get_document() {
    let (store, _backend) = test_store();
    let path = DocPath::user("u1");

    store
        .set_document(&path, doc(json!({"displayName": "Ada"})))
        .await
        .unwrap();

    let read = store.get_document(&path).await.unwrap().unwrap();
    assert_eq!(read.get("displayName"), Some(&json!("Ada")));
}

#[tokio::test]
async fn merge_write_preserves_unrelated_fields() {
    let (store, _backend) = test_store();
    let path = DocPath::user("u1");

    store
        .set_document(&path, doc(json!({"displayName": "Ada", "theme": "dark"})))
        .await
        .unwrap();
    store
        .set_document(&path, doc(json!({"displayName": "Grace"})))
        .await
        .unwrap();

    let read = store.get_document(&path).await.unwrap().unwrap();
    assert_eq!(read.get("displayName"), Some(&json!("Grace")));
    assert_eq!(read.get("theme"), Some(&json!("dark")));
}

#[tokio::test]
async fn get_document_absent_is_none() {
    let (store, _backend) = test_store();
    let read = store.get_document(&DocPath::user("ghost")).await.unwrap();
    assert!(read.is_none());
}

#[tokio::test]
async fn offline_backend_surfaces_unavailable() {
    let (store, backend) = test_store();
    backend.set_offline(true);

    let err = store
        .set_document(&DocPath::user("u1"), Doc::new())
        .await
        .unwrap_err();
    assert!(err.is_unavailable());

    let err = store.get_document(&DocPath::user("u1")).await.unwrap_err();
    assert!(err.is_unavailable());
}

#[tokio::test]
async fn rejected_write_surfaces_permission_denied() {
    let (store, backend) = test_store();
    backend.set_read_only(true);

    let err = store
        .set_document(&DocPath::user("u1"), Doc::new())
        .await
        .unwrap_err();
    assert!(err.is_permission_denied());
}

#[tokio::test]
async fn profile_round_trip() {
    let (store, _backend) = test_store();

    let profile = UserProfile {
        display_name: Some("Ada Lovelace".to_string()),
        email: Some("ada@example.com".to_string()),
        ..UserProfile::default()
    };
    store.set_profile("u1", &profile).await.unwrap();

    let read = store.get_profile("u1").await.unwrap().unwrap();
    assert_eq!(read.display_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(read.email.as_deref(), Some("ada@example.com"));
    assert!(read.phone.is_none());
}

#[tokio::test]
async fn profile_write_preserves_unrelated_fields() {
    let (store, _backend) = test_store();
    let path = DocPath::user("u1");

    store
        .set_document(&path, doc(json!({"theme": "dark", "displayName": "Ada"})))
        .await
        .unwrap();
    store
        .set_profile(
            "u1",
            &UserProfile {
                display_name: Some("Grace".to_string()),
                ..UserProfile::default()
            },
        )
        .await
        .unwrap();

    let read = store.get_document(&path).await.unwrap().unwrap();
    assert_eq!(read.get("displayName"), Some(&json!("Grace")));
    assert_eq!(read.get("theme"), Some(&json!("dark")));
}

#[tokio::test]
async fn get_profile_absent_user_is_none() {
    let (store, _backend) = test_store();
    assert!(store.get_profile("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn touch_last_login_stamps_timestamp() {
    let (store, _backend) = test_store();
    store.touch_last_login("u1").await.unwrap();

    let read = store
        .get_document(&DocPath::user("u1"))
        .await
        .unwrap()
        .unwrap();
    let last_login = read.get("lastLogin").unwrap().as_str().unwrap();
    assert!(last_login.starts_with("2024-01-01T"));
}
