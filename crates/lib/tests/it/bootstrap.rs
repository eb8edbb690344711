use serde_json::{Value, json};
use tooldeck::bootstrap::ensure_tool_defaults;
use tooldeck::{Doc, DocPath, Entry, ToolKind};

use crate::helpers::{identity, test_store};

fn doc(value: Value) -> Doc {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn fresh_identity_gets_marker_and_empty_collections() {
    let (store, _backend) = test_store();

    let provisioned = ensure_tool_defaults(&store, &identity("u1")).await.unwrap();
    assert!(provisioned);

    let user_doc = store
        .get_document(&DocPath::user("u1"))
        .await
        .unwrap()
        .unwrap();
    let marker = user_doc.get("tools").unwrap().as_object().unwrap();
    assert_eq!(marker.len(), ToolKind::ALL.len());
    assert!(marker.contains_key("paymentTracker"));
    assert!(user_doc.contains_key("createdAt"));
    assert!(user_doc.contains_key("lastLogin"));

    for tool in ToolKind::ALL {
        let tool_doc = store
            .get_document(&DocPath::tool("u1", tool))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tool_doc.get("items"), Some(&json!([])));
    }
}

#[tokio::test]
async fn bootstrap_twice_equals_bootstrap_once() {
    let (store, _backend) = test_store();
    let user = identity("u1");

    assert!(ensure_tool_defaults(&store, &user).await.unwrap());
    let user_doc_after_first = store.get_document(&DocPath::user("u1")).await.unwrap();
    let tool_doc_after_first = store
        .get_document(&DocPath::tool("u1", ToolKind::GoalTracker))
        .await
        .unwrap();

    assert!(!ensure_tool_defaults(&store, &user).await.unwrap());
    assert_eq!(
        store.get_document(&DocPath::user("u1")).await.unwrap(),
        user_doc_after_first
    );
    assert_eq!(
        store
            .get_document(&DocPath::tool("u1", ToolKind::GoalTracker))
            .await
            .unwrap(),
        tool_doc_after_first
    );
}

#[tokio::test]
async fn bootstrap_preserves_unrelated_user_fields() {
    let (store, _backend) = test_store();
    store
        .set_document(&DocPath::user("u1"), doc(json!({"theme": "dark"})))
        .await
        .unwrap();

    assert!(ensure_tool_defaults(&store, &identity("u1")).await.unwrap());

    let user_doc = store
        .get_document(&DocPath::user("u1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user_doc.get("theme"), Some(&json!("dark")));
    assert!(user_doc.contains_key("tools"));
}

#[tokio::test]
async fn existing_marker_short_circuits() {
    let (store, backend) = test_store();
    store
        .set_document(&DocPath::user("u1"), doc(json!({"tools": {}})))
        .await
        .unwrap();

    let provisioned = ensure_tool_defaults(&store, &identity("u1")).await.unwrap();
    assert!(!provisioned);

    // Only the user document exists; no tool documents were created.
    assert_eq!(backend.doc_count(), 1);
}

#[tokio::test]
async fn existing_tool_items_survive_a_redundant_bootstrap() {
    let (store, _backend) = test_store();

    // A previous bootstrap half-landed: the tool document has entries but
    // the user document lost its marker.
    store
        .add_entry(
            "u1",
            ToolKind::ExpenseTracker,
            Entry::new().field("id", "e1").field("amount", 50),
        )
        .await
        .unwrap();

    assert!(ensure_tool_defaults(&store, &identity("u1")).await.unwrap());

    let entries = store
        .get_entries("u1", ToolKind::ExpenseTracker)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id(), Some("e1"));
}

#[tokio::test]
async fn identity_display_fields_are_mirrored() {
    let (store, _backend) = test_store();

    ensure_tool_defaults(&store, &identity("u1")).await.unwrap();

    let profile = store.get_profile("u1").await.unwrap().unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
    assert_eq!(profile.company.as_deref(), Some("Analytical Engines"));
}
