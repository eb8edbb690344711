//! One-time provisioning of the default tool documents for a fresh identity.
//!
//! There is no separate "first run" flag: the `tools` marker on the user
//! document itself records that provisioning happened. The check-then-act
//! sequence is not transactional against a concurrent sign-in of the same
//! identity from another device; the accepted outcome of that race is a
//! redundant merge write, never data loss.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::auth::Identity;
use crate::constants;
use crate::doc::Doc;
use crate::path::DocPath;
use crate::store::{ToolStore, UserProfile};
use crate::tool::ToolKind;
use crate::Result;

/// Ensures `identity` has its full default set of tool documents.
///
/// When the user document already carries the `tools` marker this does
/// nothing and returns `Ok(false)`. Otherwise it merge-writes the user
/// document — the marker, `createdAt`/`lastLogin` timestamps, and the
/// identity's display attributes — and then writes an empty `items`
/// collection for every tool document that does not exist yet, returning
/// `Ok(true)`. Existing tool documents are left untouched, so running the
/// bootstrap twice produces the same final state as running it once.
pub async fn ensure_tool_defaults(store: &ToolStore, identity: &Identity) -> Result<bool> {
    let user_path = DocPath::user(&identity.uid);

    if let Some(doc) = store.get_document(&user_path).await? {
        if doc.contains_key(constants::TOOLS_FIELD) {
            debug!(uid = %identity.uid, "tool defaults already provisioned");
            return Ok(false);
        }
    }

    let now = store.clock().now_rfc3339();
    let mut marker = Map::new();
    for tool in ToolKind::ALL {
        marker.insert(tool.as_str().to_string(), Value::Object(Map::new()));
    }

    let mut defaults = Doc::new();
    defaults.set(constants::TOOLS_FIELD, Value::Object(marker));
    defaults.set(constants::CREATED_AT_FIELD, now.clone());
    defaults.set(constants::LAST_LOGIN_FIELD, now);
    UserProfile::from(identity).apply_to(&mut defaults);
    store.set_document(&user_path, defaults).await?;

    for tool in ToolKind::ALL {
        let tool_path = DocPath::tool(&identity.uid, tool);
        if store.get_document(&tool_path).await?.is_none() {
            let mut empty = Doc::new();
            empty.set(constants::ITEMS_FIELD, Value::Array(Vec::new()));
            store.set_document(&tool_path, empty).await?;
        }
    }

    info!(uid = %identity.uid, "provisioned default tool documents");
    Ok(true)
}
