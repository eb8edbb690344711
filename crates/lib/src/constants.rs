//! Constants used throughout the Tooldeck library.
//!
//! Central definitions for the persisted document layout: collection path
//! segments and reserved field names.

/// Top-level collection segment for user documents (`users/{uid}`).
pub const USERS: &str = "users";

/// Sub-collection segment for tool documents (`users/{uid}/tools/{tool}`).
pub const TOOLS: &str = "tools";

/// Field on a tool document holding its entry collection.
pub const ITEMS_FIELD: &str = "items";

/// Marker field on a user document recording that defaults were provisioned.
pub const TOOLS_FIELD: &str = "tools";

/// Bookkeeping field stamped when a user document is first provisioned.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Bookkeeping field updated when a user signs in.
pub const LAST_LOGIN_FIELD: &str = "lastLogin";

/// Required unique identifier field on an entry.
pub const ENTRY_ID_FIELD: &str = "id";

/// Required creation-timestamp field on an entry.
pub const ENTRY_CREATED_AT_FIELD: &str = "createdAt";
