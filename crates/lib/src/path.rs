//! Path-segment addressing for documents.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::tool::ToolKind;

/// Address of a document in the backend, as slash-joined path segments.
///
/// The persisted layout uses two shapes: `users/{uid}` for the per-user root
/// document and `users/{uid}/tools/{tool}` for tool documents. Arbitrary
/// paths can be built with [`DocPath::new`] for backends holding other
/// collections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocPath(String);

impl DocPath {
    /// Creates a path from any string-like input.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Path of the user document for `uid`.
    pub fn user(uid: impl AsRef<str>) -> Self {
        Self(format!("{}/{}", constants::USERS, uid.as_ref()))
    }

    /// Path of the tool document for `(uid, tool)`.
    pub fn tool(uid: impl AsRef<str>, tool: ToolKind) -> Self {
        Self(format!(
            "{}/{}/{}/{}",
            constants::USERS,
            uid.as_ref(),
            constants::TOOLS,
            tool.as_str()
        ))
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the path's segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }
}

impl From<String> for DocPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocPath {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for DocPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for DocPath {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DocPath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
