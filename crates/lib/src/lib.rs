//!
//! Tooldeck: a client-side reactive synchronization layer for per-user tool
//! documents.
//!
//! Tooldeck sits between an application and a remote per-user document
//! database with push-based change notification. It keeps the application's
//! view of "who is signed in" and "what is in each tool" current without the
//! application talking to the backend directly.
//!
//! ## Core Concepts
//!
//! * **Backends (`backend::Backend`)**: a pluggable remote document database
//!   addressed by path segments, supporting merge-write, full read, and
//!   per-path watch subscriptions. [`backend::InMemory`] is the bundled
//!   implementation, with JSON file persistence.
//! * **Documents (`doc::Doc`)**: free-form JSON-object payloads written via
//!   merge. A write never clobbers fields it does not mention.
//! * **Entries (`doc::Entry`)**: opaque records inside a tool document's
//!   `items` collection, each carrying a unique `id` and a `createdAt`
//!   timestamp.
//! * **Tools (`tool::ToolKind`)**: the fixed set of named per-user
//!   sub-documents (payment tracker, expense tracker, and friends).
//! * **Store (`store::ToolStore`)**: uniform CRUD + realtime-subscribe access
//!   to user and tool documents.
//! * **Auth (`auth::AuthBroadcaster`)**: a process-wide fan-out of the
//!   current identity, replaying the held state to late subscribers and
//!   running the tool bootstrap policy before publishing a sign-in.
//! * **Bootstrap (`bootstrap::ensure_tool_defaults`)**: idempotent one-time
//!   provisioning of the default tool documents for a fresh identity.

pub mod auth;
pub mod backend;
pub mod bootstrap;
pub mod clock;
pub mod constants;
pub mod doc;
pub mod path;
pub mod store;
pub mod tool;
pub mod watch;

pub use auth::{AuthBroadcaster, AuthProvider, AuthState, Identity, LocalProvider};
pub use backend::Backend;
#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;
pub use clock::{Clock, SystemClock};
pub use doc::{Doc, Entry};
pub use path::DocPath;
pub use store::{ToolStore, UserProfile};
pub use tool::ToolKind;
pub use watch::Watch;

/// Result type used throughout the Tooldeck library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Tooldeck library.
///
/// Absence of a document is never represented here: reads of missing
/// documents yield `None`, reads of missing collections yield an empty
/// collection.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured errors from the store module
    #[error(transparent)]
    Store(store::StoreError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
            Error::Backend(_) => "backend",
            Error::Store(_) => "store",
        }
    }

    /// Check if this error indicates the backend could not be reached.
    pub fn is_unavailable(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_unavailable(),
            _ => false,
        }
    }

    /// Check if this error indicates the backend rejected an operation.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_permission_denied(),
            _ => false,
        }
    }

    /// Check if this error is a serialization failure.
    pub fn is_serialization_error(&self) -> bool {
        match self {
            Error::Serialize(_) => true,
            Error::Backend(backend_err) => backend_err.is_serialization_error(),
            _ => false,
        }
    }

    /// Check if this error was caused by a malformed or incomplete caller payload.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_invalid_input(),
            _ => false,
        }
    }
}
