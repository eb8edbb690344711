//! Backend abstraction for the remote document database.
//!
//! The [`Backend`] trait is the contract this layer requires of the remote
//! per-user document database: path-addressed merge-writes, full reads, and
//! push-based watch subscriptions delivering full-document snapshots. The
//! store and bootstrap logic are independent of the concrete backend; the
//! bundled [`InMemory`] implementation backs tests, the CLI, and local
//! development.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;

use crate::doc::Doc;
use crate::path::DocPath;
use crate::watch::Watch;
use crate::Result;

mod errors;
pub use errors::BackendError;

mod memory;
pub use memory::InMemory;

/// Callback invoked with the full current document snapshot at a watched
/// path. `None` means the document does not exist.
pub type SnapshotCallback = Arc<dyn Fn(Option<Doc>) + Send + Sync>;

/// Contract for the remote document database.
///
/// All backends must be `Send + Sync` for sharing across tasks, and `Any`
/// for downcasting to implementation-specific APIs.
///
/// ## Delivery guarantees
///
/// For a single path, watch callbacks fire in the same order the writes were
/// committed. There is no ordering guarantee across different paths, and no
/// guarantee that a write issued by this process is observed by its own watch
/// before a concurrent writer's change to the same path.
#[async_trait]
pub trait Backend: Send + Sync + Any {
    /// Merge-writes `patch` into the document at `path`, creating the
    /// document if it is absent.
    ///
    /// Nested objects merge recursively; arrays and scalars are replaced
    /// wholesale; fields absent from `patch` are never touched.
    ///
    /// # Errors
    /// [`BackendError::Unavailable`] when the backend cannot be reached,
    /// [`BackendError::PermissionDenied`] when the write is rejected.
    async fn merge_write(&self, path: &DocPath, patch: Doc) -> Result<()>;

    /// Reads the full current document at `path`.
    ///
    /// Absence of the document is `Ok(None)`, not an error.
    async fn read(&self, path: &DocPath) -> Result<Option<Doc>>;

    /// Registers `on_change` for the document at `path`.
    ///
    /// The callback is invoked immediately with the current snapshot, then
    /// once per committed write, in commit order. The registration is
    /// long-lived and never blocks the caller; delivery may happen at any
    /// later time. The returned [`Watch`] stops delivery when cancelled or
    /// dropped.
    async fn watch(&self, path: &DocPath, on_change: SnapshotCallback) -> Result<Watch>;

    /// Downcast support for implementation-specific methods.
    fn as_any(&self) -> &dyn Any;
}
