//! In-memory backend implementation.

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use tracing::debug;

use super::{Backend, BackendError, SnapshotCallback};
use crate::doc::Doc;
use crate::path::DocPath;
use crate::watch::Watch;
use crate::{Error, Result};

/// An in-memory document backend.
///
/// Suitable for tests, local development, and ephemeral deployments where
/// durability is handled externally by saving/loading the whole document set
/// to a JSON file (`save_to_file` / `load_from_file`).
///
/// `InMemory` is a cheap-to-clone handle; clones share the same document set
/// and watcher registry.
///
/// ## Fault injection
///
/// Tests can flip the backend into degraded modes: [`set_offline`] makes
/// every operation fail with [`BackendError::Unavailable`], and
/// [`set_read_only`] makes writes fail with
/// [`BackendError::PermissionDenied`] while reads keep working.
///
/// [`set_offline`]: InMemory::set_offline
/// [`set_read_only`]: InMemory::set_read_only
#[derive(Clone, Default)]
pub struct InMemory {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    docs: HashMap<DocPath, Doc>,
    watchers: HashMap<DocPath, Vec<Watcher>>,
    next_watcher_id: u64,
    pending: VecDeque<Notification>,
    dispatching: bool,
    offline: bool,
    read_only: bool,
}

struct Watcher {
    id: u64,
    callback: SnapshotCallback,
}

struct Notification {
    path: DocPath,
    watcher_id: u64,
    snapshot: Option<Doc>,
}

impl InMemory {
    /// Creates a new, empty `InMemory` backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a document set previously written by [`save_to_file`].
    ///
    /// [`save_to_file`]: InMemory::save_to_file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(Error::Io)?;
        let docs: HashMap<DocPath, Doc> = serde_json::from_str(&json)?;
        let backend = Self::new();
        backend.inner.state.lock().unwrap().docs = docs;
        Ok(backend)
    }

    /// Saves the entire document set to `path` as JSON.
    ///
    /// Watcher registrations are not persisted.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = {
            let state = self.inner.state.lock().unwrap();
            serde_json::to_string_pretty(&state.docs)?
        };
        fs::write(path, json).map_err(Error::Io)
    }

    /// Simulate the backend being unreachable. While set, every operation
    /// fails with [`BackendError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.inner.state.lock().unwrap().offline = offline;
    }

    /// Simulate authorization failures. While set, writes fail with
    /// [`BackendError::PermissionDenied`]; reads and watches still work.
    pub fn set_read_only(&self, read_only: bool) {
        self.inner.state.lock().unwrap().read_only = read_only;
    }

    /// Returns true if a document exists at `path`.
    pub fn contains(&self, path: &DocPath) -> bool {
        self.inner.state.lock().unwrap().docs.contains_key(path)
    }

    /// Number of documents currently stored.
    pub fn doc_count(&self) -> usize {
        self.inner.state.lock().unwrap().docs.len()
    }
}

impl Inner {
    /// Delivers queued notifications in commit order.
    ///
    /// A single caller drains at a time; concurrent committers enqueue and
    /// return, leaving delivery to the active drainer. Callbacks run without
    /// the state lock held, so a callback may call back into the backend
    /// (e.g. cancel its own watch) without deadlocking.
    fn drain(&self) {
        loop {
            let batch = {
                let mut state = self.state.lock().unwrap();
                if state.dispatching || state.pending.is_empty() {
                    return;
                }
                state.dispatching = true;
                std::mem::take(&mut state.pending)
            };

            for notification in batch {
                // Re-check registration so a cancelled watch never fires again.
                let callback = {
                    let state = self.state.lock().unwrap();
                    state
                        .watchers
                        .get(&notification.path)
                        .and_then(|watchers| {
                            watchers.iter().find(|w| w.id == notification.watcher_id)
                        })
                        .map(|w| w.callback.clone())
                };
                if let Some(callback) = callback {
                    callback(notification.snapshot);
                }
            }

            let mut state = self.state.lock().unwrap();
            state.dispatching = false;
            if state.pending.is_empty() {
                return;
            }
        }
    }

    fn remove_watcher(&self, path: &DocPath, id: u64) {
        let mut state = self.state.lock().unwrap();
        let now_empty = match state.watchers.get_mut(path) {
            Some(watchers) => {
                watchers.retain(|w| w.id != id);
                watchers.is_empty()
            }
            None => false,
        };
        if now_empty {
            state.watchers.remove(path);
        }
        state.pending.retain(|n| n.watcher_id != id);
    }
}

#[async_trait]
impl Backend for InMemory {
    async fn merge_write(&self, path: &DocPath, patch: Doc) -> Result<()> {
        {
            let mut state = self.inner.state.lock().unwrap();
            if state.offline {
                return Err(BackendError::Unavailable {
                    reason: "backend is offline".to_string(),
                }
                .into());
            }
            if state.read_only {
                return Err(BackendError::PermissionDenied {
                    path: path.to_string(),
                }
                .into());
            }

            let doc = state.docs.entry(path.clone()).or_default();
            doc.merge_from(&patch);
            let snapshot = Some(doc.clone());

            let watcher_ids: Vec<u64> = state
                .watchers
                .get(path)
                .map(|watchers| watchers.iter().map(|w| w.id).collect())
                .unwrap_or_default();
            for watcher_id in watcher_ids {
                state.pending.push_back(Notification {
                    path: path.clone(),
                    watcher_id,
                    snapshot: snapshot.clone(),
                });
            }
        }
        debug!(path = %path, "merge write committed");
        self.inner.drain();
        Ok(())
    }

    async fn read(&self, path: &DocPath) -> Result<Option<Doc>> {
        let state = self.inner.state.lock().unwrap();
        if state.offline {
            return Err(BackendError::Unavailable {
                reason: "backend is offline".to_string(),
            }
            .into());
        }
        Ok(state.docs.get(path).cloned())
    }

    async fn watch(&self, path: &DocPath, on_change: SnapshotCallback) -> Result<Watch> {
        let id = {
            let mut state = self.inner.state.lock().unwrap();
            if state.offline {
                return Err(BackendError::Unavailable {
                    reason: "backend is offline".to_string(),
                }
                .into());
            }

            let id = state.next_watcher_id;
            state.next_watcher_id += 1;
            state
                .watchers
                .entry(path.clone())
                .or_default()
                .push(Watcher {
                    id,
                    callback: on_change,
                });

            let snapshot = state.docs.get(path).cloned();
            state.pending.push_back(Notification {
                path: path.clone(),
                watcher_id: id,
                snapshot,
            });
            id
        };
        self.inner.drain();

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let watched = path.clone();
        Ok(Watch::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remove_watcher(&watched, id);
            }
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl std::fmt::Debug for InMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock().unwrap();
        f.debug_struct("InMemory")
            .field("docs", &state.docs.len())
            .field("watchers", &state.watchers.len())
            .field("offline", &state.offline)
            .field("read_only", &state.read_only)
            .finish()
    }
}
