//! Uniform access to user and tool documents.
//!
//! [`ToolStore`] is the single write path to the backend from this
//! application's perspective. It layers entry-collection semantics
//! (dedup-on-add, structural delete, read-modify-write update) on top of the
//! raw merge-write/read/watch contract of [`Backend`].
//!
//! ## Consistency
//!
//! Entry mutations are read-modify-write sequences without any cross-process
//! lock. Two concurrent [`ToolStore::update_entry`] calls against the same
//! tool document can race: the second writer's read may not reflect the
//! first writer's write, and the first write is then lost. This is an
//! accepted limitation of the store; callers needing strict consistency
//! should use field-level merge writes via [`ToolStore::set_document`] or
//! layer a version field on their entries.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::{Backend, SnapshotCallback};
use crate::clock::{Clock, SystemClock};
use crate::constants;
use crate::doc::{Doc, Entry};
use crate::path::DocPath;
use crate::tool::ToolKind;
use crate::watch::Watch;
use crate::Result;

mod errors;
pub use errors::StoreError;

mod profile;
pub use profile::UserProfile;

/// Document store for a remote per-user document backend.
///
/// `ToolStore` is a cheap-to-clone handle; clones share the same backend
/// connection and clock.
#[derive(Clone)]
pub struct ToolStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    backend: Arc<dyn Backend>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ToolStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolStore")
            .field("backend", &"<Backend>")
            .field("clock", &self.inner.clock)
            .finish()
    }
}

impl ToolStore {
    /// Creates a store over `backend`, stamping timestamps from the system
    /// clock.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                backend,
                clock: Arc::new(SystemClock),
            }),
        }
    }

    /// Creates a store with an explicit clock, for deterministic timestamps
    /// in tests.
    #[cfg(any(test, feature = "testing"))]
    pub fn with_clock(backend: Arc<dyn Backend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(StoreInner { backend, clock }),
        }
    }

    /// The backend this store writes through.
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.inner.backend
    }

    pub(crate) fn clock(&self) -> &Arc<dyn Clock> {
        &self.inner.clock
    }

    /// Merge-writes `data` into the document at `path`, creating it if
    /// absent. Fields absent from `data` are never clobbered.
    pub async fn set_document(&self, path: &DocPath, data: Doc) -> Result<()> {
        debug!(path = %path, fields = data.len(), "set document");
        self.inner.backend.merge_write(path, data).await
    }

    /// Reads the full document at `path`. `None` when it does not exist.
    pub async fn get_document(&self, path: &DocPath) -> Result<Option<Doc>> {
        self.inner.backend.read(path).await
    }

    /// Registers `on_change` for the document at `path`.
    ///
    /// The callback fires immediately with the current snapshot, then once
    /// per committed write in commit order, until the returned [`Watch`] is
    /// cancelled or dropped.
    pub async fn subscribe(
        &self,
        path: &DocPath,
        on_change: impl Fn(Option<Doc>) + Send + Sync + 'static,
    ) -> Result<Watch> {
        let callback: SnapshotCallback = Arc::new(on_change);
        self.inner.backend.watch(path, callback).await
    }

    /// One-shot read of the entry collection of `(uid, tool)`.
    ///
    /// An absent document or absent `items` field reads as an empty
    /// collection, not an error.
    pub async fn get_entries(&self, uid: &str, tool: ToolKind) -> Result<Vec<Entry>> {
        let path = DocPath::tool(uid, tool);
        let items = self.read_items(&path).await?;
        entries_from_items(&items, &path)
    }

    /// Inserts `entry` into the entry collection of `(uid, tool)` and
    /// returns the entry as stored.
    ///
    /// A missing `id` is filled with a generated UUID and a missing
    /// `createdAt` is stamped from the store's clock. Insertion uses
    /// set-union semantics: if a structurally identical entry is already
    /// present, nothing is written and the collection keeps its size.
    pub async fn add_entry(&self, uid: &str, tool: ToolKind, entry: Entry) -> Result<Entry> {
        let mut entry = entry;
        entry.ensure_identity(self.inner.clock.as_ref());

        let path = DocPath::tool(uid, tool);
        let mut items = self.read_items(&path).await?;
        let value = entry.to_value();

        if items.iter().any(|existing| existing == &value) {
            debug!(path = %path, "identical entry already present, skipping insert");
            return Ok(entry);
        }
        if let Some(id) = entry.id() {
            if items.iter().any(|existing| entry_id_of(existing) == Some(id)) {
                warn!(path = %path, id, "inserting entry with an id already in use");
            }
        }

        items.push(value);
        self.write_items(&path, items).await?;
        Ok(entry)
    }

    /// Replaces the entry whose `id` matches `updated.id()` with `updated`,
    /// wholesale (no field merge). Returns `true` if a replacement was
    /// written, `false` — with the document untouched — when no entry with
    /// that `id` exists.
    ///
    /// # Errors
    /// [`StoreError::MissingEntryId`] when `updated` carries no `id`.
    ///
    /// # Consistency
    /// This is a non-atomic read-modify-write of the whole collection. Two
    /// concurrent updates to the same tool document can lose one writer's
    /// change; see the module-level consistency note.
    pub async fn update_entry(&self, uid: &str, tool: ToolKind, updated: Entry) -> Result<bool> {
        let path = DocPath::tool(uid, tool);
        let Some(id) = updated.id().map(str::to_owned) else {
            return Err(StoreError::MissingEntryId {
                path: path.to_string(),
            }
            .into());
        };

        let mut items = self.read_items(&path).await?;
        let Some(position) = items
            .iter()
            .position(|existing| entry_id_of(existing) == Some(id.as_str()))
        else {
            debug!(path = %path, %id, "no entry with this id, leaving collection unchanged");
            return Ok(false);
        };

        items[position] = updated.into();
        self.write_items(&path, items).await?;
        Ok(true)
    }

    /// Removes every entry structurally equal to `entry` from the collection
    /// of `(uid, tool)`.
    ///
    /// Matching is by deep equality of the full entry, not by `id`: if the
    /// caller mutated any field since reading the entry, nothing matches and
    /// this is a silent no-op rather than an error.
    pub async fn delete_entry(&self, uid: &str, tool: ToolKind, entry: &Entry) -> Result<()> {
        let path = DocPath::tool(uid, tool);
        let value = entry.to_value();

        let mut items = self.read_items(&path).await?;
        let before = items.len();
        items.retain(|existing| existing != &value);

        if items.len() == before {
            debug!(path = %path, "no structurally equal entry, delete is a no-op");
            return Ok(());
        }
        self.write_items(&path, items).await
    }

    /// Registers `on_change` for the entry collection of `(uid, tool)`.
    ///
    /// Same contract as [`ToolStore::subscribe`], scoped to `items`: the
    /// callback receives the full collection on every change, and an empty
    /// collection — never an error — when the document is gone. Collection
    /// members that are not JSON objects are skipped with a warning.
    pub async fn listen_entries(
        &self,
        uid: &str,
        tool: ToolKind,
        on_change: impl Fn(Vec<Entry>) + Send + Sync + 'static,
    ) -> Result<Watch> {
        let path = DocPath::tool(uid, tool);
        let watched = path.clone();
        let callback: SnapshotCallback = Arc::new(move |snapshot: Option<Doc>| {
            let entries = match snapshot
                .as_ref()
                .and_then(|doc| doc.get(constants::ITEMS_FIELD))
            {
                Some(Value::Array(values)) => values
                    .iter()
                    .filter_map(|value| {
                        let entry = Entry::from_value(value);
                        if entry.is_none() {
                            warn!(path = %watched, "skipping non-object item in collection");
                        }
                        entry
                    })
                    .collect(),
                Some(_) => {
                    warn!(path = %watched, "items field is not an array, delivering empty collection");
                    Vec::new()
                }
                None => Vec::new(),
            };
            on_change(entries);
        });
        self.inner.backend.watch(&path, callback).await
    }

    /// Reads the raw `items` array at `path`; absent document or field reads
    /// as empty.
    async fn read_items(&self, path: &DocPath) -> Result<Vec<Value>> {
        match self.get_document(path).await? {
            None => Ok(Vec::new()),
            Some(doc) => match doc.get(constants::ITEMS_FIELD) {
                None => Ok(Vec::new()),
                Some(Value::Array(values)) => Ok(values.clone()),
                Some(other) => Err(StoreError::MalformedItems {
                    path: path.to_string(),
                    reason: format!("expected an array, found {}", json_type_name(other)),
                }
                .into()),
            },
        }
    }

    /// Writes the whole `items` array back. The merge write replaces the
    /// array wholesale and touches nothing else on the document.
    async fn write_items(&self, path: &DocPath, items: Vec<Value>) -> Result<()> {
        let mut patch = Doc::new();
        patch.set(constants::ITEMS_FIELD, Value::Array(items));
        self.inner.backend.merge_write(path, patch).await
    }
}

fn entries_from_items(items: &[Value], path: &DocPath) -> Result<Vec<Entry>> {
    items
        .iter()
        .map(|value| {
            Entry::from_value(value).ok_or_else(|| {
                StoreError::MalformedItems {
                    path: path.to_string(),
                    reason: format!("expected an object item, found {}", json_type_name(value)),
                }
                .into()
            })
        })
        .collect()
}

fn entry_id_of(value: &Value) -> Option<&str> {
    value.get(constants::ENTRY_ID_FIELD).and_then(Value::as_str)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
