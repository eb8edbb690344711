//! Document and entry payload types.
//!
//! A [`Doc`] is the free-form JSON-object payload of one backend document.
//! Writes go through merge semantics: nested objects merge recursively,
//! arrays and scalars are replaced wholesale, and fields absent from a patch
//! are never touched.
//!
//! An [`Entry`] is one opaque record inside a tool document's `items`
//! collection. The store guarantees every stored entry carries a string `id`
//! and a `createdAt` timestamp; everything else is caller-defined. Structural
//! equality (`PartialEq` over the underlying JSON) is the identity used by
//! dedup-on-add and delete.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clock::Clock;
use crate::constants;

/// A free-form document payload, written via merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Doc {
    fields: Map<String, Value>,
}

impl Doc {
    /// Creates an empty document payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a field value.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&Value> {
        self.fields.get(key.as_ref())
    }

    /// Sets a field value, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Returns true if the document has a field named `key`.
    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.fields.contains_key(key.as_ref())
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the top-level fields.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Merges `patch` into this document.
    ///
    /// Fields present in `patch` overwrite the corresponding fields here,
    /// except that two objects merge recursively. Arrays and scalars are
    /// replaced wholesale. Fields absent from `patch` are left untouched.
    pub fn merge_from(&mut self, patch: &Doc) {
        merge_objects(&mut self.fields, &patch.fields);
    }

    /// Consumes the document, returning the underlying field map.
    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for Doc {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl From<Doc> for Value {
    fn from(doc: Doc) -> Self {
        Value::Object(doc.fields)
    }
}

fn merge_objects(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, incoming) in patch {
        let merged_in_place = match (target.get_mut(key), incoming) {
            (Some(Value::Object(existing)), Value::Object(patch_obj)) => {
                merge_objects(existing, patch_obj);
                true
            }
            _ => false,
        };
        if !merged_in_place {
            target.insert(key.clone(), incoming.clone());
        }
    }
}

/// One record inside a tool document's `items` collection.
///
/// Entries are opaque to the store beyond their `id` and `createdAt` fields.
/// Two entries are the same entry for dedup/delete purposes iff they are
/// structurally equal, field for field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entry {
    fields: Map<String, Value>,
}

impl Entry {
    /// Creates an empty entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field assignment.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Gets a field value.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&Value> {
        self.fields.get(key.as_ref())
    }

    /// Sets a field value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// The entry's unique identifier, if it carries one.
    pub fn id(&self) -> Option<&str> {
        self.fields
            .get(constants::ENTRY_ID_FIELD)
            .and_then(Value::as_str)
    }

    /// The entry's creation timestamp, if it carries one.
    ///
    /// The store stamps an RFC3339 string, but caller-supplied values are
    /// kept as-is, so this is exposed as a raw [`Value`].
    pub fn created_at(&self) -> Option<&Value> {
        self.fields.get(constants::ENTRY_CREATED_AT_FIELD)
    }

    /// Fills in the identity fields the store guarantees: a generated UUID
    /// `id` when none is supplied, and a `createdAt` timestamp from `clock`
    /// when none is supplied. Caller-supplied values are never overwritten.
    pub(crate) fn ensure_identity(&mut self, clock: &dyn Clock) {
        if self.id().is_none() {
            self.fields.insert(
                constants::ENTRY_ID_FIELD.to_string(),
                Value::String(uuid::Uuid::new_v4().to_string()),
            );
        }
        if !self.fields.contains_key(constants::ENTRY_CREATED_AT_FIELD) {
            self.fields.insert(
                constants::ENTRY_CREATED_AT_FIELD.to_string(),
                Value::String(clock.now_rfc3339()),
            );
        }
    }

    /// Interprets a JSON value as an entry. Returns `None` for non-objects.
    pub fn from_value(value: &Value) -> Option<Entry> {
        match value {
            Value::Object(fields) => Some(Entry {
                fields: fields.clone(),
            }),
            _ => None,
        }
    }

    /// The entry as a JSON value, for structural comparison and storage.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl From<Entry> for Value {
    fn from(entry: Entry) -> Self {
        Value::Object(entry.fields)
    }
}
