//! Error types for store operations.

use thiserror::Error;

/// Errors raised by the document store itself, as opposed to errors
/// propagated from the backend.
///
/// Absence is never an error at this layer: missing documents read as
/// `None` and missing collections read as empty.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// An entry update was requested without an `id` to match on.
    #[error("entry update for '{path}' is missing the 'id' field")]
    MissingEntryId {
        /// The tool document path being updated
        path: String,
    },

    /// The `items` field of a tool document does not have the expected shape.
    #[error("malformed items collection at '{path}': {reason}")]
    MalformedItems {
        /// The tool document path
        path: String,
        /// Description of the shape mismatch
        reason: String,
    },
}

impl StoreError {
    /// Check if this error was caused by an incomplete caller payload.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, StoreError::MissingEntryId { .. })
    }

    /// Check if this error indicates corrupted document data.
    pub fn is_data_error(&self) -> bool {
        matches!(self, StoreError::MalformedItems { .. })
    }

    /// Get the document path associated with this error.
    pub fn path(&self) -> &str {
        match self {
            StoreError::MissingEntryId { path } | StoreError::MalformedItems { path, .. } => path,
        }
    }
}

impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
