//! Error types for backend operations.
//!
//! Absence of a document is not represented here: [`Backend::read`] yields
//! `Ok(None)` for missing documents. Backend errors are surfaced to the
//! caller unchanged; this layer never retries on its own.
//!
//! [`Backend::read`]: super::Backend::read

use thiserror::Error;

/// Errors that can occur talking to the remote document backend.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not be reached. The caller decides retry policy.
    #[error("backend unavailable: {reason}")]
    Unavailable {
        /// Description of the failure
        reason: String,
    },

    /// The backend rejected the operation. Never retried.
    #[error("permission denied for '{path}'")]
    PermissionDenied {
        /// The path the rejected operation addressed
        path: String,
    },

    /// Serializing a document payload for the wire failed.
    #[error("serialization failed for '{path}'")]
    SerializationFailed {
        /// The path being written
        path: String,
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Decoding a document payload from the backend failed.
    #[error("deserialization failed for '{path}'")]
    DeserializationFailed {
        /// The path being read
        path: String,
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },
}

impl BackendError {
    /// Check if this error indicates the backend could not be reached.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, BackendError::Unavailable { .. })
    }

    /// Check if this error indicates the backend rejected the operation.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, BackendError::PermissionDenied { .. })
    }

    /// Check if this error is related to serialization.
    pub fn is_serialization_error(&self) -> bool {
        matches!(
            self,
            BackendError::SerializationFailed { .. } | BackendError::DeserializationFailed { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            BackendError::PermissionDenied { path }
            | BackendError::SerializationFailed { path, .. }
            | BackendError::DeserializationFailed { path, .. } => Some(path),
            BackendError::Unavailable { .. } => None,
        }
    }
}

impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
