//! Storage-specific error types.
//!
//! These errors describe failures of the document store only. They know
//! nothing about deltas or connector capabilities.

use crate::storage::StorageKey;
use std::fmt;
use std::time::Duration;

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// An insert found a document already stored under the key.
    AlreadyExists { key: String },

    /// The backing store can not be reached.
    Unavailable { message: String },

    /// A storage call did not complete in time.
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Anything else the store reports.
    Internal { message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::AlreadyExists { key } => write!(f, "Object already exists: {}", key),
            StorageError::Unavailable { message } => write!(f, "Storage unavailable: {}", message),
            StorageError::Timeout {
                operation,
                duration,
            } => write!(f, "Timeout during {} after {:?}", operation, duration),
            StorageError::Internal { message } => write!(f, "Internal storage error: {}", message),
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    pub fn already_exists(key: &StorageKey) -> Self {
        Self::AlreadyExists {
            key: key.to_string(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if an insert collided with a stored document.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::AlreadyExists { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let key = StorageKey::new("__ACCOUNT__", "jdoe");
        assert_eq!(
            StorageError::already_exists(&key).to_string(),
            "Object already exists: __account__/jdoe"
        );
        assert_eq!(
            StorageError::unavailable("maintenance").to_string(),
            "Storage unavailable: maintenance"
        );
        assert_eq!(
            StorageError::timeout("get", Duration::from_secs(30)).to_string(),
            "Timeout during get after 30s"
        );
    }

    #[test]
    fn test_only_inserts_conflict() {
        let key = StorageKey::new("__GROUP__", "admins");
        assert!(StorageError::already_exists(&key).is_conflict());
        assert!(!StorageError::unavailable("down").is_conflict());
        assert!(!StorageError::internal("disk").is_conflict());
    }
}
