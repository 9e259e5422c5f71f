//! Error types for delta application and update reconciliation.
//!
//! This module provides the error taxonomy shared by the object model, the delta
//! algebra, the connector seam and the operation runner. Errors raised by a
//! connector travel through the reconciliation layer untouched.

use crate::connector::ConnectorOperation;
use crate::storage::StorageError;

/// Main error type for connector operations.
///
/// Every fallible operation in this crate returns [`ConnectorResult`]. Nothing
/// in the delta engine or the reconciliation layer retries or swallows one of
/// these; they are surfaced to the caller as produced.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// A caller supplied an argument that can never be valid (blank names,
    /// a merge without a filter, duplicated attribute names, ...)
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The connector does not advertise the capability the request needs
    #[error("Connector does not support operation '{operation}'")]
    UnsupportedCapability { operation: ConnectorOperation },

    /// No object exists for the given identity
    #[error("Object not found: {object_class} with uid {uid}")]
    ObjectNotFound { object_class: String, uid: String },

    /// Error raised by the connector itself, reported as-is
    #[error(transparent)]
    Connector(Box<dyn std::error::Error + Send + Sync>),

    /// Errors from the storage backing the in-memory connector
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConnectorError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an unsupported capability error
    pub fn unsupported(operation: ConnectorOperation) -> Self {
        Self::UnsupportedCapability { operation }
    }

    /// Create an object not found error
    pub fn object_not_found(object_class: impl Into<String>, uid: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            object_class: object_class.into(),
            uid: uid.into(),
        }
    }

    /// Wrap an error raised by a connector implementation
    pub fn connector<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connector(Box::new(error))
    }

    /// Whether this error is an [`ConnectorError::InvalidArgument`]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Whether this error is an [`ConnectorError::UnsupportedCapability`]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedCapability { .. })
    }

    /// Whether this error is an [`ConnectorError::ObjectNotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound { .. })
    }
}

pub type ConnectorResult<T> = Result<T, ConnectorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation() {
        let error = ConnectorError::object_not_found("__ACCOUNT__", "123");
        assert!(error.to_string().contains("__ACCOUNT__"));
        assert!(error.to_string().contains("123"));
        assert!(error.is_not_found());
    }

    #[test]
    fn test_unsupported_names_operation() {
        let error = ConnectorError::unsupported(ConnectorOperation::Search);
        assert!(error.is_unsupported());
        assert!(error.to_string().contains("search"));
    }

    #[test]
    fn test_connector_error_is_transparent() {
        let error = ConnectorError::connector(io::Error::new(io::ErrorKind::TimedOut, "ldap timed out"));
        assert_eq!(error.to_string(), "ldap timed out");
    }

    #[test]
    fn test_storage_error_chain() {
        let storage_error = StorageError::internal("disk gone");
        let error = ConnectorError::from(storage_error);
        assert!(error.to_string().contains("Storage error"));
    }
}
