//! Storage abstraction backing the in-memory connector.
//!
//! The `StorageProvider` trait defines pure data storage operations on JSON
//! documents. It knows nothing about attributes, deltas or capabilities; the
//! connector layer decides what a stored document means.
//!
//! # Example Usage
//!
//! ```rust
//! use connector_delta::storage::{StorageProvider, StorageKey, InMemoryStorage};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = InMemoryStorage::new();
//!
//! let key = StorageKey::new("__ACCOUNT__", "123");
//! storage.insert(key.clone(), json!([{"name": "cn", "values": []}])).await?;
//! assert!(storage.insert(key.clone(), json!([])).await.is_err());
//!
//! let retrieved = storage.get(key.clone()).await?;
//! assert!(retrieved.is_some());
//!
//! let was_deleted = storage.delete(key).await?;
//! assert!(was_deleted);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod in_memory;

pub use errors::StorageError;
pub use in_memory::InMemoryStorage;

use crate::objects::name::normalize_name;
use serde_json::Value;
use std::fmt;
use std::future::Future;

/// Key of a stored object: `object_class` → `id`.
///
/// The object class part is stored case-folded, matching how object classes
/// are compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    object_class: String,
    id: String,
}

impl StorageKey {
    pub fn new(object_class: &str, id: impl Into<String>) -> Self {
        Self {
            object_class: normalize_name(object_class),
            id: id.into(),
        }
    }

    /// The case-folded object class.
    pub fn object_class(&self) -> &str {
        &self.object_class
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.object_class, self.id)
    }
}

/// Document store used by connectors that keep objects as JSON.
///
/// `put` overwrites, `insert` never does. Whether a write creates or replaces
/// an object is the caller's decision.
pub trait StorageProvider: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store `data` at `key`, replacing any stored document.
    fn put(&self, key: StorageKey, data: Value)
    -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Store `data` at `key` unless a document is already stored there.
    ///
    /// The check and the write happen atomically, so of two concurrent
    /// inserts under one key exactly one succeeds.
    fn insert(
        &self,
        key: StorageKey,
        data: Value,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Retrieve data by key; `None` if nothing is stored there.
    fn get(
        &self,
        key: StorageKey,
    ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send;

    /// Delete data by key; `true` if something was deleted.
    fn delete(&self, key: StorageKey) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Count the documents stored for an object class.
    fn count(&self, object_class: &str)
    -> impl Future<Output = Result<usize, Self::Error>> + Send;
}
