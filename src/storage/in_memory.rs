//! In-memory document store.
//!
//! Documents are grouped per case-folded object class behind a single tokio
//! `RwLock`. Nothing is persisted.

use crate::objects::name::normalize_name;
use crate::storage::{StorageError, StorageKey, StorageProvider};
use log::trace;
use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

type Documents = HashMap<String, HashMap<String, Value>>;

/// Thread-safe in-memory storage; clones share the same documents.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    data: Arc<RwLock<Documents>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageProvider for InMemoryStorage {
    type Error = StorageError;

    async fn put(&self, key: StorageKey, data: Value) -> Result<(), Self::Error> {
        trace!("storage put {}", key);
        let mut documents = self.data.write().await;
        documents
            .entry(key.object_class().to_string())
            .or_default()
            .insert(key.id().to_string(), data);
        Ok(())
    }

    async fn insert(&self, key: StorageKey, data: Value) -> Result<(), Self::Error> {
        trace!("storage insert {}", key);
        let mut documents = self.data.write().await;
        match documents
            .entry(key.object_class().to_string())
            .or_default()
            .entry(key.id().to_string())
        {
            Entry::Occupied(_) => Err(StorageError::already_exists(&key)),
            Entry::Vacant(slot) => {
                slot.insert(data);
                Ok(())
            }
        }
    }

    async fn get(&self, key: StorageKey) -> Result<Option<Value>, Self::Error> {
        trace!("storage get {}", key);
        let documents = self.data.read().await;
        Ok(documents
            .get(key.object_class())
            .and_then(|class| class.get(key.id()))
            .cloned())
    }

    async fn delete(&self, key: StorageKey) -> Result<bool, Self::Error> {
        trace!("storage delete {}", key);
        let mut documents = self.data.write().await;
        Ok(documents
            .get_mut(key.object_class())
            .is_some_and(|class| class.remove(key.id()).is_some()))
    }

    async fn count(&self, object_class: &str) -> Result<usize, Self::Error> {
        let documents = self.data.read().await;
        Ok(documents
            .get(&normalize_name(object_class))
            .map_or(0, HashMap::len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_overwrites() {
        let storage = InMemoryStorage::new();
        let key = StorageKey::new("__ACCOUNT__", "jdoe");

        storage.put(key.clone(), json!(["a"])).await.unwrap();
        storage.put(key.clone(), json!(["b"])).await.unwrap();
        assert_eq!(storage.get(key).await.unwrap(), Some(json!(["b"])));
    }

    #[tokio::test]
    async fn test_insert_keeps_existing_document() {
        let storage = InMemoryStorage::new();
        let key = StorageKey::new("__ACCOUNT__", "jdoe");

        storage.insert(key.clone(), json!(["first"])).await.unwrap();
        let err = storage
            .insert(StorageKey::new("__account__", "jdoe"), json!(["second"]))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(storage.get(key).await.unwrap(), Some(json!(["first"])));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_under_one_key() {
        let storage = InMemoryStorage::new();
        let attempts = (0..16).map(|i| {
            let storage = storage.clone();
            tokio::spawn(async move {
                storage
                    .insert(StorageKey::new("__GROUP__", "admins"), json!(i))
                    .await
            })
        });

        let mut succeeded = 0;
        for attempt in attempts.collect::<Vec<_>>() {
            if attempt.await.unwrap().is_ok() {
                succeeded += 1;
            }
        }
        assert_eq!(succeeded, 1);
        assert_eq!(storage.count("__GROUP__").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let storage = InMemoryStorage::new();
        let key = StorageKey::new("__ACCOUNT__", "123");
        storage.put(key.clone(), json!({})).await.unwrap();

        assert!(storage.delete(key.clone()).await.unwrap());
        assert!(storage.get(key.clone()).await.unwrap().is_none());
        assert!(!storage.delete(key).await.unwrap());
    }

    #[tokio::test]
    async fn test_count_per_object_class() {
        let storage = InMemoryStorage::new();
        storage
            .put(StorageKey::new("__ACCOUNT__", "1"), json!(1))
            .await
            .unwrap();
        storage
            .put(StorageKey::new("__ACCOUNT__", "2"), json!(2))
            .await
            .unwrap();
        storage
            .put(StorageKey::new("__GROUP__", "1"), json!(3))
            .await
            .unwrap();

        assert_eq!(storage.count("__Account__").await.unwrap(), 2);
        assert_eq!(storage.count("__GROUP__").await.unwrap(), 1);
        assert_eq!(storage.count("role").await.unwrap(), 0);
    }
}
