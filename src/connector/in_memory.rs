//! In-process reference connector.
//!
//! Objects live in an [`InMemoryStorage`] as JSON attribute lists. The
//! advertised capability set is configurable, so the same connector can play
//! both a delta-capable resource and a replace-only one. Every operation is
//! counted and can be made to fail once, which lets tests observe which calls
//! the reconciliation layer issued.
//!
//! # Example Usage
//!
//! ```rust
//! use connector_delta::connector::{
//!     Connector, ConnectorCapabilities, ConnectorOperation, InMemoryConnector, OperationOptions,
//! };
//! use connector_delta::objects::{Attribute, AttributeSet, ObjectClass};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connector = InMemoryConnector::with_capabilities(ConnectorCapabilities::replace_only());
//! let attributes = AttributeSet::from_attributes([
//!     Attribute::new("__NAME__", vec!["jdoe".into()])?,
//! ])?;
//! let uid = connector
//!     .create(&ObjectClass::ACCOUNT, attributes, &OperationOptions::default())
//!     .await?;
//! assert_eq!(uid.value(), "jdoe");
//! assert_eq!(connector.calls(ConnectorOperation::Create), 1);
//! # Ok(())
//! # }
//! ```

use crate::connector::{
    Connector, ConnectorCapabilities, ConnectorOperation, OperationOptions,
};
use crate::delta::{AttributeDeltaSet, apply_deltas};
use crate::error::{ConnectorError, ConnectorResult};
use crate::objects::name::NAME;
use crate::objects::{AttributeSet, ConnectorObject, ObjectClass, Uid};
use crate::reconcile::{UpdateMode, merge};
use crate::storage::{InMemoryStorage, StorageError, StorageKey, StorageProvider};
use log::trace;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Connector keeping objects in process memory.
pub struct InMemoryConnector {
    storage: InMemoryStorage,
    capabilities: ConnectorCapabilities,
    calls: [AtomicUsize; 6],
    failures: Mutex<HashMap<ConnectorOperation, StorageError>>,
}

impl InMemoryConnector {
    /// A connector supporting every operation.
    pub fn new() -> Self {
        Self::with_capabilities(ConnectorCapabilities::full())
    }

    /// A connector advertising exactly `capabilities`.
    pub fn with_capabilities(capabilities: ConnectorCapabilities) -> Self {
        Self {
            storage: InMemoryStorage::new(),
            capabilities,
            calls: Default::default(),
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// How many times `operation` was invoked, supported or not.
    pub fn calls(&self, operation: ConnectorOperation) -> usize {
        self.calls[operation.index()].load(Ordering::SeqCst)
    }

    /// Reset every call counter to zero.
    pub fn reset_calls(&self) {
        for counter in &self.calls {
            counter.store(0, Ordering::SeqCst);
        }
    }

    /// Make the next invocation of `operation` fail with `error`.
    ///
    /// The error is reported the way a real resource failure would be, as
    /// [`ConnectorError::Connector`].
    pub async fn fail_next(&self, operation: ConnectorOperation, error: StorageError) {
        self.failures.lock().await.insert(operation, error);
    }

    /// Store an object directly, bypassing capabilities and counters.
    pub async fn insert_object(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        attributes: AttributeSet,
    ) -> ConnectorResult<()> {
        self.store(object_class, uid, &attributes).await
    }

    /// Read an object directly, bypassing capabilities and counters.
    pub async fn stored_attributes(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
    ) -> ConnectorResult<Option<AttributeSet>> {
        self.load(object_class, uid).await
    }

    /// Number of stored objects of a class.
    pub async fn object_count(&self, object_class: &ObjectClass) -> ConnectorResult<usize> {
        Ok(self.storage.count(object_class.name()).await?)
    }

    async fn enter(&self, operation: ConnectorOperation) -> ConnectorResult<()> {
        self.calls[operation.index()].fetch_add(1, Ordering::SeqCst);
        trace!("in-memory connector: {}", operation);
        self.capabilities.require(operation)?;
        match self.failures.lock().await.remove(&operation) {
            Some(error) => Err(ConnectorError::connector(error)),
            None => Ok(()),
        }
    }

    async fn load(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
    ) -> ConnectorResult<Option<AttributeSet>> {
        let key = StorageKey::new(object_class.name(), uid.value());
        match self.storage.get(key).await? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    async fn load_existing(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
    ) -> ConnectorResult<AttributeSet> {
        self.load(object_class, uid)
            .await?
            .ok_or_else(|| ConnectorError::object_not_found(object_class.name(), uid.value()))
    }

    async fn store(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        attributes: &AttributeSet,
    ) -> ConnectorResult<()> {
        let key = StorageKey::new(object_class.name(), uid.value());
        self.storage
            .put(key, serde_json::to_value(attributes)?)
            .await?;
        Ok(())
    }

    async fn replace_values(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        current: AttributeSet,
        replacements: AttributeSet,
    ) -> ConnectorResult<Uid> {
        let updated = overlay(current, replacements);
        self.store(object_class, uid, &updated).await?;
        Ok(uid.clone())
    }
}

impl Default for InMemoryConnector {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace attributes of `current` with `replacements`; an empty replacement
/// removes the attribute.
fn overlay(mut current: AttributeSet, replacements: AttributeSet) -> AttributeSet {
    for attribute in replacements {
        if attribute.is_empty() {
            current.remove(attribute.name());
        } else {
            current.insert(attribute);
        }
    }
    current
}

impl Connector for InMemoryConnector {
    fn capabilities(&self) -> &ConnectorCapabilities {
        &self.capabilities
    }

    async fn create(
        &self,
        object_class: &ObjectClass,
        attributes: AttributeSet,
        _options: &OperationOptions,
    ) -> ConnectorResult<Uid> {
        self.enter(ConnectorOperation::Create).await?;

        let uid = match attributes
            .get(NAME)
            .and_then(|name| name.single_value())
            .and_then(|value| value.as_str())
        {
            Some(name) => Uid::new(name)?,
            None => Uid::new(uuid::Uuid::new_v4().to_string())?,
        };

        let key = StorageKey::new(object_class.name(), uid.value());
        self.storage
            .insert(key, serde_json::to_value(&attributes)?)
            .await?;
        Ok(uid)
    }

    async fn get_object(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        options: &OperationOptions,
    ) -> ConnectorResult<Option<ConnectorObject>> {
        self.enter(ConnectorOperation::Search).await?;

        Ok(self.load(object_class, uid).await?.map(|attributes| {
            let returned = attributes
                .into_iter()
                .filter(|attribute| options.wants(attribute.name()))
                .collect();
            ConnectorObject::new(
                object_class.clone(),
                uid.clone(),
                AttributeSet::from_unique(returned),
            )
        }))
    }

    async fn update(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        attributes: AttributeSet,
        _options: &OperationOptions,
    ) -> ConnectorResult<Uid> {
        self.enter(ConnectorOperation::Update).await?;
        let current = self.load_existing(object_class, uid).await?;
        self.replace_values(object_class, uid, current, attributes)
            .await
    }

    async fn add_attribute_values(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        values: AttributeSet,
        _options: &OperationOptions,
    ) -> ConnectorResult<Uid> {
        self.enter(ConnectorOperation::UpdateAttributeValues).await?;
        let current = self.load_existing(object_class, uid).await?;
        let merged = merge(&values, &current, UpdateMode::Add);
        self.replace_values(object_class, uid, current, merged).await
    }

    async fn remove_attribute_values(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        values: AttributeSet,
        _options: &OperationOptions,
    ) -> ConnectorResult<Uid> {
        self.enter(ConnectorOperation::UpdateAttributeValues).await?;
        let current = self.load_existing(object_class, uid).await?;
        let merged = merge(&values, &current, UpdateMode::Remove);
        self.replace_values(object_class, uid, current, merged).await
    }

    async fn complex_update_delta(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        deltas: AttributeDeltaSet,
        _options: &OperationOptions,
    ) -> ConnectorResult<AttributeDeltaSet> {
        self.enter(ConnectorOperation::ComplexUpdateDelta).await?;
        let current = self.load_existing(object_class, uid).await?;
        let applied = apply_deltas(&current, &deltas);
        let changed = applied.restricted_to(&deltas.names());
        self.replace_values(object_class, uid, current, changed)
            .await?;
        Ok(AttributeDeltaSet::new())
    }

    async fn delete(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        _options: &OperationOptions,
    ) -> ConnectorResult<()> {
        self.enter(ConnectorOperation::Delete).await?;
        let key = StorageKey::new(object_class.name(), uid.value());
        if self.storage.delete(key).await? {
            Ok(())
        } else {
            Err(ConnectorError::object_not_found(
                object_class.name(),
                uid.value(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::ComplexAttributeDelta;
    use crate::objects::{Attribute, AttributeValue};

    fn attr(name: &str, values: &[&str]) -> Attribute {
        Attribute::new(name, values.iter().map(|v| AttributeValue::from(*v)).collect()).unwrap()
    }

    fn set(attributes: Vec<Attribute>) -> AttributeSet {
        AttributeSet::from_attributes(attributes).unwrap()
    }

    #[tokio::test]
    async fn test_create_uses_name_or_generates_uid() {
        let connector = InMemoryConnector::new();
        let options = OperationOptions::default();

        let named = connector
            .create(&ObjectClass::ACCOUNT, set(vec![attr("__NAME__", &["jdoe"])]), &options)
            .await
            .unwrap();
        assert_eq!(named.value(), "jdoe");

        let generated = connector
            .create(&ObjectClass::ACCOUNT, set(vec![attr("cn", &["x"])]), &options)
            .await
            .unwrap();
        assert!(uuid::Uuid::parse_str(generated.value()).is_ok());
        assert_eq!(connector.object_count(&ObjectClass::ACCOUNT).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_existing_name() {
        let connector = InMemoryConnector::new();
        let options = OperationOptions::default();
        let attributes = set(vec![attr("__NAME__", &["jdoe"])]);

        connector
            .create(&ObjectClass::ACCOUNT, attributes.clone(), &options)
            .await
            .unwrap();
        let err = connector
            .create(&ObjectClass::ACCOUNT, attributes, &options)
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::Storage(ref e) if e.is_conflict()));
    }

    #[tokio::test]
    async fn test_concurrent_creates_with_one_name() {
        let connector = InMemoryConnector::new();
        let options = OperationOptions::default();
        let attributes = set(vec![attr("__NAME__", &["jdoe"])]);

        let results = futures::future::join_all((0..8).map(|_| {
            connector.create(&ObjectClass::ACCOUNT, attributes.clone(), &options)
        }))
        .await;

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(connector.object_count(&ObjectClass::ACCOUNT).await.unwrap(), 1);
        assert_eq!(connector.calls(ConnectorOperation::Create), 8);
    }

    #[tokio::test]
    async fn test_get_object_honours_attributes_to_get() {
        let connector = InMemoryConnector::new();
        let uid = Uid::new("1").unwrap();
        connector
            .insert_object(
                &ObjectClass::ACCOUNT,
                &uid,
                set(vec![attr("cn", &["a"]), attr("mail", &["m"])]),
            )
            .await
            .unwrap();

        let options = OperationOptions::builder().attributes_to_get(["MAIL"]).build();
        let object = connector
            .get_object(&ObjectClass::ACCOUNT, &uid, &options)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(object.attributes().names(), vec!["mail"]);

        let missing = connector
            .get_object(&ObjectClass::ACCOUNT, &Uid::new("2").unwrap(), &options)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_and_clears() {
        let connector = InMemoryConnector::new();
        let uid = Uid::new("1").unwrap();
        connector
            .insert_object(
                &ObjectClass::ACCOUNT,
                &uid,
                set(vec![attr("cn", &["a"]), attr("mail", &["m"])]),
            )
            .await
            .unwrap();

        connector
            .update(
                &ObjectClass::ACCOUNT,
                &uid,
                set(vec![attr("cn", &["b"]), Attribute::empty("mail").unwrap()]),
                &OperationOptions::default(),
            )
            .await
            .unwrap();

        let stored = connector
            .stored_attributes(&ObjectClass::ACCOUNT, &uid)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, set(vec![attr("cn", &["b"])]));
    }

    #[tokio::test]
    async fn test_update_missing_object() {
        let connector = InMemoryConnector::new();
        let err = connector
            .update(
                &ObjectClass::ACCOUNT,
                &Uid::new("nope").unwrap(),
                AttributeSet::new(),
                &OperationOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_native_add_and_remove() {
        let connector = InMemoryConnector::new();
        let uid = Uid::new("1").unwrap();
        let options = OperationOptions::default();
        connector
            .insert_object(&ObjectClass::GROUP, &uid, set(vec![attr("member", &["a"])]))
            .await
            .unwrap();

        connector
            .add_attribute_values(&ObjectClass::GROUP, &uid, set(vec![attr("member", &["b"])]), &options)
            .await
            .unwrap();
        connector
            .remove_attribute_values(&ObjectClass::GROUP, &uid, set(vec![attr("member", &["a"])]), &options)
            .await
            .unwrap();

        let stored = connector
            .stored_attributes(&ObjectClass::GROUP, &uid)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, set(vec![attr("member", &["b"])]));
        assert_eq!(connector.calls(ConnectorOperation::UpdateAttributeValues), 2);
        assert_eq!(connector.calls(ConnectorOperation::Update), 0);
    }

    #[tokio::test]
    async fn test_native_complex_update_delta() {
        let connector = InMemoryConnector::new();
        let uid = Uid::new("1").unwrap();
        connector
            .insert_object(&ObjectClass::ACCOUNT, &uid, set(vec![attr("mail", &["a"]), attr("cn", &["c"])]))
            .await
            .unwrap();

        let deltas = AttributeDeltaSet::from_deltas([ComplexAttributeDelta::builder("mail")
            .delete_all()
            .add(["b"])
            .build()
            .unwrap()])
        .unwrap();
        let side_effects = connector
            .complex_update_delta(&ObjectClass::ACCOUNT, &uid, deltas, &OperationOptions::default())
            .await
            .unwrap();
        assert!(side_effects.is_empty());

        let stored = connector
            .stored_attributes(&ObjectClass::ACCOUNT, &uid)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, set(vec![attr("mail", &["b"]), attr("cn", &["c"])]));
    }

    #[tokio::test]
    async fn test_unsupported_operation_is_counted_and_rejected() {
        let connector = InMemoryConnector::with_capabilities(ConnectorCapabilities::replace_only());
        let err = connector
            .add_attribute_values(
                &ObjectClass::ACCOUNT,
                &Uid::new("1").unwrap(),
                AttributeSet::new(),
                &OperationOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(err.is_unsupported());
        assert_eq!(connector.calls(ConnectorOperation::UpdateAttributeValues), 1);

        connector.reset_calls();
        assert_eq!(connector.calls(ConnectorOperation::UpdateAttributeValues), 0);
    }

    #[tokio::test]
    async fn test_injected_failure_fires_once() {
        let connector = InMemoryConnector::new();
        let uid = Uid::new("1").unwrap();
        let options = OperationOptions::default();
        connector
            .insert_object(&ObjectClass::ACCOUNT, &uid, AttributeSet::new())
            .await
            .unwrap();
        connector
            .fail_next(ConnectorOperation::Delete, StorageError::unavailable("maintenance"))
            .await;

        let err = connector
            .delete(&ObjectClass::ACCOUNT, &uid, &options)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Storage unavailable: maintenance");

        connector.delete(&ObjectClass::ACCOUNT, &uid, &options).await.unwrap();
        let err = connector
            .delete(&ObjectClass::ACCOUNT, &uid, &options)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
