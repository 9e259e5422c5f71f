//! The connector seam.
//!
//! A [`Connector`] is the adapter to one downstream resource. It advertises
//! what it can do through an explicit [`ConnectorCapabilities`] set; callers
//! consult that set before dispatching instead of probing the implementation.
//! Every operation except whole-object [`Connector::update`] is optional and
//! fails with [`ConnectorError::UnsupportedCapability`] unless implemented.

pub mod in_memory;
pub mod options;

pub use in_memory::InMemoryConnector;
pub use options::{OperationOptions, OperationOptionsBuilder};

use crate::delta::AttributeDeltaSet;
use crate::error::{ConnectorError, ConnectorResult};
use crate::objects::{AttributeSet, ConnectorObject, ObjectClass, Uid};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::future::Future;

/// Operations a connector may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorOperation {
    /// Create a new object
    Create,
    /// Look objects up (the fetch half of the fallback path)
    Search,
    /// Replace the given attributes of an object
    Update,
    /// Add or remove individual attribute values natively
    UpdateAttributeValues,
    /// Apply attribute deltas natively
    ComplexUpdateDelta,
    /// Delete an object
    Delete,
}

impl ConnectorOperation {
    /// Every operation, in declaration order.
    pub const ALL: [ConnectorOperation; 6] = [
        ConnectorOperation::Create,
        ConnectorOperation::Search,
        ConnectorOperation::Update,
        ConnectorOperation::UpdateAttributeValues,
        ConnectorOperation::ComplexUpdateDelta,
        ConnectorOperation::Delete,
    ];

    /// Position of this operation in [`ConnectorOperation::ALL`].
    pub fn index(self) -> usize {
        match self {
            ConnectorOperation::Create => 0,
            ConnectorOperation::Search => 1,
            ConnectorOperation::Update => 2,
            ConnectorOperation::UpdateAttributeValues => 3,
            ConnectorOperation::ComplexUpdateDelta => 4,
            ConnectorOperation::Delete => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectorOperation::Create => "create",
            ConnectorOperation::Search => "search",
            ConnectorOperation::Update => "update",
            ConnectorOperation::UpdateAttributeValues => "update_attribute_values",
            ConnectorOperation::ComplexUpdateDelta => "complex_update_delta",
            ConnectorOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for ConnectorOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of operations a connector advertises.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorCapabilities {
    operations: HashSet<ConnectorOperation>,
}

impl ConnectorCapabilities {
    /// A set with the given operations.
    pub fn new(operations: impl IntoIterator<Item = ConnectorOperation>) -> Self {
        Self {
            operations: operations.into_iter().collect(),
        }
    }

    /// Every operation.
    pub fn full() -> Self {
        Self::new(ConnectorOperation::ALL)
    }

    /// A connector that can only look objects up and replace them wholesale.
    pub fn replace_only() -> Self {
        Self::new([
            ConnectorOperation::Create,
            ConnectorOperation::Search,
            ConnectorOperation::Update,
            ConnectorOperation::Delete,
        ])
    }

    pub fn supports(&self, operation: ConnectorOperation) -> bool {
        self.operations.contains(&operation)
    }

    pub fn with(mut self, operation: ConnectorOperation) -> Self {
        self.operations.insert(operation);
        self
    }

    pub fn without(mut self, operation: ConnectorOperation) -> Self {
        self.operations.remove(&operation);
        self
    }

    /// Fail with `UnsupportedCapability` unless `operation` is advertised.
    pub fn require(&self, operation: ConnectorOperation) -> ConnectorResult<()> {
        if self.supports(operation) {
            Ok(())
        } else {
            Err(ConnectorError::unsupported(operation))
        }
    }

    /// The advertised operations, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = ConnectorOperation> + '_ {
        ConnectorOperation::ALL
            .into_iter()
            .filter(|op| self.supports(*op))
    }
}

/// Adapter to a downstream resource.
///
/// Implementations report what they support through [`Connector::capabilities`];
/// optional operations keep their default body, which fails with
/// `UnsupportedCapability`. Errors raised by an implementation are surfaced by
/// callers unchanged.
pub trait Connector: Send + Sync {
    /// The operations this connector supports.
    fn capabilities(&self) -> &ConnectorCapabilities;

    /// Replace the given attributes of an object.
    ///
    /// Attributes not named are left alone; an attribute with no values
    /// clears it. Returns the uid of the object, which may have changed.
    fn update(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        attributes: AttributeSet,
        options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<Uid>> + Send;

    /// Create an object and return its uid.
    fn create(
        &self,
        _object_class: &ObjectClass,
        _attributes: AttributeSet,
        _options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<Uid>> + Send {
        async { Err(ConnectorError::unsupported(ConnectorOperation::Create)) }
    }

    /// Fetch one object, restricted to `options.attributes_to_get` when set.
    fn get_object(
        &self,
        _object_class: &ObjectClass,
        _uid: &Uid,
        _options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<Option<ConnectorObject>>> + Send {
        async { Err(ConnectorError::unsupported(ConnectorOperation::Search)) }
    }

    /// Append values to the named attributes natively.
    fn add_attribute_values(
        &self,
        _object_class: &ObjectClass,
        _uid: &Uid,
        _values: AttributeSet,
        _options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<Uid>> + Send {
        async {
            Err(ConnectorError::unsupported(
                ConnectorOperation::UpdateAttributeValues,
            ))
        }
    }

    /// Remove values from the named attributes natively.
    fn remove_attribute_values(
        &self,
        _object_class: &ObjectClass,
        _uid: &Uid,
        _values: AttributeSet,
        _options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<Uid>> + Send {
        async {
            Err(ConnectorError::unsupported(
                ConnectorOperation::UpdateAttributeValues,
            ))
        }
    }

    /// Apply attribute deltas natively and return the side-effect deltas the
    /// resource reported.
    fn complex_update_delta(
        &self,
        _object_class: &ObjectClass,
        _uid: &Uid,
        _deltas: AttributeDeltaSet,
        _options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<AttributeDeltaSet>> + Send {
        async {
            Err(ConnectorError::unsupported(
                ConnectorOperation::ComplexUpdateDelta,
            ))
        }
    }

    /// Delete an object.
    fn delete(
        &self,
        _object_class: &ObjectClass,
        _uid: &Uid,
        _options: &OperationOptions,
    ) -> impl Future<Output = ConnectorResult<()>> + Send {
        async { Err(ConnectorError::unsupported(ConnectorOperation::Delete)) }
    }
}
