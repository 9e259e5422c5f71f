//! Attribute delta algebra and update reconciliation for identity connectors.
//!
//! Describes modifications to the attributes of objects on a downstream
//! resource, applies them as pure functions, and runs value-level updates
//! against connectors that may only support whole-object replacement.
//!
//! # Core Components
//!
//! - [`delta`] - Delta types and the application engine
//! - [`Connector`] - Trait a resource adapter implements, with its capability set
//! - [`reconcile`] - Native dispatch or fetch-and-merge fallback for value updates
//! - [`ConnectorFacade`] - Validating, logging entry point over a connector
//!
//! # Quick Start
//!
//! ```rust
//! use connector_delta::{Attribute, AttributeSet, ConnectorFacade, InMemoryConnector, ObjectClass};
//! use connector_delta::connector::{ConnectorCapabilities, OperationOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connector = InMemoryConnector::with_capabilities(ConnectorCapabilities::replace_only());
//! let facade = ConnectorFacade::new(connector);
//! let options = OperationOptions::default();
//!
//! let uid = facade
//!     .create(
//!         &ObjectClass::ACCOUNT,
//!         AttributeSet::from_attributes([Attribute::new("mail", vec!["a@example.com".into()])?])?,
//!         &options,
//!     )
//!     .await?;
//! facade
//!     .remove_attribute_values(
//!         &ObjectClass::ACCOUNT,
//!         &uid,
//!         AttributeSet::from_attributes([Attribute::new("mail", vec!["a@example.com".into()])?])?,
//!         &options,
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod connector;
pub mod delta;
pub mod error;
pub mod objects;
pub mod operation;
pub mod reconcile;
pub mod storage;

// Re-export commonly used types for convenience
pub use connector::{
    Connector, ConnectorCapabilities, ConnectorOperation, InMemoryConnector, OperationOptions,
};
pub use delta::{
    AttributeDelta, AttributeDeltaSet, AttributeValueDelta, ComplexAttributeDelta, DeltaOp,
    ValueDelta, apply_delta, apply_deltas,
};
pub use error::{ConnectorError, ConnectorResult};
pub use objects::{
    Attribute, AttributeSet, AttributeValue, ConnectorObject, EmbeddedObject, Filter, FilterRef,
    ObjectClass, Uid, filters,
};
pub use operation::{ConnectorFacade, FacadeConfig};
pub use reconcile::{UpdateMode, reconcile};
