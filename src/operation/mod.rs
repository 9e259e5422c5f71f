//! The operation runner.
//!
//! [`ConnectorFacade`] is what callers hold. It validates input, checks the
//! connector's advertised capabilities, routes value and delta updates through
//! [`reconcile`](crate::reconcile), and logs each operation. Errors are logged
//! and returned unchanged.

pub mod config;
pub mod validation;

pub use config::FacadeConfig;

use crate::connector::{Connector, ConnectorOperation, OperationOptions};
use crate::delta::AttributeDeltaSet;
use crate::error::{ConnectorError, ConnectorResult};
use crate::objects::{AttributeSet, ConnectorObject, ObjectClass, Uid};
use crate::reconcile::{self, UpdateMode};
use log::{debug, info, warn};

/// Entry point for running operations against one connector.
///
/// # Example
///
/// ```rust
/// use connector_delta::connector::{ConnectorCapabilities, InMemoryConnector, OperationOptions};
/// use connector_delta::objects::{Attribute, AttributeSet, ObjectClass};
/// use connector_delta::operation::ConnectorFacade;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let facade = ConnectorFacade::new(InMemoryConnector::with_capabilities(
///     ConnectorCapabilities::replace_only(),
/// ));
/// let options = OperationOptions::default();
///
/// let uid = facade
///     .create(
///         &ObjectClass::GROUP,
///         AttributeSet::from_attributes([Attribute::new("member", vec!["alice".into()])?])?,
///         &options,
///     )
///     .await?;
///
/// // The connector cannot add values itself, so this goes through fetch-and-merge.
/// facade
///     .add_attribute_values(
///         &ObjectClass::GROUP,
///         &uid,
///         AttributeSet::from_attributes([Attribute::new("member", vec!["bob".into()])?])?,
///         &options,
///     )
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ConnectorFacade<C: Connector> {
    connector: C,
    config: FacadeConfig,
}

impl<C: Connector> ConnectorFacade<C> {
    /// Create a facade with the default configuration.
    pub fn new(connector: C) -> Self {
        Self::with_config(connector, FacadeConfig::default())
    }

    pub fn with_config(connector: C, config: FacadeConfig) -> Self {
        Self { connector, config }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    /// Create an object and return its uid.
    pub async fn create(
        &self,
        object_class: &ObjectClass,
        attributes: AttributeSet,
        options: &OperationOptions,
    ) -> ConnectorResult<Uid> {
        debug!(
            "create {} with attributes {:?}",
            object_class,
            attributes.names()
        );
        let result = async {
            validation::validate_object_class(object_class)?;
            validation::validate_attributes("createAttributes", &attributes)?;
            self.require(ConnectorOperation::Create)?;
            self.connector
                .create(object_class, attributes, options)
                .await
        }
        .await;
        log_uid("create", result)
    }

    /// Replace the given attributes of an object.
    ///
    /// An attribute with no values clears it on the resource.
    pub async fn update(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        attributes: AttributeSet,
        options: &OperationOptions,
    ) -> ConnectorResult<Uid> {
        debug!(
            "update {}/{} replacing {:?}",
            object_class,
            uid,
            attributes.names()
        );
        let result = async {
            validation::validate_object_class(object_class)?;
            validation::validate_attributes("replaceAttributes", &attributes)?;
            self.require(ConnectorOperation::Update)?;
            self.connector
                .update(object_class, uid, attributes, options)
                .await
        }
        .await;
        log_uid("update", result)
    }

    /// Append values to attributes of an object.
    pub async fn add_attribute_values(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        values: AttributeSet,
        options: &OperationOptions,
    ) -> ConnectorResult<Uid> {
        self.update_values(object_class, uid, values, UpdateMode::Add, options)
            .await
    }

    /// Remove values from attributes of an object.
    pub async fn remove_attribute_values(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        values: AttributeSet,
        options: &OperationOptions,
    ) -> ConnectorResult<Uid> {
        self.update_values(object_class, uid, values, UpdateMode::Remove, options)
            .await
    }

    async fn update_values(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        values: AttributeSet,
        mode: UpdateMode,
        options: &OperationOptions,
    ) -> ConnectorResult<Uid> {
        debug!(
            "{} values of {:?} on {}/{}",
            mode,
            values.names(),
            object_class,
            uid
        );
        let result = async {
            validation::validate_value_changes(&self.config, object_class, &values)?;
            let path = reconcile::select_path(self.connector.capabilities())?;
            info!("{} values on {}/{} via {} path", mode, object_class, uid, path);
            reconcile::reconcile(&self.connector, object_class, uid, values, mode, options).await
        }
        .await;
        log_uid(&format!("{} values", mode), result)
    }

    /// Apply attribute deltas to an object.
    ///
    /// Returns the side-effect deltas the connector reported. When the
    /// connector has no native delta support and emulation is enabled, the
    /// deltas are applied with fetch, apply and replace and the returned set
    /// is empty.
    pub async fn complex_update_delta(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        deltas: AttributeDeltaSet,
        options: &OperationOptions,
    ) -> ConnectorResult<AttributeDeltaSet> {
        debug!(
            "complex update delta on {}/{} for {:?}",
            object_class,
            uid,
            deltas.names()
        );
        let result = async {
            validation::validate_deltas(object_class, &deltas)?;
            let capabilities = self.connector.capabilities();
            if capabilities.supports(ConnectorOperation::ComplexUpdateDelta) {
                info!("delta update on {}/{} via native path", object_class, uid);
                self.connector
                    .complex_update_delta(object_class, uid, deltas, options)
                    .await
            } else if self.config.emulate_complex_delta {
                info!("delta update on {}/{} via fetch-and-merge path", object_class, uid);
                reconcile::reconcile_deltas(&self.connector, object_class, uid, &deltas, options)
                    .await
            } else {
                Err(ConnectorError::unsupported(
                    ConnectorOperation::ComplexUpdateDelta,
                ))
            }
        }
        .await;

        match &result {
            Ok(side_effects) => debug!(
                "complex update delta completed with {} side effects",
                side_effects.len()
            ),
            Err(e) => warn!("complex update delta failed: {}", e),
        }
        result
    }

    /// Fetch one object; `None` if it does not exist.
    pub async fn get_object(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        options: &OperationOptions,
    ) -> ConnectorResult<Option<ConnectorObject>> {
        debug!("get {}/{}", object_class, uid);
        let result = async {
            self.require(ConnectorOperation::Search)?;
            self.connector.get_object(object_class, uid, options).await
        }
        .await;

        match &result {
            Ok(object) => debug!("get completed, found: {}", object.is_some()),
            Err(e) => warn!("get failed: {}", e),
        }
        result
    }

    /// Delete an object.
    pub async fn delete(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        options: &OperationOptions,
    ) -> ConnectorResult<()> {
        debug!("delete {}/{}", object_class, uid);
        let result = async {
            validation::validate_object_class(object_class)?;
            self.require(ConnectorOperation::Delete)?;
            self.connector.delete(object_class, uid, options).await
        }
        .await;

        match &result {
            Ok(()) => debug!("delete completed"),
            Err(e) => warn!("delete failed: {}", e),
        }
        result
    }

    fn require(&self, operation: ConnectorOperation) -> ConnectorResult<()> {
        self.connector.capabilities().require(operation)
    }
}

fn log_uid(operation: &str, result: ConnectorResult<Uid>) -> ConnectorResult<Uid> {
    match &result {
        Ok(uid) => debug!("{} completed with uid {}", operation, uid),
        Err(e) => warn!("{} failed: {}", operation, e),
    }
    result
}
