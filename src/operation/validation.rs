//! Input validation performed before anything reaches a connector.

use crate::delta::AttributeDeltaSet;
use crate::error::{ConnectorError, ConnectorResult};
use crate::objects::name::UID;
use crate::objects::{AttributeSet, ObjectClass};
use crate::operation::FacadeConfig;

/// Reject the `__ALL__` pseudo class.
pub fn validate_object_class(object_class: &ObjectClass) -> ConnectorResult<()> {
    if object_class.is_all() {
        return Err(ConnectorError::invalid_argument(format!(
            "Operation cannot be performed on the object class {}",
            object_class
        )));
    }
    Ok(())
}

/// Reject attribute sets that try to set the uid.
pub fn validate_attributes(parameter: &str, attributes: &AttributeSet) -> ConnectorResult<()> {
    if attributes.contains(UID) {
        return Err(ConnectorError::invalid_argument(format!(
            "Parameter '{}' contains {}",
            parameter, UID
        )));
    }
    Ok(())
}

/// Validate the input of a value-level add or remove.
///
/// On top of the replace rules, operational attributes may not be targeted.
pub fn validate_value_changes(
    config: &FacadeConfig,
    object_class: &ObjectClass,
    values: &AttributeSet,
) -> ConnectorResult<()> {
    validate_object_class(object_class)?;
    validate_attributes("values", values)?;
    match values.iter().find(|a| config.is_operational(a.name())) {
        Some(attribute) => Err(ConnectorError::invalid_argument(format!(
            "Operational attribute '{}' can not be added or removed.",
            attribute.name()
        ))),
        None => Ok(()),
    }
}

/// Validate the input of a delta update.
pub fn validate_deltas(object_class: &ObjectClass, deltas: &AttributeDeltaSet) -> ConnectorResult<()> {
    validate_object_class(object_class)?;
    if deltas.contains(UID) {
        return Err(ConnectorError::invalid_argument(format!(
            "Parameter 'deltas' contains {}",
            UID
        )));
    }
    Ok(())
}
