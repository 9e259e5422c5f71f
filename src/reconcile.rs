//! Update reconciliation.
//!
//! Adding or removing individual attribute values is forwarded to the
//! connector when it supports that natively. Otherwise it is emulated: the
//! current values of the changed attributes are fetched, the new values are
//! computed with [`merge`], and the result is written back with a replace
//! update.
//!
//! The fetch and the replace are two independent calls. A change made to the
//! object between them is not detected and may be overwritten. Nothing here
//! retries, logs or wraps a connector error.

use crate::connector::{Connector, ConnectorCapabilities, ConnectorOperation, OperationOptions};
use crate::delta::{AttributeDeltaSet, apply_deltas};
use crate::error::{ConnectorError, ConnectorResult};
use crate::objects::{Attribute, AttributeSet, AttributeValue, ObjectClass, Uid};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether values are being added or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    Add,
    Remove,
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateMode::Add => write!(f, "add"),
            UpdateMode::Remove => write!(f, "remove"),
        }
    }
}

/// How a value update reaches the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePath {
    /// The connector applies the change itself
    NativeDispatch,
    /// Fetch, merge, then replace
    FetchAndMerge,
}

impl fmt::Display for ReconcilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcilePath::NativeDispatch => write!(f, "native"),
            ReconcilePath::FetchAndMerge => write!(f, "fetch-and-merge"),
        }
    }
}

/// Pick the path for a value update against a connector with `capabilities`.
///
/// The fallback needs object lookup and replace updates. Without either the
/// update cannot be emulated and fails with `UnsupportedCapability` before
/// anything is fetched.
pub fn select_path(capabilities: &ConnectorCapabilities) -> ConnectorResult<ReconcilePath> {
    if capabilities.supports(ConnectorOperation::UpdateAttributeValues) {
        return Ok(ReconcilePath::NativeDispatch);
    }
    require_fetch_and_replace(capabilities)?;
    Ok(ReconcilePath::FetchAndMerge)
}

fn require_fetch_and_replace(capabilities: &ConnectorCapabilities) -> ConnectorResult<()> {
    capabilities.require(ConnectorOperation::Search)?;
    capabilities.require(ConnectorOperation::Update)
}

/// Compute the replacement attributes for a value update.
///
/// The result holds one attribute per changed attribute (removals of
/// attributes absent from `base` are dropped):
///
/// * `Add`: base values followed by the new values; an attribute missing from
///   `base` takes the new values verbatim. Duplicates are kept.
/// * `Remove`: base values minus every value equal to one being removed. An
///   attribute left with no values is kept, empty, which asks the connector to
///   clear it.
pub fn merge(changes: &AttributeSet, base: &AttributeSet, mode: UpdateMode) -> AttributeSet {
    let merged = changes
        .iter()
        .filter_map(|change| {
            let current = base.get(change.name());
            match (mode, current) {
                (UpdateMode::Add, None) => Some(change.clone()),
                (UpdateMode::Add, Some(current)) => {
                    let mut values = current.values().to_vec();
                    values.extend_from_slice(change.values());
                    Some(Attribute::from_parts(change.name().to_string(), values))
                }
                (UpdateMode::Remove, None) => None,
                (UpdateMode::Remove, Some(current)) => {
                    let values = retain_unremoved(current.values(), change.values());
                    Some(Attribute::from_parts(change.name().to_string(), values))
                }
            }
        })
        .collect();
    AttributeSet::from_unique(merged)
}

fn retain_unremoved(values: &[AttributeValue], removed: &[AttributeValue]) -> Vec<AttributeValue> {
    values
        .iter()
        .filter(|value| !removed.contains(value))
        .cloned()
        .collect()
}

/// Add or remove attribute values on one object.
///
/// Goes through the connector's native operation when it has one, otherwise
/// through fetch-and-merge (see [`merge`]). Returns the uid the connector
/// reported. Fails with `ObjectNotFound`, without issuing a replace, when the
/// object does not exist.
pub async fn reconcile<C: Connector>(
    connector: &C,
    object_class: &ObjectClass,
    uid: &Uid,
    changes: AttributeSet,
    mode: UpdateMode,
    options: &OperationOptions,
) -> ConnectorResult<Uid> {
    match select_path(connector.capabilities())? {
        ReconcilePath::NativeDispatch => match mode {
            UpdateMode::Add => {
                connector
                    .add_attribute_values(object_class, uid, changes, options)
                    .await
            }
            UpdateMode::Remove => {
                connector
                    .remove_attribute_values(object_class, uid, changes, options)
                    .await
            }
        },
        ReconcilePath::FetchAndMerge => {
            let base = fetch_attributes(connector, object_class, uid, &changes.names(), options)
                .await?;
            let merged = merge(&changes, &base, mode);
            connector.update(object_class, uid, merged, options).await
        }
    }
}

/// Apply attribute deltas on a connector without native delta support.
///
/// The attributes the deltas name are fetched, the deltas applied to them,
/// and the results written back with a replace update. An attribute a delta
/// empties is sent with no values, which clears it. No side-effect deltas are
/// reported, so the returned set is always empty.
pub async fn reconcile_deltas<C: Connector>(
    connector: &C,
    object_class: &ObjectClass,
    uid: &Uid,
    deltas: &AttributeDeltaSet,
    options: &OperationOptions,
) -> ConnectorResult<AttributeDeltaSet> {
    require_fetch_and_replace(connector.capabilities())?;
    let names = deltas.names();
    let base = fetch_attributes(connector, object_class, uid, &names, options).await?;
    let changed = apply_deltas(&base, deltas).restricted_to(&names);
    connector.update(object_class, uid, changed, options).await?;
    Ok(AttributeDeltaSet::new())
}

/// Fetch the current attributes named in `names`.
///
/// The caller's options are copied with only `attributes_to_get` overridden.
async fn fetch_attributes<C: Connector, S: AsRef<str>>(
    connector: &C,
    object_class: &ObjectClass,
    uid: &Uid,
    names: &[S],
    options: &OperationOptions,
) -> ConnectorResult<AttributeSet> {
    let fetch_options = options.with_attributes_to_get(names);
    connector
        .get_object(object_class, uid, &fetch_options)
        .await?
        .map(|object| object.into_attributes())
        .ok_or_else(|| ConnectorError::object_not_found(object_class.name(), uid.value()))
}
