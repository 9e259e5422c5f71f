//! Delta application.
//!
//! Every function here is pure: inputs are borrowed, results are freshly
//! built, and nothing is logged. Operations are applied one after the other
//! to the running result, so their order decides the outcome.

use crate::delta::attribute_delta::AttributeDelta;
use crate::delta::delta_set::AttributeDeltaSet;
use crate::delta::op::{AttributeValueDelta, DeltaElement, DeltaOp, ValueDelta};
use crate::objects::attribute::{Attribute, AttributeSet};
use crate::objects::value::{AttributeValue, EmbeddedObject};

/// Apply `ops` in order, starting from a copy of `base`.
pub fn apply_ops<T: DeltaElement>(base: &[T], ops: &[DeltaOp<T>]) -> Vec<T> {
    ops.iter().fold(base.to_vec(), |current, op| op.apply(current))
}

/// Apply value deltas to the values of one attribute.
pub fn apply_value_deltas(values: &[AttributeValue], ops: &[ValueDelta]) -> Vec<AttributeValue> {
    apply_ops(values, ops)
}

/// Apply one attribute delta to an attribute, or to its absence.
pub fn apply_delta(base: Option<&Attribute>, delta: &AttributeDelta) -> Attribute {
    delta.apply_to(base)
}

/// Apply a set of attribute deltas to an attribute set.
///
/// Each delta is applied to the same-named base attribute (absent if there is
/// none) and its result replaces that attribute or is appended. Attributes no
/// delta names pass through unchanged.
pub fn apply_deltas(base: &AttributeSet, deltas: &AttributeDeltaSet) -> AttributeSet {
    let mut result = base.clone();
    for delta in deltas {
        result.insert(delta.apply_to(base.get(delta.name())));
    }
    result
}

/// Apply object-level deltas (whole attributes added, deleted or merged) to an
/// attribute set.
pub fn apply_attribute_value_deltas(
    base: &AttributeSet,
    ops: &[AttributeValueDelta],
) -> AttributeSet {
    let attributes = ops
        .iter()
        .fold(base.clone().into_vec(), |current, op| op.apply(current));
    AttributeSet::from_unique(attributes)
}

impl DeltaElement for AttributeValue {
    fn is_mergeable(&self) -> bool {
        self.is_embedded()
    }

    fn merge_deltas(&self, deltas: &AttributeDeltaSet) -> Option<Self> {
        let object = self.as_embedded()?;
        let attributes = apply_deltas(object.attributes(), deltas);
        Some(AttributeValue::embedded(EmbeddedObject::new(
            object.object_class().clone(),
            attributes,
        )))
    }
}

impl DeltaElement for Attribute {
    fn is_mergeable(&self) -> bool {
        true
    }

    fn merge_deltas(&self, deltas: &AttributeDeltaSet) -> Option<Self> {
        deltas.get(self.name()).map(|delta| delta.apply_to(Some(self)))
    }

    // Added attributes fold into a same-named attribute so the list stays
    // unique by name.
    fn append(current: &mut Vec<Self>, added: &[Self]) {
        for attribute in added {
            match current.iter_mut().find(|a| a.is(attribute.name())) {
                Some(existing) => {
                    let mut values = existing.values().to_vec();
                    values.extend_from_slice(attribute.values());
                    *existing = Attribute::from_parts(existing.name().to_string(), values);
                }
                None => current.push(attribute.clone()),
            }
        }
    }
}
