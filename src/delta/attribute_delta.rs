//! Attribute-level deltas.
//!
//! An attribute delta names the attribute it modifies and knows how to turn
//! the current attribute (or its absence) into the modified one:
//!
//! - [`ComplexAttributeDelta`] folds an ordered list of [`ValueDelta`]s over
//!   the current values;
//! - [`ReplaceAttributeDelta`] ignores the current values altogether.
//!
//! [`AttributeDelta`] is the sum of both. Its hash only looks at the
//! (case-insensitive) name, so deltas can be keyed by attribute; its equality
//! also requires the same variant and the same payload, so an add is never
//! mistaken for a merge on the same attribute.

use crate::delta::engine::apply_ops;
use crate::delta::op::ValueDelta;
use crate::error::{ConnectorError, ConnectorResult};
use crate::objects::attribute::Attribute;
use crate::objects::filter::FilterRef;
use crate::objects::name::{hash_name, names_equal, require_name};
use crate::objects::value::AttributeValue;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A modification of one attribute.
#[derive(Debug, Clone)]
pub enum AttributeDelta {
    Complex(ComplexAttributeDelta),
    Replace(ReplaceAttributeDelta),
}

impl AttributeDelta {
    /// Name of the attribute this delta modifies.
    pub fn name(&self) -> &str {
        match self {
            Self::Complex(delta) => delta.name(),
            Self::Replace(delta) => delta.name(),
        }
    }

    /// Whether this delta targets the given attribute name (ignoring case).
    pub fn is(&self, name: &str) -> bool {
        names_equal(self.name(), name)
    }

    /// Produce the modified attribute. The input is never changed.
    pub fn apply_to(&self, attribute: Option<&Attribute>) -> Attribute {
        match self {
            Self::Complex(delta) => delta.apply_to(attribute),
            Self::Replace(delta) => delta.apply_to(attribute),
        }
    }
}

impl PartialEq for AttributeDelta {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Complex(a), Self::Complex(b)) => a == b,
            (Self::Replace(a), Self::Replace(b)) => a == b,
            _ => false,
        }
    }
}

impl Hash for AttributeDelta {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_name(self.name(), state);
    }
}

impl From<ComplexAttributeDelta> for AttributeDelta {
    fn from(delta: ComplexAttributeDelta) -> Self {
        Self::Complex(delta)
    }
}

impl From<ReplaceAttributeDelta> for AttributeDelta {
    fn from(delta: ReplaceAttributeDelta) -> Self {
        Self::Replace(delta)
    }
}

impl fmt::Display for AttributeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complex(delta) => write!(f, "{}", delta),
            Self::Replace(delta) => write!(f, "{}", delta),
        }
    }
}

/// A modification of one attribute expressed as ordered value deltas.
#[derive(Debug, Clone)]
pub struct ComplexAttributeDelta {
    name: String,
    value_deltas: Arc<[ValueDelta]>,
}

impl ComplexAttributeDelta {
    /// Create a delta, rejecting blank names.
    pub fn new(
        name: impl Into<String>,
        value_deltas: impl IntoIterator<Item = ValueDelta>,
    ) -> ConnectorResult<Self> {
        let name = name.into();
        require_name(&name, "Attribute delta")?;
        Ok(Self {
            name,
            value_deltas: value_deltas.into_iter().collect(),
        })
    }

    /// Start building a delta for the named attribute.
    pub fn builder(name: impl Into<String>) -> ComplexAttributeDeltaBuilder {
        ComplexAttributeDeltaBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_deltas(&self) -> &[ValueDelta] {
        &self.value_deltas
    }

    pub fn is(&self, name: &str) -> bool {
        names_equal(&self.name, name)
    }

    /// Fold the value deltas, in order, over the current values. An absent
    /// attribute counts as one with no values.
    pub fn apply_to(&self, attribute: Option<&Attribute>) -> Attribute {
        let base = attribute.map(Attribute::values).unwrap_or_default();
        Attribute::from_parts(self.name.clone(), apply_ops(base, &self.value_deltas))
    }
}

impl PartialEq for ComplexAttributeDelta {
    fn eq(&self, other: &Self) -> bool {
        self.is(&other.name) && self.value_deltas == other.value_deltas
    }
}

impl Hash for ComplexAttributeDelta {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_name(&self.name, state);
    }
}

impl fmt::Display for ComplexAttributeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attribute: {{Name={}, valueDeltas=[", self.name)?;
        for (i, delta) in self.value_deltas.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", delta)?;
        }
        write!(f, "]}}")
    }
}

/// Fluent construction of a [`ComplexAttributeDelta`].
///
/// Invalid steps (a merge without a filter, colliding child deltas) are
/// remembered and reported by [`build`](Self::build).
#[derive(Debug)]
pub struct ComplexAttributeDeltaBuilder {
    name: String,
    value_deltas: Vec<ValueDelta>,
    error: Option<ConnectorError>,
}

impl ComplexAttributeDeltaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_deltas: Vec::new(),
            error: None,
        }
    }

    /// Append values.
    pub fn add<V: Into<AttributeValue>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.value_deltas
            .push(ValueDelta::add(values.into_iter().map(Into::into)));
        self
    }

    /// Remove the values the filter matches.
    pub fn delete_matching(mut self, filter: FilterRef<AttributeValue>) -> Self {
        self.value_deltas.push(ValueDelta::delete_matching(filter));
        self
    }

    /// Remove every value.
    pub fn delete_all(mut self) -> Self {
        self.value_deltas.push(ValueDelta::delete_all());
        self
    }

    /// Merge child deltas into the embedded values the filter matches.
    pub fn merge<D: Into<AttributeDelta>>(
        mut self,
        filter: Option<FilterRef<AttributeValue>>,
        deltas: impl IntoIterator<Item = D>,
    ) -> Self {
        match ValueDelta::merge(filter, deltas) {
            Ok(op) => self.value_deltas.push(op),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Append an already constructed value delta.
    pub fn op(mut self, op: ValueDelta) -> Self {
        self.value_deltas.push(op);
        self
    }

    pub fn build(self) -> ConnectorResult<ComplexAttributeDelta> {
        if let Some(error) = self.error {
            return Err(error);
        }
        ComplexAttributeDelta::new(self.name, self.value_deltas)
    }
}

/// A modification that sets an attribute to exactly the given values.
#[derive(Debug, Clone)]
pub struct ReplaceAttributeDelta {
    name: String,
    values: Arc<[AttributeValue]>,
}

impl ReplaceAttributeDelta {
    /// Create a delta, rejecting blank names.
    pub fn new(
        name: impl Into<String>,
        values: impl IntoIterator<Item = AttributeValue>,
    ) -> ConnectorResult<Self> {
        let name = name.into();
        require_name(&name, "Attribute delta")?;
        Ok(Self {
            name,
            values: values.into_iter().collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    pub fn apply_to(&self, _attribute: Option<&Attribute>) -> Attribute {
        Attribute::from_parts(self.name.clone(), self.values.to_vec())
    }
}

impl PartialEq for ReplaceAttributeDelta {
    fn eq(&self, other: &Self) -> bool {
        names_equal(&self.name, &other.name) && self.values == other.values
    }
}

impl fmt::Display for ReplaceAttributeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attribute: {{Name={}, replace={:?}}}", self.name, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::filters;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(delta: &AttributeDelta) -> u64 {
        let mut hasher = DefaultHasher::new();
        delta.hash(&mut hasher);
        hasher.finish()
    }

    fn strings(attribute: &Attribute) -> Vec<&str> {
        attribute.values().iter().filter_map(AttributeValue::as_str).collect()
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(ComplexAttributeDelta::new(" ", []).unwrap_err().is_invalid_argument());
        assert!(ReplaceAttributeDelta::new("", []).unwrap_err().is_invalid_argument());
        assert!(ComplexAttributeDelta::builder("").add(["x"]).build().is_err());
    }

    #[test]
    fn test_builder_reports_merge_without_filter() {
        let err = ComplexAttributeDelta::builder("roles")
            .add(["x"])
            .merge::<AttributeDelta>(None, [])
            .build()
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_apply_to_absent_attribute() {
        let delta = ComplexAttributeDelta::builder("mail").add(["a@x", "b@x"]).build().unwrap();
        let result = delta.apply_to(None);
        assert_eq!(result.name(), "mail");
        assert_eq!(strings(&result), vec!["a@x", "b@x"]);
    }

    #[test]
    fn test_apply_does_not_touch_base() {
        let base = Attribute::new("mail", vec!["a@x".into()]).unwrap();
        let delta = ComplexAttributeDelta::builder("mail").delete_all().build().unwrap();
        let result = delta.apply_to(Some(&base));
        assert!(result.is_empty());
        assert_eq!(strings(&base), vec!["a@x"]);
    }

    #[test]
    fn test_replace_ignores_base() {
        let base = Attribute::new("cn", vec!["old".into()]).unwrap();
        let delta = ReplaceAttributeDelta::new("cn", ["new".into()]).unwrap();
        assert_eq!(strings(&delta.apply_to(Some(&base))), vec!["new"]);
    }

    #[test]
    fn test_hash_is_name_based_and_equality_variant_aware() {
        let complex: AttributeDelta = ComplexAttributeDelta::builder("cn")
            .delete_matching(filters::equal_to("x"))
            .build()
            .unwrap()
            .into();
        let replace: AttributeDelta = ReplaceAttributeDelta::new("CN", []).unwrap().into();
        assert_eq!(hash_of(&complex), hash_of(&replace));
        assert_ne!(complex, replace);
        assert_eq!(complex, complex.clone());
    }

    #[test]
    fn test_equality_ignores_name_case() {
        let a = ComplexAttributeDelta::builder("cn").add(["x"]).build().unwrap();
        let b = ComplexAttributeDelta::builder("CN").add(["x"]).build().unwrap();
        let c = ComplexAttributeDelta::builder("cn").add(["y"]).build().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display() {
        let delta = ComplexAttributeDelta::builder("cn").add(["x"]).delete_all().build().unwrap();
        assert_eq!(
            delta.to_string(),
            "Attribute: {Name=cn, valueDeltas=[Add: [x], Delete: *]}"
        );
    }
}
