//! Sets of attribute deltas keyed by attribute name.

use crate::delta::attribute_delta::AttributeDelta;
use crate::error::{ConnectorError, ConnectorResult};

/// A collection of [`AttributeDelta`]s with at most one delta per
/// (case-insensitive) attribute name.
///
/// Insertion order is kept for display and iteration; equality ignores it.
#[derive(Debug, Clone, Default)]
pub struct AttributeDeltaSet {
    deltas: Vec<AttributeDelta>,
}

impl AttributeDeltaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set, failing when two deltas target the same attribute.
    pub fn from_deltas<D: Into<AttributeDelta>>(
        deltas: impl IntoIterator<Item = D>,
    ) -> ConnectorResult<Self> {
        let mut set = Self::new();
        for delta in deltas {
            set.insert(delta.into())?;
        }
        Ok(set)
    }

    /// Add a delta, failing when one for the same attribute is present.
    pub fn insert(&mut self, delta: AttributeDelta) -> ConnectorResult<()> {
        if self.contains(delta.name()) {
            return Err(ConnectorError::invalid_argument(format!(
                "Attribute delta for '{}' is already present",
                delta.name()
            )));
        }
        self.deltas.push(delta);
        Ok(())
    }

    /// Delta targeting the given attribute name, if any.
    pub fn get(&self, name: &str) -> Option<&AttributeDelta> {
        self.deltas.iter().find(|d| d.is(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.deltas.iter().map(AttributeDelta::name).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttributeDelta> {
        self.deltas.iter()
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

impl PartialEq for AttributeDeltaSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .deltas
                .iter()
                .all(|d| other.get(d.name()).is_some_and(|o| d == o))
    }
}

impl<'a> IntoIterator for &'a AttributeDeltaSet {
    type Item = &'a AttributeDelta;
    type IntoIter = std::slice::Iter<'a, AttributeDelta>;

    fn into_iter(self) -> Self::IntoIter {
        self.deltas.iter()
    }
}

impl IntoIterator for AttributeDeltaSet {
    type Item = AttributeDelta;
    type IntoIter = std::vec::IntoIter<AttributeDelta>;

    fn into_iter(self) -> Self::IntoIter {
        self.deltas.into_iter()
    }
}
