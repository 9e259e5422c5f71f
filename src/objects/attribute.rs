//! Attributes and attribute sets.
//!
//! An [`Attribute`] is a named, ordered list of values. Attributes are
//! immutable: every modification produces a new instance. An [`AttributeSet`]
//! holds at most one attribute per (case-insensitive) name and keeps insertion
//! order.

use crate::error::{ConnectorError, ConnectorResult};
use crate::objects::name::{hash_name, names_equal, require_name};
use crate::objects::value::AttributeValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A named, ordered sequence of values.
///
/// Two attributes denote the same logical attribute when their names are equal
/// ignoring case. Equality additionally compares the values in order; hashing
/// only looks at the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawAttribute")]
pub struct Attribute {
    name: String,
    values: Vec<AttributeValue>,
}

/// Wire shape of an [`Attribute`] before its name is checked.
#[derive(Deserialize)]
struct RawAttribute {
    name: String,
    values: Vec<AttributeValue>,
}

impl TryFrom<RawAttribute> for Attribute {
    type Error = ConnectorError;

    fn try_from(raw: RawAttribute) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.values)
    }
}

impl Attribute {
    /// Create an attribute, rejecting blank names.
    pub fn new(name: impl Into<String>, values: Vec<AttributeValue>) -> ConnectorResult<Self> {
        let name = name.into();
        require_name(&name, "Attribute")?;
        Ok(Self { name, values })
    }

    /// Create an attribute with no values, which requests clearing it when
    /// used in a replace update.
    pub fn empty(name: impl Into<String>) -> ConnectorResult<Self> {
        Self::new(name, Vec::new())
    }

    /// Create an attribute from a name that has already been validated.
    pub(crate) fn from_parts(name: String, values: Vec<AttributeValue>) -> Self {
        debug_assert!(!crate::objects::name::is_blank(&name));
        Self { name, values }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<AttributeValue> {
        self.values
    }

    /// Whether this attribute carries the given name (ignoring case).
    pub fn is(&self, name: &str) -> bool {
        names_equal(&self.name, name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// The only value of a single-valued attribute.
    pub fn single_value(&self) -> Option<&AttributeValue> {
        match self.values.as_slice() {
            [value] => Some(value),
            _ => None,
        }
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.is(&other.name) && self.values == other.values
    }
}

impl Hash for Attribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_name(&self.name, state);
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=[", self.name)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

/// A collection of attributes, unique by case-insensitive name.
///
/// Equality ignores order, matching the set semantics of the collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Attribute>", into = "Vec<Attribute>")]
pub struct AttributeSet {
    attributes: Vec<Attribute>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set, failing if two attributes share a name.
    pub fn from_attributes(
        attributes: impl IntoIterator<Item = Attribute>,
    ) -> ConnectorResult<Self> {
        let mut set = Self::new();
        for attribute in attributes {
            if set.contains(attribute.name()) {
                return Err(ConnectorError::invalid_argument(format!(
                    "Duplicated named attributes: {}",
                    attribute.name()
                )));
            }
            set.attributes.push(attribute);
        }
        Ok(set)
    }

    /// Build a set from attributes already known to be unique by name.
    pub(crate) fn from_unique(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    /// Look up an attribute by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.is(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert an attribute, replacing (in place) one of the same name.
    ///
    /// Returns the replaced attribute, if any.
    pub fn insert(&mut self, attribute: Attribute) -> Option<Attribute> {
        match self.attributes.iter_mut().find(|a| a.is(attribute.name())) {
            Some(existing) => Some(std::mem::replace(existing, attribute)),
            None => {
                self.attributes.push(attribute);
                None
            }
        }
    }

    /// A new set with the attribute inserted or replaced.
    pub fn with(&self, attribute: Attribute) -> Self {
        let mut set = self.clone();
        set.insert(attribute);
        set
    }

    /// Remove the attribute with the given name.
    pub fn remove(&mut self, name: &str) -> Option<Attribute> {
        let index = self.attributes.iter().position(|a| a.is(name))?;
        Some(self.attributes.remove(index))
    }

    /// A new set restricted to the given names; names with no attribute are
    /// skipped.
    pub fn restricted_to<S: AsRef<str>>(&self, names: &[S]) -> Self {
        let attributes = self
            .attributes
            .iter()
            .filter(|a| names.iter().any(|n| a.is(n.as_ref())))
            .cloned()
            .collect();
        Self { attributes }
    }

    pub fn names(&self) -> Vec<&str> {
        self.attributes.iter().map(Attribute::name).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn into_vec(self) -> Vec<Attribute> {
        self.attributes
    }
}

impl PartialEq for AttributeSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .attributes
                .iter()
                .all(|a| other.get(a.name()).is_some_and(|b| a == b))
    }
}

impl TryFrom<Vec<Attribute>> for AttributeSet {
    type Error = ConnectorError;

    fn try_from(attributes: Vec<Attribute>) -> Result<Self, Self::Error> {
        Self::from_attributes(attributes)
    }
}

impl From<AttributeSet> for Vec<Attribute> {
    fn from(set: AttributeSet) -> Self {
        set.attributes
    }
}

impl IntoIterator for AttributeSet {
    type Item = Attribute;
    type IntoIter = std::vec::IntoIter<Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}
