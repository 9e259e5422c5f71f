//! Attribute values.
//!
//! A value is either a scalar or an embedded object carrying its own attribute
//! set. Embedded objects are shared through [`Arc`], so a value that a delta
//! leaves untouched keeps its identity, which [`AttributeValue::same_instance`]
//! exposes.

use crate::objects::attribute::{Attribute, AttributeSet};
use crate::objects::identity::ObjectClass;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A single value of an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Binary(#[serde(with = "base64_bytes")] Vec<u8>),
    DateTime(DateTime<Utc>),
    /// A nested object; the only kind of value a merge descends into
    Embedded(Arc<EmbeddedObject>),
}

impl AttributeValue {
    /// Wrap an embedded object.
    pub fn embedded(object: EmbeddedObject) -> Self {
        Self::Embedded(Arc::new(object))
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded(_))
    }

    pub fn as_embedded(&self) -> Option<&Arc<EmbeddedObject>> {
        match self {
            Self::Embedded(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// True when both values are the very same embedded object instance.
    ///
    /// Scalars have no identity beyond their content and never compare as the
    /// same instance.
    pub fn same_instance(&self, other: &AttributeValue) -> bool {
        match (self, other) {
            (Self::Embedded(a), Self::Embedded(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Double(d) => write!(f, "{}", d),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Embedded(object) => write!(f, "{}", object),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<EmbeddedObject> for AttributeValue {
    fn from(value: EmbeddedObject) -> Self {
        Self::embedded(value)
    }
}

impl From<Arc<EmbeddedObject>> for AttributeValue {
    fn from(value: Arc<EmbeddedObject>) -> Self {
        Self::Embedded(value)
    }
}

/// An object nested inside an attribute value (an address, a role
/// assignment, ...). It has a type tag but no identity of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedObject {
    object_class: ObjectClass,
    attributes: AttributeSet,
}

impl EmbeddedObject {
    pub fn new(object_class: ObjectClass, attributes: AttributeSet) -> Self {
        Self {
            object_class,
            attributes,
        }
    }

    pub fn object_class(&self) -> &ObjectClass {
        &self.object_class
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Look up an attribute by case-insensitive name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
}

impl fmt::Display for EmbeddedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.object_class)?;
        for (i, attribute) in self.attributes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", attribute)?;
        }
        write!(f, "}}")
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
