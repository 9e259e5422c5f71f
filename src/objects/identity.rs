//! Object identity: object classes, uids and whole connector objects.

use crate::error::{ConnectorError, ConnectorResult};
use crate::objects::attribute::{Attribute, AttributeSet};
use crate::objects::name::{hash_name, names_equal, require_name};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The type tag of an object on a resource (account, group, ...).
///
/// Object classes compare case-insensitively, like attribute names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct ObjectClass(Cow<'static, str>);

impl ObjectClass {
    /// Pseudo class addressing every object class; never valid for updates.
    pub const ALL: ObjectClass = ObjectClass(Cow::Borrowed("__ALL__"));
    /// Accounts (users) on the resource.
    pub const ACCOUNT: ObjectClass = ObjectClass(Cow::Borrowed("__ACCOUNT__"));
    /// Groups on the resource.
    pub const GROUP: ObjectClass = ObjectClass(Cow::Borrowed("__GROUP__"));

    /// Create an object class, rejecting blank names.
    pub fn new(name: impl Into<String>) -> ConnectorResult<Self> {
        let name = name.into();
        require_name(&name, "Object class")?;
        Ok(Self(Cow::Owned(name)))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Whether this is the `__ALL__` pseudo class.
    pub fn is_all(&self) -> bool {
        self == &Self::ALL
    }
}

impl PartialEq for ObjectClass {
    fn eq(&self, other: &Self) -> bool {
        names_equal(&self.0, &other.0)
    }
}

impl Eq for ObjectClass {}

impl Hash for ObjectClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_name(&self.0, state);
    }
}

impl TryFrom<String> for ObjectClass {
    type Error = ConnectorError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an object on a resource. Compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Uid(String);

impl Uid {
    /// Create a uid, rejecting blank values.
    pub fn new(value: impl Into<String>) -> ConnectorResult<Self> {
        let value = value.into();
        require_name(&value, "Uid")?;
        Ok(Self(value))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Uid {
    type Error = ConnectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An object as returned by a connector lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorObject {
    object_class: ObjectClass,
    uid: Uid,
    attributes: AttributeSet,
}

impl ConnectorObject {
    pub fn new(object_class: ObjectClass, uid: Uid, attributes: AttributeSet) -> Self {
        Self {
            object_class,
            uid,
            attributes,
        }
    }

    pub fn object_class(&self) -> &ObjectClass {
        &self.object_class
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Look up an attribute by case-insensitive name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn into_attributes(self) -> AttributeSet {
        self.attributes
    }
}
