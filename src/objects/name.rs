//! Attribute and object class name handling.
//!
//! Names identify attributes and object classes case-insensitively. The
//! comparison folds with Unicode lowercase mappings only, so the result does not
//! depend on the process locale.

use crate::error::{ConnectorError, ConnectorResult};
use std::hash::{Hash, Hasher};

/// Name of the attribute carrying the object identifier.
pub const UID: &str = "__UID__";

/// Name of the attribute carrying the naming (login) value of an object.
pub const NAME: &str = "__NAME__";

/// Operational attributes. They drive connector behaviour and are never the
/// target of value-level add/remove requests.
pub const OPERATIONAL_ATTRIBUTES: &[&str] = &[
    NAME,
    UID,
    "__PASSWORD__",
    "__CURRENT_PASSWORD__",
    "__ENABLE__",
    "__ENABLE_DATE__",
    "__DISABLE_DATE__",
    "__LOCK_OUT__",
    "__PASSWORD_EXPIRATION_DATE__",
    "__PASSWORD_EXPIRED__",
];

fn folded(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars().flat_map(char::to_lowercase)
}

/// Compare two names the way attributes and object classes are identified.
pub fn names_equal(a: &str, b: &str) -> bool {
    folded(a).eq(folded(b))
}

/// Hash a name consistently with [`names_equal`].
pub fn hash_name<H: Hasher>(name: &str, state: &mut H) {
    for c in folded(name) {
        c.hash(state);
    }
}

/// Lowercase form of a name, usable as a map key.
pub fn normalize_name(name: &str) -> String {
    folded(name).collect()
}

/// True when the name is empty or whitespace only.
pub fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

pub(crate) fn require_name(name: &str, what: &str) -> ConnectorResult<()> {
    if is_blank(name) {
        return Err(ConnectorError::invalid_argument(format!(
            "{} name must not be blank",
            what
        )));
    }
    Ok(())
}
