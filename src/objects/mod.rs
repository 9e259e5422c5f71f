//! The connector object model.
//!
//! Objects on a resource are described by an [`ObjectClass`], a [`Uid`] and an
//! [`AttributeSet`]. Attribute values are scalars or [`EmbeddedObject`]s, the
//! latter being the only values a merge delta descends into.

pub mod attribute;
pub mod filter;
pub mod identity;
pub mod name;
pub mod value;

pub use attribute::{Attribute, AttributeSet};
pub use filter::{Filter, FilterRef, filters};
pub use identity::{ConnectorObject, ObjectClass, Uid};
pub use name::{names_equal, normalize_name};
pub use value::{AttributeValue, EmbeddedObject};
