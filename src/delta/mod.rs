//! The attribute delta algebra.
//!
//! A delta describes a modification rather than a new state. Applying one is
//! a pure function from the current state (possibly absent) to a new state:
//!
//! ```rust
//! use connector_delta::delta::{ComplexAttributeDelta, apply_delta};
//! use connector_delta::objects::{Attribute, AttributeValue, filters};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let base = Attribute::new("mail", vec!["old@example.com".into()])?;
//! let delta = ComplexAttributeDelta::builder("mail")
//!     .delete_matching(filters::equal_to("old@example.com"))
//!     .add(["new@example.com"])
//!     .build()?;
//!
//! let result = apply_delta(Some(&base), &delta.into());
//! assert_eq!(result.values(), &[AttributeValue::from("new@example.com")]);
//! # Ok(())
//! # }
//! ```

pub mod attribute_delta;
pub mod delta_set;
pub mod engine;
pub mod op;

pub use attribute_delta::{
    AttributeDelta, ComplexAttributeDelta, ComplexAttributeDeltaBuilder, ReplaceAttributeDelta,
};
pub use delta_set::AttributeDeltaSet;
pub use engine::{
    apply_attribute_value_deltas, apply_delta, apply_deltas, apply_ops, apply_value_deltas,
};
pub use op::{AttributeValueDelta, DeltaElement, DeltaKind, DeltaOp, ValueDelta};
