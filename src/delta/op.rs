//! Delta operations over an ordered list of elements.
//!
//! [`DeltaOp`] is one step of a patch: append elements, drop the elements a
//! filter selects, or merge child deltas into the elements a filter selects.
//! The same three operations exist at two granularities:
//!
//! - [`ValueDelta`] edits the values of one attribute;
//! - [`AttributeValueDelta`] edits the attributes of one object.
//!
//! The granularity-specific behaviour (how elements are appended, what merging
//! into an element means) lives in [`DeltaElement`].

use crate::delta::attribute_delta::AttributeDelta;
use crate::delta::delta_set::AttributeDeltaSet;
use crate::error::{ConnectorError, ConnectorResult};
use crate::objects::attribute::Attribute;
use crate::objects::filter::{FilterRef, optional_matches, same_filter};
use crate::objects::value::AttributeValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Edits one attribute's values.
pub type ValueDelta = DeltaOp<AttributeValue>;

/// Edits the attributes of one object.
pub type AttributeValueDelta = DeltaOp<Attribute>;

/// Element of a list a [`DeltaOp`] can be applied to.
pub trait DeltaElement: Clone + Sized + 'static {
    /// Whether a merge may descend into this element at all. The merge filter
    /// is only consulted for mergeable elements.
    fn is_mergeable(&self) -> bool;

    /// Apply child deltas to this element. `None` means the element is not
    /// affected and must be kept as it is.
    fn merge_deltas(&self, deltas: &AttributeDeltaSet) -> Option<Self>;

    /// Append elements to a list. Plain concatenation unless the granularity
    /// needs to keep the list keyed.
    fn append(current: &mut Vec<Self>, added: &[Self]) {
        current.extend_from_slice(added);
    }
}

/// Discriminant of a [`DeltaOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaKind {
    Add,
    Delete,
    Merge,
}

impl fmt::Display for DeltaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeltaKind::Add => write!(f, "add"),
            DeltaKind::Delete => write!(f, "delete"),
            DeltaKind::Merge => write!(f, "merge"),
        }
    }
}

/// One step of a patch over a list of `T`.
#[derive(Debug, Clone)]
pub enum DeltaOp<T: 'static> {
    /// Append the values, in order. Duplicates are kept.
    Add { values: Arc<[T]> },
    /// Drop every element the filter matches; no filter drops everything.
    Delete { filter: Option<FilterRef<T>> },
    /// Apply `deltas` to every mergeable element the filter matches.
    Merge {
        filter: FilterRef<T>,
        deltas: AttributeDeltaSet,
    },
}

impl<T: 'static> DeltaOp<T> {
    /// Append the given elements.
    pub fn add(values: impl IntoIterator<Item = T>) -> Self {
        Self::Add {
            values: values.into_iter().collect(),
        }
    }

    /// Drop the elements the filter matches, or all of them without a filter.
    pub fn delete(filter: Option<FilterRef<T>>) -> Self {
        Self::Delete { filter }
    }

    /// Drop the elements the filter matches.
    pub fn delete_matching(filter: FilterRef<T>) -> Self {
        Self::Delete {
            filter: Some(filter),
        }
    }

    /// Drop every element.
    pub fn delete_all() -> Self {
        Self::Delete { filter: None }
    }

    /// Merge child deltas into the elements the filter matches.
    ///
    /// A merge always needs a filter; passing `None` is rejected. Child deltas
    /// must be unique by attribute name.
    pub fn merge<D>(
        filter: Option<FilterRef<T>>,
        deltas: impl IntoIterator<Item = D>,
    ) -> ConnectorResult<Self>
    where
        D: Into<AttributeDelta>,
    {
        let filter = filter
            .ok_or_else(|| ConnectorError::invalid_argument("Merge filter cannot be absent"))?;
        let deltas = AttributeDeltaSet::from_deltas(deltas)?;
        Ok(Self::Merge { filter, deltas })
    }

    pub fn kind(&self) -> DeltaKind {
        match self {
            Self::Add { .. } => DeltaKind::Add,
            Self::Delete { .. } => DeltaKind::Delete,
            Self::Merge { .. } => DeltaKind::Merge,
        }
    }

    /// The filter of a delete or merge.
    pub fn filter(&self) -> Option<&FilterRef<T>> {
        match self {
            Self::Add { .. } => None,
            Self::Delete { filter } => filter.as_ref(),
            Self::Merge { filter, .. } => Some(filter),
        }
    }

    /// The values of an add.
    pub fn values(&self) -> Option<&[T]> {
        match self {
            Self::Add { values } => Some(values),
            _ => None,
        }
    }
}

impl<T: DeltaElement> DeltaOp<T> {
    /// Apply this step to a list, producing the next list.
    ///
    /// Elements a merge leaves alone are moved through as they are.
    pub fn apply(&self, mut current: Vec<T>) -> Vec<T> {
        match self {
            Self::Add { values } => {
                T::append(&mut current, values);
                current
            }
            Self::Delete { filter } => current
                .into_iter()
                .filter(|v| !optional_matches(filter.as_ref(), v))
                .collect(),
            Self::Merge { filter, deltas } => current
                .into_iter()
                .map(|element| {
                    if element.is_mergeable() && filter.matches(&element) {
                        element.merge_deltas(deltas).unwrap_or(element)
                    } else {
                        element
                    }
                })
                .collect(),
        }
    }
}

impl<T: PartialEq + 'static> PartialEq for DeltaOp<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Add { values: a }, Self::Add { values: b }) => a == b,
            (Self::Delete { filter: a }, Self::Delete { filter: b }) => match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => same_filter(a, b),
                _ => false,
            },
            (
                Self::Merge {
                    filter: fa,
                    deltas: da,
                },
                Self::Merge {
                    filter: fb,
                    deltas: db,
                },
            ) => same_filter(fa, fb) && da == db,
            _ => false,
        }
    }
}

impl<T: fmt::Display + 'static> fmt::Display for DeltaOp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add { values } => {
                write!(f, "Add: [")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            Self::Delete { filter: None } => write!(f, "Delete: *"),
            Self::Delete {
                filter: Some(filter),
            } => write!(f, "Delete: {:?}", filter),
            Self::Merge { filter, deltas } => {
                write!(f, "Merge: {:?} deltas: {:?}", filter, deltas.names())
            }
        }
    }
}
