//! The filter capability consumed by deltas.
//!
//! Filter expression languages live elsewhere; deltas only need to ask whether
//! a candidate matches. [`filters`] holds a few ready-made predicates for the
//! common cases.

use std::fmt;
use std::sync::Arc;

/// A predicate over delta elements (attribute values or whole attributes).
pub trait Filter<T: ?Sized>: fmt::Debug + Send + Sync {
    /// Whether the candidate is selected by this filter.
    fn matches(&self, candidate: &T) -> bool;
}

/// Shared handle to a filter. Deltas are immutable and shareable, and so are
/// the filters they hold.
pub type FilterRef<T> = Arc<dyn Filter<T>>;

/// An absent filter selects everything.
pub(crate) fn optional_matches<T: ?Sized>(filter: Option<&FilterRef<T>>, candidate: &T) -> bool {
    filter.is_none_or(|f| f.matches(candidate))
}

/// Filters have no structural equality; two references are the same filter
/// only when they point at the same instance.
pub(crate) fn same_filter<T: ?Sized>(a: &FilterRef<T>, b: &FilterRef<T>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

pub mod filters {
    //! Ready-made filters.

    use super::{Filter, FilterRef};
    use crate::objects::attribute::Attribute;
    use crate::objects::name::names_equal;
    use crate::objects::value::AttributeValue;
    use std::fmt;
    use std::marker::PhantomData;
    use std::sync::Arc;

    /// Matches values equal to the given value.
    pub fn equal_to(value: impl Into<AttributeValue>) -> FilterRef<AttributeValue> {
        Arc::new(ValueEquals(value.into()))
    }

    /// Matches embedded objects whose attribute `name` contains `value`.
    /// Scalars never match.
    pub fn embedded_attribute_equals(
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> FilterRef<AttributeValue> {
        Arc::new(EmbeddedAttributeEquals {
            name: name.into(),
            value: value.into(),
        })
    }

    /// Matches attributes with the given name.
    pub fn attribute_named(name: impl Into<String>) -> FilterRef<Attribute> {
        Arc::new(AttributeNamed(name.into()))
    }

    /// Wrap a closure as a filter. The label shows up in debug output.
    pub fn predicate<T, F>(label: impl Into<String>, predicate: F) -> FilterRef<T>
    where
        T: ?Sized + 'static,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Arc::new(Predicate {
            label: label.into(),
            predicate,
            _candidate: PhantomData,
        })
    }

    #[derive(Debug)]
    struct ValueEquals(AttributeValue);

    impl Filter<AttributeValue> for ValueEquals {
        fn matches(&self, candidate: &AttributeValue) -> bool {
            candidate == &self.0
        }
    }

    #[derive(Debug)]
    struct EmbeddedAttributeEquals {
        name: String,
        value: AttributeValue,
    }

    impl Filter<AttributeValue> for EmbeddedAttributeEquals {
        fn matches(&self, candidate: &AttributeValue) -> bool {
            candidate
                .as_embedded()
                .and_then(|object| object.attribute(&self.name))
                .is_some_and(|attribute| attribute.values().contains(&self.value))
        }
    }

    #[derive(Debug)]
    struct AttributeNamed(String);

    impl Filter<Attribute> for AttributeNamed {
        fn matches(&self, candidate: &Attribute) -> bool {
            names_equal(candidate.name(), &self.0)
        }
    }

    struct Predicate<T: ?Sized, F> {
        label: String,
        predicate: F,
        _candidate: PhantomData<fn(&T)>,
    }

    impl<T: ?Sized, F> fmt::Debug for Predicate<T, F> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_tuple("Predicate").field(&self.label).finish()
        }
    }

    impl<T, F> Filter<T> for Predicate<T, F>
    where
        T: ?Sized,
        F: Fn(&T) -> bool + Send + Sync,
    {
        fn matches(&self, candidate: &T) -> bool {
            (self.predicate)(candidate)
        }
    }
}
