//! Per-call operation options.
//!
//! Options are an open bag: a few well-known entries get typed fields, the
//! rest travel as JSON values a connector may interpret.

use crate::objects::names_equal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Options passed along with every connector operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOptions {
    /// Restrict returned attributes to these names; `None` returns the
    /// connector's default set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes_to_get: Option<Vec<String>>,

    /// Connector-specific options.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub options: HashMap<String, Value>,
}

impl OperationOptions {
    pub fn builder() -> OperationOptionsBuilder {
        OperationOptionsBuilder::default()
    }

    /// A copy of these options asking for exactly `names`.
    pub fn with_attributes_to_get<S: AsRef<str>>(&self, names: &[S]) -> Self {
        Self {
            attributes_to_get: Some(names.iter().map(|n| n.as_ref().to_string()).collect()),
            ..self.clone()
        }
    }

    /// Whether the attribute `name` should be returned.
    pub fn wants(&self, name: &str) -> bool {
        self.attributes_to_get
            .as_ref()
            .is_none_or(|names| names.iter().any(|n| names_equal(n, name)))
    }

    /// Look up a connector-specific option.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }
}

/// Builder for [`OperationOptions`].
#[derive(Debug, Clone, Default)]
pub struct OperationOptionsBuilder {
    options: OperationOptions,
}

impl OperationOptionsBuilder {
    /// Set attributes to return.
    pub fn attributes_to_get<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.options.attributes_to_get = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set a connector-specific option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.options.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> OperationOptions {
        self.options
    }
}
