//! Facade configuration.

use crate::error::ConnectorResult;
use crate::objects::name::OPERATIONAL_ATTRIBUTES;
use crate::objects::names_equal;
use serde::{Deserialize, Serialize};

/// Settings of a [`ConnectorFacade`](super::ConnectorFacade).
///
/// # Example
///
/// ```rust
/// use connector_delta::operation::FacadeConfig;
///
/// let config = FacadeConfig::from_json(r#"{"emulateComplexDelta": false}"#).unwrap();
/// assert!(!config.emulate_complex_delta);
/// assert!(config.is_operational("__password__"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FacadeConfig {
    /// Attributes that may never be added to or removed from value by value
    pub operational_attributes: Vec<String>,

    /// Whether `complex_update_delta` may be emulated with fetch, apply and
    /// replace when the connector has no native support
    pub emulate_complex_delta: bool,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            operational_attributes: OPERATIONAL_ATTRIBUTES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            emulate_complex_delta: true,
        }
    }
}

impl FacadeConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> ConnectorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_operational_attributes<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.operational_attributes = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_emulate_complex_delta(mut self, emulate: bool) -> Self {
        self.emulate_complex_delta = emulate;
        self
    }

    /// Whether `name` is an operational attribute (ignoring case).
    pub fn is_operational(&self, name: &str) -> bool {
        self.operational_attributes
            .iter()
            .any(|operational| names_equal(operational, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FacadeConfig::default();
        assert!(config.emulate_complex_delta);
        assert!(config.is_operational("__NAME__"));
        assert!(config.is_operational("__enable__"));
        assert!(!config.is_operational("mail"));
    }

    #[test]
    fn test_from_json_overrides() {
        let config =
            FacadeConfig::from_json(r#"{"operationalAttributes": ["secret"]}"#).unwrap();
        assert!(config.emulate_complex_delta);
        assert!(config.is_operational("SECRET"));
        assert!(!config.is_operational("__NAME__"));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = FacadeConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::error::ConnectorError::Serialization(_)));
    }

    #[test]
    fn test_builder_methods() {
        let config = FacadeConfig::default()
            .with_operational_attributes(["a"])
            .with_emulate_complex_delta(false);
        assert_eq!(config.operational_attributes, vec!["a".to_string()]);
        assert!(!config.emulate_complex_delta);
    }
}
