// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Binder configuration
//!
//! ```yaml
//! default_schema: test
//! case_sensitive: false
//! ```
//!
//! Every field is optional.

use serde::{Deserialize, Serialize};
use sql_binder_catalog::{Catalog, CatalogResult, InfoSchema};

use crate::error::ConfigError;

/// Settings for a bind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Schema for table references without an explicit schema
    pub default_schema: String,

    /// Identifier case policy of snapshots built by [`BinderConfig::load_snapshot`]
    ///
    /// Binding itself always follows the policy of the snapshot it is given.
    pub case_sensitive: bool,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            default_schema: "test".to_string(),
            case_sensitive: false,
        }
    }
}

impl BinderConfig {
    pub fn new(default_schema: impl Into<String>) -> Self {
        Self {
            default_schema: default_schema.into(),
            ..Self::default()
        }
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Snapshot `catalog` under this config's case policy
    pub async fn load_snapshot(&self, catalog: &dyn Catalog) -> CatalogResult<InfoSchema> {
        InfoSchema::with_case_sensitive(self.case_sensitive)
            .load_from(catalog)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BinderConfig::default();
        assert_eq!(config.default_schema, "test");
        assert!(!config.case_sensitive);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = BinderConfig::from_yaml_str("case_sensitive: true\n").unwrap();
        assert_eq!(config.default_schema, "test");
        assert!(config.case_sensitive);
    }

    #[test]
    fn test_json_config() {
        let config = BinderConfig::from_json_str(r#"{"default_schema":"app"}"#).unwrap();
        assert_eq!(config, BinderConfig::new("app"));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = BinderConfig::from_yaml_str("default_schema: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }
}
