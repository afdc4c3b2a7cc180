// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Static Catalog
//!
//! A catalog backed by schema definitions held in memory, usually read from a
//! YAML or JSON file:
//!
//! ```yaml
//! tables:
//!   - name: t1
//!     schema: test
//!     columns:
//!       - { name: c1, data_type: Integer }
//!       - { name: c2, data_type: Integer }
//! functions:
//!   - { name: median, return_type: Double, function_type: Aggregate }
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sql_binder_catalog::{InfoSchema, StaticCatalog};
//!
//! let catalog = StaticCatalog::from_file("catalog.yaml")?;
//! let snapshot = InfoSchema::load(&catalog).await?;
//! ```

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::metadata::{ColumnMetadata, FunctionMetadata, TableMetadata};
use crate::{Catalog, CatalogError, CatalogResult};

/// On-disk layout of a static catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default)]
    pub tables: Vec<TableMetadata>,
    #[serde(default)]
    pub functions: Vec<FunctionMetadata>,
}

/// Static catalog with predefined schema data
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    tables: Vec<TableMetadata>,
    functions: Vec<FunctionMetadata>,
}

impl StaticCatalog {
    /// Create an empty static catalog
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_function(mut self, function: FunctionMetadata) -> Self {
        self.functions.push(function);
        self
    }

    pub fn from_definition(definition: CatalogDefinition) -> Self {
        Self {
            tables: definition.tables,
            functions: definition.functions,
        }
    }

    pub fn from_yaml_str(yaml: &str) -> CatalogResult<Self> {
        let definition: CatalogDefinition = serde_yaml::from_str(yaml)?;
        Ok(Self::from_definition(definition))
    }

    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let definition: CatalogDefinition = serde_json::from_str(json)?;
        Ok(Self::from_definition(definition))
    }

    /// Load a definition file; `.json` is parsed as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::ConnectionFailed(format!("{}: {}", path.display(), e))
        })?;

        let catalog = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            _ => Self::from_yaml_str(&content)?,
        };
        debug!(
            path = %path.display(),
            tables = catalog.tables.len(),
            functions = catalog.functions.len(),
            "loaded static catalog"
        );
        Ok(catalog)
    }

    fn lookup(&self, table: &str) -> Option<&TableMetadata> {
        match table.split_once('.') {
            Some((schema, name)) => self
                .tables
                .iter()
                .find(|t| t.schema == schema && t.name == name),
            None => self.tables.iter().find(|t| t.name == table),
        }
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>> {
        Ok(self.tables.clone())
    }

    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>> {
        self.lookup(table).map(|t| t.columns.clone()).ok_or_else(|| {
            let (schema, name) = table.split_once('.').unwrap_or(("", table));
            CatalogError::TableNotFound(name.to_string(), schema.to_string())
        })
    }

    async fn list_functions(&self) -> CatalogResult<Vec<FunctionMetadata>> {
        Ok(self.functions.clone())
    }
}
