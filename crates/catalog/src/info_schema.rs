// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # InfoSchema
//!
//! An immutable, point-in-time snapshot of a catalog. Binding reads only from
//! a snapshot, so lookups are synchronous, deterministic and free of side
//! effects, and a snapshot can be shared between threads behind an `Arc`.
//!
//! ## Case policy
//!
//! The snapshot owns the identifier case policy. Unless built with
//! [`InfoSchema::with_case_sensitive`]`(true)`, schema, table, column and
//! function names compare on their lower-cased form. Everything that matches
//! identifiers during binding goes through [`InfoSchema::normalize`] so the
//! catalog and the scopes agree.
//!
//! ## Lookup
//!
//! ```rust
//! use sql_binder_catalog::{ColumnMetadata, DataType, InfoSchema, TableMetadata};
//!
//! let mut info = InfoSchema::new();
//! info.add_table(
//!     TableMetadata::new("t1", "test")
//!         .with_columns(vec![ColumnMetadata::new("c1", DataType::Integer)]),
//! )
//! .unwrap();
//!
//! let t1 = info.find_table(None, "T1", "test").unwrap();
//! let (ordinal, _) = info.find_column(t1, "C1").unwrap();
//! assert_eq!(ordinal, 0);
//! assert!(info.is_aggregate("COUNT"));
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::{CatalogError, CatalogResult};
use crate::metadata::{ColumnMetadata, DataType, FunctionMetadata, TableMetadata};
use crate::r#trait::Catalog;

/// Aggregates every snapshot knows about, whatever the catalog lists
fn builtin_aggregates() -> Vec<FunctionMetadata> {
    let any = || DataType::Other("ANY".to_string());
    vec![
        FunctionMetadata::aggregate("count", DataType::BigInt),
        FunctionMetadata::aggregate("sum", DataType::Decimal),
        FunctionMetadata::aggregate("avg", DataType::Decimal),
        FunctionMetadata::aggregate("min", any()),
        FunctionMetadata::aggregate("max", any()),
        FunctionMetadata::aggregate("group_concat", DataType::Text),
        FunctionMetadata::aggregate("bit_and", DataType::BigInt),
        FunctionMetadata::aggregate("bit_or", DataType::BigInt),
        FunctionMetadata::aggregate("bit_xor", DataType::BigInt),
        FunctionMetadata::aggregate("std", DataType::Double),
        FunctionMetadata::aggregate("stddev", DataType::Double),
        FunctionMetadata::aggregate("variance", DataType::Double),
    ]
}

/// Immutable catalog snapshot used for Catalog Lookup
#[derive(Debug, Clone)]
pub struct InfoSchema {
    /// normalized schema -> normalized table -> metadata
    schemas: HashMap<String, HashMap<String, Arc<TableMetadata>>>,
    /// normalized function name -> metadata
    functions: HashMap<String, FunctionMetadata>,
    case_sensitive: bool,
}

impl Default for InfoSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl InfoSchema {
    /// Empty, case-insensitive snapshot seeded with the built-in aggregates
    pub fn new() -> Self {
        Self::with_case_sensitive(false)
    }

    pub fn with_case_sensitive(case_sensitive: bool) -> Self {
        let mut info = Self {
            schemas: HashMap::new(),
            functions: HashMap::new(),
            case_sensitive,
        };
        for function in builtin_aggregates() {
            info.add_function(function);
        }
        info
    }

    /// Take a snapshot of `catalog` with the default (case-insensitive) policy
    pub async fn load(catalog: &dyn Catalog) -> CatalogResult<Self> {
        Self::new().load_from(catalog).await
    }

    /// Add every table and function `catalog` lists to this snapshot
    ///
    /// Tables listed without columns are completed through
    /// [`Catalog::get_columns`].
    #[instrument(skip_all)]
    pub async fn load_from(mut self, catalog: &dyn Catalog) -> CatalogResult<Self> {
        let tables = catalog.list_tables().await?;
        for mut table in tables {
            if table.columns.is_empty() {
                table.columns = catalog.get_columns(&table.qualified_name()).await?;
            }
            self.add_table(table)?;
        }

        for function in catalog.list_functions().await? {
            self.add_function(function);
        }

        debug!(
            schemas = self.schemas.len(),
            tables = self.table_count(),
            functions = self.functions.len(),
            "catalog snapshot loaded"
        );
        Ok(self)
    }

    /// Register a table under its own schema
    ///
    /// # Errors
    ///
    /// - `CatalogError::InvalidSchema` if the table has no schema
    /// - `CatalogError::DuplicateTable` if the normalized `schema.table` is
    ///   already present
    pub fn add_table(&mut self, table: TableMetadata) -> CatalogResult<()> {
        if table.schema.is_empty() {
            return Err(CatalogError::InvalidSchema(format!(
                "table '{}' has no schema",
                table.name
            )));
        }

        let schema = self.normalize(&table.schema).into_owned();
        let name = self.normalize(&table.name).into_owned();
        let tables = self.schemas.entry(schema).or_default();
        if tables.contains_key(&name) {
            return Err(CatalogError::DuplicateTable(table.name, table.schema));
        }
        tables.insert(name, Arc::new(table));
        Ok(())
    }

    /// Register a function; a later definition replaces an earlier one
    pub fn add_function(&mut self, function: FunctionMetadata) {
        let name = self.normalize(&function.name).into_owned();
        self.functions.insert(name, function);
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Identifier under the snapshot's case policy
    pub fn normalize<'a>(&self, ident: &'a str) -> Cow<'a, str> {
        if self.case_sensitive {
            Cow::Borrowed(ident)
        } else {
            Cow::Owned(ident.to_lowercase())
        }
    }

    /// `true` if both identifiers name the same thing under the case policy
    pub fn ident_eq(&self, left: &str, right: &str) -> bool {
        self.normalize(left) == self.normalize(right)
    }

    /// Find a table by optional schema and name
    ///
    /// Without an explicit schema the lookup uses `default_schema`.
    pub fn find_table(
        &self,
        schema: Option<&str>,
        name: &str,
        default_schema: &str,
    ) -> Option<&Arc<TableMetadata>> {
        let schema = self.normalize(schema.unwrap_or(default_schema));
        let name = self.normalize(name);
        self.schemas.get(schema.as_ref())?.get(name.as_ref())
    }

    /// Find a column of `table` by name, returning its ordinal
    pub fn find_column<'t>(
        &self,
        table: &'t TableMetadata,
        name: &str,
    ) -> Option<(usize, &'t ColumnMetadata)> {
        table
            .columns
            .iter()
            .enumerate()
            .find(|(_, column)| self.ident_eq(&column.name, name))
    }

    pub fn has_schema(&self, schema: &str) -> bool {
        self.schemas.contains_key(self.normalize(schema).as_ref())
    }

    pub fn find_function(&self, name: &str) -> Option<&FunctionMetadata> {
        self.functions.get(self.normalize(name).as_ref())
    }

    /// `true` if `name` is a known aggregate function
    pub fn is_aggregate(&self, name: &str) -> bool {
        self.find_function(name)
            .is_some_and(FunctionMetadata::is_aggregate)
    }

    pub fn table_count(&self) -> usize {
        self.schemas.values().map(HashMap::len).sum()
    }

    /// All tables, in no particular order
    pub fn tables(&self) -> impl Iterator<Item = &Arc<TableMetadata>> {
        self.schemas.values().flat_map(HashMap::values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FunctionType;
    use crate::r#static::StaticCatalog;

    fn t1() -> TableMetadata {
        TableMetadata::new("t1", "test").with_columns(vec![
            ColumnMetadata::new("c1", DataType::Integer),
            ColumnMetadata::new("c2", DataType::Integer),
        ])
    }

    #[test]
    fn test_find_table_uses_default_schema() {
        let mut info = InfoSchema::new();
        info.add_table(t1()).unwrap();

        assert!(info.find_table(None, "t1", "test").is_some());
        assert!(info.find_table(Some("test"), "t1", "other").is_some());
        assert!(info.find_table(None, "t1", "other").is_none());
        assert!(info.find_table(None, "t4", "test").is_none());
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut info = InfoSchema::new();
        info.add_table(t1()).unwrap();

        let table = info.find_table(Some("TEST"), "T1", "x").unwrap();
        let (ordinal, column) = info.find_column(table, "C2").unwrap();
        assert_eq!(ordinal, 1);
        assert_eq!(column.name, "c2");
    }

    #[test]
    fn test_case_sensitive_lookup() {
        let mut info = InfoSchema::with_case_sensitive(true);
        info.add_table(t1()).unwrap();

        assert!(info.find_table(None, "T1", "test").is_none());
        let table = info.find_table(None, "t1", "test").unwrap();
        assert!(info.find_column(table, "C1").is_none());
        assert!(info.find_column(table, "c1").is_some());
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let mut info = InfoSchema::new();
        info.add_table(t1()).unwrap();
        let result = info.add_table(TableMetadata::new("T1", "Test"));
        assert_eq!(
            result,
            Err(CatalogError::DuplicateTable("T1".to_string(), "Test".to_string()))
        );
    }

    #[test]
    fn test_table_without_schema_rejected() {
        let mut info = InfoSchema::new();
        let result = info.add_table(TableMetadata::new("t1", ""));
        assert!(matches!(result, Err(CatalogError::InvalidSchema(_))));
    }

    #[test]
    fn test_builtin_aggregates() {
        let info = InfoSchema::new();
        for name in ["count", "SUM", "Avg", "min", "max", "group_concat"] {
            assert!(info.is_aggregate(name), "{} should be an aggregate", name);
        }
        assert!(!info.is_aggregate("abs"));
    }

    #[tokio::test]
    async fn test_load_merges_catalog_functions() {
        let catalog = StaticCatalog::new()
            .with_table(t1())
            .with_function(FunctionMetadata::aggregate("median", DataType::Double))
            .with_function(
                FunctionMetadata::new("abs", DataType::Double).with_type(FunctionType::Scalar),
            );

        let info = InfoSchema::load(&catalog).await.unwrap();
        assert_eq!(info.table_count(), 1);
        assert!(info.is_aggregate("median"));
        assert!(info.is_aggregate("count"));
        assert!(!info.is_aggregate("abs"));
        assert!(info.has_schema("TEST"));
    }
}
