// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock catalog implementation for testing
//!
//! Provides an in-memory catalog with builder pattern for easy test setup

use std::collections::BTreeMap;

use sql_binder_catalog::{
    Catalog, CatalogError, CatalogResult, ColumnMetadata, DataType, FunctionMetadata,
    FunctionType, InfoSchema, TableMetadata, TableType,
};

/// In-memory mock catalog for testing
///
/// Tables are keyed by `schema.table` and listed in key order, so snapshots
/// built from a mock are deterministic.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    tables: BTreeMap<String, TableMetadata>,
    functions: Vec<FunctionMetadata>,
}

impl MockCatalog {
    /// Create a new empty mock catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table to the catalog, replacing one with the same qualified name
    pub fn add_table(mut self, table: TableMetadata) -> Self {
        self.tables.insert(table.qualified_name(), table);
        self
    }

    /// Add a function to the catalog
    pub fn add_function(mut self, function: FunctionMetadata) -> Self {
        self.functions.push(function);
        self
    }

    /// Get a table by `schema.table` or by bare name (any schema)
    pub fn get_table(&self, name: &str) -> Option<&TableMetadata> {
        self.tables
            .get(name)
            .or_else(|| self.tables.values().find(|t| t.name == name))
    }

    /// Case-insensitive snapshot of this catalog, built without awaiting
    pub fn info_schema(&self) -> CatalogResult<InfoSchema> {
        let mut info = InfoSchema::new();
        for table in self.tables.values() {
            info.add_table(table.clone())?;
        }
        for function in &self.functions {
            info.add_function(function.clone());
        }
        Ok(info)
    }
}

#[async_trait::async_trait]
impl Catalog for MockCatalog {
    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>> {
        Ok(self.tables.values().cloned().collect())
    }

    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>> {
        if let Some(table_metadata) = self.get_table(table) {
            Ok(table_metadata.columns.clone())
        } else {
            Err(CatalogError::TableNotFound(table.to_string(), "mock".to_string()))
        }
    }

    async fn list_functions(&self) -> CatalogResult<Vec<FunctionMetadata>> {
        Ok(self.functions.clone())
    }
}

/// Builder for creating mock catalogs with a fluent API
#[derive(Debug, Default)]
pub struct MockCatalogBuilder {
    catalog: MockCatalog,
}

impl MockCatalogBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `t1`, `t2` and `t3`, each `(c1 int, c2 int)`, in schema `test`
    pub fn with_binder_schema(mut self) -> Self {
        for name in ["t1", "t2", "t3"] {
            self.catalog = self.catalog.add_table(
                TableMetadata::new(name, "test").with_columns(vec![
                    ColumnMetadata::new("c1", DataType::Integer),
                    ColumnMetadata::new("c2", DataType::Integer),
                ]),
            );
        }
        self
    }

    /// Add the standard test schema (users, orders and products in `myapp`)
    pub fn with_standard_schema(mut self) -> Self {
        self.catalog = self
            .catalog
            .add_table(
                TableMetadata::new("users", "myapp")
                    .with_columns(vec![
                        ColumnMetadata::new("id", DataType::BigInt).with_primary_key(),
                        ColumnMetadata::new("email", DataType::Varchar(Some(255)))
                            .with_nullable(false),
                        ColumnMetadata::new("name", DataType::Varchar(Some(100))),
                        ColumnMetadata::new("created_at", DataType::Timestamp),
                    ]),
            )
            .add_table(
                TableMetadata::new("orders", "myapp")
                    .with_columns(vec![
                        ColumnMetadata::new("id", DataType::BigInt).with_primary_key(),
                        ColumnMetadata::new("user_id", DataType::BigInt).with_nullable(false),
                        ColumnMetadata::new("total", DataType::Decimal),
                        ColumnMetadata::new("status", DataType::Varchar(Some(50)))
                            .with_nullable(false),
                        ColumnMetadata::new("created_at", DataType::Timestamp),
                    ])
                    .with_type(TableType::Table),
            )
            .add_table(TableMetadata::new("products", "myapp").with_columns(vec![
                ColumnMetadata::new("id", DataType::BigInt).with_primary_key(),
                ColumnMetadata::new("name", DataType::Varchar(Some(255))).with_nullable(false),
                ColumnMetadata::new("price", DataType::Decimal).with_nullable(false),
                ColumnMetadata::new("stock", DataType::Integer),
            ]))
            .add_table(
                TableMetadata::new("active_users", "myapp")
                    .with_columns(vec![
                        ColumnMetadata::new("id", DataType::BigInt),
                        ColumnMetadata::new("email", DataType::Varchar(Some(255))),
                    ])
                    .with_type(TableType::View),
            )
            .add_function(
                FunctionMetadata::new("abs", DataType::Integer).with_type(FunctionType::Scalar),
            )
            .add_function(
                FunctionMetadata::new("upper", DataType::Varchar(None))
                    .with_type(FunctionType::Scalar),
            )
            .add_function(
                FunctionMetadata::new("lower", DataType::Varchar(None))
                    .with_type(FunctionType::Scalar),
            )
            .add_function(
                FunctionMetadata::new("row_number", DataType::BigInt)
                    .with_type(FunctionType::Window),
            )
            .add_function(FunctionMetadata::aggregate("median", DataType::Double));

        self
    }

    /// Add a custom table
    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.catalog = self.catalog.add_table(table);
        self
    }

    /// Add a custom function
    pub fn with_function(mut self, function: FunctionMetadata) -> Self {
        self.catalog = self.catalog.add_function(function);
        self
    }

    /// Build the mock catalog
    pub fn build(self) -> MockCatalog {
        self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_catalog_list_tables() {
        let catalog = MockCatalogBuilder::new().with_standard_schema().build();

        let tables = catalog.list_tables().await.unwrap();
        assert_eq!(tables.len(), 4);

        let table_names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert!(table_names.contains(&"users"));
        assert!(table_names.contains(&"orders"));
        assert!(table_names.contains(&"products"));
    }

    #[tokio::test]
    async fn test_mock_catalog_get_columns() {
        let catalog = MockCatalogBuilder::new().with_standard_schema().build();

        let columns = catalog.get_columns("users").await.unwrap();
        let column_names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(column_names, vec!["id", "email", "name", "created_at"]);

        let qualified = catalog.get_columns("myapp.orders").await.unwrap();
        assert_eq!(qualified.len(), 5);

        assert!(catalog.get_columns("nope").await.is_err());
    }

    #[test]
    fn test_binder_schema_snapshot() {
        let catalog = MockCatalogBuilder::new().with_binder_schema().build();
        let info = catalog.info_schema().unwrap();

        assert_eq!(info.table_count(), 3);
        let t3 = info.find_table(None, "T3", "test").unwrap();
        assert_eq!(t3.columns.len(), 2);
    }

    #[tokio::test]
    async fn test_loaded_snapshot_sees_catalog_aggregates() {
        let catalog = MockCatalogBuilder::new().with_standard_schema().build();
        let info = InfoSchema::load(&catalog).await.unwrap();

        assert!(info.is_aggregate("median"));
        assert!(info.is_aggregate("count"));
        assert!(!info.is_aggregate("upper"));
    }
}
