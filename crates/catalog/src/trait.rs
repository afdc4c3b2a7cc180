// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog trait for database schema abstraction
//!
//! The async contract a schema store fulfils. The binder never calls it
//! directly; [`InfoSchema::load`](crate::InfoSchema::load) takes a snapshot
//! through it once, and binding runs against that snapshot.

use crate::error::CatalogResult;
use crate::metadata::{ColumnMetadata, FunctionMetadata, TableMetadata};

/// Catalog trait for database schema abstraction
///
/// Implementations can read from live databases, static files, or caches.
/// They must be safe to share across tasks.
///
/// # Examples
///
/// ```rust,ignore
/// use sql_binder_catalog::{Catalog, CatalogError};
///
/// async fn list_test_tables(catalog: &impl Catalog) -> Result<Vec<String>, CatalogError> {
///     let tables = catalog.list_tables().await?;
///     Ok(tables.into_iter()
///         .filter(|t| t.schema == "test")
///         .map(|t| t.name)
///         .collect())
/// }
/// ```
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// List all tables visible to the catalog
    ///
    /// Tables may come back without columns; the snapshot loader then asks
    /// [`Catalog::get_columns`] for them.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ConnectionFailed` if the store is unreachable.
    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>>;

    /// Get column metadata for a specific table, in ordinal order
    ///
    /// # Arguments
    ///
    /// * `table` - Table name, optionally schema-qualified (`"test.t1"`)
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::TableNotFound` if the table doesn't exist.
    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>>;

    /// List all available functions
    ///
    /// Only the aggregate flag matters to the binder. Built-in aggregates are
    /// known to the snapshot already, so an empty list is a valid answer.
    async fn list_functions(&self) -> CatalogResult<Vec<FunctionMetadata>>;
}
