// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Binder - Catalog Layer
//!
//! Schema access for the binder. Two levels:
//!
//! - [`Catalog`]: the async contract of an external schema store (live
//!   database, static file, cache). Implemented here by [`StaticCatalog`].
//! - [`InfoSchema`]: an immutable snapshot taken from a catalog. Binding only
//!   ever reads a snapshot, so one statement sees one consistent schema and
//!   lookups never block.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sql_binder_catalog::{InfoSchema, StaticCatalog};
//!
//! let catalog = StaticCatalog::from_file("catalog.yaml")?;
//! let snapshot = InfoSchema::load(&catalog).await?;
//! let t1 = snapshot.find_table(None, "t1", "test");
//! ```
//!
//! ## Implementing the Catalog Trait
//!
//! ```rust,ignore
//! use sql_binder_catalog::{Catalog, CatalogResult, ColumnMetadata, FunctionMetadata, TableMetadata};
//! use async_trait::async_trait;
//!
//! struct MyCatalog;
//!
//! #[async_trait]
//! impl Catalog for MyCatalog {
//!     async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>> {
//!         // Your implementation here
//!     }
//!
//!     async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>> {
//!         // Your implementation here
//!     }
//!
//!     async fn list_functions(&self) -> CatalogResult<Vec<FunctionMetadata>> {
//!         // Your implementation here
//!     }
//! }
//! ```

pub mod error;
pub mod info_schema;
pub mod metadata;
pub mod r#static;
pub mod r#trait;

// Re-exports
pub use error::{CatalogError, CatalogResult};
pub use info_schema::InfoSchema;
pub use metadata::{
    ColumnMetadata, DataType, FunctionMetadata, FunctionType, TableMetadata, TableType,
};
pub use r#static::{CatalogDefinition, StaticCatalog};
pub use r#trait::Catalog;
