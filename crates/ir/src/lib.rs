// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Binder - Intermediate Representation
//!
//! This crate provides the typed statement tree consumed by the binder.
//! The tree is designed to:
//! - Model SELECT / INSERT / UPDATE / DELETE with a binary join tree in FROM
//! - Carry resolution annotations in place, so binding never rewrites structure
//! - Describe schema metadata (tables, columns, functions) shared with the catalog
//!
//! Parsing SQL text is not part of this crate; producers build the tree
//! directly (or deserialize it from JSON).

pub mod expr;
pub mod metadata;
pub mod query;
pub mod resolved;
pub mod visit;

// Re-export commonly used types
pub use expr::{BinaryOp, ColumnRef, Expr, Literal, Span, UnaryOp};
pub use metadata::{
    ColumnMetadata, DataType, FunctionMetadata, FunctionType, TableMetadata, TableType,
};
pub use query::{
    Assignment, DeleteStatement, FromItem, InsertSource, InsertStatement, Join, JoinType, Limit,
    OrderBy, SelectItem, SelectStatement, SortDirection, Statement, TableName, UpdateStatement,
    WildcardRef,
};
pub use resolved::{BindingId, ColumnResolution, ResolvedColumn, ResolvedTable};
pub use visit::{Node, ReferenceMut, Visitor};
