// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # SQL Binder - Semantic Layer
//!
//! This crate resolves every identifier of a parsed statement against a
//! catalog snapshot and annotates the statement in place.
//!
//! ## Overview
//!
//! - **Scope Builder**: turns the FROM join tree into [`TableBinding`]s and
//!   restricts each ON condition to its own join's operands
//! - **Identifier Resolver**: resolves column references through a
//!   [`Scope`] chain, with correlation into enclosing statements
//! - **Alias Namespace**: the SELECT list's output fields, consulted by
//!   GROUP BY, HAVING and ORDER BY
//! - **Clause Validator**: alias precedence, positional references and the
//!   grouped-columns rule of HAVING
//!
//! ## Core Concepts
//!
//! ### Scopes
//!
//! A [`Scope`] is a slice of bindings plus an optional link to the enclosing
//! statement's scope. Scopes live on the stack for the duration of one
//! SELECT and are never stored.
//!
//! ```text
//! SELECT ... FROM t1 WHERE EXISTS (SELECT ... FROM t2 WHERE t2.c1 = t1.c1)
//!
//!   [t1] <-parent- [t2]          t1.c1 resolves at depth 1
//! ```
//!
//! ### Errors
//!
//! Binding stops at the first problem and returns one [`SemanticError`];
//! callers treat any error as "statement rejected".
//!
//! ## Examples
//!
//! ```rust
//! use sql_binder_catalog::{ColumnMetadata, DataType, InfoSchema, TableMetadata};
//! use sql_binder_ir::{Expr, FromItem, SelectItem, SelectStatement, Statement, TableName};
//! use sql_binder_semantic::{bind, BinderConfig, SemanticError};
//!
//! let mut info = InfoSchema::new();
//! for name in ["t1", "t2"] {
//!     info.add_table(TableMetadata::new(name, "test").with_columns(vec![
//!         ColumnMetadata::new("c1", DataType::Integer),
//!         ColumnMetadata::new("c2", DataType::Integer),
//!     ]))
//!     .unwrap();
//! }
//! let config = BinderConfig::default();
//!
//! let from = FromItem::comma_list(vec![
//!     FromItem::table(TableName::new("t1")),
//!     FromItem::table(TableName::new("t2")),
//! ]);
//! let mut select = SelectStatement::new()
//!     .with_projection(vec![SelectItem::UnnamedExpr(Expr::column("c1"))]);
//! select.from = from;
//!
//! let mut stmt = Statement::from(select);
//! let err = bind(&mut stmt, &info, &config).unwrap_err();
//! assert!(matches!(err, SemanticError::AmbiguousColumn { .. }));
//! ```

pub mod alias;
pub mod binder;
mod clause;
pub mod config;
pub mod error;
mod resolver;
pub mod scope;
mod scope_builder;
pub mod symbol;

// Re-export commonly used types
pub use alias::{AliasNamespace, FieldTarget, OutputField};
pub use binder::{BindPhase, Binder, bind};
pub use clause::GroupingSet;
pub use config::BinderConfig;
pub use error::{Clause, ConfigError, SemanticError, SemanticResult};
pub use scope::Scope;
pub use symbol::TableBinding;
