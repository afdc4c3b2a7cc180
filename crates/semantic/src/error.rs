// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Error types for semantic analysis
//!
//! Every rejection names the offending identifier, the clause it appeared in
//! and, when the producer tracked it, its source span. Messages follow the
//! MySQL server's wording so they read familiar next to server errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use sql_binder_ir::Span;
use thiserror::Error;

/// Result type alias for semantic operations
pub type SemanticResult<T> = Result<T, SemanticError>;

/// Clause a reference was resolved in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Clause {
    FieldList,
    From,
    On,
    Where,
    GroupBy,
    Having,
    OrderBy,
    SetList,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Clause::FieldList => "field list",
            Clause::From => "from clause",
            Clause::On => "on clause",
            Clause::Where => "where clause",
            Clause::GroupBy => "group statement",
            Clause::Having => "having clause",
            Clause::OrderBy => "order clause",
            Clause::SetList => "set list",
        };
        f.write_str(name)
    }
}

/// Errors that reject a statement during binding
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// Table not in the catalog, or `t.*` naming no visible table
    #[error("Unknown table '{name}' in {clause}")]
    UnknownTable {
        name: String,
        clause: Clause,
        span: Option<Span>,
    },

    /// Column not found in any visible table
    #[error("Unknown column '{name}' in '{clause}'")]
    UnknownColumn {
        name: String,
        clause: Clause,
        span: Option<Span>,
    },

    /// Column matches more than one visible table
    #[error("Column '{name}' in {clause} is ambiguous (found in {candidates:?})")]
    AmbiguousColumn {
        name: String,
        candidates: Vec<String>,
        clause: Clause,
        span: Option<Span>,
    },

    /// Bare name in GROUP BY / ORDER BY / HAVING matching SELECT fields that
    /// denote different columns
    #[error("Column '{name}' in {clause} is ambiguous")]
    AmbiguousAlias {
        name: String,
        clause: Clause,
        span: Option<Span>,
    },

    /// Column in HAVING that is neither grouped nor inside an aggregate
    #[error("Column '{name}' in having clause is neither grouped nor aggregated")]
    InvalidHaving {
        name: String,
        clause: Clause,
        span: Option<Span>,
    },

    /// Column not found locally nor in any enclosing statement
    #[error("Unknown column '{name}' in '{clause}' (not found in any enclosing scope)")]
    UnresolvedCorrelation {
        name: String,
        clause: Clause,
        span: Option<Span>,
    },

    /// Unqualified `*` without a FROM clause
    #[error("No tables used")]
    NoTablesUsed { clause: Clause, span: Option<Span> },

    /// Positional GROUP BY / ORDER BY reference outside the SELECT list
    #[error("Unknown column '{position}' in '{clause}'")]
    InvalidPosition {
        position: i64,
        clause: Clause,
        span: Option<Span>,
    },
}

impl SemanticError {
    /// Clause the offending reference appeared in
    pub fn clause(&self) -> Clause {
        match self {
            SemanticError::UnknownTable { clause, .. }
            | SemanticError::UnknownColumn { clause, .. }
            | SemanticError::AmbiguousColumn { clause, .. }
            | SemanticError::AmbiguousAlias { clause, .. }
            | SemanticError::InvalidHaving { clause, .. }
            | SemanticError::UnresolvedCorrelation { clause, .. }
            | SemanticError::NoTablesUsed { clause, .. }
            | SemanticError::InvalidPosition { clause, .. } => *clause,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            SemanticError::UnknownTable { span, .. }
            | SemanticError::UnknownColumn { span, .. }
            | SemanticError::AmbiguousColumn { span, .. }
            | SemanticError::AmbiguousAlias { span, .. }
            | SemanticError::InvalidHaving { span, .. }
            | SemanticError::UnresolvedCorrelation { span, .. }
            | SemanticError::NoTablesUsed { span, .. }
            | SemanticError::InvalidPosition { span, .. } => *span,
        }
    }

    /// Short machine-readable kind, e.g. `"UnknownColumn"`
    pub fn kind(&self) -> &'static str {
        match self {
            SemanticError::UnknownTable { .. } => "UnknownTable",
            SemanticError::UnknownColumn { .. } => "UnknownColumn",
            SemanticError::AmbiguousColumn { .. } => "AmbiguousColumn",
            SemanticError::AmbiguousAlias { .. } => "AmbiguousAlias",
            SemanticError::InvalidHaving { .. } => "InvalidHaving",
            SemanticError::UnresolvedCorrelation { .. } => "UnresolvedCorrelation",
            SemanticError::NoTablesUsed { .. } => "NoTablesUsed",
            SemanticError::InvalidPosition { .. } => "InvalidPosition",
        }
    }
}

/// Errors reading a [`BinderConfig`](crate::BinderConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}
