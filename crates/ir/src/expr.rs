// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Expressions
//!
//! This module represents SQL expressions in the IR.
//!
//! ## Design
//!
//! Expressions are the building blocks of statements and can represent:
//!
//! - **Column references**: `column`, `table.column` or `schema.table.column`
//! - **Literal values**: Numbers, strings, booleans, NULL
//! - **Operators**: Binary and unary operations
//! - **Function calls**: Scalar and aggregate functions, including `COUNT(*)`
//! - **Subqueries**: Scalar subqueries, `EXISTS (...)` and `expr IN (SELECT ...)`
//!
//! ## Column References
//!
//! [`ColumnRef`] is the node the binder annotates. After a successful bind,
//! [`ColumnRef::resolved`] holds a [`ColumnResolution`] pointing at the catalog
//! column (or at the SELECT field it was resolved through).
//!
//! ```sql
//! -- Bare column
//! c1
//!
//! -- Qualified column
//! t1.c1
//!
//! -- Schema-qualified column
//! test.t1.c1
//! ```
//!
//! ## Subqueries
//!
//! Subquery expressions own a full [`SelectStatement`]. The binder resolves them
//! with a scope chained to the enclosing statement, which is how correlated
//! references such as `WHERE EXISTS (SELECT c2)` find `c2` in the outer FROM.

use serde::{Deserialize, Serialize};

use crate::query::SelectStatement;
use crate::resolved::{ColumnResolution, ResolvedColumn};

/// Byte range of a node in the original statement text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A SQL expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Column reference (e.g., `table.column` or just `column`)
    Column(ColumnRef),

    /// Literal value
    Literal(Literal),

    /// Binary operation (e.g., `a + b`, `x = 5`)
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// Unary operation (e.g., `-x`, `NOT a`)
    UnaryOp { op: UnaryOp, expr: Box<Expr> },

    /// Function call (e.g., `COUNT(*)`, `MAX(column)`)
    Function {
        name: String,
        args: Vec<Expr>,
        distinct: bool,
    },

    /// The `*` argument of `COUNT(*)`
    Wildcard,

    /// CASE expression
    Case {
        operand: Option<Box<Expr>>,
        conditions: Vec<Expr>,
        results: Vec<Expr>,
        else_result: Option<Box<Expr>>,
    },

    /// CAST expression
    Cast { expr: Box<Expr>, type_name: String },

    /// Parenthesized expression
    Paren(Box<Expr>),

    /// List of expressions (e.g., for IN clause)
    List(Vec<Expr>),

    /// `[NOT] EXISTS (SELECT ...)`
    Exists {
        subquery: Box<SelectStatement>,
        negated: bool,
    },

    /// Scalar subquery `(SELECT ...)`
    Subquery(Box<SelectStatement>),

    /// `expr [NOT] IN (SELECT ...)`
    InSubquery {
        expr: Box<Expr>,
        subquery: Box<SelectStatement>,
        negated: bool,
    },
}

impl Expr {
    /// Unqualified column reference
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(ColumnRef::new(name))
    }

    /// Returns the column reference if this expression is a bare identifier
    ///
    /// Only bare identifiers take part in SELECT alias lookup; `t1.c1`,
    /// `c1 + 1` and friends always resolve against the table scope.
    pub fn as_bare_column(&self) -> Option<&ColumnRef> {
        match self {
            Expr::Column(col) if col.is_bare() => Some(col),
            _ => None,
        }
    }

    pub fn is_bare_column(&self) -> bool {
        self.as_bare_column().is_some()
    }
}

/// Column reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Optional schema name (only valid together with `table`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Optional table/alias name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Column name
    pub column: String,
    /// Position in the source text, if the producer tracked it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Filled in by the binder
    #[serde(skip)]
    pub resolved: Option<ColumnResolution>,
}

impl ColumnRef {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: None,
            column: column.into(),
            span: None,
            resolved: None,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// `true` when neither table nor schema qualifier is present
    pub fn is_bare(&self) -> bool {
        self.table.is_none() && self.schema.is_none()
    }

    pub fn qualified(&self) -> String {
        match (&self.schema, &self.table) {
            (Some(schema), Some(table)) => format!("{}.{}.{}", schema, table, self.column),
            (_, Some(table)) => format!("{}.{}", table, self.column),
            _ => self.column.clone(),
        }
    }

    /// The catalog column this reference resolved to, if any
    ///
    /// References resolved through a SELECT alias whose target is not a plain
    /// column (e.g. `1 AS a ... GROUP BY a`) have a resolution but no column.
    pub fn resolved_column(&self) -> Option<&ResolvedColumn> {
        self.resolved.as_ref().and_then(ColumnResolution::column)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // String
    Like,
    NotLike,

    // Other
    In,
    NotIn,
    Is,
    IsNot,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum UnaryOp {
    Neg,
    Not,
}
