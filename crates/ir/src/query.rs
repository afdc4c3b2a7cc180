// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement Representation
//!
//! This module represents SQL statements in the IR.
//!
//! ## Statement Kinds
//!
//! A [`Statement`] is one of:
//!
//! - `Select`: `SELECT ... FROM ... WHERE ... GROUP BY ... HAVING ... ORDER BY ... LIMIT ...`
//! - `Insert`: `INSERT INTO t [(cols)] VALUES (...) | SELECT ...`
//! - `Update`: `UPDATE t SET c = expr [WHERE ...] [ORDER BY ...] [LIMIT ...]`
//! - `Delete`: `DELETE FROM t [WHERE ...] [ORDER BY ...] [LIMIT ...]`
//!
//! ## FROM Clause as a Join Tree
//!
//! FROM is a binary tree of [`FromItem`]s. Leaves are tables or derived
//! tables; inner nodes are [`Join`]s. A comma list is a left-deep chain of
//! `Cross` joins, and an explicit `JOIN` binds tighter than a comma:
//!
//! ```text
//! FROM t1, t2 JOIN t3 ON t2.c1 = t3.c1
//!
//!        Join(Cross)
//!        /        \
//!      t1       Join(Inner, ON t2.c1 = t3.c1)
//!                 /      \
//!               t2        t3
//! ```
//!
//! The shape matters for name resolution: the ON condition only sees the two
//! operands of its own join, so `t1` is not visible inside it.
//!
//! ## Projection Items
//!
//! [`SelectItem`] represents items in the SELECT clause:
//!
//! - `UnnamedExpr`: Regular expression (e.g., `c1`, `c1 + 1`)
//! - `AliasedExpr`: Expression with alias (e.g., `c1 AS a`)
//! - `QualifiedWildcard`: Table-qualified wildcard (e.g., `t1.*`)
//! - `Wildcard`: Unqualified wildcard (`*`)
//!
//! ## Builder Pattern
//!
//! ```rust
//! use sql_binder_ir::{Expr, FromItem, SelectItem, SelectStatement, TableName};
//!
//! // SELECT c1 FROM t1 WHERE c2 IS NULL
//! let select = SelectStatement::new()
//!     .with_projection(vec![SelectItem::UnnamedExpr(Expr::column("c1"))])
//!     .with_from(FromItem::table(TableName::new("t1")));
//! assert!(select.from.is_some());
//! ```

use serde::{Deserialize, Serialize};

use crate::expr::{ColumnRef, Expr, Span};
use crate::resolved::ResolvedTable;

/// A bindable SQL statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Select(Box<SelectStatement>),
    Insert(Box<InsertStatement>),
    Update(Box<UpdateStatement>),
    Delete(Box<DeleteStatement>),
}

impl From<SelectStatement> for Statement {
    fn from(select: SelectStatement) -> Self {
        Statement::Select(Box::new(select))
    }
}

impl From<InsertStatement> for Statement {
    fn from(insert: InsertStatement) -> Self {
        Statement::Insert(Box::new(insert))
    }
}

impl From<UpdateStatement> for Statement {
    fn from(update: UpdateStatement) -> Self {
        Statement::Update(Box::new(update))
    }
}

impl From<DeleteStatement> for Statement {
    fn from(delete: DeleteStatement) -> Self {
        Statement::Delete(Box::new(delete))
    }
}

/// SELECT statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    /// SELECT DISTINCT or ALL
    #[serde(default)]
    pub distinct: bool,

    /// Projection list (columns to select)
    pub projection: Vec<SelectItem>,

    /// FROM clause; `None` for `SELECT 1` style statements
    #[serde(default)]
    pub from: Option<FromItem>,

    /// WHERE clause
    #[serde(default)]
    pub where_clause: Option<Expr>,

    /// GROUP BY clause
    #[serde(default)]
    pub group_by: Vec<Expr>,

    /// HAVING clause
    #[serde(default)]
    pub having: Option<Expr>,

    /// ORDER BY clause
    #[serde(default)]
    pub order_by: Vec<OrderBy>,

    /// LIMIT clause
    #[serde(default)]
    pub limit: Option<Limit>,
}

impl SelectStatement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn with_projection(mut self, projection: Vec<SelectItem>) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_from(mut self, from: FromItem) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_where(mut self, predicate: Expr) -> Self {
        self.where_clause = Some(predicate);
        self
    }

    pub fn with_group_by(mut self, group_by: Vec<Expr>) -> Self {
        self.group_by = group_by;
        self
    }

    pub fn with_having(mut self, having: Expr) -> Self {
        self.having = Some(having);
        self
    }

    pub fn with_order_by(mut self, order_by: Vec<OrderBy>) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Item in a SELECT projection list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectItem {
    /// Unnamed expression (e.g., `column` or `a + b`)
    UnnamedExpr(Expr),

    /// Expression with alias (e.g., `col AS name`)
    AliasedExpr { expr: Expr, alias: String },

    /// Qualified wildcard (e.g., `table.*`)
    QualifiedWildcard(WildcardRef),

    /// Unqualified wildcard (`*`)
    Wildcard,
}

impl SelectItem {
    /// The expression behind this item, if it is not a wildcard
    pub fn expr(&self) -> Option<&Expr> {
        match self {
            SelectItem::UnnamedExpr(expr) | SelectItem::AliasedExpr { expr, .. } => Some(expr),
            SelectItem::QualifiedWildcard(_) | SelectItem::Wildcard => None,
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            SelectItem::AliasedExpr { alias, .. } => Some(alias),
            _ => None,
        }
    }
}

/// The `t1.*` / `test.t1.*` projection item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WildcardRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Filled in by the binder
    #[serde(skip)]
    pub resolved: Option<ResolvedTable>,
}

impl WildcardRef {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: table.into(),
            span: None,
            resolved: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn qualified(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}.*", schema, self.table),
            None => format!("{}.*", self.table),
        }
    }
}

/// Table mention in FROM / INSERT INTO / UPDATE
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableName {
    /// Explicit schema (`test.t1`); the binder's default schema otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Filled in by the binder
    #[serde(skip)]
    pub resolved: Option<ResolvedTable>,
}

impl TableName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            alias: None,
            span: None,
            resolved: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Name other clauses use to refer to this table: the alias if present
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn qualified(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }
}

/// Node of the FROM join tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FromItem {
    /// Base table
    Table(TableName),

    /// `(SELECT ...) AS alias`
    Derived {
        subquery: Box<SelectStatement>,
        alias: String,
    },

    /// Two operands joined, with or without an ON condition
    Join(Box<Join>),
}

impl FromItem {
    pub fn table(table: TableName) -> Self {
        FromItem::Table(table)
    }

    pub fn derived(subquery: SelectStatement, alias: impl Into<String>) -> Self {
        FromItem::Derived {
            subquery: Box::new(subquery),
            alias: alias.into(),
        }
    }

    /// `left JOIN right [ON condition]`
    pub fn join(left: FromItem, right: FromItem, join_type: JoinType, on: Option<Expr>) -> Self {
        FromItem::Join(Box::new(Join {
            left,
            right,
            join_type,
            on,
        }))
    }

    /// Folds a comma list `a, b, c` into `Cross(Cross(a, b), c)`
    ///
    /// Returns `None` for an empty list.
    pub fn comma_list(items: impl IntoIterator<Item = FromItem>) -> Option<Self> {
        items
            .into_iter()
            .reduce(|left, right| FromItem::join(left, right, JoinType::Cross, None))
    }
}

/// JOIN node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub left: FromItem,
    pub right: FromItem,
    pub join_type: JoinType,
    /// ON condition; `None` for comma lists and condition-less joins
    #[serde(default)]
    pub on: Option<Expr>,
}

/// Join type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    /// Comma list or `CROSS JOIN`
    Cross,
    Inner,
    Left,
    Right,
}

/// ORDER BY item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub expr: Expr,
    #[serde(default)]
    pub direction: Option<SortDirection>,
}

impl OrderBy {
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            direction: None,
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            direction: Some(SortDirection::Desc),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// LIMIT count [OFFSET offset]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Limit {
    pub count: u64,
    #[serde(default)]
    pub offset: Option<u64>,
}

/// INSERT statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertStatement {
    pub table: TableName,
    /// Explicit column list; empty means "all columns in order"
    #[serde(default)]
    pub columns: Vec<ColumnRef>,
    pub source: InsertSource,
}

/// Rows to insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertSource {
    Values(Vec<Vec<Expr>>),
    Select(Box<SelectStatement>),
}

/// UPDATE statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatement {
    pub table: FromItem,
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub where_clause: Option<Expr>,
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    #[serde(default)]
    pub limit: Option<Limit>,
}

/// `column = value` in UPDATE ... SET
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub column: ColumnRef,
    pub value: Expr,
}

/// DELETE statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub from: FromItem,
    #[serde(default)]
    pub where_clause: Option<Expr>,
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    #[serde(default)]
    pub limit: Option<Limit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_default() {
        let select = SelectStatement::default();
        assert!(!select.distinct);
        assert!(select.projection.is_empty());
        assert!(select.from.is_none());
    }

    #[test]
    fn test_comma_list_is_left_deep() {
        let from = FromItem::comma_list(vec![
            FromItem::table(TableName::new("t1")),
            FromItem::table(TableName::new("t2")),
            FromItem::table(TableName::new("t3")),
        ])
        .unwrap();

        let FromItem::Join(outer) = from else {
            panic!("expected a join");
        };
        assert_eq!(outer.join_type, JoinType::Cross);
        assert!(matches!(&outer.right, FromItem::Table(t) if t.name == "t3"));
        assert!(matches!(&outer.left, FromItem::Join(inner) if inner.join_type == JoinType::Cross));
    }

    #[test]
    fn test_comma_list_empty() {
        assert!(FromItem::comma_list(Vec::new()).is_none());
    }

    #[test]
    fn test_table_display_name() {
        assert_eq!(TableName::new("t1").display_name(), "t1");
        assert_eq!(TableName::new("t1").with_alias("x").display_name(), "x");
        assert_eq!(TableName::new("t1").with_schema("test").qualified(), "test.t1");
    }
}
