// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Statement builders for tests
//!
//! Short constructors for the AST nodes tests build over and over, so a test
//! reads close to the SQL it stands for:
//!
//! ```rust
//! use sql_binder_test_utils::fixtures::*;
//!
//! // SELECT c1 AS a FROM t1 GROUP BY a
//! let stmt = select(vec![aliased(col("c1"), "a")])
//!     .with_from(table("t1"))
//!     .with_group_by(vec![col("a")]);
//! assert_eq!(stmt.projection.len(), 1);
//! ```

use sql_binder_ir::{
    BinaryOp, ColumnRef, Expr, FromItem, JoinType, Literal, SelectItem, SelectStatement,
    Statement, TableName, WildcardRef,
};

/// `SELECT <items>` without a FROM clause
pub fn select(items: Vec<SelectItem>) -> SelectStatement {
    SelectStatement::new().with_projection(items)
}

/// `<expr>` as a select item
pub fn item(expr: Expr) -> SelectItem {
    SelectItem::UnnamedExpr(expr)
}

/// `<expr> AS <alias>`
pub fn aliased(expr: Expr, alias: &str) -> SelectItem {
    SelectItem::AliasedExpr {
        expr,
        alias: alias.to_string(),
    }
}

/// `*`
pub fn star() -> SelectItem {
    SelectItem::Wildcard
}

/// `<table>.*`
pub fn table_star(table: &str) -> SelectItem {
    SelectItem::QualifiedWildcard(WildcardRef::new(table))
}

/// Bare column `<name>`
pub fn col(name: &str) -> Expr {
    Expr::column(name)
}

/// `<table>.<name>`
pub fn qcol(table: &str, name: &str) -> Expr {
    Expr::Column(ColumnRef::new(name).with_table(table))
}

/// `<schema>.<table>.<name>`
pub fn scol(schema: &str, table: &str, name: &str) -> Expr {
    Expr::Column(ColumnRef::new(name).with_table(table).with_schema(schema))
}

pub fn int(value: i64) -> Expr {
    Expr::Literal(Literal::Integer(value))
}

pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

/// `<left> = <right>`
pub fn eq(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::Eq, right)
}

/// `<left> + <right>`
pub fn plus(left: Expr, right: Expr) -> Expr {
    binary(left, BinaryOp::Add, right)
}

/// `<name>(<args>)`
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.to_string(),
        args,
        distinct: false,
    }
}

/// `COUNT(*)`
pub fn count_star() -> Expr {
    func("count", vec![Expr::Wildcard])
}

/// `EXISTS (<subquery>)`
pub fn exists(subquery: SelectStatement) -> Expr {
    Expr::Exists {
        subquery: Box::new(subquery),
        negated: false,
    }
}

/// `(<subquery>)` as a scalar
pub fn scalar(subquery: SelectStatement) -> Expr {
    Expr::Subquery(Box::new(subquery))
}

/// `<expr> IN (<subquery>)`
pub fn in_subquery(expr: Expr, subquery: SelectStatement) -> Expr {
    Expr::InSubquery {
        expr: Box::new(expr),
        subquery: Box::new(subquery),
        negated: false,
    }
}

/// Base table in FROM
pub fn table(name: &str) -> FromItem {
    FromItem::table(TableName::new(name))
}

/// `<name> AS <alias>` in FROM
pub fn table_as(name: &str, alias: &str) -> FromItem {
    FromItem::table(TableName::new(name).with_alias(alias))
}

/// Comma-separated FROM list, left-deep
///
/// # Panics
///
/// If `items` is empty.
pub fn from_list(items: Vec<FromItem>) -> FromItem {
    FromItem::comma_list(items).expect("FROM list needs at least one item")
}

/// `<left> JOIN <right> ON <on>`
pub fn join_on(left: FromItem, right: FromItem, on: Expr) -> FromItem {
    FromItem::join(left, right, JoinType::Inner, Some(on))
}

/// `(<subquery>) AS <alias>` in FROM
pub fn derived(subquery: SelectStatement, alias: &str) -> FromItem {
    FromItem::derived(subquery, alias)
}

/// Canned statements over the `t1`/`t2`/`t3 (c1, c2)` schema
pub struct BinderFixtures;

impl BinderFixtures {
    /// `SELECT t1.c1 FROM t1, t2 JOIN t3 ON <left> = <right>`
    pub fn comma_then_join(left: Expr, right: Expr) -> Statement {
        let from = from_list(vec![
            table("t1"),
            join_on(table("t2"), table("t3"), eq(left, right)),
        ]);
        select(vec![item(qcol("t1", "c1"))]).with_from(from).into()
    }

    /// `SELECT c1, c2 FROM t1 GROUP BY c1 HAVING <column> = 3`
    pub fn group_by_c1_having(column: &str) -> Statement {
        select(vec![item(col("c1")), item(col("c2"))])
            .with_from(table("t1"))
            .with_group_by(vec![col("c1")])
            .with_having(eq(col(column), int(3)))
            .into()
    }

    /// `SELECT c1 FROM t1 WHERE EXISTS (SELECT c2)`
    pub fn correlated_exists() -> Statement {
        select(vec![item(col("c1"))])
            .with_from(table("t1"))
            .with_where(exists(select(vec![item(col("c2"))])))
            .into()
    }
}
