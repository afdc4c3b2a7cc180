// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Assertions over bound statements

use sql_binder_ir::{ColumnRef, ColumnResolution, Node, ResolvedColumn, Statement, Visitor};

/// Collects every reference node that carries no annotation
#[derive(Default)]
struct UnresolvedCollector {
    missing: Vec<String>,
}

impl<'a> Visitor<'a> for UnresolvedCollector {
    fn enter(&mut self, node: Node<'a>) -> bool {
        match node {
            Node::Column(column) if column.resolved.is_none() => {
                self.missing.push(column.qualified());
            }
            Node::Table(table) if table.resolved.is_none() => {
                self.missing.push(table.qualified());
            }
            Node::Wildcard(wildcard) if wildcard.resolved.is_none() => {
                self.missing.push(wildcard.qualified());
            }
            _ => {}
        }
        true
    }
}

/// Collects column references in visit order
#[derive(Default)]
struct ColumnCollector<'a> {
    columns: Vec<&'a ColumnRef>,
}

impl<'a> Visitor<'a> for ColumnCollector<'a> {
    fn enter(&mut self, node: Node<'a>) -> bool {
        if let Node::Column(column) = node {
            self.columns.push(column);
        }
        true
    }
}

/// Display names of the references in `stmt` without an annotation
pub fn unresolved_references(stmt: &Statement) -> Vec<String> {
    let mut collector = UnresolvedCollector::default();
    stmt.accept(&mut collector);
    collector.missing
}

/// Every column reference in `stmt`, in visit order
pub fn column_references(stmt: &Statement) -> Vec<&ColumnRef> {
    let mut collector = ColumnCollector::default();
    stmt.accept(&mut collector);
    collector.columns
}

/// The `index`-th column reference in visit order that displays as `name`
///
/// # Panics
///
/// If there is no such reference.
pub fn find_column<'a>(stmt: &'a Statement, name: &str, index: usize) -> &'a ColumnRef {
    column_references(stmt)
        .into_iter()
        .filter(|c| c.qualified() == name)
        .nth(index)
        .unwrap_or_else(|| panic!("no column reference '{name}' #{index}"))
}

/// Assert that every column, table and `t.*` node of `stmt` is annotated
pub fn assert_fully_resolved(stmt: &Statement) {
    let missing = unresolved_references(stmt);
    assert!(
        missing.is_empty(),
        "unresolved references after bind: {missing:?}"
    );
}

/// Assert that `column` resolved to `qualifier.name` at `depth`
pub fn assert_resolves_to(column: &ColumnRef, qualifier: &str, name: &str, depth: usize) {
    let resolved: &ResolvedColumn = column
        .resolved_column()
        .unwrap_or_else(|| panic!("'{}' has no resolved column", column.qualified()));
    assert_eq!(
        (resolved.qualifier.as_str(), resolved.column_name(), resolved.depth),
        (qualifier, name, depth),
        "'{}' resolved elsewhere",
        column.qualified()
    );
}

/// Assert that `column` resolved through the SELECT field at `position`
pub fn assert_select_field(column: &ColumnRef, position: usize) {
    match &column.resolved {
        Some(ColumnResolution::SelectField { position: actual, .. }) => {
            assert_eq!(*actual, position, "'{}' bound to another field", column.qualified());
        }
        other => panic!(
            "'{}' expected to resolve through field {position}, got {other:?}",
            column.qualified()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    #[test]
    fn test_unbound_statement_reports_every_reference() {
        let stmt: Statement = select(vec![item(col("c1")), table_star("t2")])
            .with_from(table("t1"))
            .into();

        assert_eq!(unresolved_references(&stmt), vec!["c1", "t2.*", "t1"]);
    }

    #[test]
    fn test_find_column_by_occurrence() {
        let stmt: Statement = select(vec![item(col("c1"))])
            .with_from(table("t1"))
            .with_where(eq(col("c1"), qcol("t1", "c1")))
            .into();

        assert_eq!(column_references(&stmt).len(), 3);
        let second = find_column(&stmt, "c1", 1);
        assert!(second.is_bare());
        assert_eq!(find_column(&stmt, "t1.c1", 0).table.as_deref(), Some("t1"));
    }
}
