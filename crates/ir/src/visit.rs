// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Tree traversal
//!
//! Two walkers over the statement tree:
//!
//! - [`Visitor`]: read-only, enter/leave double dispatch over [`Node`].
//!   `enter` runs pre-order and may prune a subtree by returning `false`;
//!   `leave` runs post-order.
//! - [`ReferenceMut`]: mutable walk over every node that carries a resolution
//!   annotation (column references, table mentions, `t.*`), used to reset
//!   annotations before a bind.
//!
//! Children are visited in source order: projection, FROM, WHERE, GROUP BY,
//! HAVING, ORDER BY for SELECT.

use crate::expr::{ColumnRef, Expr};
use crate::query::{
    FromItem, InsertSource, OrderBy, SelectItem, SelectStatement, Statement, TableName,
    WildcardRef,
};

/// A borrowed node handed to a [`Visitor`]
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Statement(&'a Statement),
    Select(&'a SelectStatement),
    FromItem(&'a FromItem),
    Table(&'a TableName),
    SelectItem(&'a SelectItem),
    Wildcard(&'a WildcardRef),
    Expr(&'a Expr),
    Column(&'a ColumnRef),
}

/// Read-only tree visitor
pub trait Visitor<'a> {
    /// Called before the node's children; return `false` to skip them
    fn enter(&mut self, _node: Node<'a>) -> bool {
        true
    }

    /// Called after the node's children (also when they were skipped)
    fn leave(&mut self, _node: Node<'a>) {}
}

impl Statement {
    pub fn accept<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) {
        let node = Node::Statement(self);
        if visitor.enter(node) {
            match self {
                Statement::Select(select) => select.accept(visitor),
                Statement::Insert(insert) => {
                    visit_table(&insert.table, visitor);
                    for column in &insert.columns {
                        visit_column(column, visitor);
                    }
                    match &insert.source {
                        InsertSource::Values(rows) => {
                            for expr in rows.iter().flatten() {
                                expr.accept(visitor);
                            }
                        }
                        InsertSource::Select(select) => select.accept(visitor),
                    }
                }
                Statement::Update(update) => {
                    update.table.accept(visitor);
                    for assignment in &update.assignments {
                        visit_column(&assignment.column, visitor);
                        assignment.value.accept(visitor);
                    }
                    if let Some(predicate) = &update.where_clause {
                        predicate.accept(visitor);
                    }
                    visit_order_by(&update.order_by, visitor);
                }
                Statement::Delete(delete) => {
                    delete.from.accept(visitor);
                    if let Some(predicate) = &delete.where_clause {
                        predicate.accept(visitor);
                    }
                    visit_order_by(&delete.order_by, visitor);
                }
            }
        }
        visitor.leave(node);
    }
}

impl SelectStatement {
    pub fn accept<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) {
        let node = Node::Select(self);
        if visitor.enter(node) {
            for item in &self.projection {
                item.accept(visitor);
            }
            if let Some(from) = &self.from {
                from.accept(visitor);
            }
            if let Some(predicate) = &self.where_clause {
                predicate.accept(visitor);
            }
            for expr in &self.group_by {
                expr.accept(visitor);
            }
            if let Some(having) = &self.having {
                having.accept(visitor);
            }
            visit_order_by(&self.order_by, visitor);
        }
        visitor.leave(node);
    }
}

impl SelectItem {
    pub fn accept<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) {
        let node = Node::SelectItem(self);
        if visitor.enter(node) {
            match self {
                SelectItem::UnnamedExpr(expr) | SelectItem::AliasedExpr { expr, .. } => {
                    expr.accept(visitor)
                }
                SelectItem::QualifiedWildcard(wildcard) => {
                    let node = Node::Wildcard(wildcard);
                    visitor.enter(node);
                    visitor.leave(node);
                }
                SelectItem::Wildcard => {}
            }
        }
        visitor.leave(node);
    }
}

impl FromItem {
    pub fn accept<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) {
        let node = Node::FromItem(self);
        if visitor.enter(node) {
            match self {
                FromItem::Table(table) => visit_table(table, visitor),
                FromItem::Derived { subquery, .. } => subquery.accept(visitor),
                FromItem::Join(join) => {
                    join.left.accept(visitor);
                    join.right.accept(visitor);
                    if let Some(on) = &join.on {
                        on.accept(visitor);
                    }
                }
            }
        }
        visitor.leave(node);
    }
}

impl Expr {
    pub fn accept<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) {
        let node = Node::Expr(self);
        if visitor.enter(node) {
            match self {
                Expr::Column(column) => visit_column(column, visitor),
                Expr::Literal(_) | Expr::Wildcard => {}
                Expr::BinaryOp { left, right, .. } => {
                    left.accept(visitor);
                    right.accept(visitor);
                }
                Expr::UnaryOp { expr, .. } | Expr::Cast { expr, .. } | Expr::Paren(expr) => {
                    expr.accept(visitor)
                }
                Expr::Function { args, .. } | Expr::List(args) => {
                    for arg in args {
                        arg.accept(visitor);
                    }
                }
                Expr::Case {
                    operand,
                    conditions,
                    results,
                    else_result,
                } => {
                    if let Some(operand) = operand {
                        operand.accept(visitor);
                    }
                    for expr in conditions.iter().chain(results) {
                        expr.accept(visitor);
                    }
                    if let Some(else_result) = else_result {
                        else_result.accept(visitor);
                    }
                }
                Expr::Exists { subquery, .. } | Expr::Subquery(subquery) => {
                    subquery.accept(visitor)
                }
                Expr::InSubquery { expr, subquery, .. } => {
                    expr.accept(visitor);
                    subquery.accept(visitor);
                }
            }
        }
        visitor.leave(node);
    }
}

fn visit_table<'a, V: Visitor<'a>>(table: &'a TableName, visitor: &mut V) {
    let node = Node::Table(table);
    visitor.enter(node);
    visitor.leave(node);
}

fn visit_column<'a, V: Visitor<'a>>(column: &'a ColumnRef, visitor: &mut V) {
    let node = Node::Column(column);
    visitor.enter(node);
    visitor.leave(node);
}

fn visit_order_by<'a, V: Visitor<'a>>(order_by: &'a [OrderBy], visitor: &mut V) {
    for item in order_by {
        item.expr.accept(visitor);
    }
}

/// A node carrying a resolution annotation, borrowed mutably
#[derive(Debug)]
pub enum ReferenceMut<'a> {
    Column(&'a mut ColumnRef),
    Table(&'a mut TableName),
    Wildcard(&'a mut WildcardRef),
}

impl ReferenceMut<'_> {
    pub fn clear(self) {
        match self {
            ReferenceMut::Column(column) => column.resolved = None,
            ReferenceMut::Table(table) => table.resolved = None,
            ReferenceMut::Wildcard(wildcard) => wildcard.resolved = None,
        }
    }
}

impl Statement {
    /// Calls `f` on every annotated node, subqueries included
    pub fn for_each_reference_mut(&mut self, f: &mut dyn FnMut(ReferenceMut<'_>)) {
        match self {
            Statement::Select(select) => select.for_each_reference_mut(f),
            Statement::Insert(insert) => {
                f(ReferenceMut::Table(&mut insert.table));
                for column in &mut insert.columns {
                    f(ReferenceMut::Column(column));
                }
                match &mut insert.source {
                    InsertSource::Values(rows) => {
                        for expr in rows.iter_mut().flatten() {
                            expr.for_each_reference_mut(f);
                        }
                    }
                    InsertSource::Select(select) => select.for_each_reference_mut(f),
                }
            }
            Statement::Update(update) => {
                update.table.for_each_reference_mut(f);
                for assignment in &mut update.assignments {
                    f(ReferenceMut::Column(&mut assignment.column));
                    assignment.value.for_each_reference_mut(f);
                }
                if let Some(predicate) = &mut update.where_clause {
                    predicate.for_each_reference_mut(f);
                }
                for item in &mut update.order_by {
                    item.expr.for_each_reference_mut(f);
                }
            }
            Statement::Delete(delete) => {
                delete.from.for_each_reference_mut(f);
                if let Some(predicate) = &mut delete.where_clause {
                    predicate.for_each_reference_mut(f);
                }
                for item in &mut delete.order_by {
                    item.expr.for_each_reference_mut(f);
                }
            }
        }
    }

    /// Drops every annotation left by a previous bind
    pub fn clear_resolution(&mut self) {
        self.for_each_reference_mut(&mut |reference| reference.clear());
    }
}

impl SelectStatement {
    pub fn for_each_reference_mut(&mut self, f: &mut dyn FnMut(ReferenceMut<'_>)) {
        for item in &mut self.projection {
            match item {
                SelectItem::UnnamedExpr(expr) | SelectItem::AliasedExpr { expr, .. } => {
                    expr.for_each_reference_mut(f)
                }
                SelectItem::QualifiedWildcard(wildcard) => f(ReferenceMut::Wildcard(wildcard)),
                SelectItem::Wildcard => {}
            }
        }
        if let Some(from) = &mut self.from {
            from.for_each_reference_mut(f);
        }
        if let Some(predicate) = &mut self.where_clause {
            predicate.for_each_reference_mut(f);
        }
        for expr in &mut self.group_by {
            expr.for_each_reference_mut(f);
        }
        if let Some(having) = &mut self.having {
            having.for_each_reference_mut(f);
        }
        for item in &mut self.order_by {
            item.expr.for_each_reference_mut(f);
        }
    }
}

impl FromItem {
    pub fn for_each_reference_mut(&mut self, f: &mut dyn FnMut(ReferenceMut<'_>)) {
        match self {
            FromItem::Table(table) => f(ReferenceMut::Table(table)),
            FromItem::Derived { subquery, .. } => subquery.for_each_reference_mut(f),
            FromItem::Join(join) => {
                join.left.for_each_reference_mut(f);
                join.right.for_each_reference_mut(f);
                if let Some(on) = &mut join.on {
                    on.for_each_reference_mut(f);
                }
            }
        }
    }
}

impl Expr {
    pub fn for_each_reference_mut(&mut self, f: &mut dyn FnMut(ReferenceMut<'_>)) {
        match self {
            Expr::Column(column) => f(ReferenceMut::Column(column)),
            Expr::Literal(_) | Expr::Wildcard => {}
            Expr::BinaryOp { left, right, .. } => {
                left.for_each_reference_mut(f);
                right.for_each_reference_mut(f);
            }
            Expr::UnaryOp { expr, .. } | Expr::Cast { expr, .. } | Expr::Paren(expr) => {
                expr.for_each_reference_mut(f)
            }
            Expr::Function { args, .. } | Expr::List(args) => {
                for arg in args {
                    arg.for_each_reference_mut(f);
                }
            }
            Expr::Case {
                operand,
                conditions,
                results,
                else_result,
            } => {
                if let Some(operand) = operand {
                    operand.for_each_reference_mut(f);
                }
                for expr in conditions.iter_mut().chain(results.iter_mut()) {
                    expr.for_each_reference_mut(f);
                }
                if let Some(else_result) = else_result {
                    else_result.for_each_reference_mut(f);
                }
            }
            Expr::Exists { subquery, .. } | Expr::Subquery(subquery) => {
                subquery.for_each_reference_mut(f)
            }
            Expr::InSubquery { expr, subquery, .. } => {
                expr.for_each_reference_mut(f);
                subquery.for_each_reference_mut(f);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{BinaryOp, Literal};

    #[derive(Default)]
    struct ColumnCollector {
        columns: Vec<String>,
        selects: usize,
    }

    impl<'a> Visitor<'a> for ColumnCollector {
        fn enter(&mut self, node: Node<'a>) -> bool {
            match node {
                Node::Column(column) => self.columns.push(column.qualified()),
                Node::Select(_) => self.selects += 1,
                _ => {}
            }
            true
        }
    }

    fn sample() -> Statement {
        // SELECT c1 FROM t1 WHERE EXISTS (SELECT c2) ORDER BY t1.c1
        SelectStatement::new()
            .with_projection(vec![SelectItem::UnnamedExpr(Expr::column("c1"))])
            .with_from(FromItem::table(TableName::new("t1")))
            .with_where(Expr::Exists {
                subquery: Box::new(
                    SelectStatement::new()
                        .with_projection(vec![SelectItem::UnnamedExpr(Expr::column("c2"))]),
                ),
                negated: false,
            })
            .with_order_by(vec![OrderBy::new(Expr::Column(
                ColumnRef::new("c1").with_table("t1"),
            ))])
            .into()
    }

    #[test]
    fn test_visitor_order() {
        let stmt = sample();
        let mut collector = ColumnCollector::default();
        stmt.accept(&mut collector);

        assert_eq!(collector.columns, vec!["c1", "c2", "t1.c1"]);
        assert_eq!(collector.selects, 2);
    }

    #[test]
    fn test_visitor_can_prune_subqueries() {
        struct SkipSubqueries(Vec<String>, usize);
        impl<'a> Visitor<'a> for SkipSubqueries {
            fn enter(&mut self, node: Node<'a>) -> bool {
                match node {
                    Node::Select(_) => {
                        self.1 += 1;
                        self.1 == 1
                    }
                    Node::Column(column) => {
                        self.0.push(column.column.clone());
                        true
                    }
                    _ => true,
                }
            }
        }

        let stmt = sample();
        let mut visitor = SkipSubqueries(Vec::new(), 0);
        stmt.accept(&mut visitor);
        assert_eq!(visitor.0, vec!["c1", "c1"]);
    }

    #[test]
    fn test_for_each_reference_counts_all_annotated_nodes() {
        let mut stmt = sample();
        let mut count = 0;
        stmt.for_each_reference_mut(&mut |_| count += 1);
        // c1, t1, c2, t1.c1
        assert_eq!(count, 4);
    }

    #[test]
    fn test_case_expression_children_visited() {
        let expr = Expr::Case {
            operand: None,
            conditions: vec![Expr::BinaryOp {
                left: Box::new(Expr::column("a")),
                op: BinaryOp::Gt,
                right: Box::new(Expr::Literal(Literal::Integer(0))),
            }],
            results: vec![Expr::column("b")],
            else_result: Some(Box::new(Expr::column("c"))),
        };
        let mut collector = ColumnCollector::default();
        expr.accept(&mut collector);
        assert_eq!(collector.columns, vec!["a", "b", "c"]);
    }
}
