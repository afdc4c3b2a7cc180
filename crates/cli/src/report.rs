// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Printable summary of one bind
//!
//! Annotations are not part of the statement's serialized form, so the CLI
//! reports them through this flat structure instead.

use std::fmt::Write as _;

use serde::Serialize;
use sql_binder_ir::{
    ColumnResolution, Node, ResolvedColumn, ResolvedTable, Span, Statement, Visitor,
};
use sql_binder_semantic::{Clause, SemanticError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Column,
    Table,
    Wildcard,
}

/// One reference node and what it was bound to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceReport {
    pub kind: ReferenceKind,
    /// The reference as written
    pub reference: String,
    /// `schema.table[.column]` it resolved to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<u32>,
    /// 0-based output field for references resolved through the SELECT list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_field: Option<usize>,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub kind: &'static str,
    pub clause: Clause,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl From<&SemanticError> for ErrorReport {
    fn from(err: &SemanticError) -> Self {
        Self {
            kind: err.kind(),
            clause: err.clause(),
            message: err.to_string(),
            span: err.span(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindReport {
    pub accepted: bool,
    pub references: Vec<ReferenceReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

impl BindReport {
    pub fn new(stmt: &Statement, outcome: Result<(), &SemanticError>) -> Self {
        let mut collector = ReferenceCollector::default();
        stmt.accept(&mut collector);
        Self {
            accepted: outcome.is_ok(),
            references: collector.references,
            error: outcome.err().map(ErrorReport::from),
        }
    }

    /// One line per reference, or the rejection
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        if let Some(error) = &self.error {
            let _ = writeln!(out, "rejected ({}): {}", error.kind, error.message);
            return out;
        }

        for reference in &self.references {
            let kind = match reference.kind {
                ReferenceKind::Column => "column",
                ReferenceKind::Table => "table",
                ReferenceKind::Wildcard => "wildcard",
            };
            let _ = write!(out, "{kind:<8} {:<16} ->", reference.reference);
            if let Some(position) = reference.select_field {
                let _ = write!(out, " select field {}", position + 1);
            }
            if let Some(target) = &reference.target {
                let _ = write!(out, " {target}");
            }
            if let Some(binding) = reference.binding {
                let _ = write!(out, " #{binding}");
            }
            if reference.depth > 0 {
                let _ = write!(out, " (outer {})", reference.depth);
            }
            out.push('\n');
        }
        out
    }
}

#[derive(Default)]
struct ReferenceCollector {
    references: Vec<ReferenceReport>,
}

impl ReferenceCollector {
    fn push_table(
        &mut self,
        kind: ReferenceKind,
        reference: String,
        resolved: Option<&ResolvedTable>,
        span: Option<Span>,
    ) {
        self.references.push(ReferenceReport {
            kind,
            reference,
            target: resolved.map(|r| r.table.qualified_name()),
            binding: resolved.map(|r| r.binding.0),
            select_field: None,
            depth: 0,
            span,
        });
    }
}

fn column_target(column: &ResolvedColumn) -> String {
    format!("{}.{}", column.table.qualified_name(), column.column_name())
}

impl<'a> Visitor<'a> for ReferenceCollector {
    fn enter(&mut self, node: Node<'a>) -> bool {
        match node {
            Node::Column(column) => {
                let (select_field, resolved) = match &column.resolved {
                    Some(ColumnResolution::Column(resolved)) => (None, Some(resolved)),
                    Some(ColumnResolution::SelectField { position, column }) => {
                        (Some(*position), column.as_ref())
                    }
                    None => (None, None),
                };
                self.references.push(ReferenceReport {
                    kind: ReferenceKind::Column,
                    reference: column.qualified(),
                    target: resolved.map(column_target),
                    binding: resolved.map(|r| r.binding.0),
                    select_field,
                    depth: resolved.map_or(0, |r| r.depth),
                    span: column.span,
                });
            }
            Node::Table(table) => self.push_table(
                ReferenceKind::Table,
                table.qualified(),
                table.resolved.as_ref(),
                table.span,
            ),
            Node::Wildcard(wildcard) => self.push_table(
                ReferenceKind::Wildcard,
                wildcard.qualified(),
                wildcard.resolved.as_ref(),
                wildcard.span,
            ),
            _ => {}
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sql_binder_catalog::{ColumnMetadata, DataType, InfoSchema, TableMetadata};
    use sql_binder_ir::{
        ColumnRef, Expr, FromItem, OrderBy, SelectItem, SelectStatement, TableName,
    };
    use sql_binder_semantic::{BinderConfig, bind};

    use super::*;

    fn info() -> InfoSchema {
        let mut info = InfoSchema::new();
        info.add_table(TableMetadata::new("t1", "test").with_columns(vec![
            ColumnMetadata::new("c1", DataType::Integer),
            ColumnMetadata::new("c2", DataType::Integer),
        ]))
        .unwrap();
        info
    }

    fn statement(column: &str) -> Statement {
        SelectStatement::new()
            .with_projection(vec![SelectItem::AliasedExpr {
                expr: Expr::Column(ColumnRef::new(column)),
                alias: "a".to_string(),
            }])
            .with_from(FromItem::table(TableName::new("t1")))
            .with_order_by(vec![OrderBy::new(Expr::column("a"))])
            .into()
    }

    #[test]
    fn test_report_of_accepted_statement() {
        let mut stmt = statement("c2");
        let outcome = bind(&mut stmt, &info(), &BinderConfig::default());
        let report = BindReport::new(&stmt, outcome.as_ref().map(|_| ()));

        assert!(report.accepted);
        let targets: Vec<_> = report
            .references
            .iter()
            .map(|r| (r.reference.as_str(), r.target.as_deref(), r.select_field))
            .collect();
        assert_eq!(
            targets,
            vec![
                ("c2", Some("test.t1.c2"), None),
                ("t1", Some("test.t1"), None),
                ("a", Some("test.t1.c2"), Some(0)),
            ]
        );

        let text = report.render_text();
        assert!(text.contains("-> select field 1 test.t1.c2 #0"));
    }

    #[test]
    fn test_report_of_rejected_statement() {
        let mut stmt = statement("c9");
        let outcome = bind(&mut stmt, &info(), &BinderConfig::default());
        let report = BindReport::new(&stmt, outcome.as_ref().map(|_| ()));

        assert!(!report.accepted);
        let error = report.error.as_ref().unwrap();
        assert_eq!(error.kind, "UnknownColumn");
        assert_eq!(error.clause, Clause::FieldList);
        assert_eq!(
            report.render_text(),
            "rejected (UnknownColumn): Unknown column 'c9' in 'field list'\n"
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["error"]["clause"], "FieldList");
    }
}
