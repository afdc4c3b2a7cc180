// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Identifier Resolver
//!
//! Resolves column references against a [`Scope`] chain and annotates them.
//!
//! ## Column lookup
//!
//! Scopes are searched innermost first; the first scope with any match
//! decides the outcome.
//!
//! - Qualified (`t.c`, `s.t.c`): the bindings named `t` (and of schema `s`)
//!   are looked up. None: try the enclosing scope. One: the column must exist
//!   in it (`UnknownColumn` otherwise). More than one: `AmbiguousColumn`.
//! - Unqualified (`c`): the bindings whose table has a column `c` are
//!   collected. None: try the enclosing scope. One: resolved. More than one:
//!   `AmbiguousColumn`.
//!
//! When no scope matches, the reference is `UnresolvedCorrelation` if the
//! lookup started inside a subquery (there was an enclosing scope to try).
//! At the top level a bare reference is `UnknownColumn`. A qualified one is
//! `UnknownColumn` when its qualifier names a table of the same FROM clause
//! that is out of reach (a comma sibling seen from a JOIN's ON condition),
//! and `UnknownTable` when no binding carries that name at all.
//!
//! ## Select list
//!
//! [`Binder::bind_select_list`] resolves the projection and builds the
//! statement's [`AliasNamespace`], expanding `*` and `t.*` into one field per
//! column.

use sql_binder_catalog::InfoSchema;
use sql_binder_ir::{
    ColumnRef, ColumnResolution, Expr, ResolvedColumn, SelectItem, WildcardRef,
};
use tracing::debug;

use crate::alias::{AliasNamespace, FieldTarget};
use crate::binder::Binder;
use crate::error::{Clause, SemanticError, SemanticResult};
use crate::scope::Scope;
use crate::symbol::TableBinding;

impl Binder<'_> {
    /// Resolve every column reference in `expr` against `scope`
    ///
    /// Subqueries are bound as nested statements whose enclosing scope is
    /// `scope`.
    pub(crate) fn resolve_expr(
        &mut self,
        expr: &mut Expr,
        scope: &Scope<'_>,
        clause: Clause,
    ) -> SemanticResult<()> {
        match expr {
            Expr::Column(column) => self.resolve_column(column, scope, clause),
            Expr::Literal(_) | Expr::Wildcard => Ok(()),
            Expr::BinaryOp { left, right, .. } => {
                self.resolve_expr(left, scope, clause)?;
                self.resolve_expr(right, scope, clause)
            }
            Expr::UnaryOp { expr, .. } | Expr::Cast { expr, .. } | Expr::Paren(expr) => {
                self.resolve_expr(expr, scope, clause)
            }
            Expr::Function { args, .. } | Expr::List(args) => {
                for arg in args {
                    self.resolve_expr(arg, scope, clause)?;
                }
                Ok(())
            }
            Expr::Case {
                operand,
                conditions,
                results,
                else_result,
            } => {
                if let Some(operand) = operand {
                    self.resolve_expr(operand, scope, clause)?;
                }
                for expr in conditions.iter_mut().chain(results.iter_mut()) {
                    self.resolve_expr(expr, scope, clause)?;
                }
                if let Some(else_result) = else_result {
                    self.resolve_expr(else_result, scope, clause)?;
                }
                Ok(())
            }
            Expr::Exists { subquery, .. } | Expr::Subquery(subquery) => {
                self.bind_select(subquery, Some(scope)).map(|_| ())
            }
            Expr::InSubquery { expr, subquery, .. } => {
                self.resolve_expr(expr, scope, clause)?;
                self.bind_select(subquery, Some(scope)).map(|_| ())
            }
        }
    }

    /// Resolve one column reference against the table scope and annotate it
    pub(crate) fn resolve_column(
        &self,
        column: &mut ColumnRef,
        scope: &Scope<'_>,
        clause: Clause,
    ) -> SemanticResult<()> {
        let resolved = self.lookup_column(column, scope, clause)?;
        column.resolved = Some(ColumnResolution::Column(resolved));
        Ok(())
    }

    /// Find the column `reference` names, walking enclosing scopes outward
    pub(crate) fn lookup_column(
        &self,
        reference: &ColumnRef,
        scope: &Scope<'_>,
        clause: Clause,
    ) -> SemanticResult<ResolvedColumn> {
        let info = self.info();

        for (depth, current) in scope.ancestors().enumerate() {
            let found = match &reference.table {
                Some(qualifier) => {
                    let named: Vec<&TableBinding> = current
                        .bindings()
                        .iter()
                        .filter(|b| b.matches(info, reference.schema.as_deref(), qualifier))
                        .collect();
                    match named.as_slice() {
                        [] => None,
                        [binding] => match binding.find_column(info, &reference.column) {
                            Some(ordinal) => Some(binding.resolve(ordinal, depth)),
                            None => {
                                return Err(SemanticError::UnknownColumn {
                                    name: reference.qualified(),
                                    clause,
                                    span: reference.span,
                                });
                            }
                        },
                        _ => return Err(ambiguous(reference, &named, clause)),
                    }
                }
                None => {
                    let mut matches = current.bindings().iter().filter_map(|b| {
                        b.find_column(info, &reference.column)
                            .map(|ordinal| (b, ordinal))
                    });
                    match (matches.next(), matches.next()) {
                        (None, _) => None,
                        (Some((binding, ordinal)), None) => Some(binding.resolve(ordinal, depth)),
                        (Some((first, _)), Some((second, _))) => {
                            let mut candidates = vec![first, second];
                            candidates.extend(matches.map(|(b, _)| b));
                            return Err(ambiguous(reference, &candidates, clause));
                        }
                    }
                }
            };

            if let Some(resolved) = found {
                if resolved.is_correlated() {
                    debug!(
                        column = %reference.qualified(),
                        qualifier = %resolved.qualifier,
                        depth,
                        "correlated reference"
                    );
                }
                return Ok(resolved);
            }
        }

        let span = reference.span;
        Err(match (scope.parent(), &reference.table) {
            (Some(_), _) => SemanticError::UnresolvedCorrelation {
                name: reference.qualified(),
                clause,
                span,
            },
            (None, Some(qualifier)) if names_hidden_binding(info, reference, qualifier, scope) => {
                SemanticError::UnknownColumn {
                    name: reference.qualified(),
                    clause,
                    span,
                }
            }
            // no scope has a binding by that name
            (None, Some(table)) => SemanticError::UnknownTable {
                name: match &reference.schema {
                    Some(schema) => format!("{schema}.{table}"),
                    None => table.clone(),
                },
                clause,
                span,
            },
            (None, None) => SemanticError::UnknownColumn {
                name: reference.qualified(),
                clause,
                span,
            },
        })
    }

    /// Resolve the projection and build the statement's output fields
    pub(crate) fn bind_select_list(
        &mut self,
        projection: &mut [SelectItem],
        scope: &Scope<'_>,
    ) -> SemanticResult<AliasNamespace> {
        let mut fields = AliasNamespace::new();

        for item in projection.iter_mut() {
            match item {
                SelectItem::UnnamedExpr(expr) => {
                    self.resolve_expr(expr, scope, Clause::FieldList)?;
                    let name = match &*expr {
                        Expr::Column(column) => Some(column.column.clone()),
                        _ => None,
                    };
                    fields.push(name, field_target(expr));
                }
                SelectItem::AliasedExpr { expr, alias } => {
                    self.resolve_expr(expr, scope, Clause::FieldList)?;
                    fields.push(Some(alias.clone()), field_target(expr));
                }
                SelectItem::Wildcard => {
                    if scope.is_empty() {
                        return Err(SemanticError::NoTablesUsed {
                            clause: Clause::FieldList,
                            span: None,
                        });
                    }
                    for binding in scope.bindings() {
                        expand_binding(&mut fields, binding);
                    }
                }
                SelectItem::QualifiedWildcard(wildcard) => {
                    let binding = self.lookup_wildcard(wildcard, scope)?;
                    wildcard.resolved = Some(binding.resolved_table());
                    expand_binding(&mut fields, binding);
                }
            }
        }

        Ok(fields)
    }

    /// `t.*` only sees the statement's own FROM, never enclosing scopes
    fn lookup_wildcard<'s>(
        &self,
        wildcard: &WildcardRef,
        scope: &Scope<'s>,
    ) -> SemanticResult<&'s TableBinding> {
        let info = self.info();
        let named: Vec<&'s TableBinding> = scope
            .bindings()
            .iter()
            .filter(|b| b.matches(info, wildcard.schema.as_deref(), &wildcard.table))
            .collect();

        match named.as_slice() {
            [binding] => Ok(*binding),
            [] => Err(SemanticError::UnknownTable {
                name: wildcard.table.clone(),
                clause: Clause::FieldList,
                span: wildcard.span,
            }),
            _ => Err(SemanticError::AmbiguousColumn {
                name: wildcard.qualified(),
                candidates: named.iter().map(|b| b.table.qualified_name()).collect(),
                clause: Clause::FieldList,
                span: wildcard.span,
            }),
        }
    }
}

/// `true` if `qualifier` names a binding declared in the FROM clause but not
/// visible from `scope`
fn names_hidden_binding(
    info: &InfoSchema,
    reference: &ColumnRef,
    qualifier: &str,
    scope: &Scope<'_>,
) -> bool {
    scope.ancestors().any(|current| {
        current
            .hidden()
            .iter()
            .any(|b| b.matches(info, reference.schema.as_deref(), qualifier))
    })
}

fn ambiguous(reference: &ColumnRef, candidates: &[&TableBinding], clause: Clause) -> SemanticError {
    SemanticError::AmbiguousColumn {
        name: reference.qualified(),
        candidates: candidates.iter().map(|b| b.name.clone()).collect(),
        clause,
        span: reference.span,
    }
}

/// Target of a resolved projection expression
fn field_target(expr: &Expr) -> FieldTarget {
    match expr {
        Expr::Column(column) => match column.resolved_column() {
            Some(resolved) => FieldTarget::Column(resolved.clone()),
            None => FieldTarget::Expr,
        },
        _ => FieldTarget::Expr,
    }
}

fn expand_binding(fields: &mut AliasNamespace, binding: &TableBinding) {
    for (ordinal, column) in binding.table.columns.iter().enumerate() {
        fields.push(
            Some(column.name.clone()),
            FieldTarget::Column(binding.resolve(ordinal, 0)),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sql_binder_catalog::{ColumnMetadata, DataType, InfoSchema, TableMetadata};
    use sql_binder_ir::{BindingId, ColumnRef, TableName};

    use super::*;
    use crate::config::BinderConfig;

    fn info() -> InfoSchema {
        let mut info = InfoSchema::new();
        for (name, columns) in [("t1", ["c1", "c2"]), ("t2", ["c1", "c3"])] {
            info.add_table(
                TableMetadata::new(name, "test").with_columns(
                    columns
                        .iter()
                        .map(|c| ColumnMetadata::new(*c, DataType::Integer))
                        .collect(),
                ),
            )
            .unwrap();
        }
        info
    }

    fn binding(info: &InfoSchema, id: u32, table: &str, alias: Option<&str>) -> TableBinding {
        let mut mention = TableName::new(table);
        if let Some(alias) = alias {
            mention = mention.with_alias(alias);
        }
        let metadata = Arc::clone(info.find_table(None, table, "test").unwrap());
        TableBinding::table(BindingId(id), &mention, metadata)
    }

    #[test]
    fn test_unqualified_unique_and_ambiguous() {
        let info = info();
        let config = BinderConfig::default();
        let binder = Binder::new(&info, &config);
        let bindings = vec![binding(&info, 0, "t1", None), binding(&info, 1, "t2", None)];
        let scope = Scope::new(&bindings, None);

        let c2 = binder
            .lookup_column(&ColumnRef::new("c2"), &scope, Clause::Where)
            .unwrap();
        assert_eq!(c2.binding, BindingId(0));

        let c3 = binder
            .lookup_column(&ColumnRef::new("c3"), &scope, Clause::Where)
            .unwrap();
        assert_eq!((c3.binding, c3.ordinal), (BindingId(1), 1));

        let err = binder
            .lookup_column(&ColumnRef::new("c1"), &scope, Clause::Where)
            .unwrap_err();
        assert_eq!(
            err,
            SemanticError::AmbiguousColumn {
                name: "c1".to_string(),
                candidates: vec!["t1".to_string(), "t2".to_string()],
                clause: Clause::Where,
                span: None,
            }
        );
    }

    #[test]
    fn test_qualified_through_alias() {
        let info = info();
        let config = BinderConfig::default();
        let binder = Binder::new(&info, &config);
        let bindings = vec![binding(&info, 0, "t1", Some("x"))];
        let scope = Scope::new(&bindings, None);

        let resolved = binder
            .lookup_column(&ColumnRef::new("c1").with_table("x"), &scope, Clause::Where)
            .unwrap();
        assert_eq!(resolved.qualifier, "x");

        // the table name is hidden by its alias
        let err = binder
            .lookup_column(&ColumnRef::new("c1").with_table("t1"), &scope, Clause::Where)
            .unwrap_err();
        assert_eq!(
            err,
            SemanticError::UnknownTable {
                name: "t1".to_string(),
                clause: Clause::Where,
                span: None,
            }
        );

        let err = binder
            .lookup_column(&ColumnRef::new("c9").with_table("x"), &scope, Clause::Where)
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown column 'x.c9' in 'where clause'");
    }

    #[test]
    fn test_correlation_depth_and_failure() {
        let info = info();
        let config = BinderConfig::default();
        let binder = Binder::new(&info, &config);
        let outer_bindings = vec![binding(&info, 0, "t2", None)];
        let outer = Scope::new(&outer_bindings, None);
        let inner_bindings = vec![binding(&info, 1, "t1", None)];
        let inner = Scope::new(&inner_bindings, Some(&outer));

        // local match shadows the outer one
        let c1 = binder
            .lookup_column(&ColumnRef::new("c1"), &inner, Clause::Where)
            .unwrap();
        assert_eq!((c1.binding, c1.depth), (BindingId(1), 0));

        let c3 = binder
            .lookup_column(&ColumnRef::new("c3"), &inner, Clause::Where)
            .unwrap();
        assert_eq!((c3.binding, c3.depth), (BindingId(0), 1));

        let err = binder
            .lookup_column(&ColumnRef::new("c9"), &inner, Clause::Where)
            .unwrap_err();
        assert!(matches!(err, SemanticError::UnresolvedCorrelation { .. }));

        // an unknown qualifier inside a subquery is still a correlation failure
        let err = binder
            .lookup_column(&ColumnRef::new("c1").with_table("t9"), &inner, Clause::Where)
            .unwrap_err();
        assert!(matches!(err, SemanticError::UnresolvedCorrelation { .. }));
    }
}
