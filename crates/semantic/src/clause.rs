// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Clause Validator
//!
//! Resolution policy for GROUP BY, HAVING and ORDER BY.
//!
//! - A bare identifier is looked up in the [`AliasNamespace`] first and
//!   falls back to the table scope when no output field carries its name.
//!   An output field that names one column while a local table exposes a
//!   different column under the same name is an ambiguous alias; fields
//!   over other expressions take precedence without that check.
//! - An integer literal is a 1-based position into the output fields.
//! - Any other expression (`c1 + 1`, `t1.c1`, `count(*)`) resolves against
//!   the table scope only.
//!
//! HAVING additionally requires every column outside an aggregate call to be
//! grouped: grouped by identity, reached through a grouped output position,
//! correlated to an enclosing statement, or an alias of a non-column
//! expression. Without a GROUP BY the whole result is one group and the check
//! does not apply.

use sql_binder_ir::{ColumnRef, ColumnResolution, Expr, Literal, OrderBy, ResolvedColumn};
use tracing::debug;

use crate::alias::{AliasNamespace, OutputField};
use crate::binder::Binder;
use crate::error::{Clause, SemanticError, SemanticResult};
use crate::scope::Scope;

/// What a statement groups by: column identities and output positions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupingSet {
    columns: Vec<ResolvedColumn>,
    positions: Vec<usize>,
}

impl GroupingSet {
    fn add_column(&mut self, column: &ResolvedColumn) {
        if !self.has_column(column) {
            self.columns.push(column.clone());
        }
    }

    fn add_position(&mut self, position: usize, fields: &AliasNamespace) {
        self.positions.push(position);
        if let Some(column) = fields.get(position).and_then(OutputField::column) {
            self.add_column(column);
        }
    }

    fn add_resolution(&mut self, resolution: &ColumnResolution, fields: &AliasNamespace) {
        match resolution {
            ColumnResolution::Column(column) => self.add_column(column),
            ColumnResolution::SelectField { position, .. } => self.add_position(*position, fields),
        }
    }

    fn has_column(&self, column: &ResolvedColumn) -> bool {
        self.columns.iter().any(|c| c.same_column(column))
    }

    /// `true` if a HAVING reference resolved to `resolution` is legal
    pub fn covers(&self, resolution: &ColumnResolution) -> bool {
        match resolution {
            ColumnResolution::Column(column) => column.is_correlated() || self.has_column(column),
            ColumnResolution::SelectField { position, column } => {
                self.positions.contains(position)
                    || column
                        .as_ref()
                        .is_none_or(|c| c.is_correlated() || self.has_column(c))
            }
        }
    }

    pub fn columns(&self) -> &[ResolvedColumn] {
        &self.columns
    }
}

impl Binder<'_> {
    /// Resolve GROUP BY; `None` when the statement has no GROUP BY
    pub(crate) fn bind_group_by(
        &mut self,
        group_by: &mut [Expr],
        fields: &AliasNamespace,
        scope: &Scope<'_>,
    ) -> SemanticResult<Option<GroupingSet>> {
        if group_by.is_empty() {
            return Ok(None);
        }

        let mut grouping = GroupingSet::default();
        for expr in group_by.iter_mut() {
            if let Some(position) = self.resolve_by_item(expr, Some(fields), scope, Clause::GroupBy)? {
                grouping.add_position(position, fields);
            } else if let Expr::Column(ColumnRef {
                resolved: Some(resolution),
                ..
            }) = expr
            {
                grouping.add_resolution(resolution, fields);
            }
        }

        debug!(
            columns = grouping.columns.len(),
            positions = grouping.positions.len(),
            "grouping set"
        );
        Ok(Some(grouping))
    }

    /// Resolve HAVING and check it only uses grouped columns outside aggregates
    pub(crate) fn bind_having(
        &mut self,
        having: &mut Expr,
        fields: &AliasNamespace,
        grouping: Option<&GroupingSet>,
        scope: &Scope<'_>,
    ) -> SemanticResult<()> {
        let clause = Clause::Having;
        match having {
            Expr::Column(column) => {
                if column.is_bare() {
                    self.resolve_bare_column(column, fields, scope, clause)?;
                } else {
                    self.resolve_column(column, scope, clause)?;
                }

                let covered = match (grouping, &column.resolved) {
                    (Some(grouping), Some(resolution)) => grouping.covers(resolution),
                    _ => true,
                };
                if !covered {
                    return Err(SemanticError::InvalidHaving {
                        name: column.qualified(),
                        clause,
                        span: column.span,
                    });
                }
                Ok(())
            }
            Expr::Function { name, args, .. } if self.info().is_aggregate(name) => {
                for arg in args {
                    self.resolve_expr(arg, scope, clause)?;
                }
                Ok(())
            }
            Expr::Function { args, .. } | Expr::List(args) => {
                for arg in args {
                    self.bind_having(arg, fields, grouping, scope)?;
                }
                Ok(())
            }
            Expr::BinaryOp { left, right, .. } => {
                self.bind_having(left, fields, grouping, scope)?;
                self.bind_having(right, fields, grouping, scope)
            }
            Expr::UnaryOp { expr, .. } | Expr::Cast { expr, .. } | Expr::Paren(expr) => {
                self.bind_having(expr, fields, grouping, scope)
            }
            Expr::Case {
                operand,
                conditions,
                results,
                else_result,
            } => {
                if let Some(operand) = operand {
                    self.bind_having(operand, fields, grouping, scope)?;
                }
                for expr in conditions.iter_mut().chain(results.iter_mut()) {
                    self.bind_having(expr, fields, grouping, scope)?;
                }
                if let Some(else_result) = else_result {
                    self.bind_having(else_result, fields, grouping, scope)?;
                }
                Ok(())
            }
            Expr::InSubquery { expr, subquery, .. } => {
                self.bind_having(expr, fields, grouping, scope)?;
                self.bind_select(subquery, Some(scope)).map(|_| ())
            }
            Expr::Exists { .. } | Expr::Subquery(_) | Expr::Literal(_) | Expr::Wildcard => {
                self.resolve_expr(having, scope, clause)
            }
        }
    }

    /// Resolve ORDER BY; `fields` is `None` for statements without a SELECT
    /// list (UPDATE, DELETE)
    pub(crate) fn bind_order_by(
        &mut self,
        order_by: &mut [OrderBy],
        fields: Option<&AliasNamespace>,
        scope: &Scope<'_>,
    ) -> SemanticResult<()> {
        for item in order_by.iter_mut() {
            self.resolve_by_item(&mut item.expr, fields, scope, Clause::OrderBy)?;
        }
        Ok(())
    }

    /// Resolve one GROUP BY / ORDER BY item
    ///
    /// Returns the 0-based output position for positional items.
    fn resolve_by_item(
        &mut self,
        expr: &mut Expr,
        fields: Option<&AliasNamespace>,
        scope: &Scope<'_>,
        clause: Clause,
    ) -> SemanticResult<Option<usize>> {
        if let Some(fields) = fields {
            match expr {
                Expr::Literal(Literal::Integer(n)) => {
                    let position = usize::try_from(*n)
                        .ok()
                        .filter(|p| (1..=fields.len()).contains(p))
                        .ok_or(SemanticError::InvalidPosition {
                            position: *n,
                            clause,
                            span: None,
                        })?;
                    return Ok(Some(position - 1));
                }
                Expr::Column(column) if column.is_bare() => {
                    self.resolve_bare_column(column, fields, scope, clause)?;
                    return Ok(None);
                }
                _ => {}
            }
        }

        self.resolve_expr(expr, scope, clause)?;
        Ok(None)
    }

    /// Output field first, then the table scope
    ///
    /// A field naming a column is ambiguous with a different local column of
    /// the same name (`SELECT c2 AS c1 FROM t1 GROUP BY c1`).
    fn resolve_bare_column(
        &self,
        column: &mut ColumnRef,
        fields: &AliasNamespace,
        scope: &Scope<'_>,
        clause: Clause,
    ) -> SemanticResult<()> {
        let resolution = match fields.lookup(self.info(), column, clause)? {
            Some(position) => {
                let target = fields.get(position).and_then(OutputField::column).cloned();
                if let Some(target) = &target {
                    let local = Scope::new(scope.bindings(), None);
                    let shadowed = self.lookup_column(column, &local, clause).ok();
                    if shadowed.is_some_and(|shadowed| !shadowed.same_column(target)) {
                        return Err(SemanticError::AmbiguousAlias {
                            name: column.column.clone(),
                            clause,
                            span: column.span,
                        });
                    }
                }
                debug!(column = %column.column, position, %clause, "resolved through select field");
                ColumnResolution::SelectField {
                    position,
                    column: target,
                }
            }
            None => ColumnResolution::Column(self.lookup_column(column, scope, clause)?),
        };
        column.resolved = Some(resolution);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sql_binder_catalog::{ColumnMetadata, DataType, TableMetadata};
    use sql_binder_ir::BindingId;

    use super::*;
    use crate::alias::FieldTarget;

    fn column(binding: u32, ordinal: usize, depth: usize) -> ResolvedColumn {
        ResolvedColumn {
            table: Arc::new(TableMetadata::new("t1", "test").with_columns(vec![
                ColumnMetadata::new("c1", DataType::Integer),
                ColumnMetadata::new("c2", DataType::Integer),
            ])),
            ordinal,
            binding: BindingId(binding),
            qualifier: "t1".to_string(),
            depth,
        }
    }

    #[test]
    fn test_grouping_by_position_groups_the_column() {
        let mut fields = AliasNamespace::new();
        fields.push(Some("c2".to_string()), FieldTarget::Column(column(0, 1, 0)));

        let mut grouping = GroupingSet::default();
        grouping.add_position(0, &fields);

        assert!(grouping.covers(&ColumnResolution::Column(column(0, 1, 0))));
        assert!(!grouping.covers(&ColumnResolution::Column(column(0, 0, 0))));
    }

    #[test]
    fn test_correlated_and_expression_aliases_are_exempt() {
        let grouping = GroupingSet::default();

        assert!(grouping.covers(&ColumnResolution::Column(column(0, 0, 1))));
        assert!(grouping.covers(&ColumnResolution::SelectField {
            position: 3,
            column: None,
        }));
        assert!(!grouping.covers(&ColumnResolution::SelectField {
            position: 3,
            column: Some(column(0, 0, 0)),
        }));
    }
}
