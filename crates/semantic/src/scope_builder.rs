// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Scope Builder
//!
//! Turns a FROM join tree into table bindings, in two post-order passes.
//!
//! 1. [`Binder::build_scope`] visits the leaves left to right. Base tables
//!    are looked up in the snapshot (an unknown table is reported here) and
//!    annotated; derived tables are bound as independent statements and
//!    described by their output fields. Every leaf appends one binding, so the
//!    bindings of any subtree form a contiguous slice.
//! 2. [`Binder::resolve_join_conditions`] walks the tree again and resolves
//!    each ON condition against exactly the slice produced by its two
//!    operands, chained to the enclosing statement's scope (not to sibling
//!    comma-list members).
//!
//! ```text
//! FROM t1, t2 JOIN t3 ON t2.c1 = t3.c1
//!
//! bindings:   [ t1 | t2  t3 ]
//!                    ^^^^^^    visible to the ON condition
//!             ^^^^^^^^^^^^^^   visible to the rest of the statement
//! ```
//!
//! Duplicate names across comma-list members are accepted here; ambiguity is
//! reported only when a reference actually matches more than one binding.

use std::sync::Arc;

use sql_binder_ir::{FromItem, TableName};
use tracing::debug;

use crate::binder::Binder;
use crate::error::{Clause, SemanticError, SemanticResult};
use crate::scope::Scope;
use crate::symbol::TableBinding;

impl Binder<'_> {
    /// First pass: append one binding per FROM leaf, left to right
    pub(crate) fn build_scope(
        &mut self,
        from: &mut FromItem,
        bindings: &mut Vec<TableBinding>,
    ) -> SemanticResult<()> {
        match from {
            FromItem::Table(table) => {
                let binding = self.bind_table(table)?;
                bindings.push(binding);
            }
            FromItem::Derived { subquery, alias } => {
                let fields = self.bind_select(subquery, None)?;
                let table = Arc::new(fields.to_derived_table(alias));
                let binding = TableBinding::derived(self.allocate_binding(), alias.clone(), table);
                debug!(
                    alias = %alias,
                    binding = %binding.id,
                    columns = binding.table.columns.len(),
                    "derived table bound"
                );
                bindings.push(binding);
            }
            FromItem::Join(join) => {
                self.build_scope(&mut join.left, bindings)?;
                self.build_scope(&mut join.right, bindings)?;
            }
        }
        Ok(())
    }

    /// Look up a table mention, annotate it and create its binding
    pub(crate) fn bind_table(&mut self, table: &mut TableName) -> SemanticResult<TableBinding> {
        let metadata = self
            .info()
            .find_table(
                table.schema.as_deref(),
                &table.name,
                &self.config().default_schema,
            )
            .cloned()
            .ok_or_else(|| SemanticError::UnknownTable {
                name: table.qualified(),
                clause: Clause::From,
                span: table.span,
            })?;

        let binding = TableBinding::table(self.allocate_binding(), table, metadata);
        table.resolved = Some(binding.resolved_table());
        debug!(
            table = %binding.table.qualified_name(),
            name = %binding.name,
            binding = %binding.id,
            "table bound"
        );
        Ok(binding)
    }

    /// Second pass: resolve every ON condition against its join's operands
    ///
    /// `bindings` must be the output of [`Binder::build_scope`] for `from`.
    pub(crate) fn resolve_join_conditions(
        &mut self,
        from: &mut FromItem,
        bindings: &[TableBinding],
        outer: Option<&Scope<'_>>,
    ) -> SemanticResult<()> {
        let mut cursor = 0;
        self.visit_join_conditions(from, bindings, &mut cursor, outer)
    }

    fn visit_join_conditions(
        &mut self,
        from: &mut FromItem,
        bindings: &[TableBinding],
        cursor: &mut usize,
        outer: Option<&Scope<'_>>,
    ) -> SemanticResult<()> {
        match from {
            FromItem::Table(_) | FromItem::Derived { .. } => {
                *cursor += 1;
            }
            FromItem::Join(join) => {
                let start = *cursor;
                self.visit_join_conditions(&mut join.left, bindings, cursor, outer)?;
                self.visit_join_conditions(&mut join.right, bindings, cursor, outer)?;

                if let Some(on) = join.on.as_mut() {
                    let inner = Scope::new(&bindings[start..*cursor], outer).with_hidden(bindings);
                    self.resolve_expr(on, &inner, Clause::On)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sql_binder_catalog::{ColumnMetadata, DataType, InfoSchema, TableMetadata};
    use sql_binder_ir::{BindingId, Expr, FromItem, JoinType, SelectItem, SelectStatement, TableName};

    use crate::binder::Binder;
    use crate::config::BinderConfig;
    use crate::error::SemanticError;

    fn info() -> InfoSchema {
        let mut info = InfoSchema::new();
        for name in ["t1", "t2", "t3"] {
            info.add_table(TableMetadata::new(name, "test").with_columns(vec![
                ColumnMetadata::new("c1", DataType::Integer),
                ColumnMetadata::new("c2", DataType::Integer),
            ]))
            .unwrap();
        }
        info
    }

    fn table(name: &str) -> FromItem {
        FromItem::table(TableName::new(name))
    }

    #[test]
    fn test_bindings_follow_from_order() {
        let info = info();
        let config = BinderConfig::default();
        let mut binder = Binder::new(&info, &config);

        let mut from = FromItem::comma_list(vec![
            table("t1"),
            FromItem::join(table("t2"), table("t3"), JoinType::Inner, None),
        ])
        .unwrap();
        let mut bindings = Vec::new();
        binder.build_scope(&mut from, &mut bindings).unwrap();

        let names: Vec<_> = bindings.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["t1", "t2", "t3"]);
        assert_eq!(bindings[2].id, BindingId(2));
    }

    #[test]
    fn test_unknown_table_reported_by_scope_builder() {
        let info = info();
        let config = BinderConfig::default();
        let mut binder = Binder::new(&info, &config);

        let mut from = table("t4");
        let result = binder.build_scope(&mut from, &mut Vec::new());
        assert!(matches!(
            result,
            Err(SemanticError::UnknownTable { ref name, .. }) if name == "t4"
        ));
    }

    #[test]
    fn test_derived_table_binding() {
        let info = info();
        let config = BinderConfig::default();
        let mut binder = Binder::new(&info, &config);

        let subquery = SelectStatement::new()
            .with_projection(vec![
                SelectItem::UnnamedExpr(Expr::column("c1")),
                SelectItem::AliasedExpr {
                    expr: Expr::column("c2"),
                    alias: "x".to_string(),
                },
            ])
            .with_from(table("t1"));
        let mut from = FromItem::derived(subquery, "d");
        let mut bindings = Vec::new();
        binder.build_scope(&mut from, &mut bindings).unwrap();

        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].name, "d");
        assert!(bindings[0].schema.is_none());
        let columns: Vec<_> = bindings[0].table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(columns, vec!["c1", "x"]);
    }
}
