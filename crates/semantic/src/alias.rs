// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Alias Namespace
//!
//! The output fields of a SELECT list, after wildcard expansion. GROUP BY,
//! HAVING and ORDER BY consult it before the table scope when they see a bare
//! identifier; WHERE and ON never do.
//!
//! ## Field names
//!
//! | Item            | Name          | Target          |
//! |-----------------|---------------|-----------------|
//! | `c1`, `t1.c1`   | `c1`          | column          |
//! | `expr AS a`     | `a`           | column if `expr` is a column reference, else expression |
//! | `c1 + 1`        | none          | expression      |
//! | `*`, `t1.*`     | column name   | column          |
//!
//! ## Lookup rule
//!
//! Fields are scanned in order. The first matching field whose target is not a
//! column wins immediately. Otherwise all matching fields must denote the
//! same column (same binding, same ordinal); two different columns under one
//! name is an ambiguous alias. So `SELECT 1 AS a, c1 AS a, c2 AS a ... GROUP
//! BY a` picks the literal, while `SELECT c1 AS a, c2 AS a ... GROUP BY a` is
//! rejected.

use sql_binder_catalog::{ColumnMetadata, DataType, InfoSchema, TableMetadata, TableType};
use sql_binder_ir::{ColumnRef, ResolvedColumn};

use crate::error::{Clause, SemanticError, SemanticResult};

/// What an output field evaluates to
#[derive(Debug, Clone, PartialEq)]
pub enum FieldTarget {
    /// A plain column reference (possibly reached through a wildcard)
    Column(ResolvedColumn),
    /// Anything else: literal, arithmetic, function call, subquery
    Expr,
}

/// One output field of a SELECT list
#[derive(Debug, Clone, PartialEq)]
pub struct OutputField {
    pub name: Option<String>,
    pub target: FieldTarget,
}

impl OutputField {
    pub fn column(&self) -> Option<&ResolvedColumn> {
        match &self.target {
            FieldTarget::Column(column) => Some(column),
            FieldTarget::Expr => None,
        }
    }
}

/// Output fields of one SELECT, in projection order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasNamespace {
    fields: Vec<OutputField>,
}

impl AliasNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: Option<String>, target: FieldTarget) {
        self.fields.push(OutputField { name, target });
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&OutputField> {
        self.fields.get(position)
    }

    pub fn fields(&self) -> &[OutputField] {
        &self.fields
    }

    /// Find the field a bare identifier names
    ///
    /// Returns `Ok(None)` when no field carries that name, in which case the
    /// caller falls back to the table scope.
    ///
    /// # Errors
    ///
    /// `SemanticError::AmbiguousAlias` when the name matches fields denoting
    /// different columns and no expression field comes first.
    pub fn lookup(
        &self,
        info: &InfoSchema,
        reference: &ColumnRef,
        clause: Clause,
    ) -> SemanticResult<Option<usize>> {
        let mut matched: Option<(usize, &ResolvedColumn)> = None;

        for (position, field) in self.fields.iter().enumerate() {
            let named = field
                .name
                .as_deref()
                .is_some_and(|name| info.ident_eq(name, &reference.column));
            if !named {
                continue;
            }

            match (&field.target, matched) {
                (FieldTarget::Expr, _) => return Ok(Some(position)),
                (FieldTarget::Column(column), None) => matched = Some((position, column)),
                (FieldTarget::Column(column), Some((_, first))) if first.same_column(column) => {}
                (FieldTarget::Column(_), Some(_)) => {
                    return Err(SemanticError::AmbiguousAlias {
                        name: reference.column.clone(),
                        clause,
                        span: reference.span,
                    });
                }
            }
        }

        Ok(matched.map(|(position, _)| position))
    }

    /// Table metadata describing these fields as the columns of a derived
    /// table named `alias`
    ///
    /// Unnamed fields are called `col_<n>` (1-based).
    pub fn to_derived_table(&self, alias: &str) -> TableMetadata {
        let columns = self
            .fields
            .iter()
            .enumerate()
            .map(|(position, field)| {
                let name = field
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("col_{}", position + 1));
                let data_type = field
                    .column()
                    .and_then(ResolvedColumn::column)
                    .map(|column| column.data_type.clone())
                    .unwrap_or_else(|| DataType::Other("UNKNOWN".to_string()));
                ColumnMetadata::new(name, data_type)
            })
            .collect();

        TableMetadata::new(alias, "")
            .with_columns(columns)
            .with_type(TableType::Derived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use sql_binder_ir::BindingId;

    fn column(ordinal: usize) -> FieldTarget {
        let table = Arc::new(TableMetadata::new("t1", "test").with_columns(vec![
            ColumnMetadata::new("c1", DataType::Integer),
            ColumnMetadata::new("c2", DataType::Integer),
        ]));
        FieldTarget::Column(ResolvedColumn {
            table,
            ordinal,
            binding: BindingId(0),
            qualifier: "t1".to_string(),
            depth: 0,
        })
    }

    fn named(name: &str) -> Option<String> {
        Some(name.to_string())
    }

    fn lookup(fields: &AliasNamespace, name: &str) -> SemanticResult<Option<usize>> {
        fields.lookup(&InfoSchema::new(), &ColumnRef::new(name), Clause::GroupBy)
    }

    #[test]
    fn test_distinct_columns_under_one_alias_are_ambiguous() {
        let mut fields = AliasNamespace::new();
        fields.push(named("a"), column(0));
        fields.push(named("a"), column(1));

        assert!(matches!(
            lookup(&fields, "a"),
            Err(SemanticError::AmbiguousAlias { .. })
        ));
    }

    #[test]
    fn test_same_column_twice_is_not_ambiguous() {
        let mut fields = AliasNamespace::new();
        fields.push(named("a"), column(0));
        fields.push(named("a"), column(0));

        assert_eq!(lookup(&fields, "A").unwrap(), Some(0));
    }

    #[test]
    fn test_expression_field_wins_when_first() {
        let mut fields = AliasNamespace::new();
        fields.push(named("a"), FieldTarget::Expr);
        fields.push(named("a"), column(0));
        fields.push(named("a"), column(1));

        assert_eq!(lookup(&fields, "a").unwrap(), Some(0));
    }

    #[test]
    fn test_unnamed_fields_never_match() {
        let mut fields = AliasNamespace::new();
        fields.push(None, FieldTarget::Expr);

        assert_eq!(lookup(&fields, "c1").unwrap(), None);
    }

    #[test]
    fn test_derived_table_columns() {
        let mut fields = AliasNamespace::new();
        fields.push(named("c1"), column(0));
        fields.push(None, FieldTarget::Expr);

        let table = fields.to_derived_table("d");
        assert_eq!(table.table_type, TableType::Derived);
        assert_eq!(table.qualified_name(), "d");
        assert_eq!(table.columns[0].name, "c1");
        assert_eq!(table.columns[0].data_type, DataType::Integer);
        assert_eq!(table.columns[1].name, "col_2");
    }
}
