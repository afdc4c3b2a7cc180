// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Resolution annotations
//!
//! Types the binder writes into [`ColumnRef::resolved`](crate::ColumnRef),
//! [`TableName::resolved`](crate::TableName) and
//! [`WildcardRef::resolved`](crate::WildcardRef).
//!
//! Annotations share the catalog snapshot's `Arc<TableMetadata>`, so they stay
//! valid for as long as the caller keeps them and never copy column lists.

use std::sync::Arc;

use crate::metadata::{ColumnMetadata, TableMetadata};

/// Identity of one table binding within a single bind call
///
/// Ids are handed out in FROM order starting at zero for every bind, which
/// keeps annotations identical across repeated binds of the same statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u32);

impl std::fmt::Display for BindingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Table a table mention or `t.*` resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTable {
    pub table: Arc<TableMetadata>,
    /// Binding introduced by this mention
    pub binding: BindingId,
}

/// Catalog column a reference resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    pub table: Arc<TableMetadata>,
    /// Position of the column in `table.columns`
    pub ordinal: usize,
    pub binding: BindingId,
    /// Name the binding is visible under (alias or table name)
    pub qualifier: String,
    /// Number of scopes walked outward; 0 for local, >0 for correlated
    pub depth: usize,
}

impl ResolvedColumn {
    pub fn column(&self) -> Option<&ColumnMetadata> {
        self.table.columns.get(self.ordinal)
    }

    pub fn column_name(&self) -> &str {
        self.column().map(|c| c.name.as_str()).unwrap_or_default()
    }

    /// Same binding, same column
    ///
    /// Two references to `t1.c1` through different aliases of `t1` are
    /// different columns.
    pub fn same_column(&self, other: &ResolvedColumn) -> bool {
        self.binding == other.binding && self.ordinal == other.ordinal
    }

    pub fn is_correlated(&self) -> bool {
        self.depth > 0
    }
}

/// What a column reference was bound to
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnResolution {
    /// Directly to a column of a visible table
    Column(ResolvedColumn),

    /// Through the SELECT list (alias, output column name or position)
    SelectField {
        /// 0-based index into the projection after wildcard expansion
        position: usize,
        /// The field's column, when the field is a plain column
        column: Option<ResolvedColumn>,
    },
}

impl ColumnResolution {
    pub fn column(&self) -> Option<&ResolvedColumn> {
        match self {
            ColumnResolution::Column(column) => Some(column),
            ColumnResolution::SelectField { column, .. } => column.as_ref(),
        }
    }

    pub fn is_select_field(&self) -> bool {
        matches!(self, ColumnResolution::SelectField { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::DataType;

    fn table() -> Arc<TableMetadata> {
        Arc::new(TableMetadata::new("t1", "test").with_columns(vec![
            ColumnMetadata::new("c1", DataType::Integer),
            ColumnMetadata::new("c2", DataType::Integer),
        ]))
    }

    fn resolved(binding: u32, ordinal: usize) -> ResolvedColumn {
        ResolvedColumn {
            table: table(),
            ordinal,
            binding: BindingId(binding),
            qualifier: "t1".to_string(),
            depth: 0,
        }
    }

    #[test]
    fn test_same_column_needs_same_binding() {
        assert!(resolved(0, 1).same_column(&resolved(0, 1)));
        assert!(!resolved(0, 1).same_column(&resolved(0, 0)));
        assert!(!resolved(0, 1).same_column(&resolved(1, 1)));
    }

    #[test]
    fn test_column_name() {
        assert_eq!(resolved(0, 1).column_name(), "c2");
    }

    #[test]
    fn test_select_field_without_column() {
        let res = ColumnResolution::SelectField {
            position: 0,
            column: None,
        };
        assert!(res.is_select_field());
        assert!(res.column().is_none());
    }
}
