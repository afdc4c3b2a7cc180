// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Table bindings
//!
//! A [`TableBinding`] is one entry of a scope: a name other clauses can use
//! (table name or alias) tied to the table's metadata.

use std::sync::Arc;

use sql_binder_catalog::{InfoSchema, TableMetadata};
use sql_binder_ir::{BindingId, ResolvedColumn, ResolvedTable, TableName};

/// A table visible under a name in some scope
#[derive(Debug, Clone, PartialEq)]
pub struct TableBinding {
    /// Unique within one bind call
    pub id: BindingId,

    /// Name the binding is visible under: the alias if present, otherwise the
    /// table name
    pub name: String,

    /// Schema a schema-qualified reference must name; `None` for aliased and
    /// derived tables
    pub schema: Option<String>,

    pub table: Arc<TableMetadata>,
}

impl TableBinding {
    /// Binding for a base table mention
    pub fn table(id: BindingId, mention: &TableName, table: Arc<TableMetadata>) -> Self {
        let schema = match mention.alias {
            Some(_) => None,
            None => Some(table.schema.clone()),
        };
        Self {
            id,
            name: mention.display_name().to_string(),
            schema,
            table,
        }
    }

    /// Binding for a derived table (`(SELECT ...) AS alias`)
    pub fn derived(id: BindingId, alias: impl Into<String>, table: Arc<TableMetadata>) -> Self {
        Self {
            id,
            name: alias.into(),
            schema: None,
            table,
        }
    }

    /// Check if a `[schema.]qualifier` reference names this binding
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use sql_binder_catalog::{InfoSchema, TableMetadata};
    /// use sql_binder_ir::{BindingId, TableName};
    /// use sql_binder_semantic::TableBinding;
    ///
    /// let info = InfoSchema::new();
    /// let table = Arc::new(TableMetadata::new("t1", "test"));
    ///
    /// let plain = TableBinding::table(BindingId(0), &TableName::new("t1"), table.clone());
    /// assert!(plain.matches(&info, None, "T1"));
    /// assert!(plain.matches(&info, Some("test"), "t1"));
    ///
    /// let aliased = TableBinding::table(BindingId(1), &TableName::new("t1").with_alias("x"), table);
    /// assert!(aliased.matches(&info, None, "x"));
    /// assert!(!aliased.matches(&info, None, "t1"));
    /// assert!(!aliased.matches(&info, Some("test"), "x"));
    /// ```
    pub fn matches(&self, info: &InfoSchema, schema: Option<&str>, qualifier: &str) -> bool {
        if !info.ident_eq(&self.name, qualifier) {
            return false;
        }
        match (schema, &self.schema) {
            (None, _) => true,
            (Some(wanted), Some(own)) => info.ident_eq(wanted, own),
            (Some(_), None) => false,
        }
    }

    /// Ordinal of `column` in this binding's table
    pub fn find_column(&self, info: &InfoSchema, column: &str) -> Option<usize> {
        info.find_column(&self.table, column).map(|(ordinal, _)| ordinal)
    }

    /// Annotation for column `ordinal` reached `depth` scopes outward
    pub fn resolve(&self, ordinal: usize, depth: usize) -> ResolvedColumn {
        ResolvedColumn {
            table: Arc::clone(&self.table),
            ordinal,
            binding: self.id,
            qualifier: self.name.clone(),
            depth,
        }
    }

    pub fn resolved_table(&self) -> ResolvedTable {
        ResolvedTable {
            table: Arc::clone(&self.table),
            binding: self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sql_binder_catalog::{ColumnMetadata, DataType};

    fn t1() -> Arc<TableMetadata> {
        Arc::new(TableMetadata::new("t1", "test").with_columns(vec![
            ColumnMetadata::new("c1", DataType::Integer),
            ColumnMetadata::new("c2", DataType::Integer),
        ]))
    }

    #[test]
    fn test_binding_find_column() {
        let info = InfoSchema::new();
        let binding = TableBinding::table(BindingId(3), &TableName::new("t1"), t1());

        assert_eq!(binding.find_column(&info, "C2"), Some(1));
        assert_eq!(binding.find_column(&info, "c3"), None);

        let resolved = binding.resolve(1, 2);
        assert_eq!(resolved.binding, BindingId(3));
        assert_eq!(resolved.qualifier, "t1");
        assert_eq!(resolved.column_name(), "c2");
        assert!(resolved.is_correlated());
    }

    #[test]
    fn test_derived_binding_has_no_schema() {
        let info = InfoSchema::new();
        let binding = TableBinding::derived(BindingId(0), "d", t1());
        assert!(binding.matches(&info, None, "d"));
        assert!(!binding.matches(&info, Some("test"), "d"));
    }
}
