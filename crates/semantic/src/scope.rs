// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Scopes
//!
//! A [`Scope`] is the set of table bindings visible at one point of a
//! statement, plus a borrowed link to the scope of the enclosing statement.
//!
//! Scopes never own their parent: a subquery's scope lives on the binder's
//! stack while the subquery is resolved, and points at the enclosing scope
//! one frame up. Lookups only walk the parent link after a name fails to
//! resolve locally (correlation).
//!
//! ```text
//! SELECT c1 FROM t1 WHERE EXISTS (SELECT c2)
//!
//!   Scope { bindings: [t1], parent: None }
//!        ^
//!        |
//!   Scope { bindings: [],   parent: Some(..) }   -- c2 resolves here at depth 1
//! ```

use crate::symbol::TableBinding;

/// Bindings visible at one point of a statement
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    bindings: &'a [TableBinding],
    /// Bindings of the same FROM clause that exist but are out of reach here,
    /// such as comma siblings of a JOIN seen from its ON condition
    hidden: &'a [TableBinding],
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub fn new(bindings: &'a [TableBinding], parent: Option<&'a Scope<'a>>) -> Self {
        Self {
            bindings,
            hidden: &[],
            parent,
        }
    }

    pub fn with_hidden(mut self, hidden: &'a [TableBinding]) -> Self {
        self.hidden = hidden;
        self
    }

    /// Scope with no bindings and no parent
    pub fn empty() -> Self {
        Self::new(&[], None)
    }

    pub fn bindings(&self) -> &'a [TableBinding] {
        self.bindings
    }

    pub fn hidden(&self) -> &'a [TableBinding] {
        self.hidden
    }

    pub fn parent(&self) -> Option<&'a Scope<'a>> {
        self.parent
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// This scope followed by its ancestors, innermost first
    pub fn ancestors(&self) -> impl Iterator<Item = &Scope<'a>> {
        std::iter::successors(Some(self), |scope| scope.parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use sql_binder_catalog::TableMetadata;
    use sql_binder_ir::{BindingId, TableName};

    #[test]
    fn test_scope_chain() {
        let outer_bindings = vec![TableBinding::table(
            BindingId(0),
            &TableName::new("t1"),
            Arc::new(TableMetadata::new("t1", "test")),
        )];
        let outer = Scope::new(&outer_bindings, None);
        let inner = Scope::new(&[], Some(&outer));
        let innermost = Scope::new(&[], Some(&inner));

        assert_eq!(innermost.ancestors().count(), 3);
        assert!(innermost.is_empty());
        let last = innermost.ancestors().last().unwrap();
        assert_eq!(last.bindings()[0].name, "t1");
        assert!(last.parent().is_none());
    }

    #[test]
    fn test_empty_scope() {
        let scope = Scope::empty();
        assert!(scope.is_empty());
        assert!(scope.hidden().is_empty());
        assert_eq!(scope.ancestors().count(), 1);
    }

    #[test]
    fn test_hidden_bindings_are_not_visible() {
        let bindings = vec![TableBinding::table(
            BindingId(0),
            &TableName::new("t1"),
            Arc::new(TableMetadata::new("t1", "test")),
        )];
        let scope = Scope::new(&[], None).with_hidden(&bindings);

        assert!(scope.is_empty());
        assert_eq!(scope.hidden()[0].name, "t1");
    }
}
