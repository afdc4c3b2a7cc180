// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Binder
//!
//! Entry point of name resolution. A [`Binder`] borrows an immutable
//! [`InfoSchema`] snapshot and a [`BinderConfig`], and annotates a statement in
//! place:
//!
//! ```text
//! SELECT                   enter: build scope from FROM
//!   FROM ... ON ...        ON conditions against join-local slices
//!   select list            Alias Namespace built here
//!   WHERE                  table scope only
//!   GROUP BY               alias first, then table scope
//!   HAVING                 alias first, grouped columns only
//!   ORDER BY               alias first, then table scope
//!                          leave: scope and Alias Namespace dropped
//! ```
//!
//! Binding is a recursive descent over the statement's typed nodes, one
//! `match` per node kind; the "enter" and "leave" steps above are the start
//! and end of [`Binder::bind_select`]'s stack frame. Subqueries in
//! expressions are bound by a nested call with the current scope as their
//! parent. The first error aborts the statement.
//!
//! ## Examples
//!
//! ```rust
//! use sql_binder_catalog::{ColumnMetadata, DataType, InfoSchema, TableMetadata};
//! use sql_binder_ir::{Expr, FromItem, SelectItem, SelectStatement, Statement, TableName};
//! use sql_binder_semantic::{BindPhase, Binder, BinderConfig};
//!
//! let mut info = InfoSchema::new();
//! info.add_table(
//!     TableMetadata::new("t1", "test")
//!         .with_columns(vec![ColumnMetadata::new("c1", DataType::Integer)]),
//! )
//! .unwrap();
//! let config = BinderConfig::default();
//!
//! let mut stmt = Statement::from(
//!     SelectStatement::new()
//!         .with_projection(vec![SelectItem::UnnamedExpr(Expr::column("c1"))])
//!         .with_from(FromItem::table(TableName::new("t1"))),
//! );
//!
//! let mut binder = Binder::new(&info, &config);
//! binder.bind_statement(&mut stmt).unwrap();
//! assert_eq!(binder.phase(), BindPhase::Done);
//! ```

use std::fmt;

use sql_binder_catalog::InfoSchema;
use sql_binder_ir::{
    BindingId, DeleteStatement, InsertSource, InsertStatement, SelectStatement, Statement,
    UpdateStatement,
};
use tracing::{debug, instrument, trace};

use crate::alias::AliasNamespace;
use crate::config::BinderConfig;
use crate::error::{Clause, SemanticResult};
use crate::scope::Scope;

/// Progress of binding one statement
///
/// Phases only move forward; `Failed` can be entered from any non-terminal
/// phase. Statements without some clause still pass through its phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum BindPhase {
    #[default]
    Init,
    ScopeBuilt,
    FromVisited,
    SelectListVisited,
    WhereVisited,
    GroupByVisited,
    HavingVisited,
    OrderByVisited,
    Done,
    Failed,
}

impl BindPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, BindPhase::Done | BindPhase::Failed)
    }

    pub fn can_advance_to(self, next: BindPhase) -> bool {
        !self.is_terminal() && (next == BindPhase::Failed || next > self)
    }

    pub(crate) fn advance(&mut self, next: BindPhase) {
        debug_assert!(
            self.can_advance_to(next),
            "illegal phase transition {self} -> {next}"
        );
        trace!(from = %self, to = %next, "phase");
        *self = next;
    }
}

impl fmt::Display for BindPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BindPhase::Init => "init",
            BindPhase::ScopeBuilt => "scope built",
            BindPhase::FromVisited => "from visited",
            BindPhase::SelectListVisited => "select list visited",
            BindPhase::WhereVisited => "where visited",
            BindPhase::GroupByVisited => "group by visited",
            BindPhase::HavingVisited => "having visited",
            BindPhase::OrderByVisited => "order by visited",
            BindPhase::Done => "done",
            BindPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Resolves the identifiers of statements against one snapshot
///
/// A binder holds no per-statement state between calls except the outcome of
/// the last one, so it can be reused for any number of statements.
pub struct Binder<'a> {
    info: &'a InfoSchema,
    config: &'a BinderConfig,
    next_binding: u32,
    phase: BindPhase,
}

impl<'a> Binder<'a> {
    pub fn new(info: &'a InfoSchema, config: &'a BinderConfig) -> Self {
        Self {
            info,
            config,
            next_binding: 0,
            phase: BindPhase::Init,
        }
    }

    /// Terminal phase of the last statement (`Init` before the first one)
    pub fn phase(&self) -> BindPhase {
        self.phase
    }

    pub(crate) fn info(&self) -> &'a InfoSchema {
        self.info
    }

    pub(crate) fn config(&self) -> &'a BinderConfig {
        self.config
    }

    pub(crate) fn allocate_binding(&mut self) -> BindingId {
        let id = BindingId(self.next_binding);
        self.next_binding += 1;
        id
    }

    /// Resolve every identifier of `stmt` and annotate it in place
    ///
    /// Annotations left by an earlier bind are cleared first and binding ids
    /// restart at zero, so binding the same statement twice against the same
    /// snapshot produces identical annotations.
    ///
    /// # Errors
    ///
    /// The first [`SemanticError`](crate::SemanticError) encountered. The
    /// statement may be partially annotated afterwards.
    #[instrument(skip_all, fields(kind = statement_kind(stmt)))]
    pub fn bind_statement(&mut self, stmt: &mut Statement) -> SemanticResult<()> {
        stmt.clear_resolution();
        self.next_binding = 0;
        self.phase = BindPhase::Init;

        let result = match stmt {
            Statement::Select(select) => self.bind_select(select, None).map(|_| ()),
            Statement::Insert(insert) => self.bind_insert(insert),
            Statement::Update(update) => self.bind_update(update),
            Statement::Delete(delete) => self.bind_delete(delete),
        };

        match &result {
            Ok(()) => {
                self.phase.advance(BindPhase::Done);
                debug!(bindings = self.next_binding, "statement bound");
            }
            Err(err) => {
                self.phase.advance(BindPhase::Failed);
                debug!(kind = err.kind(), clause = %err.clause(), error = %err, "statement rejected");
            }
        }
        result
    }

    /// Bind one SELECT and return its output fields
    ///
    /// `parent` is the scope of the enclosing statement for subqueries in
    /// expressions, `None` for top-level and derived-table statements.
    pub(crate) fn bind_select(
        &mut self,
        select: &mut SelectStatement,
        parent: Option<&Scope<'_>>,
    ) -> SemanticResult<AliasNamespace> {
        self.tracked(|binder, phase| binder.select_phases(select, parent, phase))
    }

    fn select_phases(
        &mut self,
        select: &mut SelectStatement,
        parent: Option<&Scope<'_>>,
        phase: &mut BindPhase,
    ) -> SemanticResult<AliasNamespace> {
        let mut bindings = Vec::new();
        if let Some(from) = select.from.as_mut() {
            self.build_scope(from, &mut bindings)?;
        }
        phase.advance(BindPhase::ScopeBuilt);

        if let Some(from) = select.from.as_mut() {
            self.resolve_join_conditions(from, &bindings, parent)?;
        }
        phase.advance(BindPhase::FromVisited);

        let scope = Scope::new(&bindings, parent);
        let fields = self.bind_select_list(&mut select.projection, &scope)?;
        phase.advance(BindPhase::SelectListVisited);

        if let Some(predicate) = select.where_clause.as_mut() {
            self.resolve_expr(predicate, &scope, Clause::Where)?;
        }
        phase.advance(BindPhase::WhereVisited);

        let grouping = self.bind_group_by(&mut select.group_by, &fields, &scope)?;
        phase.advance(BindPhase::GroupByVisited);

        if let Some(having) = select.having.as_mut() {
            self.bind_having(having, &fields, grouping.as_ref(), &scope)?;
        }
        phase.advance(BindPhase::HavingVisited);

        self.bind_order_by(&mut select.order_by, Some(&fields), &scope)?;
        phase.advance(BindPhase::OrderByVisited);

        Ok(fields)
    }

    /// `INSERT INTO t [(cols)] VALUES ... | SELECT ...`
    fn bind_insert(&mut self, insert: &mut InsertStatement) -> SemanticResult<()> {
        self.tracked(|binder, phase| {
            let target = [binder.bind_table(&mut insert.table)?];
            phase.advance(BindPhase::ScopeBuilt);

            let scope = Scope::new(&target, None);
            for column in insert.columns.iter_mut() {
                binder.resolve_column(column, &scope, Clause::FieldList)?;
            }
            phase.advance(BindPhase::FromVisited);

            match &mut insert.source {
                InsertSource::Values(rows) => {
                    let empty = Scope::empty();
                    for value in rows.iter_mut().flatten() {
                        binder.resolve_expr(value, &empty, Clause::FieldList)?;
                    }
                }
                InsertSource::Select(select) => {
                    binder.bind_select(select, None)?;
                }
            }
            phase.advance(BindPhase::SelectListVisited);
            Ok(())
        })
    }

    /// `UPDATE <from-item> SET ... [WHERE] [ORDER BY] [LIMIT]`
    fn bind_update(&mut self, update: &mut UpdateStatement) -> SemanticResult<()> {
        self.tracked(|binder, phase| {
            let mut bindings = Vec::new();
            binder.build_scope(&mut update.table, &mut bindings)?;
            phase.advance(BindPhase::ScopeBuilt);

            binder.resolve_join_conditions(&mut update.table, &bindings, None)?;
            phase.advance(BindPhase::FromVisited);

            let scope = Scope::new(&bindings, None);
            for assignment in update.assignments.iter_mut() {
                binder.resolve_column(&mut assignment.column, &scope, Clause::SetList)?;
                binder.resolve_expr(&mut assignment.value, &scope, Clause::SetList)?;
            }
            phase.advance(BindPhase::SelectListVisited);

            if let Some(predicate) = update.where_clause.as_mut() {
                binder.resolve_expr(predicate, &scope, Clause::Where)?;
            }
            phase.advance(BindPhase::WhereVisited);

            binder.bind_order_by(&mut update.order_by, None, &scope)?;
            phase.advance(BindPhase::OrderByVisited);
            Ok(())
        })
    }

    /// `DELETE FROM <from-item> [WHERE] [ORDER BY] [LIMIT]`
    fn bind_delete(&mut self, delete: &mut DeleteStatement) -> SemanticResult<()> {
        self.tracked(|binder, phase| {
            let mut bindings = Vec::new();
            binder.build_scope(&mut delete.from, &mut bindings)?;
            phase.advance(BindPhase::ScopeBuilt);

            binder.resolve_join_conditions(&mut delete.from, &bindings, None)?;
            phase.advance(BindPhase::FromVisited);

            let scope = Scope::new(&bindings, None);
            if let Some(predicate) = delete.where_clause.as_mut() {
                binder.resolve_expr(predicate, &scope, Clause::Where)?;
            }
            phase.advance(BindPhase::WhereVisited);

            binder.bind_order_by(&mut delete.order_by, None, &scope)?;
            phase.advance(BindPhase::OrderByVisited);
            Ok(())
        })
    }

    /// Run `bind` with a fresh phase tracker and finish it as `Done` or `Failed`
    fn tracked<T>(
        &mut self,
        bind: impl FnOnce(&mut Self, &mut BindPhase) -> SemanticResult<T>,
    ) -> SemanticResult<T> {
        let mut phase = BindPhase::Init;
        let result = bind(self, &mut phase);
        phase.advance(if result.is_ok() {
            BindPhase::Done
        } else {
            BindPhase::Failed
        });
        result
    }
}

/// Bind `stmt` with a throwaway [`Binder`]
pub fn bind(stmt: &mut Statement, info: &InfoSchema, config: &BinderConfig) -> SemanticResult<()> {
    Binder::new(info, config).bind_statement(stmt)
}

fn statement_kind(stmt: &Statement) -> &'static str {
    match stmt {
        Statement::Select(_) => "select",
        Statement::Insert(_) => "insert",
        Statement::Update(_) => "update",
        Statement::Delete(_) => "delete",
    }
}
