// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Unit tests for IR statement representation

use pretty_assertions::assert_eq;
use sql_binder_ir::{
    Assignment, BinaryOp, ColumnRef, DeleteStatement, Expr, FromItem, InsertSource,
    InsertStatement, JoinType, Limit, Literal, OrderBy, SelectItem, SelectStatement,
    SortDirection, Statement, TableName, UpdateStatement, WildcardRef,
};

fn eq(left: Expr, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op: BinaryOp::Eq,
        right: Box::new(right),
    }
}

#[test]
fn test_select_builder() {
    let select = SelectStatement::new()
        .with_distinct()
        .with_projection(vec![
            SelectItem::UnnamedExpr(Expr::column("c1")),
            SelectItem::AliasedExpr {
                expr: Expr::column("c2"),
                alias: "a".to_string(),
            },
        ])
        .with_from(FromItem::table(TableName::new("t1")))
        .with_group_by(vec![Expr::column("c1")])
        .with_order_by(vec![OrderBy::desc(Expr::column("c1"))])
        .with_limit(Limit {
            count: 10,
            offset: Some(5),
        });

    assert!(select.distinct);
    assert_eq!(select.projection.len(), 2);
    assert_eq!(select.projection[1].alias(), Some("a"));
    assert_eq!(select.order_by[0].direction, Some(SortDirection::Desc));
    assert_eq!(select.limit.map(|l| l.count), Some(10));
}

#[test]
fn test_select_item_expr() {
    assert!(SelectItem::Wildcard.expr().is_none());
    assert!(
        SelectItem::QualifiedWildcard(WildcardRef::new("t1"))
            .expr()
            .is_none()
    );
    assert_eq!(
        SelectItem::UnnamedExpr(Expr::column("c1")).expr(),
        Some(&Expr::column("c1"))
    );
}

#[test]
fn test_join_on_binds_tighter_than_comma() {
    // FROM t1, t2 JOIN t3 ON t2.c1 = t3.c1
    let on = eq(
        Expr::Column(ColumnRef::new("c1").with_table("t2")),
        Expr::Column(ColumnRef::new("c1").with_table("t3")),
    );
    let from = FromItem::comma_list(vec![
        FromItem::table(TableName::new("t1")),
        FromItem::join(
            FromItem::table(TableName::new("t2")),
            FromItem::table(TableName::new("t3")),
            JoinType::Inner,
            Some(on),
        ),
    ])
    .expect("non-empty list");

    let FromItem::Join(cross) = from else {
        panic!("expected cross join at the root");
    };
    assert_eq!(cross.join_type, JoinType::Cross);
    assert!(cross.on.is_none());
    match &cross.right {
        FromItem::Join(inner) => {
            assert_eq!(inner.join_type, JoinType::Inner);
            assert!(inner.on.is_some());
        }
        other => panic!("expected inner join, got {:?}", other),
    }
}

#[test]
fn test_wildcard_ref_qualified() {
    assert_eq!(WildcardRef::new("t1").qualified(), "t1.*");
    assert_eq!(WildcardRef::new("t1").with_schema("test").qualified(), "test.t1.*");
}

#[test]
fn test_statement_from_conversions() {
    let insert = InsertStatement {
        table: TableName::new("t1"),
        columns: vec![ColumnRef::new("c1")],
        source: InsertSource::Values(vec![vec![Expr::Literal(Literal::Integer(1))]]),
    };
    assert!(matches!(Statement::from(insert), Statement::Insert(_)));

    let update = UpdateStatement {
        table: FromItem::table(TableName::new("t1")),
        assignments: vec![Assignment {
            column: ColumnRef::new("c1"),
            value: Expr::Literal(Literal::Integer(1)),
        }],
        where_clause: None,
        order_by: Vec::new(),
        limit: None,
    };
    assert!(matches!(Statement::from(update), Statement::Update(_)));

    let delete = DeleteStatement {
        from: FromItem::table(TableName::new("t1")),
        where_clause: Some(eq(Expr::column("c1"), Expr::Literal(Literal::Integer(1)))),
        order_by: Vec::new(),
        limit: None,
    };
    assert!(matches!(Statement::from(delete), Statement::Delete(_)));
}

#[test]
fn test_statement_json_roundtrip_drops_annotations() {
    let stmt: Statement = SelectStatement::new()
        .with_projection(vec![SelectItem::Wildcard])
        .with_from(FromItem::table(TableName::new("t1").with_alias("x")))
        .into();

    let json = serde_json::to_string(&stmt).unwrap();
    let back: Statement = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stmt);
}

#[test]
fn test_minimal_json_statement() {
    let json = r#"{
        "Select": {
            "projection": [{ "UnnamedExpr": { "Column": { "column": "c1" } } }],
            "from": { "Table": { "name": "t1" } }
        }
    }"#;
    let stmt: Statement = serde_json::from_str(json).unwrap();

    let Statement::Select(select) = stmt else {
        panic!("expected select");
    };
    assert!(select.where_clause.is_none());
    assert!(select.group_by.is_empty());
    assert!(matches!(&select.from, Some(FromItem::Table(t)) if t.name == "t1"));
}
