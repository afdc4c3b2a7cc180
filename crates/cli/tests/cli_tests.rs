// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! End-to-end runs of the `sql-binder` binary over the files in `demos/`

use std::path::PathBuf;
use std::process::{Command, Output};

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sql-binder"))
        .args(args)
        .output()
        .expect("failed to spawn sql-binder")
}

fn bind_demo(statement: &str, format: &str) -> Output {
    let catalog = demo("catalog.yaml");
    let config = demo("config.yaml");
    let statement = demo(statement);
    run(&[
        "--catalog",
        catalog.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--statement",
        statement.to_str().unwrap(),
        "--format",
        format,
    ])
}

#[test]
fn test_accepted_statement_prints_bindings() {
    let output = bind_demo("accepted.json", "text");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0), "stdout: {stdout}");
    assert!(stdout.contains("t1.c2"));
    assert!(stdout.contains("(outer 1)"));
    assert!(!stdout.contains("rejected"));
}

#[test]
fn test_accepted_statement_as_json() {
    let output = bind_demo("accepted.json", "json");
    assert_eq!(output.status.code(), Some(0));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["accepted"], true);
    assert!(report.get("error").is_none());

    let references = report["references"].as_array().unwrap();
    let grouped = references
        .iter()
        .find(|r| r["reference"] == "c1" && r["select_field"] == 0)
        .expect("GROUP BY c1 should bind through the SELECT list");
    assert_eq!(grouped["target"], "test.t1.c1");
}

#[test]
fn test_rejected_statement_exits_with_one() {
    let output = bind_demo("ambiguous.json", "json");
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["accepted"], false);
    assert_eq!(report["error"]["kind"], "AmbiguousColumn");
    assert_eq!(report["error"]["clause"], "FieldList");
}

#[test]
fn test_missing_catalog_exits_with_two() {
    let statement = demo("accepted.json");
    let output = run(&[
        "--catalog",
        "does-not-exist.yaml",
        "--statement",
        statement.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid catalog"));
}
