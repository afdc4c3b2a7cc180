// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! `sql-binder`: bind one JSON-encoded statement against a catalog file
//!
//! ```text
//! sql-binder --catalog schema.yaml --statement query.json --format json
//! ```
//!
//! Exit status is 0 when the statement is accepted, 1 when it is rejected and
//! 2 when the inputs cannot be read.

mod report;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use sql_binder_catalog::StaticCatalog;
use sql_binder_ir::Statement;
use sql_binder_semantic::{BinderConfig, bind};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::report::BindReport;

/// Resolve the identifiers of a SQL statement against a catalog
#[derive(Parser)]
#[command(name = "sql-binder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Catalog definition (YAML, or JSON with a .json extension)
    #[arg(long)]
    catalog: PathBuf,

    /// Statement AST as JSON
    #[arg(long)]
    statement: PathBuf,

    /// Binder configuration (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Schema for unqualified table names; overrides the config file
    #[arg(long)]
    default_schema: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout stays machine-readable
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: failed to set tracing subscriber: {err}");
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => BinderConfig::from_yaml_str(&read(path)?)
            .with_context(|| format!("invalid config {}", path.display()))?,
        None => BinderConfig::default(),
    };
    if let Some(schema) = cli.default_schema {
        config.default_schema = schema;
    }

    let catalog = StaticCatalog::from_file(&cli.catalog)
        .with_context(|| format!("invalid catalog {}", cli.catalog.display()))?;
    let info = config
        .load_snapshot(&catalog)
        .await
        .context("failed to load catalog snapshot")?;

    let mut stmt: Statement = serde_json::from_str(&read(&cli.statement)?)
        .with_context(|| format!("invalid statement {}", cli.statement.display()))?;

    let outcome = bind(&mut stmt, &info, &config);
    tracing::info!(accepted = outcome.is_ok(), "bind finished");
    let report = BindReport::new(&stmt, outcome.as_ref().map(|_| ()));

    match cli.format {
        Format::Text => print!("{}", report.render_text()),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
