// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata types for database schema information
//!
//! Re-exported from `sql-binder-ir` so catalog implementors only need this
//! crate.

pub use sql_binder_ir::{
    ColumnMetadata, DataType, FunctionMetadata, FunctionType, TableMetadata, TableType,
};
