// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata types for database schema information
//!
//! Tables, columns and functions as the catalog describes them. The binder
//! only reads these; column types are carried through to the annotations but
//! never checked.
//!
//! All optional attributes default when deserializing, so a catalog file can
//! be as short as:
//!
//! ```yaml
//! - name: t1
//!   schema: test
//!   columns:
//!     - { name: c1, data_type: Integer }
//!     - { name: c2, data_type: Integer }
//! ```

use serde::{Deserialize, Serialize};

/// SQL data types (unified across dialects)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DataType {
    // Numeric types
    Integer,
    BigInt,
    SmallInt,
    TinyInt,
    Decimal,
    Float,
    Double,

    // String types
    Varchar(Option<usize>),
    Char(Option<usize>),
    Text,

    // Binary types
    Blob,

    // Date/Time types
    Date,
    Time,
    DateTime,
    Timestamp,

    Boolean,
    Json,

    // Unknown/Other (with original type name)
    Other(String),
}

/// Table type classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableType {
    #[default]
    Table,
    View,
    /// Output of a subquery in FROM; never stored in a catalog
    Derived,
    Other(String),
}

/// Metadata for a database column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Whether the column is nullable
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Whether this is a primary key column
    #[serde(default)]
    pub is_primary_key: bool,
}

fn default_nullable() -> bool {
    true
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            is_primary_key: false,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Mark as primary key (implies NOT NULL)
    pub fn with_primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.nullable = false;
        self
    }
}

/// Metadata for a database table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name
    pub name: String,
    /// Schema/database name
    #[serde(default)]
    pub schema: String,
    /// Column definitions, in ordinal order
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
    /// Table type (TABLE, VIEW, ...)
    #[serde(default)]
    pub table_type: TableType,
}

impl TableMetadata {
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            columns: Vec::new(),
            table_type: TableType::Table,
        }
    }

    pub fn with_columns(mut self, columns: Vec<ColumnMetadata>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        self
    }

    /// Get column by exact name
    pub fn get_column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// `schema.name`, or just `name` for tables without a schema
    pub fn qualified_name(&self) -> String {
        if self.schema.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.schema, self.name)
        }
    }
}

/// Function classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionType {
    #[default]
    Scalar,
    Aggregate,
    Window,
}

/// Metadata for a database function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionMetadata {
    /// Function name
    pub name: String,
    /// Return type
    pub return_type: DataType,
    /// Function type (scalar, aggregate, window)
    #[serde(default)]
    pub function_type: FunctionType,
}

impl FunctionMetadata {
    pub fn new(name: impl Into<String>, return_type: DataType) -> Self {
        Self {
            name: name.into(),
            return_type,
            function_type: FunctionType::Scalar,
        }
    }

    /// Shorthand for an aggregate function
    pub fn aggregate(name: impl Into<String>, return_type: DataType) -> Self {
        Self::new(name, return_type).with_type(FunctionType::Aggregate)
    }

    pub fn with_type(mut self, function_type: FunctionType) -> Self {
        self.function_type = function_type;
        self
    }

    pub fn is_aggregate(&self) -> bool {
        self.function_type == FunctionType::Aggregate
    }
}
