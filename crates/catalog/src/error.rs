// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for Catalog operations

use serde::Serialize;
use thiserror::Error;

/// Result type alias for Catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while reading or snapshotting a catalog
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum CatalogError {
    /// The backing store could not be reached
    #[error("Failed to connect to catalog: {0}")]
    ConnectionFailed(String),

    /// A metadata query failed
    #[error("Catalog query failed: {0}")]
    QueryFailed(String),

    /// Requested table was not found
    #[error("Table '{0}' not found in schema '{1}'")]
    TableNotFound(String, String),

    /// Two tables normalize to the same `schema.table` key
    #[error("Duplicate table '{0}' in schema '{1}'")]
    DuplicateTable(String, String),

    /// Invalid schema name provided
    #[error("Invalid schema name: {0}")]
    InvalidSchema(String),

    /// Failed to serialize or deserialize schema data
    #[error("Failed to parse catalog definition: {0}")]
    SerializationError(String),

    /// The specified feature is not supported by this catalog implementation
    #[error("Feature not supported: {0}")]
    NotSupported(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for CatalogError {
    fn from(err: serde_yaml::Error) -> Self {
        CatalogError::SerializationError(err.to_string())
    }
}
