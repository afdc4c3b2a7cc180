// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for the SQL binder
//!
//! This crate provides common testing components including:
//! - Mock catalog implementations
//! - Statement builders for binder tests
//! - Assertions over bound statements

pub mod assertions;
pub mod fixtures;
pub mod mock_catalog;

// Re-exports for convenience
pub use assertions::{
    assert_fully_resolved, assert_resolves_to, assert_select_field, column_references,
    find_column, unresolved_references,
};
pub use fixtures::BinderFixtures;
pub use mock_catalog::{MockCatalog, MockCatalogBuilder};
