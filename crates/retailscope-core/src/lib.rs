//! Core contracts for retailscope.
//!
//! This crate defines the five retail relations, the in-memory `Dataset`
//! snapshot the reports borrow, the static table catalog, and integrity
//! validation shared by the loaders and the CLI.

pub mod catalog;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod model;
pub mod validation;

pub use catalog::{CATALOG, ColumnDef, ForeignKeyDef, SqlType, TableDef, table_def};
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use graph::load_order;
pub use model::{Category, Product, RepairStatus, Sale, Store, WarrantyClaim};
pub use validation::{IssueSeverity, ValidationIssue, ValidationReport, validate_dataset};

/// Contract version for dataset and report artifacts.
pub const DATASET_VERSION: &str = "0.1";
