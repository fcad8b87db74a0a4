//! Schema inference and schema catalog for Kuro DLC binary tables.
//!
//! Derives per-record byte layouts from a decoded JSON sample and the
//! binary TBL file it came from, keeps them in a deduplicated catalog,
//! and audits catalogs for consistency.

pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod error;
pub mod inference;
pub mod kurotools;
pub mod pattern;
pub mod sample;
pub mod types;
pub mod validation;

pub use analyzer::SchemaAnalyzer;
pub use catalog::{Schema, SchemaCatalog};
pub use config::ToolConfig;
pub use error::{Result, SchemaError};
pub use validation::{SchemaValidator, ValidationReport};
