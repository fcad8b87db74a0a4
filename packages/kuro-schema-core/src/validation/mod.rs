//! Advisory audit of schema catalogs.
//!
//! Validation never mutates the catalog and never stops early: every entry is
//! checked and all findings are accumulated into a [`ValidationReport`].

mod audit;
mod entry;
mod report;

pub use audit::SchemaValidator;
pub use report::{
    CatalogStats, DuplicateGroup, EntryIssue, EntryReport, Finding, PairDiff, SchemaDiff,
    Severity, TableStats, ValidationReport,
};
