//! Integration test suite.
//!
//! 1. Inference from JSON/TBL sample pairs
//! 2. Catalog persistence and deduplication
//! 3. Catalog auditing

pub mod analyzer_tests;
pub mod catalog_tests;
pub mod helpers;
pub mod validation_tests;
