//! Catalog-wide audit: duplicate detection, pairwise diffs and statistics.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use super::entry::validate_entry;
use super::report::{
    CatalogStats, DuplicateGroup, EntryReport, PairDiff, SchemaDiff, ValidationReport,
};
use crate::catalog::{read_file, SchemaCatalog};
use crate::error::{Result, SchemaError};

const UNKNOWN: &str = "Unknown";

/// Read-only auditor for schema catalogs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    /// Reads a catalog file as raw JSON entries, keeping malformed ones.
    pub fn load_document(path: &Path) -> Result<Vec<Value>> {
        let contents = read_file(path)?;
        serde_json::from_slice(&contents).map_err(|e| SchemaError::MalformedJson {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Audits a typed catalog.
    pub fn validate_catalog(&self, catalog: &SchemaCatalog) -> Result<ValidationReport> {
        let entries = catalog
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| SchemaError::SerializationError(e.to_string()))?;
        Ok(self.validate_document(&entries))
    }

    /// Audits raw catalog entries.
    ///
    /// # Arguments
    /// * `entries` - Catalog entries as parsed JSON
    ///
    /// # Returns
    /// `ValidationReport` covering every entry, duplicate groups and stats.
    pub fn validate_document(&self, entries: &[Value]) -> ValidationReport {
        let mut reports = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            let findings = validate_entry(entry);
            if findings.is_empty() {
                continue;
            }
            reports.push(EntryReport {
                index,
                table_header: str_field(entry, "table_header").map(str::to_string),
                schema_length: entry.get("schema_length").and_then(Value::as_u64),
                info_comment: str_field(entry, "info_comment").map(str::to_string),
                findings,
            });
        }

        let duplicates = Self::find_duplicates(entries);
        let stats = Self::collect_stats(entries);

        let report = ValidationReport {
            entry_count: entries.len(),
            entries: reports,
            duplicates,
            stats,
        };
        if report.has_errors() || !report.duplicates.is_empty() {
            warn!(
                entries = report.entry_count,
                errors = report.error_count(),
                warnings = report.warning_count(),
                duplicates = report.duplicates.len(),
                "catalog audit found problems"
            );
        } else {
            info!(
                entries = report.entry_count,
                warnings = report.warning_count(),
                "catalog audit passed"
            );
        }
        report
    }

    /// Groups entries by `(table_header, schema_length)` and diffs each group.
    ///
    /// Entries without a usable key are left out. Groups keep the order in
    /// which their key first appears.
    pub fn find_duplicates(entries: &[Value]) -> Vec<DuplicateGroup> {
        let mut order: Vec<(String, u64)> = Vec::new();
        let mut groups: HashMap<(String, u64), Vec<usize>> = HashMap::new();

        for (index, entry) in entries.iter().enumerate() {
            let (Some(table), Some(length)) = (
                str_field(entry, "table_header"),
                entry.get("schema_length").and_then(Value::as_u64),
            ) else {
                continue;
            };
            let key = (table.to_string(), length);
            groups
                .entry(key.clone())
                .or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                })
                .push(index);
        }

        order
            .into_iter()
            .filter_map(|key| {
                let indices = groups.remove(&key)?;
                if indices.len() < 2 {
                    return None;
                }
                let base = indices[0];
                let diffs = indices[1..]
                    .iter()
                    .filter_map(|&other| {
                        let differences = Self::compare(&entries[base], &entries[other]);
                        (!differences.is_empty()).then_some(PairDiff {
                            base,
                            other,
                            differences,
                        })
                    })
                    .collect();
                Some(DuplicateGroup {
                    table_header: key.0,
                    schema_length: key.1,
                    indices,
                    diffs,
                })
            })
            .collect()
    }

    /// Structural differences between two entries' layouts.
    ///
    /// Keys report a count mismatch when lengths differ, otherwise the first
    /// diverging position.
    pub fn compare(left: &Value, right: &Value) -> Vec<SchemaDiff> {
        let mut differences = Vec::new();

        let left_pattern = layout_field(left, "schema");
        let right_pattern = layout_field(right, "schema");
        if left_pattern != right_pattern {
            differences.push(SchemaDiff::Pattern {
                left: render(left_pattern),
                right: render(right_pattern),
            });
        }

        let left_keys = layout_keys(left);
        let right_keys = layout_keys(right);
        if left_keys.len() != right_keys.len() {
            differences.push(SchemaDiff::KeyCount {
                left: left_keys.len(),
                right: right_keys.len(),
            });
        } else if let Some(index) = left_keys
            .iter()
            .zip(right_keys)
            .position(|(l, r)| l != r)
        {
            differences.push(SchemaDiff::Key {
                index,
                left: render(left_keys.get(index)),
                right: render(right_keys.get(index)),
            });
        }

        let left_values = layout_field(left, "values");
        let right_values = layout_field(right, "values");
        if left_values != right_values {
            differences.push(SchemaDiff::Values {
                left: render(left_values),
                right: render(right_values),
            });
        }

        differences
    }

    /// Counts by provenance label and by table.
    pub fn collect_stats(entries: &[Value]) -> CatalogStats {
        let mut stats = CatalogStats::default();
        for entry in entries {
            let comment = str_field(entry, "info_comment").unwrap_or(UNKNOWN);
            *stats
                .by_info_comment
                .entry(comment.to_string())
                .or_insert(0) += 1;

            let table = str_field(entry, "table_header").unwrap_or(UNKNOWN);
            let table_stats = stats.by_table.entry(table.to_string()).or_default();
            table_stats.entries += 1;
            if let Some(length) = entry.get("schema_length").and_then(Value::as_u64) {
                table_stats.lengths.insert(length);
            }
        }
        stats
    }
}

fn str_field<'a>(entry: &'a Value, field: &str) -> Option<&'a str> {
    entry.get(field).and_then(Value::as_str)
}

fn layout_field<'a>(entry: &'a Value, field: &str) -> Option<&'a Value> {
    entry.get("schema").and_then(|layout| layout.get(field))
}

fn layout_keys(entry: &Value) -> &[Value] {
    layout_field(entry, "keys")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Renders a JSON value for diff output, strings without quotes.
fn render(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "N/A".to_string(),
    }
}
