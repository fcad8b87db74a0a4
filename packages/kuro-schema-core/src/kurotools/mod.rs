//! Conversion of KuroTools header schemas into catalog entries.
//!
//! A KuroTools schema directory holds `headers/<table>.json`, each mapping a
//! variant name to `{"game": ..., "schema": {column: datatype}}`. Datatypes
//! are scalar names (`uint`, `float`, ...), `toffset`, `*array`, `dataN`, or
//! nested `{"size": n, "schema": {...}}` blocks repeated `n` times.

mod datatype;

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use crate::catalog::{classify_io_error, read_file, Schema, SchemaCatalog};
use crate::error::{Result, SchemaError};
use crate::types::ValueTag;

pub use datatype::KuroDataType;

/// Suffix appended to the game name in `info_comment`.
const CONVERTED_SUFFIX: &str = " - Converted from KuroTools";

/// Result of converting every loaded header file.
#[derive(Debug, Clone, Default)]
pub struct KuroToolsConversion {
    /// Header files found
    pub tables_found: usize,
    /// One entry per successfully converted variant
    pub converted: Vec<Schema>,
    /// Variants that could not be converted
    pub failures: Vec<SchemaError>,
}

/// Result of merging converted entries into a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub original_count: usize,
    pub tables_found: usize,
    pub converted_count: usize,
    /// Entries that were new to the catalog
    pub added: Vec<Schema>,
    /// Entries skipped because the key already existed
    pub existing: usize,
    pub total: usize,
}

impl MergeSummary {
    /// Plain-text conversion report.
    pub fn render_report(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(70);
        let _ = writeln!(out, "KuroTools Schema Conversion Report");
        let _ = writeln!(out, "{}\n", rule);
        let _ = writeln!(out, "Original schemas: {}", self.original_count);
        let _ = writeln!(out, "KuroTools schemas found: {}", self.tables_found);
        let _ = writeln!(out, "Converted schemas: {}", self.converted_count);
        let _ = writeln!(out, "New schemas added: {}", self.added.len());
        let _ = writeln!(out, "Total schemas: {}\n", self.total);
        let _ = writeln!(out, "New Schema Tables:");
        let _ = writeln!(out, "{}", "-".repeat(70));
        for schema in &self.added {
            let _ = writeln!(
                out,
                "  {:40} Size: {:4}  Game: {}",
                schema.table_header, schema.schema_length, schema.info_comment
            );
        }
        out
    }
}

/// Flattened columns produced from one schema object.
#[derive(Debug, Default)]
struct Columns {
    pattern: String,
    keys: Vec<String>,
    tags: Vec<ValueTag>,
    size: u64,
}

impl Columns {
    fn push(&mut self, table: &str, key: String, datatype: &Value) -> Result<()> {
        match KuroDataType::parse(table, datatype)? {
            KuroDataType::Nested { count, schema } => {
                for i in 0..count {
                    for (inner_key, inner_type) in schema {
                        self.push(table, format!("{}_{}_{}", key, i, inner_key), inner_type)?;
                    }
                }
            }
            flat => {
                let (code, tag) = flat.encoding();
                self.pattern.push_str(&code);
                self.keys.push(key);
                self.tags.push(tag);
                self.size += flat.size();
                if self.size > u64::from(u32::MAX) {
                    return Err(SchemaError::RecordTooLarge {
                        table: table.to_string(),
                        size: self.size,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Converts one schema variant into a catalog entry.
///
/// # Arguments
/// * `table` - Table name (header file stem)
/// * `variant_name` - Variant key, used as the game name when `game` is absent
/// * `variant` - Variant object with `game` and `schema`
///
/// # Returns
/// `Result<Schema>`; unknown datatypes fail the whole variant.
pub fn convert_variant(table: &str, variant_name: &str, variant: &Value) -> Result<Schema> {
    let game = variant
        .get("game")
        .and_then(Value::as_str)
        .unwrap_or(variant_name);

    let mut columns = Columns::default();
    if let Some(schema) = variant.get("schema").and_then(Value::as_object) {
        for (key, datatype) in schema {
            columns.push(table, key.clone(), datatype)?;
        }
    }

    // Bounded by `Columns::push`
    let size = columns.size as u32;
    let mut entry = Schema::new(
        table,
        size,
        format!("{}{}", game, CONVERTED_SUFFIX),
        format!("<{}", columns.pattern),
        columns.keys,
        ValueTag::join(&columns.tags),
    );
    if entry.layout.keys.iter().any(|k| k == "id") {
        entry.layout.primary_key = Some("id".to_string());
    }
    Ok(entry)
}

/// Loads `headers/*.json` from a KuroTools schema directory, sorted by name.
///
/// A missing `headers` directory yields no tables. Files that cannot be read
/// or parsed are logged and skipped.
pub fn load_headers(schemas_dir: &Path) -> Result<Vec<(String, Value)>> {
    let headers_dir = schemas_dir.join("headers");
    if !headers_dir.is_dir() {
        warn!(dir = %headers_dir.display(), "headers directory not found");
        return Ok(Vec::new());
    }

    let mut paths: Vec<_> = fs::read_dir(&headers_dir)
        .map_err(|e| classify_io_error(e, "Failed to list headers directory"))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut headers = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(table) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let parsed = read_file(&path).and_then(|bytes| {
            serde_json::from_slice::<Value>(&bytes).map_err(|e| SchemaError::MalformedJson {
                path: path.clone(),
                message: e.to_string(),
            })
        });
        match parsed {
            Ok(value) => headers.push((table.to_string(), value)),
            Err(err) => warn!(path = %path.display(), error = %err, "skipping header file"),
        }
    }
    Ok(headers)
}

/// Converts every variant of every loaded header.
pub fn convert_all(headers: &[(String, Value)]) -> KuroToolsConversion {
    let mut conversion = KuroToolsConversion {
        tables_found: headers.len(),
        ..Default::default()
    };

    for (table, variants) in headers {
        let Some(variants) = variants.as_object() else {
            warn!(table = %table, "header file is not an object of variants");
            continue;
        };
        let mut converted = 0;
        for (variant_name, variant) in variants {
            match convert_variant(table, variant_name, variant) {
                Ok(schema) => {
                    conversion.converted.push(schema);
                    converted += 1;
                }
                Err(err) => {
                    warn!(
                        table = %table,
                        variant = %variant_name,
                        error = %err,
                        "conversion failed"
                    );
                    conversion.failures.push(err);
                }
            }
        }
        if converted > 0 {
            info!(table = %table, variants = converted, "converted table");
        }
    }
    conversion
}

/// Merges converted entries into a catalog through its dedup gate.
pub fn merge_into(catalog: &mut SchemaCatalog, conversion: &KuroToolsConversion) -> MergeSummary {
    let mut summary = MergeSummary {
        original_count: catalog.len(),
        tables_found: conversion.tables_found,
        converted_count: conversion.converted.len(),
        ..Default::default()
    };

    for schema in &conversion.converted {
        match catalog.insert(schema.clone()) {
            Ok(_) => {
                info!(table = %schema.table_header, size = schema.schema_length, "added");
                summary.added.push(schema.clone());
            }
            Err(_) => {
                warn!(table = %schema.table_header, size = schema.schema_length, "exists");
                summary.existing += 1;
            }
        }
    }

    summary.total = catalog.len();
    summary
}

#[cfg(test)]
mod tests;
