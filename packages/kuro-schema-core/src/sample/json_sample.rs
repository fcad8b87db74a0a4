use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::catalog::read_file;
use crate::error::{Result, SchemaError};

/// One table of a decoded JSON document.
#[derive(Debug, Clone)]
pub struct JsonTable {
    /// Table name from the header entry
    pub name: String,
    /// Header `schema` label, `"Unknown"` when absent
    pub schema_version: String,
    /// Column names of the first row, in document order
    pub keys: Vec<String>,
    /// Row objects in document order
    pub rows: Vec<Map<String, Value>>,
}

impl JsonTable {
    /// Leading rows inspected during inference, at most `limit`.
    pub fn sample_rows(&self, limit: usize) -> &[Map<String, Value>] {
        &self.rows[..self.rows.len().min(limit)]
    }
}

/// Decoded JSON document with `headers` and `data` sections.
#[derive(Debug, Clone, Default)]
pub struct JsonSample {
    /// Tables that have at least one row, in header order
    pub tables: Vec<JsonTable>,
}

impl JsonSample {
    /// Reads and parses a JSON document from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = read_file(path)?;
        let text = String::from_utf8(contents).map_err(|e| SchemaError::MalformedJson {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&text, path)
    }

    /// Parses a JSON document.
    ///
    /// # Arguments
    /// * `text` - Document contents
    /// * `path` - Source path for error context
    ///
    /// # Returns
    /// `Result<JsonSample>`; tables without rows are skipped.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let document: Value = serde_json::from_str(text).map_err(|e| SchemaError::MalformedJson {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let non_standard = |reason: &str| SchemaError::NonStandardDocument {
            path: PathBuf::from(path),
            reason: reason.to_string(),
        };

        let headers = document
            .get("headers")
            .and_then(Value::as_array)
            .ok_or_else(|| non_standard("missing 'headers' array"))?;
        let data = document
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| non_standard("missing 'data' array"))?;

        let mut tables = Vec::new();
        for header in headers {
            let name = header
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| non_standard("header entry without 'name'"))?;
            let schema_version = header
                .get("schema")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string();

            let section_rows = data
                .iter()
                .find(|section| section.get("name").and_then(Value::as_str) == Some(name))
                .and_then(|section| section.get("data"))
                .and_then(Value::as_array);

            let rows: Vec<Map<String, Value>> = match section_rows {
                Some(rows) => rows
                    .iter()
                    .map(|row| {
                        row.as_object()
                            .cloned()
                            .ok_or_else(|| non_standard("row is not an object"))
                    })
                    .collect::<Result<_>>()?,
                None => Vec::new(),
            };

            let Some(first) = rows.first() else {
                debug!(table = name, "skipping table without rows");
                continue;
            };
            let keys = first.keys().cloned().collect();

            tables.push(JsonTable {
                name: name.to_string(),
                schema_version,
                keys,
                rows,
            });
        }

        Ok(Self { tables })
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Option<&JsonTable> {
        self.tables.iter().find(|t| t.name == name)
    }
}
