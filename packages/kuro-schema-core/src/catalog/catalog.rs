//! In-memory schema catalog with JSON persistence.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use super::io_utils::{backup_path, classify_io_error, read_file, retry_io_operation};
use super::schema::Schema;
use crate::error::{AlreadyExists, Result, SchemaError};

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 100;

/// Successful catalog insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inserted {
    /// Position of the new entry
    pub index: usize,
}

/// Ordered schema collection, logically a set keyed by
/// `(table_header, schema_length)`.
///
/// Entries are never mutated once inserted. Documents loaded from disk are
/// kept as-is, so duplicates that bypassed the insert gate survive loading
/// and are left for the validator to report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaCatalog {
    schemas: Vec<Schema>,
}

impl SchemaCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing entries without deduplicating them.
    pub fn from_schemas(schemas: Vec<Schema>) -> Self {
        Self { schemas }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Entries in insertion order.
    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Schema> {
        self.schemas.iter()
    }

    /// Finds the entry for a key.
    pub fn get(&self, table_header: &str, schema_length: u32) -> Option<&Schema> {
        self.schemas
            .iter()
            .find(|s| s.key() == (table_header, schema_length))
    }

    /// Checks whether an entry exists for `(table_header, schema_length)`.
    pub fn exists(&self, table_header: &str, schema_length: u32) -> bool {
        self.get(table_header, schema_length).is_some()
    }

    /// Appends a schema unless its key is already present.
    ///
    /// # Arguments
    /// * `schema` - Entry to insert
    ///
    /// # Returns
    /// `Ok(Inserted)` with the new index, or `Err(AlreadyExists)` when the
    /// key is taken. The existing entry is left untouched.
    pub fn insert(&mut self, schema: Schema) -> std::result::Result<Inserted, AlreadyExists> {
        if self.exists(&schema.table_header, schema.schema_length) {
            return Err(AlreadyExists {
                table_header: schema.table_header,
                schema_length: schema.schema_length,
            });
        }
        self.schemas.push(schema);
        Ok(Inserted {
            index: self.schemas.len() - 1,
        })
    }

    /// Loads a catalog from a JSON array document.
    ///
    /// A missing file yields an empty catalog.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_retry(path, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS)
    }

    /// Loads a catalog, retrying transient read failures.
    pub fn load_with_retry(path: &Path, max_retries: u32, retry_delay_ms: u64) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "catalog file not found, starting empty");
            return Ok(Self::new());
        }

        let contents = retry_io_operation(
            || read_file(path),
            max_retries,
            retry_delay_ms,
            "load_catalog",
        )?;
        let schemas: Vec<Schema> = serde_json::from_slice(&contents).map_err(|e| {
            SchemaError::SerializationError(format!(
                "Failed to parse catalog '{}': {}",
                path.display(),
                e
            ))
        })?;

        info!(path = %path.display(), schemas = schemas.len(), "loaded catalog");
        Ok(Self { schemas })
    }

    /// Writes the catalog as pretty-printed JSON.
    ///
    /// # Arguments
    /// * `path` - Destination file
    /// * `backup` - Copy an existing file to `<path>.backup` first
    ///
    /// # Returns
    /// `Result<()>` indicating success or failure.
    pub fn save(&self, path: &Path, backup: bool) -> Result<()> {
        self.save_with_retry(path, backup, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS)
    }

    /// Writes the catalog, retrying transient I/O failures.
    pub fn save_with_retry(
        &self,
        path: &Path,
        backup: bool,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<()> {
        if backup && path.exists() {
            let backup = backup_path(path);
            retry_io_operation(
                || {
                    fs::copy(path, &backup)
                        .map(|_| ())
                        .map_err(|e| classify_io_error(e, "Failed to create catalog backup"))
                },
                max_retries,
                retry_delay_ms,
                "backup_catalog",
            )?;
            info!(backup = %backup.display(), "catalog backup created");
        }

        let json = self.to_json()?;
        retry_io_operation(
            || Self::write_internal(path, &json),
            max_retries,
            retry_delay_ms,
            "save_catalog",
        )?;

        info!(path = %path.display(), schemas = self.schemas.len(), "catalog saved");
        Ok(())
    }

    /// Serializes entries with four-space indentation, non-ASCII unescaped.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.schemas
            .serialize(&mut serializer)
            .map_err(|e| SchemaError::SerializationError(e.to_string()))?;
        Ok(buf)
    }

    fn write_internal(path: &Path, json: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| classify_io_error(e, "Failed to create catalog directory"))?;
        }

        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let mut file = File::create(&temp_path)
            .map_err(|e| classify_io_error(e, "Failed to create temp file"))?;
        file.write_all(json)
            .map_err(|e| classify_io_error(e, "Failed to write catalog"))?;
        file.sync_all()
            .map_err(|e| classify_io_error(e, "Failed to sync catalog"))?;

        fs::rename(&temp_path, path)
            .map_err(|e| classify_io_error(e, "Failed to rename catalog file"))?;
        debug!(path = %path.display(), bytes = json.len(), "catalog written");
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SchemaCatalog {
    type Item = &'a Schema;
    type IntoIter = std::slice::Iter<'a, Schema>;

    fn into_iter(self) -> Self::IntoIter {
        self.schemas.iter()
    }
}
