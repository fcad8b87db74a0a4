//! Schema tooling error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::pattern::PatternError;

/// Rejection returned when a catalog already holds a schema for the same
/// `(table_header, schema_length)` key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Schema for table '{table_header}' with length {schema_length} already exists")]
pub struct AlreadyExists {
    pub table_header: String,
    pub schema_length: u32,
}

/// Schema inference, catalog and conversion errors.
#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    /// Input file is not valid JSON
    #[error("Malformed JSON in '{}': {message}", path.display())]
    MalformedJson { path: PathBuf, message: String },

    /// JSON is valid but lacks the expected document structure
    #[error("Non-standard document '{}': {reason}", path.display())]
    NonStandardDocument { path: PathBuf, reason: String },

    /// Binary table file does not start with the expected marker
    #[error("Bad magic in '{}': expected {expected:?}, found {found:?}", path.display())]
    BadMagic {
        path: PathBuf,
        expected: [u8; 4],
        found: Vec<u8>,
    },

    /// Binary table file ends before a complete structure could be read
    #[error(
        "Truncated '{}' while reading {context}: needed {needed} bytes, {available} available",
        path.display()
    )]
    Truncated {
        path: PathBuf,
        context: String,
        needed: usize,
        available: usize,
    },

    /// Section name is not valid UTF-8
    #[error("Invalid UTF-8 in '{}' while reading {context}", path.display())]
    InvalidUtf8 { path: PathBuf, context: String },

    /// Pattern string cannot be interpreted
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] PatternError),

    /// Duplicate catalog insert
    #[error(transparent)]
    AlreadyExists(#[from] AlreadyExists),

    /// KuroTools datatype with no known encoding
    #[error("Unknown data type '{datatype}' in table '{table}'")]
    UnknownDataType { table: String, datatype: String },

    /// Converted record does not fit the u32 length field
    #[error("Record of table '{table}' is too large: {size} bytes")]
    RecordTooLarge { table: String, size: u64 },

    /// Configuration file or override is invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),

    /// Transient I/O error that may succeed on retry
    #[error("Transient I/O error: {0}")]
    TransientIoError(String),

    /// Disk full error while writing the catalog
    #[error("Disk full: {0}")]
    DiskFull(String),
}

/// Result alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
