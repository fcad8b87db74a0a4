//! Catalog entry structs.

use serde::{Deserialize, Serialize};

use crate::types::ValueTag;

/// One catalog entry: the layout of a table at a given record length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Provenance label, e.g. game and schema version
    #[serde(default)]
    pub info_comment: String,
    /// Table (section) name
    pub table_header: String,
    /// Record length in bytes
    pub schema_length: u32,
    /// Struct layout
    #[serde(rename = "schema")]
    pub layout: SchemaLayout,
}

/// Nested layout object of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaLayout {
    /// Pattern string in the packed-struct mini-language
    #[serde(rename = "schema")]
    pub pattern: String,
    /// Record length implied by the layout; equals `schema_length`
    #[serde(rename = "sch_len")]
    pub declared_length: u32,
    /// Column names
    pub keys: Vec<String>,
    /// One tag character per key
    pub values: String,
    /// Primary key column, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
}

impl Schema {
    /// Builds an entry whose declared length mirrors `schema_length`.
    pub fn new(
        table_header: impl Into<String>,
        schema_length: u32,
        info_comment: impl Into<String>,
        pattern: impl Into<String>,
        keys: Vec<String>,
        values: impl Into<String>,
    ) -> Self {
        Self {
            info_comment: info_comment.into(),
            table_header: table_header.into(),
            schema_length,
            layout: SchemaLayout {
                pattern: pattern.into(),
                declared_length: schema_length,
                keys,
                values: values.into(),
                primary_key: None,
            },
        }
    }

    /// Dedup key.
    pub fn key(&self) -> (&str, u32) {
        (&self.table_header, self.schema_length)
    }

    /// Parsed value tags; `None` entries mark unknown characters.
    pub fn value_tags(&self) -> Vec<Option<ValueTag>> {
        self.layout.values.chars().map(ValueTag::from_char).collect()
    }
}
