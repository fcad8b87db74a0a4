use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};
use crate::types::ValueTag;

/// A KuroTools column datatype.
#[derive(Debug, Clone, PartialEq)]
pub enum KuroDataType<'a> {
    /// Fixed-width number with its pattern code
    Scalar { code: char, size: u32 },
    /// 8-byte string-table offset
    TextOffset,
    /// 8-byte offset plus 4-byte count; `wide` for `u32array`
    Array { wide: bool },
    /// Opaque `dataN` blob of `N` bytes
    Data(u32),
    /// Block of columns repeated `count` times
    Nested {
        count: u64,
        schema: &'a Map<String, Value>,
    },
}

fn scalar(name: &str) -> Option<(char, u32)> {
    let encoding = match name {
        "byte" => ('b', 1),
        "ubyte" => ('B', 1),
        "short" => ('h', 2),
        "ushort" => ('H', 2),
        "int" => ('i', 4),
        "uint" => ('I', 4),
        "long" => ('q', 8),
        "ulong" => ('Q', 8),
        "float" => ('f', 4),
        _ => return None,
    };
    Some(encoding)
}

impl<'a> KuroDataType<'a> {
    /// Parses a datatype value.
    pub fn parse(table: &str, value: &'a Value) -> Result<Self> {
        let unknown = || SchemaError::UnknownDataType {
            table: table.to_string(),
            datatype: value.to_string(),
        };

        if let Value::Object(block) = value {
            let count = block.get("size").and_then(Value::as_u64).ok_or_else(unknown)?;
            let schema = block
                .get("schema")
                .and_then(Value::as_object)
                .ok_or_else(unknown)?;
            return Ok(KuroDataType::Nested { count, schema });
        }

        let name = value.as_str().ok_or_else(unknown)?;
        if let Some(len) = name.strip_prefix("data") {
            // Bare "data" has no size
            return len.parse().map(KuroDataType::Data).map_err(|_| unknown());
        }
        if name.starts_with("toffset") {
            return Ok(KuroDataType::TextOffset);
        }
        if name.ends_with("array") {
            return Ok(KuroDataType::Array {
                wide: name.starts_with("u32"),
            });
        }
        scalar(name)
            .map(|(code, size)| KuroDataType::Scalar { code, size })
            .ok_or_else(unknown)
    }

    /// Byte width of a flat datatype; nested blocks report zero.
    pub fn size(&self) -> u64 {
        match self {
            KuroDataType::Scalar { size, .. } => u64::from(*size),
            KuroDataType::TextOffset => 8,
            KuroDataType::Array { .. } => 12,
            KuroDataType::Data(len) => u64::from(*len),
            KuroDataType::Nested { .. } => 0,
        }
    }

    /// Pattern tokens and value tag of a flat datatype.
    pub fn encoding(&self) -> (String, ValueTag) {
        match self {
            KuroDataType::Scalar { code, .. } => (code.to_string(), ValueTag::Numeric),
            KuroDataType::TextOffset => ("Q".to_string(), ValueTag::Text),
            KuroDataType::Array { wide: true } => ("QI".to_string(), ValueTag::Array32),
            KuroDataType::Array { wide: false } => ("QI".to_string(), ValueTag::Array16),
            KuroDataType::Data(len) => (format!("{}s", len), ValueTag::Numeric),
            KuroDataType::Nested { .. } => (String::new(), ValueTag::Numeric),
        }
    }
}
