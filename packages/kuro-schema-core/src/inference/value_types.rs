use serde_json::{Map, Value};

use crate::types::ValueTag;

/// Default number of non-null samples inspected per column.
pub const DEFAULT_SAMPLE_ROWS: usize = 20;

/// Shape of a single JSON value as seen by the inferer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueShape {
    Number,
    String,
    Array,
    Other,
}

impl ValueShape {
    fn of(value: &Value) -> Self {
        match value {
            Value::Number(_) => ValueShape::Number,
            Value::String(_) => ValueShape::String,
            Value::Array(_) => ValueShape::Array,
            Value::Null | Value::Bool(_) | Value::Object(_) => ValueShape::Other,
        }
    }
}

/// Infers a semantic tag for each column from sample JSON rows.
///
/// Samples are the first non-null values in row order, so the result is
/// deterministic for a given document.
#[derive(Debug, Clone)]
pub struct ValueTypeInferer {
    sample_rows: usize,
}

impl Default for ValueTypeInferer {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_ROWS)
    }
}

impl ValueTypeInferer {
    /// Creates an inferer inspecting at most `sample_rows` values per column.
    pub fn new(sample_rows: usize) -> Self {
        Self { sample_rows }
    }

    /// Infers the tag of a single column.
    ///
    /// Numbers give `Numeric`, strings `Text`, arrays `Array32`. Mixed,
    /// unrecognized or empty columns fall back to `Numeric`.
    pub fn infer_column<'a, I>(&self, values: I) -> ValueTag
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut shapes = values
            .into_iter()
            .filter(|v| !v.is_null())
            .take(self.sample_rows)
            .map(ValueShape::of);

        let Some(first) = shapes.next() else {
            return ValueTag::Numeric;
        };
        if shapes.any(|shape| shape != first) {
            return ValueTag::Numeric;
        }

        match first {
            ValueShape::Number | ValueShape::Other => ValueTag::Numeric,
            ValueShape::String => ValueTag::Text,
            // 16-bit arrays cannot be told apart from the JSON side
            ValueShape::Array => ValueTag::Array32,
        }
    }

    /// Infers one tag per key over a table's rows.
    ///
    /// # Arguments
    /// * `rows` - Parsed row objects in document order
    /// * `keys` - Column names in output order
    ///
    /// # Returns
    /// `Vec<ValueTag>` aligned with `keys`.
    pub fn infer_tags(&self, rows: &[Map<String, Value>], keys: &[String]) -> Vec<ValueTag> {
        keys.iter()
            .map(|key| self.infer_column(rows.iter().filter_map(|row| row.get(key))))
            .collect()
    }
}
