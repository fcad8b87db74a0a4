use std::fmt;

use super::field_code::FieldCode;

/// Semantic tag of a table column, stored as one character per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTag {
    /// `n`: integer or float
    Numeric,
    /// `t`: offset into the string table
    Text,
    /// `a`: array of 32-bit values
    Array32,
    /// `b`: array of 16-bit values
    Array16,
}

const NUMERIC_MENU: &[FieldCode] = &[
    FieldCode::UByte,
    FieldCode::UShort,
    FieldCode::UInt,
    FieldCode::ULong,
    FieldCode::Float,
];
const TEXT_MENU: &[FieldCode] = &[FieldCode::TextOffset];
const ARRAY_MENU: &[FieldCode] = &[FieldCode::ArrayRef];

impl ValueTag {
    /// All known tags in catalog character order.
    pub const ALL: [ValueTag; 4] = [
        ValueTag::Numeric,
        ValueTag::Text,
        ValueTag::Array32,
        ValueTag::Array16,
    ];

    /// Catalog character for this tag.
    pub fn as_char(self) -> char {
        match self {
            ValueTag::Numeric => 'n',
            ValueTag::Text => 't',
            ValueTag::Array32 => 'a',
            ValueTag::Array16 => 'b',
        }
    }

    /// Parses a catalog character. Returns `None` for unknown tags.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(ValueTag::Numeric),
            't' => Some(ValueTag::Text),
            'a' => Some(ValueTag::Array32),
            'b' => Some(ValueTag::Array16),
            _ => None,
        }
    }

    /// Primitive encodings tried for this tag, in search order.
    ///
    /// The order is part of the candidate search contract: the generator
    /// visits widths in exactly this sequence.
    pub fn candidate_codes(self) -> &'static [FieldCode] {
        match self {
            ValueTag::Numeric => NUMERIC_MENU,
            ValueTag::Text => TEXT_MENU,
            ValueTag::Array32 | ValueTag::Array16 => ARRAY_MENU,
        }
    }

    /// Whether the column is array-valued.
    pub fn is_array(self) -> bool {
        matches!(self, ValueTag::Array32 | ValueTag::Array16)
    }

    /// Renders a tag sequence as a catalog `values` string.
    pub fn join(tags: &[ValueTag]) -> String {
        tags.iter().map(|t| t.as_char()).collect()
    }
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
