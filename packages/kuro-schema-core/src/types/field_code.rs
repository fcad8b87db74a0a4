/// Primitive encoding chosen for one column of a candidate layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCode {
    /// `B`
    UByte,
    /// `H`
    UShort,
    /// `I`
    UInt,
    /// `Q`
    ULong,
    /// `f`
    Float,
    /// `Q` holding a string-table offset
    TextOffset,
    /// `2Q`: 8-byte offset followed by 8-byte count
    ArrayRef,
}

impl FieldCode {
    /// Encoded width in bytes.
    pub fn size(self) -> u32 {
        match self {
            FieldCode::UByte => 1,
            FieldCode::UShort => 2,
            FieldCode::UInt | FieldCode::Float => 4,
            FieldCode::ULong | FieldCode::TextOffset => 8,
            FieldCode::ArrayRef => 16,
        }
    }

    /// Token emitted into a pattern string.
    pub fn code(self) -> &'static str {
        match self {
            FieldCode::UByte => "B",
            FieldCode::UShort => "H",
            FieldCode::UInt => "I",
            FieldCode::ULong | FieldCode::TextOffset => "Q",
            FieldCode::Float => "f",
            FieldCode::ArrayRef => "2Q",
        }
    }
}
