//! Column semantic tags and the primitive encodings a column may take.

mod field_code;
mod value_tag;

pub use field_code::FieldCode;
pub use value_tag::ValueTag;

#[cfg(test)]
mod tests {
    use super::*;
    use ntest::timeout;

    #[timeout(1000)]
    #[test]
    fn test_value_tag_char_round_trip() {
        for tag in ValueTag::ALL {
            assert_eq!(ValueTag::from_char(tag.as_char()), Some(tag));
        }
        assert_eq!(ValueTag::from_char('x'), None);
    }

    #[timeout(1000)]
    #[test]
    fn test_tags_to_string() {
        let tags = [
            ValueTag::Numeric,
            ValueTag::Text,
            ValueTag::Array32,
            ValueTag::Array16,
        ];
        assert_eq!(ValueTag::join(&tags), "ntab");
    }

    #[timeout(1000)]
    #[test]
    fn test_candidate_menu_order() {
        assert_eq!(
            ValueTag::Numeric.candidate_codes(),
            &[
                FieldCode::UByte,
                FieldCode::UShort,
                FieldCode::UInt,
                FieldCode::ULong,
                FieldCode::Float,
            ]
        );
        assert_eq!(ValueTag::Text.candidate_codes(), &[FieldCode::TextOffset]);
        assert_eq!(ValueTag::Array16.candidate_codes(), &[FieldCode::ArrayRef]);
    }

    #[timeout(1000)]
    #[test]
    fn test_field_code_sizes() {
        assert_eq!(FieldCode::UByte.size(), 1);
        assert_eq!(FieldCode::UShort.size(), 2);
        assert_eq!(FieldCode::UInt.size(), 4);
        assert_eq!(FieldCode::Float.size(), 4);
        assert_eq!(FieldCode::ULong.size(), 8);
        assert_eq!(FieldCode::TextOffset.size(), 8);
        assert_eq!(FieldCode::ArrayRef.size(), 16);
        assert_eq!(FieldCode::ArrayRef.code(), "2Q");
    }
}
