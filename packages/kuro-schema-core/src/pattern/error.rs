/// Error type for pattern parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("unexpected character '{found}' at position {position}")]
    UnexpectedChar { position: usize, found: char },

    #[error("repeat count at position {position} is not followed by a type code")]
    DanglingCount { position: usize },

    #[error("repeat count or total size overflows at position {position}")]
    CountOverflow { position: usize },
}
