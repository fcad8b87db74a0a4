//! Packed-struct pattern mini-language.
//!
//! A pattern is an optional byte-order marker followed by type codes, each
//! optionally prefixed by a decimal repeat count, e.g. `<I2QfB` or `<6I`.
//! Sizes follow the standard packed sizes (`B`=1, `H`=2, `I`=4, `Q`=8,
//! `f`=4, ...). With a standard marker (`<`, `>`, `!`, `=`) the size is
//! purely additive; with `@` or no marker each item is aligned to its own
//! size, matching native struct packing.

mod error;

use std::fmt;

pub use error::PatternError;

/// Byte-order marker at the head of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// `@` or no marker: native sizes with alignment
    Native,
    /// `=`: native order, standard sizes
    NativeStandard,
    /// `<`
    Little,
    /// `>`
    Big,
    /// `!`
    Network,
}

impl ByteOrder {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '@' => Some(ByteOrder::Native),
            '=' => Some(ByteOrder::NativeStandard),
            '<' => Some(ByteOrder::Little),
            '>' => Some(ByteOrder::Big),
            '!' => Some(ByteOrder::Network),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            ByteOrder::Native => '@',
            ByteOrder::NativeStandard => '=',
            ByteOrder::Little => '<',
            ByteOrder::Big => '>',
            ByteOrder::Network => '!',
        }
    }
}

/// One `[count]code` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternItem {
    /// Explicit repeat count, if written
    pub count: Option<u32>,
    /// Type code character
    pub code: char,
}

impl PatternItem {
    fn repeat(&self) -> usize {
        self.count.unwrap_or(1) as usize
    }

    /// Whether the count is a byte length (`s`, `p`) rather than a repeat.
    fn is_byte_string(&self) -> bool {
        matches!(self.code, 's' | 'p')
    }
}

/// Parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    byte_order: ByteOrder,
    explicit_order: bool,
    items: Vec<PatternItem>,
}

/// Standard (packed) size of a type code.
fn standard_size(code: char) -> Option<usize> {
    match code {
        'x' | 'c' | 'b' | 'B' | '?' | 's' | 'p' => Some(1),
        'h' | 'H' | 'e' => Some(2),
        'i' | 'I' | 'l' | 'L' | 'f' => Some(4),
        'q' | 'Q' | 'd' => Some(8),
        _ => None,
    }
}

/// Native size of a type code; differs from standard only for C `long`.
fn native_size(code: char) -> Option<usize> {
    match code {
        'l' | 'L' => Some(std::mem::size_of::<std::ffi::c_long>()),
        other => standard_size(other),
    }
}

impl Pattern {
    /// Parses a pattern string.
    ///
    /// # Arguments
    /// * `input` - Pattern text such as `<IIfQ`
    ///
    /// # Returns
    /// `Result<Pattern, PatternError>` with the parsed token stream.
    pub fn parse(input: &str) -> Result<Self, PatternError> {
        if input.trim().is_empty() {
            return Err(PatternError::Empty);
        }

        let mut chars = input.char_indices().peekable();
        let mut byte_order = ByteOrder::Native;
        let mut explicit_order = false;

        // The marker is only recognised as the very first character
        if let Some(order) = chars.peek().and_then(|&(_, c)| ByteOrder::from_char(c)) {
            byte_order = order;
            explicit_order = true;
            chars.next();
        }

        let mut items = Vec::new();
        let mut pending_count: Option<(usize, u32)> = None;

        for (position, c) in chars {
            if c.is_ascii_digit() {
                let digit = c.to_digit(10).unwrap_or(0);
                let (start, value) = pending_count.unwrap_or((position, 0));
                let value = value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(digit))
                    .ok_or(PatternError::CountOverflow { position })?;
                pending_count = Some((start, value));
                continue;
            }
            if c.is_ascii_whitespace() {
                if let Some((start, _)) = pending_count {
                    return Err(PatternError::DanglingCount { position: start });
                }
                continue;
            }
            if standard_size(c).is_none() {
                return Err(PatternError::UnexpectedChar { position, found: c });
            }
            items.push(PatternItem {
                count: pending_count.take().map(|(_, count)| count),
                code: c,
            });
        }

        if let Some((start, _)) = pending_count {
            return Err(PatternError::DanglingCount { position: start });
        }

        let pattern = Self {
            byte_order,
            explicit_order,
            items,
        };
        // Reject patterns whose size cannot be represented
        pattern.try_computed_size()?;
        Ok(pattern)
    }

    /// Byte-order marker in effect.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Parsed tokens.
    pub fn items(&self) -> &[PatternItem] {
        &self.items
    }

    /// Total byte size described by the pattern.
    pub fn computed_size(&self) -> usize {
        // Overflow is rejected at parse time
        self.try_computed_size().unwrap_or(usize::MAX)
    }

    fn try_computed_size(&self) -> Result<usize, PatternError> {
        let native = self.byte_order == ByteOrder::Native;
        let mut total: usize = 0;

        for (position, item) in self.items.iter().enumerate() {
            let overflow = PatternError::CountOverflow { position };
            let size = if native {
                native_size(item.code)
            } else {
                standard_size(item.code)
            }
            .ok_or(PatternError::UnexpectedChar {
                position,
                found: item.code,
            })?;

            if native && size > 1 && !item.is_byte_string() {
                let remainder = total % size;
                if remainder != 0 {
                    total = total.checked_add(size - remainder).ok_or(overflow.clone())?;
                }
            }

            let span = if item.is_byte_string() {
                item.repeat()
            } else {
                size.checked_mul(item.repeat()).ok_or(overflow.clone())?
            };
            total = total.checked_add(span).ok_or(overflow)?;
        }

        Ok(total)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.explicit_order {
            write!(f, "{}", self.byte_order.as_char())?;
        }
        for item in &self.items {
            if let Some(count) = item.count {
                write!(f, "{}", count)?;
            }
            write!(f, "{}", item.code)?;
        }
        Ok(())
    }
}

/// Computes the byte size implied by a pattern string.
///
/// # Arguments
/// * `pattern` - Pattern text
///
/// # Returns
/// `Result<usize, PatternError>` containing the size in bytes.
pub fn computed_size(pattern: &str) -> Result<usize, PatternError> {
    Pattern::parse(pattern).map(|p| p.computed_size())
}
