use serde_json::{Map, Value};
use tracing::warn;

use super::candidates::LayoutCandidate;
use crate::pattern;
use crate::types::ValueTag;

/// Layout chosen for a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedLayout {
    /// Pattern string
    pub pattern: String,
    /// Catalog `values` string, one tag per key
    pub values: String,
    /// True when no candidate matched and the naive layout was used
    pub fallback: bool,
    /// Array columns whose 16/32-bit width cannot be confirmed
    pub ambiguous_arrays: Vec<String>,
}

/// Picks the layout for a table from generated candidates.
///
/// The first candidate whose pattern size equals the record length wins. When
/// none does, a naive layout of 4-byte words plus trailing bytes covers the
/// record and the result is flagged as fallback-derived.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutSelector;

impl LayoutSelector {
    /// Selects a layout.
    ///
    /// # Arguments
    /// * `table` - Table name, used in diagnostics
    /// * `keys` - Column names
    /// * `tags` - Inferred tags aligned with `keys`
    /// * `samples` - Sampled rows of the table, in document order
    /// * `target_size` - Record length in bytes
    /// * `candidates` - Output of the candidate generator
    ///
    /// # Returns
    /// The chosen `SelectedLayout`; never fails.
    pub fn select(
        &self,
        table: &str,
        keys: &[String],
        tags: &[ValueTag],
        samples: &[Map<String, Value>],
        target_size: u32,
        candidates: &[LayoutCandidate],
    ) -> SelectedLayout {
        let chosen = candidates.iter().find(|candidate| {
            pattern::computed_size(&candidate.pattern())
                .map(|size| size == target_size as usize)
                .unwrap_or(false)
        });

        let (pattern, values, fallback) = match chosen {
            Some(candidate) => (candidate.pattern(), candidate.values(), false),
            None => {
                let pattern = Self::fallback_pattern(target_size);
                warn!(
                    table,
                    target_size,
                    pattern = %pattern,
                    "no exact layout found, using fallback pattern; review manually"
                );
                (pattern, ValueTag::join(tags), true)
            }
        };

        let ambiguous_arrays = Self::ambiguous_arrays(keys, tags, samples);
        if !ambiguous_arrays.is_empty() {
            warn!(
                table,
                columns = ?ambiguous_arrays,
                "array width ambiguous, defaulting to 32-bit"
            );
        }

        SelectedLayout {
            pattern,
            values,
            fallback,
            ambiguous_arrays,
        }
    }

    /// Naive layout covering `target_size` bytes: `S / 4` uints then `S % 4` bytes.
    pub fn fallback_pattern(target_size: u32) -> String {
        let words = target_size / 4;
        let remainder = target_size % 4;
        let mut pattern = format!("<{}I", words);
        if remainder > 0 {
            pattern.push_str(&format!("{}B", remainder));
        }
        pattern
    }

    /// 32-bit array columns whose sampled values would also fit in 16 bits.
    ///
    /// An element above `u16::MAX` in any sampled row confirms the 32-bit
    /// width; otherwise (including when no rows are sampled) the width stays
    /// unconfirmed.
    fn ambiguous_arrays(
        keys: &[String],
        tags: &[ValueTag],
        samples: &[Map<String, Value>],
    ) -> Vec<String> {
        keys.iter()
            .zip(tags)
            .filter(|(_, tag)| **tag == ValueTag::Array32)
            .filter(|(key, _)| {
                !samples
                    .iter()
                    .filter_map(|row| row.get(key.as_str()).and_then(Value::as_array))
                    .flatten()
                    .any(|item| item.as_u64().is_some_and(|v| v > u64::from(u16::MAX)))
            })
            .map(|(key, _)| key.clone())
            .collect()
    }
}
