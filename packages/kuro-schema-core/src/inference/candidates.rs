use tracing::debug;

use crate::types::{FieldCode, ValueTag};

/// Default cap on returned candidates.
pub const DEFAULT_MAX_CANDIDATES: usize = 10;

/// A full column-to-primitive assignment whose widths sum to the target size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutCandidate {
    codes: Vec<FieldCode>,
    tags: Vec<ValueTag>,
    size: u32,
}

impl LayoutCandidate {
    /// Primitive encodings, one per column.
    pub fn codes(&self) -> &[FieldCode] {
        &self.codes
    }

    /// Column tags the candidate was built for.
    pub fn tags(&self) -> &[ValueTag] {
        &self.tags
    }

    /// Cumulative byte size.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Little-endian pattern string, e.g. `<IQ2Q`.
    pub fn pattern(&self) -> String {
        let mut pattern = String::from("<");
        for code in &self.codes {
            pattern.push_str(code.code());
        }
        pattern
    }

    /// Catalog `values` string.
    pub fn values(&self) -> String {
        ValueTag::join(&self.tags)
    }
}

/// Partial assignment on the search worklist.
#[derive(Debug)]
struct PartialLayout {
    index: usize,
    size: u64,
    codes: Vec<FieldCode>,
}

/// Enumerates fixed-width layouts matching a record length exactly.
///
/// The search is depth-first over columns left to right, trying each tag's
/// encodings in menu order. Results appear in that traversal order and the
/// search stops once `max_candidates` layouts are found.
#[derive(Debug, Clone)]
pub struct CandidateLayoutGenerator {
    max_candidates: usize,
}

impl Default for CandidateLayoutGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CANDIDATES)
    }
}

impl CandidateLayoutGenerator {
    /// Creates a generator returning at most `max_candidates` layouts.
    pub fn new(max_candidates: usize) -> Self {
        Self { max_candidates }
    }

    /// Generates candidate layouts for `tags` summing to `target_size`.
    ///
    /// # Arguments
    /// * `tags` - Column tags in record order
    /// * `target_size` - Record length in bytes
    ///
    /// # Returns
    /// Up to `max_candidates` layouts; empty when no assignment fits.
    pub fn generate(&self, tags: &[ValueTag], target_size: u32) -> Vec<LayoutCandidate> {
        let target = u64::from(target_size);
        let mut candidates = Vec::new();
        if self.max_candidates == 0 {
            return candidates;
        }

        // Bounds on what the columns from `i` onwards can still contribute
        let mut min_rest = vec![0u64; tags.len() + 1];
        let mut max_rest = vec![0u64; tags.len() + 1];
        for (i, tag) in tags.iter().enumerate().rev() {
            let widths = tag.candidate_codes().iter().map(|c| u64::from(c.size()));
            min_rest[i] = min_rest[i + 1] + widths.clone().min().unwrap_or(0);
            max_rest[i] = max_rest[i + 1] + widths.max().unwrap_or(0);
        }

        if min_rest[0] > target || max_rest[0] < target {
            debug!(
                columns = tags.len(),
                target_size, "no layout can reach target size"
            );
            return candidates;
        }

        let mut worklist = vec![PartialLayout {
            index: 0,
            size: 0,
            codes: Vec::with_capacity(tags.len()),
        }];

        while let Some(partial) = worklist.pop() {
            if partial.index == tags.len() {
                if partial.size == target {
                    candidates.push(LayoutCandidate {
                        codes: partial.codes,
                        tags: tags.to_vec(),
                        size: target_size,
                    });
                    if candidates.len() >= self.max_candidates {
                        break;
                    }
                }
                continue;
            }

            let next = partial.index + 1;
            // Reverse push keeps menu order on pop
            for code in tags[partial.index].candidate_codes().iter().rev() {
                let size = partial.size + u64::from(code.size());
                if size + min_rest[next] > target || size + max_rest[next] < target {
                    continue;
                }
                let mut codes = partial.codes.clone();
                codes.push(*code);
                worklist.push(PartialLayout {
                    index: next,
                    size,
                    codes,
                });
            }
        }

        debug!(
            columns = tags.len(),
            target_size,
            found = candidates.len(),
            "candidate search finished"
        );
        candidates
    }
}
