//! Layout inference: column tagging, candidate search and layout selection.

mod candidates;
mod selector;
mod value_types;

pub use candidates::{CandidateLayoutGenerator, LayoutCandidate, DEFAULT_MAX_CANDIDATES};
pub use selector::{LayoutSelector, SelectedLayout};
pub use value_types::{ValueTypeInferer, DEFAULT_SAMPLE_ROWS};
