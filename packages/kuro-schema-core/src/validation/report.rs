//! Validation findings and the aggregated audit report.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::pattern::PatternError;

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// A problem found in a single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryIssue {
    #[error("missing field '{field}'")]
    MissingField { field: &'static str },

    #[error("missing field 'schema.{field}'")]
    MissingLayoutField { field: &'static str },

    #[error("field '{field}' is not {expected}")]
    InvalidFieldType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("schema_length ({schema_length}) != sch_len ({declared_length})")]
    LengthMismatch {
        schema_length: u64,
        declared_length: u64,
    },

    #[error("pattern '{pattern}' has size {computed}, but sch_len is {declared}")]
    PatternSizeMismatch {
        pattern: String,
        computed: usize,
        declared: u64,
    },

    #[error("invalid pattern '{pattern}': {error}")]
    InvalidPattern { pattern: String, error: PatternError },

    #[error("key count ({keys}) != value count ({values})")]
    ArityMismatch { keys: usize, values: usize },

    #[error("unknown value type '{tag}' at position {position}")]
    UnknownValueTag { tag: char, position: usize },

    #[error("duplicate keys: {keys:?}")]
    DuplicateKeys { keys: Vec<String> },
}

impl EntryIssue {
    /// Severity of this issue.
    pub fn severity(&self) -> Severity {
        match self {
            // Unknown tags may come from newer tooling
            EntryIssue::UnknownValueTag { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// An issue tagged with its severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub issue: EntryIssue,
}

impl From<EntryIssue> for Finding {
    fn from(issue: EntryIssue) -> Self {
        Self {
            severity: issue.severity(),
            issue,
        }
    }
}

/// Findings for one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    /// Position in the catalog
    pub index: usize,
    pub table_header: Option<String>,
    pub schema_length: Option<u64>,
    pub info_comment: Option<String>,
    pub findings: Vec<Finding>,
}

/// One differing field between two entries sharing a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaDiff {
    Pattern { left: String, right: String },
    KeyCount { left: usize, right: usize },
    Key { index: usize, left: String, right: String },
    Values { left: String, right: String },
}

impl fmt::Display for SchemaDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaDiff::Pattern { left, right } => write!(f, "Pattern: '{}' vs '{}'", left, right),
            SchemaDiff::KeyCount { left, right } => write!(f, "Key count: {} vs {}", left, right),
            SchemaDiff::Key { index, left, right } => {
                write!(f, "Key[{}]: '{}' vs '{}'", index, left, right)
            }
            SchemaDiff::Values { left, right } => write!(f, "Values: '{}' vs '{}'", left, right),
        }
    }
}

/// Differences between the first entry of a duplicate group and another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairDiff {
    pub base: usize,
    pub other: usize,
    pub differences: Vec<SchemaDiff>,
}

/// Entries sharing a `(table_header, schema_length)` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub table_header: String,
    pub schema_length: u64,
    pub indices: Vec<usize>,
    /// Only pairs that actually differ
    pub diffs: Vec<PairDiff>,
}

/// Per-table aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableStats {
    pub entries: usize,
    pub lengths: BTreeSet<u64>,
}

/// Catalog-wide counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    /// Entry count per `info_comment`
    pub by_info_comment: BTreeMap<String, usize>,
    /// Entry count and distinct lengths per `table_header`
    pub by_table: BTreeMap<String, TableStats>,
}

impl CatalogStats {
    /// Tables with more than one distinct schema length, most versions first.
    pub fn multi_version(&self) -> Vec<(&str, usize)> {
        let mut tables: Vec<(&str, usize)> = self
            .by_table
            .iter()
            .filter(|(_, stats)| stats.lengths.len() > 1)
            .map(|(name, stats)| (name.as_str(), stats.lengths.len()))
            .collect();
        tables.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        tables
    }
}

/// Complete audit of a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of entries audited
    pub entry_count: usize,
    /// Entries that produced at least one finding
    pub entries: Vec<EntryReport>,
    pub duplicates: Vec<DuplicateGroup>,
    pub stats: CatalogStats,
}

impl ValidationReport {
    fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .flat_map(|e| &e.findings)
            .filter(|f| f.severity == severity)
            .count()
    }

    /// Total error findings.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Total warning findings.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Whether any error-severity finding occurred.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Findings for the entry at `index`, empty when it is clean.
    pub fn findings_for(&self, index: usize) -> &[Finding] {
        self.entries
            .iter()
            .find(|e| e.index == index)
            .map(|e| e.findings.as_slice())
            .unwrap_or(&[])
    }
}

fn or_na<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schemas loaded: {}", self.entry_count)?;
        writeln!(f)?;

        for entry in &self.entries {
            writeln!(
                f,
                "Schema #{}: {} (length: {})",
                entry.index,
                or_na(&entry.table_header),
                or_na(&entry.schema_length)
            )?;
            writeln!(f, "  Info: {}", or_na(&entry.info_comment))?;
            for finding in &entry.findings {
                let label = match finding.severity {
                    Severity::Error => "ERROR",
                    Severity::Warning => "WARNING",
                };
                writeln!(f, "  {}: {}", label, finding.issue)?;
            }
            writeln!(f)?;
        }

        if self.entries.is_empty() {
            writeln!(f, "All schemas are valid.")?;
        } else {
            writeln!(
                f,
                "Errors: {}, warnings: {}",
                self.error_count(),
                self.warning_count()
            )?;
        }
        writeln!(f)?;

        if self.duplicates.is_empty() {
            writeln!(f, "No duplicate schemas.")?;
        } else {
            writeln!(f, "Duplicate schemas: {}", self.duplicates.len())?;
            for group in &self.duplicates {
                writeln!(
                    f,
                    "  {} (length: {}) at positions {:?}",
                    group.table_header, group.schema_length, group.indices
                )?;
                for pair in &group.diffs {
                    writeln!(f, "    Differences between #{} and #{}:", pair.base, pair.other)?;
                    for diff in &pair.differences {
                        writeln!(f, "      - {}", diff)?;
                    }
                }
            }
        }
        writeln!(f)?;

        writeln!(f, "By version:")?;
        for (comment, count) in &self.stats.by_info_comment {
            writeln!(f, "  {:30}: {:3}", comment, count)?;
        }
        writeln!(f, "Unique tables: {}", self.stats.by_table.len())?;
        let multi = self.stats.multi_version();
        if !multi.is_empty() {
            writeln!(f, "Tables with multiple versions:")?;
            for (table, versions) in multi {
                writeln!(f, "  {:30}: {:3} versions", table, versions)?;
            }
        }
        writeln!(f)?;

        if self.has_errors() {
            write!(f, "Validation failed with {} error(s)", self.error_count())
        } else {
            write!(f, "Validation passed")
        }
    }
}
