//! Per-entry structural checks.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::report::{EntryIssue, Finding};
use crate::pattern::Pattern;
use crate::types::ValueTag;

const REQUIRED_FIELDS: [&str; 3] = ["table_header", "schema_length", "schema"];
const REQUIRED_LAYOUT_FIELDS: [&str; 4] = ["schema", "sch_len", "keys", "values"];

/// Checks one raw catalog entry.
///
/// Missing or mistyped required fields short-circuit the remaining checks,
/// since they cannot be evaluated without them.
pub(crate) fn validate_entry(entry: &Value) -> Vec<Finding> {
    let mut issues = Vec::new();
    check_entry(entry, &mut issues);
    issues.into_iter().map(Finding::from).collect()
}

fn check_entry(entry: &Value, issues: &mut Vec<EntryIssue>) {
    let Some(entry) = entry.as_object() else {
        issues.push(EntryIssue::InvalidFieldType {
            field: "entry",
            expected: "an object",
        });
        return;
    };

    for field in REQUIRED_FIELDS {
        if !entry.contains_key(field) {
            issues.push(EntryIssue::MissingField { field });
        }
    }
    if !issues.is_empty() {
        return;
    }

    let schema_length = entry["schema_length"].as_u64();
    if schema_length.is_none() {
        issues.push(EntryIssue::InvalidFieldType {
            field: "schema_length",
            expected: "an unsigned integer",
        });
    }
    if !entry["table_header"].is_string() {
        issues.push(EntryIssue::InvalidFieldType {
            field: "table_header",
            expected: "a string",
        });
    }
    let Some(layout) = entry["schema"].as_object() else {
        issues.push(EntryIssue::InvalidFieldType {
            field: "schema",
            expected: "an object",
        });
        return;
    };

    let missing_before = issues.len();
    for field in REQUIRED_LAYOUT_FIELDS {
        if !layout.contains_key(field) {
            issues.push(EntryIssue::MissingLayoutField { field });
        }
    }
    if issues.len() > missing_before {
        return;
    }

    check_layout(schema_length, layout, issues);
}

fn check_layout(
    schema_length: Option<u64>,
    layout: &Map<String, Value>,
    issues: &mut Vec<EntryIssue>,
) {
    let pattern = layout["schema"].as_str();
    let declared = layout["sch_len"].as_u64();
    let keys: Option<Vec<&str>> = layout["keys"]
        .as_array()
        .and_then(|keys| keys.iter().map(Value::as_str).collect());
    let values = layout["values"].as_str();

    let typed = [
        (pattern.is_some(), "schema.schema", "a string"),
        (declared.is_some(), "schema.sch_len", "an unsigned integer"),
        (keys.is_some(), "schema.keys", "an array of strings"),
        (values.is_some(), "schema.values", "a string"),
    ];
    for (ok, field, expected) in typed {
        if !ok {
            issues.push(EntryIssue::InvalidFieldType { field, expected });
        }
    }
    let (Some(pattern), Some(declared), Some(keys), Some(values)) =
        (pattern, declared, keys, values)
    else {
        return;
    };

    if let Some(schema_length) = schema_length {
        if schema_length != declared {
            issues.push(EntryIssue::LengthMismatch {
                schema_length,
                declared_length: declared,
            });
        }
    }

    match Pattern::parse(pattern) {
        Ok(parsed) => {
            let computed = parsed.computed_size();
            if computed as u64 != declared {
                issues.push(EntryIssue::PatternSizeMismatch {
                    pattern: pattern.to_string(),
                    computed,
                    declared,
                });
            }
        }
        Err(error) => issues.push(EntryIssue::InvalidPattern {
            pattern: pattern.to_string(),
            error,
        }),
    }

    let value_count = values.chars().count();
    if keys.len() != value_count {
        issues.push(EntryIssue::ArityMismatch {
            keys: keys.len(),
            values: value_count,
        });
    }

    for (position, tag) in values.chars().enumerate() {
        if ValueTag::from_char(tag).is_none() {
            issues.push(EntryIssue::UnknownValueTag { tag, position });
        }
    }

    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    for key in &keys {
        if !seen.insert(*key) && !duplicates.iter().any(|d| d == key) {
            duplicates.push(key.to_string());
        }
    }
    if !duplicates.is_empty() {
        issues.push(EntryIssue::DuplicateKeys { keys: duplicates });
    }
}
