//! Catalog audit tests over documents on disk.

use std::fs;

use serde_json::json;
use tempfile::tempdir;

use kuro_schema_core::validation::{EntryIssue, SchemaDiff, SchemaValidator};

#[test]
fn test_audit_reports_every_problem() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kurodlc_schema.json");
    let document = json!([
        {
            "info_comment": "Kuro2",
            "table_header": "ItemTableData",
            "schema_length": 8,
            "schema": {"schema": "<2I", "sch_len": 8, "keys": ["id", "price"], "values": "nn"}
        },
        {
            "info_comment": "Kuro2 import",
            "table_header": "ItemTableData",
            "schema_length": 8,
            "schema": {"schema": "<Q", "sch_len": 8, "keys": ["id", "price"], "values": "nn"}
        },
        {
            "info_comment": "Kai",
            "table_header": "ShopInfo",
            "schema_length": 12,
            "schema": {"schema": "<2I", "sch_len": 12, "keys": ["id"], "values": "nz"}
        },
        {
            "table_header": "Broken",
            "schema_length": 4
        }
    ]);
    fs::write(&path, serde_json::to_string_pretty(&document).unwrap()).unwrap();

    let entries = SchemaValidator::load_document(&path).unwrap();
    let report = SchemaValidator.validate_document(&entries);

    assert_eq!(report.entry_count, 4);
    assert!(report.findings_for(0).is_empty());
    assert!(report.findings_for(1).is_empty());

    let shop: Vec<&EntryIssue> = report.findings_for(2).iter().map(|f| &f.issue).collect();
    assert!(shop
        .iter()
        .any(|i| matches!(i, EntryIssue::PatternSizeMismatch { computed: 8, declared: 12, .. })));
    assert!(shop
        .iter()
        .any(|i| matches!(i, EntryIssue::ArityMismatch { keys: 1, values: 2 })));
    assert!(shop
        .iter()
        .any(|i| matches!(i, EntryIssue::UnknownValueTag { tag: 'z', position: 1 })));

    assert!(report
        .findings_for(3)
        .iter()
        .any(|f| matches!(f.issue, EntryIssue::MissingField { field: "schema" })));

    assert_eq!(report.duplicates.len(), 1);
    let group = &report.duplicates[0];
    assert_eq!(group.indices, vec![0, 1]);
    assert_eq!(
        group.diffs[0].differences,
        vec![SchemaDiff::Pattern {
            left: "<2I".to_string(),
            right: "<Q".to_string()
        }]
    );

    assert!(report.has_errors());
    assert_eq!(report.warning_count(), 1);
    assert!(report.to_string().contains("Validation failed"));
}
