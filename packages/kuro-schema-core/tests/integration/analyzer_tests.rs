//! End-to-end inference tests.

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use kuro_schema_core::analyzer::SchemaAnalyzer;
use kuro_schema_core::catalog::SchemaCatalog;
use kuro_schema_core::error::SchemaError;
use kuro_schema_core::pattern::computed_size;
use kuro_schema_core::validation::SchemaValidator;

use super::helpers::{build_json, build_tbl, config_in, item_rows, shop_rows, write_pair};

#[test]
fn test_process_files_infers_and_persists() {
    let dir = tempdir().unwrap();
    let json = build_json(&[
        ("ItemTableData", item_rows()),
        ("ShopInfo", shop_rows()),
        ("QuestTable", serde_json::json!([{"id": 1}])),
    ]);
    let tbl = build_tbl(&[("ItemTableData", 32, 3), ("ShopInfo", 24, 2)]);
    let (json_path, tbl_path) = write_pair(dir.path(), "t_item", &json, &tbl);

    let config = config_in(dir.path());
    let catalog_path = config.catalog_path.clone();
    let mut analyzer = SchemaAnalyzer::new(config).unwrap();
    let (report, summary) = analyzer
        .process_files(&json_path, &tbl_path, "Kuro2 1.0")
        .unwrap();

    assert_eq!(report.missing_in_tbl, vec!["QuestTable".to_string()]);
    assert_eq!(report.tables.len(), 2);
    assert_eq!(summary.added, 2);
    assert!(summary.skipped.is_empty());

    let item = &report.tables[0];
    assert!(!item.fallback);
    assert_eq!(item.candidate_count, 4);
    assert_eq!(item.num_entries, 3);
    assert_eq!(item.schema.layout.pattern, "<IQI2Q");
    assert_eq!(item.schema.layout.values, "ntna");
    assert_eq!(item.schema.info_comment, "Kuro2 1.0 / Kuro2");
    assert_eq!(item.ambiguous_arrays, vec!["effects".to_string()]);

    let shop = &report.tables[1];
    assert!(shop.fallback);
    assert_eq!(shop.schema.layout.pattern, "<6I");
    assert_eq!(shop.schema.layout.values, "nta");
    assert_eq!(
        report.fallback_tables().map(|t| t.schema.table_header.as_str()).collect::<Vec<_>>(),
        vec!["ShopInfo"]
    );

    for table in &report.tables {
        assert_eq!(
            computed_size(&table.schema.layout.pattern).unwrap(),
            table.schema.schema_length as usize
        );
    }

    analyzer.save().unwrap();
    let reloaded = SchemaCatalog::load(&catalog_path).unwrap();
    assert_eq!(&reloaded, analyzer.catalog());

    let audit = SchemaValidator.validate_catalog(&reloaded).unwrap();
    assert_eq!(audit.error_count(), 0);
    assert!(audit.duplicates.is_empty());
}

#[test]
fn test_rerun_is_idempotent() {
    let dir = tempdir().unwrap();
    let json = build_json(&[("ItemTableData", item_rows())]);
    let tbl = build_tbl(&[("ItemTableData", 32, 3)]);
    let (json_path, tbl_path) = write_pair(dir.path(), "t_item", &json, &tbl);

    let config = config_in(dir.path());
    let mut analyzer = SchemaAnalyzer::new(config.clone()).unwrap();
    analyzer.process_files(&json_path, &tbl_path, "").unwrap();
    analyzer.save().unwrap();
    let first = fs::read(&config.catalog_path).unwrap();

    let mut analyzer = SchemaAnalyzer::new(config.clone()).unwrap();
    let (_, summary) = analyzer.process_files(&json_path, &tbl_path, "").unwrap();
    assert_eq!(summary.added, 0);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].table_header, "ItemTableData");
    assert_eq!(summary.skipped[0].schema_length, 32);
    analyzer.save().unwrap();

    assert_eq!(fs::read(&config.catalog_path).unwrap(), first);
    assert_eq!(analyzer.catalog().len(), 1);
}

#[test]
fn test_new_length_adds_second_version() {
    let dir = tempdir().unwrap();
    let json = build_json(&[("ItemTableData", item_rows())]);
    let config = config_in(dir.path());

    let (json_path, tbl_path) =
        write_pair(dir.path(), "v1", &json, &build_tbl(&[("ItemTableData", 32, 3)]));
    let mut analyzer = SchemaAnalyzer::new(config.clone()).unwrap();
    analyzer.process_files(&json_path, &tbl_path, "Kuro2").unwrap();
    analyzer.save().unwrap();
    let first = fs::read(&config.catalog_path).unwrap();

    let (json_path, tbl_path) =
        write_pair(dir.path(), "v2", &json, &build_tbl(&[("ItemTableData", 36, 3)]));
    let mut analyzer = SchemaAnalyzer::new(config.clone()).unwrap();
    let (_, summary) = analyzer.process_files(&json_path, &tbl_path, "Kuro2").unwrap();
    assert_eq!(summary.added, 1);
    analyzer.save().unwrap();

    let backup = dir.path().join("kurodlc_schema.json.backup");
    assert_eq!(fs::read(backup).unwrap(), first);

    let catalog = SchemaCatalog::load(&config.catalog_path).unwrap();
    assert!(catalog.exists("ItemTableData", 32));
    assert!(catalog.exists("ItemTableData", 36));

    let audit = SchemaValidator.validate_catalog(&catalog).unwrap();
    assert_eq!(audit.stats.by_table["ItemTableData"].lengths.len(), 2);
    assert_eq!(audit.stats.multi_version(), vec![("ItemTableData", 2)]);
}

#[test]
fn test_malformed_inputs_abort_without_changes() {
    let dir = tempdir().unwrap();
    let json_path = dir.path().join("bad.json");
    let tbl_path = dir.path().join("bad.tbl");
    fs::write(&json_path, "{ not json").unwrap();
    fs::write(&tbl_path, build_tbl(&[("ItemTableData", 32, 1)])).unwrap();

    let config = config_in(dir.path());
    let mut analyzer = SchemaAnalyzer::new(config.clone()).unwrap();
    let err = analyzer
        .process_files(&json_path, &tbl_path, "")
        .unwrap_err();
    assert!(matches!(err, SchemaError::MalformedJson { .. }));

    let json = build_json(&[("ItemTableData", item_rows())]);
    fs::write(&json_path, json.to_string()).unwrap();
    fs::write(&tbl_path, b"XTBL\x00\x00\x00\x00").unwrap();
    let err = analyzer
        .process_files(&json_path, &tbl_path, "")
        .unwrap_err();
    assert!(matches!(err, SchemaError::BadMagic { .. }));

    assert!(analyzer.catalog().is_empty());
    assert!(!config.catalog_path.exists());
}
