//! Catalog persistence tests.

use std::fs;

use serde_json::Value;
use tempfile::tempdir;

use kuro_schema_core::catalog::{backup_path, Schema, SchemaCatalog};

fn item_schema(length: u32) -> Schema {
    Schema::new(
        "ItemTableData",
        length,
        "Kuro2",
        format!("<{}I", length / 4),
        (0..length / 4).map(|i| format!("field_{}", i)).collect(),
        "n".repeat((length / 4) as usize),
    )
}

#[test]
fn test_saved_document_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    let mut catalog = SchemaCatalog::new();
    catalog.insert(item_schema(8)).unwrap();
    catalog.save(&path, true).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("[\n    {"));
    assert!(!backup_path(&path).exists());

    let document: Value = serde_json::from_str(&text).unwrap();
    let entry = &document[0];
    assert_eq!(entry["table_header"], "ItemTableData");
    assert_eq!(entry["schema_length"], 8);
    assert_eq!(entry["schema"]["schema"], "<2I");
    assert_eq!(entry["schema"]["sch_len"], 8);
    assert_eq!(entry["schema"]["values"], "nn");
    assert!(entry["schema"].get("primary_key").is_none());

    let keys: Vec<&str> = entry.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["info_comment", "table_header", "schema_length", "schema"]);
}

#[test]
fn test_backup_tracks_previous_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    let mut catalog = SchemaCatalog::new();
    catalog.insert(item_schema(8)).unwrap();
    catalog.save(&path, true).unwrap();
    let first = fs::read(&path).unwrap();

    catalog.insert(item_schema(12)).unwrap();
    catalog.save(&path, true).unwrap();
    let second = fs::read(&path).unwrap();
    assert_eq!(fs::read(backup_path(&path)).unwrap(), first);

    catalog.insert(item_schema(16)).unwrap();
    catalog.save(&path, true).unwrap();
    assert_eq!(fs::read(backup_path(&path)).unwrap(), second);

    assert_eq!(SchemaCatalog::load(&path).unwrap().len(), 3);
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("catalog.json");

    let mut catalog = SchemaCatalog::new();
    catalog.insert(item_schema(4)).unwrap();
    catalog.save(&path, false).unwrap();

    assert_eq!(SchemaCatalog::load(&path).unwrap(), catalog);
}
