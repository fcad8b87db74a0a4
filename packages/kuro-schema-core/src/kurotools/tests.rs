//! Tests for KuroTools conversion.

use std::fs;

use serde_json::json;
use tempfile::tempdir;

use super::*;
use crate::pattern::computed_size;
use ntest::timeout;

#[timeout(1000)]
#[test]
fn test_convert_scalar_and_text_columns() {
    let variant = json!({
        "game": "Kuro2",
        "schema": {
            "id": "uint",
            "name": "toffset",
            "price": "int",
            "rate": "float",
            "flag": "ubyte"
        }
    });
    let schema = convert_variant("ItemTableData", "kuro2", &variant).unwrap();

    assert_eq!(schema.table_header, "ItemTableData");
    assert_eq!(schema.info_comment, "Kuro2 - Converted from KuroTools");
    assert_eq!(schema.layout.pattern, "<IQifB");
    assert_eq!(schema.layout.values, "ntnnn");
    assert_eq!(schema.schema_length, 21);
    assert_eq!(schema.layout.declared_length, 21);
    assert_eq!(schema.layout.primary_key.as_deref(), Some("id"));
    assert_eq!(computed_size(&schema.layout.pattern).unwrap(), 21);
}

#[timeout(1000)]
#[test]
fn test_convert_arrays_and_data() {
    let variant = json!({
        "schema": {
            "effects": "u32array",
            "items": "u16array",
            "blob": "data6"
        }
    });
    let schema = convert_variant("T", "kai", &variant).unwrap();
    assert_eq!(schema.info_comment, "kai - Converted from KuroTools");
    assert_eq!(schema.layout.pattern, "<QIQI6s");
    assert_eq!(schema.layout.values, "abn");
    assert_eq!(schema.schema_length, 30);
    assert_eq!(computed_size(&schema.layout.pattern).unwrap(), 30);
    assert_eq!(schema.layout.primary_key, None);
}

#[timeout(1000)]
#[test]
fn test_convert_nested_block_flattens_keys() {
    let variant = json!({
        "schema": {
            "id": "ushort",
            "slots": {"size": 2, "schema": {"item": "uint", "count": "ushort"}}
        }
    });
    let schema = convert_variant("T", "v", &variant).unwrap();
    assert_eq!(
        schema.layout.keys,
        vec!["id", "slots_0_item", "slots_0_count", "slots_1_item", "slots_1_count"]
    );
    assert_eq!(schema.layout.pattern, "<HIHIH");
    assert_eq!(schema.layout.values, "nnnnn");
    assert_eq!(schema.schema_length, 14);
}

#[timeout(1000)]
#[test]
fn test_unknown_datatypes_fail_variant() {
    for bad in [json!("quaternion"), json!("data"), json!({"size": 2}), json!(5)] {
        let variant = json!({"schema": {"x": bad}});
        let err = convert_variant("T", "v", &variant).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownDataType { .. }));
    }
}

#[timeout(1000)]
#[test]
fn test_load_convert_and_merge() {
    let dir = tempdir().unwrap();
    let headers = dir.path().join("headers");
    fs::create_dir_all(&headers).unwrap();
    fs::write(
        headers.join("ShopItem.json"),
        json!({
            "kuro1": {"game": "Kuro1", "schema": {"shop": "uint", "item": "ushort"}},
            "kuro2": {"game": "Kuro2", "schema": {"shop": "uint", "item": "uint"}},
            "broken": {"schema": {"shop": "mystery"}}
        })
        .to_string(),
    )
    .unwrap();
    fs::write(
        headers.join("ItemTableData.json"),
        json!({"kuro2": {"game": "Kuro2", "schema": {"id": "uint"}}}).to_string(),
    )
    .unwrap();
    fs::write(headers.join("notes.txt"), "ignored").unwrap();
    fs::write(headers.join("Corrupt.json"), "{").unwrap();

    let loaded = load_headers(dir.path()).unwrap();
    let names: Vec<&str> = loaded.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["ItemTableData", "ShopItem"]);

    let conversion = convert_all(&loaded);
    assert_eq!(conversion.tables_found, 2);
    assert_eq!(conversion.converted.len(), 3);
    assert_eq!(conversion.failures.len(), 1);

    let mut catalog = SchemaCatalog::new();
    catalog
        .insert(Schema::new(
            "ShopItem",
            6,
            "manual",
            "<IH",
            vec!["shop".to_string(), "item".to_string()],
            "nn",
        ))
        .unwrap();

    let summary = merge_into(&mut catalog, &conversion);
    assert_eq!(summary.original_count, 1);
    assert_eq!(summary.existing, 1);
    assert_eq!(summary.added.len(), 2);
    assert_eq!(summary.total, 3);
    // Existing entry wins
    assert_eq!(catalog.get("ShopItem", 6).unwrap().info_comment, "manual");
    assert!(catalog.exists("ShopItem", 8));

    let report = summary.render_report();
    assert!(report.contains("New schemas added: 2"));
    assert!(report.contains("Game: Kuro2 - Converted from KuroTools"));
}

#[timeout(1000)]
#[test]
fn test_missing_headers_dir_yields_nothing() {
    let dir = tempdir().unwrap();
    assert!(load_headers(dir.path()).unwrap().is_empty());
}
