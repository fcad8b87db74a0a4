//! Sample file builders shared by the integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use kuro_schema_core::config::ToolConfig;
use kuro_schema_core::sample::{SECTION_NAME_LEN, TBL_MAGIC};

/// Builds TBL bytes for `(name, entry_length, num_entries)` sections with
/// zero-filled records.
pub fn build_tbl(sections: &[(&str, u32, u32)]) -> Vec<u8> {
    let header_len = SECTION_NAME_LEN + 16;
    let mut out = Vec::new();
    out.extend_from_slice(&TBL_MAGIC);
    out.extend_from_slice(&(sections.len() as u32).to_le_bytes());

    let mut data_offset = 8 + sections.len() * header_len;
    for (name, length, count) in sections {
        let mut raw_name = [0u8; SECTION_NAME_LEN];
        raw_name[..name.len()].copy_from_slice(name.as_bytes());
        out.extend_from_slice(&raw_name);
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&(data_offset as u32).to_le_bytes());
        out.extend_from_slice(&length.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        data_offset += (*length * *count) as usize;
    }
    let records: usize = sections.iter().map(|(_, l, c)| (*l * *c) as usize).sum();
    out.resize(out.len() + records, 0);
    out
}

/// Builds a decoded-table JSON document from `(name, rows)` pairs.
pub fn build_json(tables: &[(&str, Value)]) -> Value {
    let headers: Vec<Value> = tables
        .iter()
        .map(|(name, _)| json!({"name": name, "schema": "Kuro2"}))
        .collect();
    let data: Vec<Value> = tables
        .iter()
        .map(|(name, rows)| json!({"name": name, "data": rows}))
        .collect();
    json!({"headers": headers, "data": data})
}

/// Writes a JSON/TBL pair into `dir` and returns their paths.
pub fn write_pair(dir: &Path, stem: &str, json: &Value, tbl: &[u8]) -> (PathBuf, PathBuf) {
    let json_path = dir.join(format!("{}.json", stem));
    let tbl_path = dir.join(format!("{}.tbl", stem));
    fs::write(&json_path, json.to_string()).unwrap();
    fs::write(&tbl_path, tbl).unwrap();
    (json_path, tbl_path)
}

/// Item rows: numeric id, text name, numeric price, array effects.
pub fn item_rows() -> Value {
    json!([
        {"id": 1, "name": "Potion", "price": 50, "effects": [1, 2]},
        {"id": 2, "name": "Ether", "price": 120, "effects": []},
        {"id": 3, "name": "Elixir", "price": 900, "effects": [5]}
    ])
}

/// Shop rows whose columns cannot fit 24 bytes under any candidate.
pub fn shop_rows() -> Value {
    json!([
        {"shop_id": 10, "name": "General Store", "flags": [1, 2, 3]},
        {"shop_id": 11, "name": "Armory", "flags": [4]}
    ])
}

/// Configuration pointing at a catalog inside `dir`.
pub fn config_in(dir: &Path) -> ToolConfig {
    ToolConfig {
        catalog_path: dir.join("kurodlc_schema.json"),
        io_retry_delay_ms: 1,
        ..Default::default()
    }
}
