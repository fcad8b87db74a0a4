//! Subcommand handlers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use kuro_schema_core::analyzer::{AnalysisReport, SchemaAnalyzer};
use kuro_schema_core::catalog::SchemaCatalog;
use kuro_schema_core::config::ToolConfig;
use kuro_schema_core::kurotools;
use kuro_schema_core::sample::TblFile;
use kuro_schema_core::validation::SchemaValidator;

use crate::cli::Cli;

/// Builds the configuration: file, then environment, then flags.
pub fn load_config(cli: &Cli) -> Result<ToolConfig> {
    let mut config = match &cli.config {
        Some(path) => ToolConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ToolConfig::default(),
    };
    config.apply_env_overrides()?;
    if let Some(catalog) = &cli.catalog {
        config.catalog_path = catalog.clone();
    }
    config.validate()?;
    Ok(config)
}

pub fn analyze(
    mut config: ToolConfig,
    json: &Path,
    tbl: &Path,
    game_version: &str,
    dry_run: bool,
    no_backup: bool,
) -> Result<()> {
    if no_backup {
        config.backup_on_save = false;
    }
    let catalog_path = config.catalog_path.clone();

    let mut analyzer = SchemaAnalyzer::new(config)
        .with_context(|| format!("opening catalog {}", catalog_path.display()))?;
    let report = analyzer
        .analyze(json, tbl, game_version)
        .with_context(|| format!("analysing {} and {}", json.display(), tbl.display()))?;
    print_analysis(&report);

    if dry_run {
        info!("dry run, catalog not modified");
        return Ok(());
    }

    let summary = analyzer.add_schemas(&report.tables);
    for existing in &summary.skipped {
        println!("  exists: {}", existing);
    }
    if summary.added == 0 {
        println!("No new schemas to add");
        return Ok(());
    }
    analyzer
        .save()
        .with_context(|| format!("saving catalog {}", catalog_path.display()))?;
    println!(
        "Added {} schema(s) to {} ({} total)",
        summary.added,
        catalog_path.display(),
        analyzer.catalog().len()
    );
    Ok(())
}

fn print_analysis(report: &AnalysisReport) {
    for table in &report.tables {
        let schema = &table.schema;
        println!(
            "{} ({} bytes, {} rows)",
            schema.table_header, schema.schema_length, table.num_entries
        );
        println!("  pattern: {}", schema.layout.pattern);
        println!("  values:  {}", schema.layout.values);
        println!("  candidates: {}", table.candidate_count);
        if table.fallback {
            println!("  fallback layout, needs manual review");
        }
        if !table.ambiguous_arrays.is_empty() {
            println!("  assumed 32-bit arrays: {}", table.ambiguous_arrays.join(", "));
        }
    }
    for name in &report.missing_in_tbl {
        warn!(table = %name, "no matching TBL section");
    }
}

/// Audits a catalog document and prints the report.
///
/// Returns whether the catalog passed.
pub fn validate(path: &Path) -> Result<bool> {
    let entries = SchemaValidator::load_document(path)
        .with_context(|| format!("loading catalog {}", path.display()))?;
    let report = SchemaValidator.validate_document(&entries);
    print!("{}", report);
    Ok(!report.has_errors())
}

pub fn convert_kurotools(
    config: &ToolConfig,
    schemas_dir: &Path,
    output: Option<&Path>,
    report_path: Option<&Path>,
) -> Result<()> {
    let mut catalog = SchemaCatalog::load_with_retry(
        &config.catalog_path,
        config.io_max_retries,
        config.io_retry_delay_ms,
    )
    .with_context(|| format!("loading catalog {}", config.catalog_path.display()))?;

    let headers = kurotools::load_headers(schemas_dir)
        .with_context(|| format!("reading KuroTools schemas in {}", schemas_dir.display()))?;
    let conversion = kurotools::convert_all(&headers);
    let summary = kurotools::merge_into(&mut catalog, &conversion);
    if !conversion.failures.is_empty() {
        warn!(failures = conversion.failures.len(), "some variants were not converted");
    }

    let destination = output.unwrap_or(config.catalog_path.as_path());
    if summary.added.is_empty() && output.is_none() {
        println!("No new schemas to add");
    } else {
        catalog
            .save_with_retry(
                destination,
                config.backup_on_save,
                config.io_max_retries,
                config.io_retry_delay_ms,
            )
            .with_context(|| format!("saving catalog {}", destination.display()))?;
    }

    let rendered = summary.render_report();
    match report_path {
        Some(path) => fs::write(path, &rendered)
            .with_context(|| format!("writing report {}", path.display()))?,
        None => print!("{}", rendered),
    }
    println!(
        "Added {} schema(s), {} already present, {} total",
        summary.added.len(),
        summary.existing,
        summary.total
    );
    Ok(())
}

/// Bytes of the first record shown by `inspect-tbl`.
const PREVIEW_BYTES: usize = 32;

pub fn inspect_tbl(path: &Path) -> Result<()> {
    let tbl = TblFile::read(path).with_context(|| format!("reading {}", path.display()))?;
    print!("{}", render_tbl(&tbl));
    Ok(())
}

/// Section table plus a hex preview of each section's first record.
fn render_tbl(tbl: &TblFile) -> String {
    let mut out = format!(
        "{}: {} section(s)\n{:<40} {:>8} {:>8} {:>10}\n",
        tbl.path().display(),
        tbl.sections().len(),
        "name",
        "length",
        "entries",
        "offset"
    );
    for section in tbl.sections() {
        out.push_str(&format!(
            "{:<40} {:>8} {:>8} {:>10}\n",
            section.name, section.entry_length, section.num_entries, section.start_offset
        ));
        if section.num_entries == 0 {
            continue;
        }
        match tbl.first_record(section) {
            Some(record) => {
                let hex: Vec<String> = record
                    .iter()
                    .take(PREVIEW_BYTES)
                    .map(|b| format!("{:02x}", b))
                    .collect();
                let more = if record.len() > PREVIEW_BYTES { " ..." } else { "" };
                out.push_str(&format!("  first record: {}{}\n", hex.join(" "), more));
            }
            None => out.push_str("  first record: out of range\n"),
        }
    }
    out
}
