//! Inference pipeline from a JSON sample and a TBL sample to catalog entries.

use std::path::Path;

use tracing::{info, warn};

use crate::catalog::{Schema, SchemaCatalog};
use crate::config::ToolConfig;
use crate::error::{AlreadyExists, Result};
use crate::inference::{CandidateLayoutGenerator, LayoutSelector, ValueTypeInferer};
use crate::sample::{JsonSample, JsonTable, TblFile, TblSection};

/// Inference result for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredTable {
    /// Entry ready for the catalog
    pub schema: Schema,
    /// Layout came from the naive fallback and needs manual review
    pub fallback: bool,
    /// Number of exact-size candidates found
    pub candidate_count: usize,
    /// Array columns whose width defaulted to 32-bit without confirmation
    pub ambiguous_arrays: Vec<String>,
    /// Rows in the JSON sample
    pub num_entries: usize,
}

/// Outcome of analysing one JSON/TBL pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    pub tables: Vec<InferredTable>,
    /// JSON tables with no section in the TBL file
    pub missing_in_tbl: Vec<String>,
}

impl AnalysisReport {
    /// Tables whose layout needs manual review.
    pub fn fallback_tables(&self) -> impl Iterator<Item = &InferredTable> {
        self.tables.iter().filter(|t| t.fallback)
    }
}

/// Outcome of merging inferred schemas into the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddSummary {
    pub added: usize,
    /// Rejected because the catalog already had the key
    pub skipped: Vec<AlreadyExists>,
}

/// Builds the provenance label: `"{game} / {schema}"`, or just the schema
/// label when no game version is given.
pub fn compose_info_comment(game_version: &str, schema_version: &str) -> String {
    match (game_version.is_empty(), schema_version.is_empty()) {
        (true, _) => schema_version.to_string(),
        (false, true) => game_version.to_string(),
        (false, false) => format!("{} / {}", game_version, schema_version),
    }
}

/// Drives inference and owns the catalog for the session.
#[derive(Debug)]
pub struct SchemaAnalyzer {
    config: ToolConfig,
    catalog: SchemaCatalog,
    inferer: ValueTypeInferer,
    generator: CandidateLayoutGenerator,
}

impl SchemaAnalyzer {
    /// Creates an analyzer, loading the catalog from `config.catalog_path`.
    pub fn new(config: ToolConfig) -> Result<Self> {
        config.validate()?;
        let catalog = SchemaCatalog::load_with_retry(
            &config.catalog_path,
            config.io_max_retries,
            config.io_retry_delay_ms,
        )?;
        Ok(Self::with_catalog(config, catalog))
    }

    /// Creates an analyzer over an existing catalog.
    pub fn with_catalog(config: ToolConfig, catalog: SchemaCatalog) -> Self {
        Self {
            inferer: ValueTypeInferer::new(config.sample_rows),
            generator: CandidateLayoutGenerator::new(config.max_candidates),
            config,
            catalog,
        }
    }

    /// Current catalog.
    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Consumes the analyzer, returning its catalog.
    pub fn into_catalog(self) -> SchemaCatalog {
        self.catalog
    }

    /// Reads both sample files and infers a schema per shared table.
    ///
    /// # Arguments
    /// * `json_path` - Decoded JSON table document
    /// * `tbl_path` - Binary TBL file with the same tables
    /// * `game_version` - Optional provenance label, may be empty
    ///
    /// # Returns
    /// `Result<AnalysisReport>`; malformed inputs abort without any schema.
    pub fn analyze(
        &self,
        json_path: &Path,
        tbl_path: &Path,
        game_version: &str,
    ) -> Result<AnalysisReport> {
        let json = JsonSample::read(json_path)?;
        let tbl = TblFile::read(tbl_path)?;
        info!(
            json = %json_path.display(),
            tbl = %tbl_path.display(),
            json_tables = json.tables.len(),
            tbl_sections = tbl.sections().len(),
            "analysing samples"
        );
        Ok(self.analyze_sources(&json, &tbl, game_version))
    }

    /// Infers schemas from already parsed samples.
    pub fn analyze_sources(
        &self,
        json: &JsonSample,
        tbl: &TblFile,
        game_version: &str,
    ) -> AnalysisReport {
        let mut report = AnalysisReport::default();
        for table in &json.tables {
            match tbl.section(&table.name) {
                Some(section) => report
                    .tables
                    .push(self.infer_table(table, section, game_version)),
                None => {
                    warn!(table = %table.name, "table not present in TBL file");
                    report.missing_in_tbl.push(table.name.clone());
                }
            }
        }
        report
    }

    /// Runs tagging, candidate search and selection for one table.
    pub fn infer_table(
        &self,
        table: &JsonTable,
        section: &TblSection,
        game_version: &str,
    ) -> InferredTable {
        let tags = self.inferer.infer_tags(&table.rows, &table.keys);
        let candidates = self.generator.generate(&tags, section.entry_length);
        let selected = LayoutSelector.select(
            &table.name,
            &table.keys,
            &tags,
            table.sample_rows(self.config.sample_rows),
            section.entry_length,
            &candidates,
        );

        info!(
            table = %table.name,
            pattern = %selected.pattern,
            length = section.entry_length,
            values = %selected.values,
            fallback = selected.fallback,
            "inferred layout"
        );

        let schema = Schema::new(
            table.name.clone(),
            section.entry_length,
            compose_info_comment(game_version, &table.schema_version),
            selected.pattern,
            table.keys.clone(),
            selected.values,
        );

        InferredTable {
            schema,
            fallback: selected.fallback,
            candidate_count: candidates.len(),
            ambiguous_arrays: selected.ambiguous_arrays,
            num_entries: table.rows.len(),
        }
    }

    /// Inserts inferred schemas, skipping keys already in the catalog.
    pub fn add_schemas(&mut self, tables: &[InferredTable]) -> AddSummary {
        let mut summary = AddSummary::default();
        for table in tables {
            match self.catalog.insert(table.schema.clone()) {
                Ok(_) => {
                    info!(table = %table.schema.table_header, "schema added");
                    summary.added += 1;
                }
                Err(existing) => {
                    warn!(
                        table = %existing.table_header,
                        length = existing.schema_length,
                        "schema already exists"
                    );
                    summary.skipped.push(existing);
                }
            }
        }
        summary
    }

    /// Saves the catalog to `config.catalog_path`.
    pub fn save(&self) -> Result<()> {
        self.catalog.save_with_retry(
            &self.config.catalog_path,
            self.config.backup_on_save,
            self.config.io_max_retries,
            self.config.io_retry_delay_ms,
        )
    }

    /// Analyses a JSON/TBL pair and merges the results into the catalog.
    pub fn process_files(
        &mut self,
        json_path: &Path,
        tbl_path: &Path,
        game_version: &str,
    ) -> Result<(AnalysisReport, AddSummary)> {
        let report = self.analyze(json_path, tbl_path, game_version)?;
        let summary = self.add_schemas(&report.tables);
        info!(
            added = summary.added,
            skipped = summary.skipped.len(),
            "merged inferred schemas"
        );
        Ok((report, summary))
    }
}
