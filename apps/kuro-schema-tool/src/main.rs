//! Command-line front end for Kuro DLC schema tooling.
//!
//! - `analyze`: infer schemas from a JSON/TBL pair and merge them
//! - `validate`: audit a catalog
//! - `convert-kurotools`: import KuroTools header schemas
//! - `inspect-tbl`: list TBL sections

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let config = commands::load_config(&cli)?;

    match cli.command {
        Commands::Analyze {
            json,
            tbl,
            game_version,
            dry_run,
            no_backup,
        } => commands::analyze(config, &json, &tbl, &game_version, dry_run, no_backup)?,
        Commands::Validate { catalog } => {
            let path = catalog.unwrap_or(config.catalog_path);
            return commands::validate(&path);
        }
        Commands::ConvertKurotools {
            schemas_dir,
            output,
            report,
        } => commands::convert_kurotools(
            &config,
            &schemas_dir,
            output.as_deref(),
            report.as_deref(),
        )?,
        Commands::InspectTbl { tbl } => commands::inspect_tbl(&tbl)?,
    }
    Ok(true)
}
