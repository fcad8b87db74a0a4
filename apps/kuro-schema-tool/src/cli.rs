use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Schema catalog file, overriding the configuration
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Infer schemas from a decoded JSON table and its binary TBL file
    Analyze {
        /// Decoded JSON document with headers and data
        json: PathBuf,

        /// Binary TBL file the JSON was decoded from
        tbl: PathBuf,

        /// Game version recorded in info_comment
        #[arg(short, long, default_value = "")]
        game_version: String,

        /// Report inferred schemas without saving the catalog
        #[arg(long)]
        dry_run: bool,

        /// Do not back up the previous catalog before saving
        #[arg(long)]
        no_backup: bool,
    },

    /// Audit a schema catalog; exits non-zero when errors are found
    Validate {
        /// Catalog to audit (defaults to the configured catalog)
        catalog: Option<PathBuf>,
    },

    /// Merge KuroTools header schemas into the catalog
    ConvertKurotools {
        /// KuroTools schema directory containing headers/
        schemas_dir: PathBuf,

        /// Write the merged catalog here instead of the configured catalog
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a plain-text conversion report
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// List the sections of a TBL file
    InspectTbl {
        /// Binary TBL file
        tbl: PathBuf,
    },
}
