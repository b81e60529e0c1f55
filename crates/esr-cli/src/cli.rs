use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use esr_io::write::OutputTarget;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a raw solver output file into the compact or CSV line format
    Convert {
        /// Path of the raw solver output file
        input: PathBuf,
        /// Path of the converted file to write
        output: PathBuf,

        /// Path to the schema catalog (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Output only the results from this year onwards
        #[arg(short, long, default_value_t = 2015)]
        start_year: i32,

        /// Output only the results up to and including this year
        #[arg(short, long, default_value_t = 2070)]
        end_year: i32,

        /// Write comma-separated-values output
        #[arg(long, group = "line_format")]
        csv: bool,

        /// Write compact solver-native output (default)
        #[arg(long, group = "line_format")]
        cbc: bool,
    },

    /// Re-express a combined compact solution as a per-variable table set
    Results {
        /// Path of the combined compact solution file
        input: PathBuf,
        /// Output path (directory or file, depending on the format)
        output: PathBuf,

        /// Path to the schema catalog (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Physical output format
        #[arg(long, value_enum, default_value_t = ResultsFormat::CsvDir)]
        format: ResultsFormat,

        /// Directory of input-dataset CSV files for derived variables
        #[arg(long)]
        input_data: Option<PathBuf>,

        /// Fail the run when any diagnostics were collected
        #[arg(long)]
        strict: bool,
    },
}

/// Physical output formats for the `results` command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsFormat {
    /// Directory of narrow per-entry CSV files
    CsvDir,
    /// Default-eliding GMPL datafile
    Datafile,
    /// Spreadsheet workbook, one sheet per entry
    Excel,
    /// Resource bundle with a datapackage manifest
    Package,
}

impl ResultsFormat {
    pub fn to_output_target(self) -> OutputTarget {
        match self {
            ResultsFormat::CsvDir => OutputTarget::CsvDir,
            ResultsFormat::Datafile => OutputTarget::Datafile,
            ResultsFormat::Excel => OutputTarget::Excel,
            ResultsFormat::Package => OutputTarget::Package,
        }
    }
}
