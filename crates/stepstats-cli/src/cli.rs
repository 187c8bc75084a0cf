//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stepstats_core::OutputFormat;

#[derive(Parser)]
#[command(name = "stepstats")]
#[command(version, about = "Flatten rhythm-game high-score XML logs into one table")]
pub struct Cli {
    /// Config file (defaults to <config dir>/stepstats/config.toml if present)
    #[arg(short, long, global = true, env = "STEPSTATS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse every XML file in a directory and write the table
    Convert(ConvertArgs),
    /// Parse a directory and print the table preview without writing
    Preview(PreviewArgs),
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Directory containing the stats XML files
    #[arg(env = "STEPSTATS_INPUT")]
    pub input: Option<PathBuf>,

    /// Output file path [default: parsed.csv]
    #[arg(short, long, env = "STEPSTATS_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Output format (inferred from the output extension when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,

    #[command(flatten)]
    pub keep_going: KeepGoing,

    /// Number of rows shown in the preview
    #[arg(long)]
    pub preview_rows: Option<usize>,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Directory containing the stats XML files
    #[arg(env = "STEPSTATS_INPUT")]
    pub input: Option<PathBuf>,

    /// Number of rows shown
    #[arg(short, long)]
    pub rows: Option<usize>,

    #[command(flatten)]
    pub keep_going: KeepGoing,
}

/// `--keep-going` / `--no-keep-going` pair; the last one given wins
#[derive(Args, Debug, Default, Clone, Copy)]
pub struct KeepGoing {
    /// Skip files that fail to parse instead of aborting
    #[arg(long = "keep-going", overrides_with = "no_keep_going")]
    pub keep_going: bool,

    /// Abort on the first file that fails to parse
    #[arg(long = "no-keep-going", overrides_with = "keep_going")]
    pub no_keep_going: bool,
}

impl KeepGoing {
    /// `None` when neither flag was passed
    pub fn value(&self) -> Option<bool> {
        if self.keep_going {
            Some(true)
        } else if self.no_keep_going {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Json,
}

impl From<ExportFormat> for OutputFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Csv => OutputFormat::Csv,
            ExportFormat::Tsv => OutputFormat::Tsv,
            ExportFormat::Json => OutputFormat::Json,
        }
    }
}
