//! ExportFormat trait and format selection

use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Deserialize;
use strum::{Display, EnumString, IntoStaticStr};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::Result;
use crate::table::Table;

use super::delimited::{CsvExporter, TsvExporter};
use super::json::JsonExporter;

/// Trait for table export implementations
///
/// Provides a common interface for the output formats (CSV, TSV, NDJSON)
pub trait ExportFormat {
    /// Serialize the whole table into `out`
    fn write_table(&self, table: &Table, out: &mut dyn Write) -> Result<()>;

    /// Serialize the whole table into a string
    fn render(&self, table: &Table) -> Result<String> {
        let mut buf = Vec::new();
        self.write_table(table, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Output format selector
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn exporter(&self) -> Box<dyn ExportFormat> {
        match self {
            Self::Csv => Box::new(CsvExporter),
            Self::Tsv => Box::new(TsvExporter),
            Self::Json => Box::new(JsonExporter),
        }
    }

    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "jsonl",
        }
    }

    /// Guess the format from an output path's extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            "json" | "jsonl" | "ndjson" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Write the table to `path` in the given format
pub fn write_table_to_path<P: AsRef<Path>>(
    table: &Table,
    format: OutputFormat,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    persist_table(table, format.exporter().as_ref(), path)?;

    info!(
        "Wrote {} rows to {} ({})",
        table.len(),
        path.display(),
        format
    );
    Ok(())
}

/// Serialize into a temporary file next to `path`, then move it into place.
/// On error the temporary file is removed and `path` is left untouched.
fn persist_table(table: &Table, exporter: &dyn ExportFormat, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    debug!("Staging output in {}", tmp.path().display());

    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        exporter.write_table(table, &mut out)?;
        out.flush()?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
