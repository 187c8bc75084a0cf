//! CSV and TSV export.
//!
//! Layout matches what spreadsheet tooling and pandas read back without
//! options: an unnamed index column first, one header cell per table column,
//! empty cells for nulls, quoting only where needed and `\n` line endings.

use std::io::Write;

use csv::{Terminator, WriterBuilder};

use crate::error::Result;
use crate::table::Table;

use super::format::ExportFormat;

/// Comma-separated exporter
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

/// Tab-separated exporter
#[derive(Debug, Clone, Copy, Default)]
pub struct TsvExporter;

impl ExportFormat for CsvExporter {
    fn write_table(&self, table: &Table, out: &mut dyn Write) -> Result<()> {
        write_delimited(table, out, b',')
    }
}

impl ExportFormat for TsvExporter {
    fn write_table(&self, table: &Table, out: &mut dyn Write) -> Result<()> {
        write_delimited(table, out, b'\t')
    }
}

fn write_delimited(table: &Table, out: &mut dyn Write, delimiter: u8) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    let header = std::iter::once("").chain(table.columns().iter().map(String::as_str));
    writer.write_record(header)?;

    for index in 0..table.len() {
        let record = std::iter::once(index.to_string())
            .chain(table.row_values(index).into_iter().map(|v| v.to_string()));
        writer.write_record(record)?;
    }

    writer.flush()?;
    Ok(())
}
