//! Convert command: parse a directory and write the table.

use anyhow::{Context, Result};
use stepstats_core::{parse_folder, write_table_to_path};
use tracing::warn;

use super::announce_file;
use crate::config::ConvertSettings;
use crate::display;

pub fn run(settings: &ConvertSettings) -> Result<()> {
    let report = parse_folder(&settings.input_dir, &settings.batch, announce_file)
        .with_context(|| format!("Failed to convert {}", settings.input_dir.display()))?;

    display::print_summary(&report.table, settings.preview_rows);

    let failed: Vec<String> = report
        .failures()
        .map(|f| f.path.display().to_string())
        .collect();
    if !failed.is_empty() {
        warn!("{} files skipped: {}", failed.len(), failed.join(", "));
    }

    write_table_to_path(&report.table, settings.format, &settings.output)
        .with_context(|| format!("Failed to write {}", settings.output.display()))?;
    eprintln!("Exported to: {}", settings.output.display());

    Ok(())
}
