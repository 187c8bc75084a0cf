//! Preview command: parse a directory and print the table head.

use anyhow::{Context, Result};
use stepstats_core::parse_folder;

use super::announce_file;
use crate::config::PreviewSettings;
use crate::display;

pub fn run(settings: &PreviewSettings) -> Result<()> {
    let report = parse_folder(&settings.input_dir, &settings.batch, announce_file)
        .with_context(|| format!("Failed to parse {}", settings.input_dir.display()))?;

    display::print_summary(&report.table, settings.rows);

    if report.failed_count() > 0 {
        eprintln!("{} files could not be parsed", report.failed_count());
    }

    Ok(())
}
