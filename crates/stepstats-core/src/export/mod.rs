//! Table serialization.
//!
//! - **CSV**: comma separated with a leading index column (default)
//! - **TSV**: same layout, tab separated
//! - **JSON**: one object per row (NDJSON)

mod delimited;
mod format;
mod json;

pub use delimited::{CsvExporter, TsvExporter};
pub use format::{ExportFormat, OutputFormat, write_table_to_path};
pub use json::JsonExporter;
