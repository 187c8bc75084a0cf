//! # stepstats-core
//!
//! Core library for flattening rhythm-game high-score XML logs into a table.
//!
//! This crate provides:
//! - Value coercion for raw element text
//! - Record extraction from `HighScoreForASongAndSteps` entries
//! - Directory batch processing with per-file results
//! - CSV, TSV and NDJSON table export

pub mod batch;
pub mod error;
pub mod export;
pub mod extract;
pub mod row;
pub mod table;
pub mod value;

pub use batch::{
    BatchOptions, BatchOptionsBuilder, BatchReport, ErrorPolicy, FileOutcome, FileReport,
    FileSummary, collect_xml_files, parse_folder, process_file,
};
pub use error::{Error, Result};
pub use export::{
    CsvExporter, ExportFormat, JsonExporter, OutputFormat, TsvExporter, write_table_to_path,
};
pub use extract::{
    ENTRY_TAG, ScoreGroup, decode_document, extract_rows, parse_document, parse_file,
};
pub use row::Row;
pub use table::Table;
pub use value::{Value, coerce};
