//! JSON export format implementation

use std::io::Write;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Result;
use crate::table::Table;

use super::format::ExportFormat;

/// JSON exporter (one object per line, NDJSON format)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl ExportFormat for JsonExporter {
    fn write_table(&self, table: &Table, out: &mut dyn Write) -> Result<()> {
        for index in 0..table.len() {
            serde_json::to_writer(&mut *out, &RowRecord { table, index })?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// One row laid out over every table column, keys in column order
struct RowRecord<'a> {
    table: &'a Table,
    index: usize,
}

impl Serialize for RowRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let columns = self.table.columns();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for column in columns {
            map.serialize_entry(column, self.table.cell(self.index, column))?;
        }
        map.end()
    }
}
