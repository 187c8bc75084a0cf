//! Console preview of a table.

use std::io::IsTerminal;

use owo_colors::OwoColorize;
use stepstats_core::Table;

/// Columns shown on each side of the elision marker for wide tables
const EDGE_COLUMNS: usize = 4;
/// Longest cell text shown before truncation
const MAX_CELL_WIDTH: usize = 24;

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        text.to_string()
    } else {
        let kept: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{}...", kept)
    }
}

/// Indices of the columns to show, `None` marking the elided middle
fn visible_columns(count: usize) -> Vec<Option<usize>> {
    if count <= EDGE_COLUMNS * 2 {
        return (0..count).map(Some).collect();
    }
    (0..EDGE_COLUMNS)
        .map(Some)
        .chain(std::iter::once(None))
        .chain((count - EDGE_COLUMNS..count).map(Some))
        .collect()
}

/// Render the first `rows` rows as aligned text, header line first
pub fn format_preview(table: &Table, rows: usize) -> Vec<String> {
    if table.columns().is_empty() {
        return vec!["Empty table".to_string()];
    }

    let head = table.head(rows);
    let layout = visible_columns(head.columns().len());

    // cells[0] is the header; column 0 is the row index
    let mut cells: Vec<Vec<String>> = Vec::with_capacity(head.len() + 1);
    let mut header = vec![String::new()];
    header.extend(layout.iter().map(|col| match col {
        Some(i) => truncate(&head.columns()[*i]),
        None => "...".to_string(),
    }));
    cells.push(header);

    for index in 0..head.len() {
        let values = head.row_values(index);
        let mut line = vec![index.to_string()];
        line.extend(layout.iter().map(|col| match col {
            Some(i) => match values[*i] {
                v if v.is_null() => "None".to_string(),
                v => truncate(&v.to_string()),
            },
            None => "...".to_string(),
        }));
        cells.push(line);
    }

    let widths: Vec<usize> = (0..cells[0].len())
        .map(|c| cells.iter().map(|line| line[c].chars().count()).max().unwrap_or(0))
        .collect();

    let mut lines: Vec<String> = cells
        .iter()
        .map(|line| {
            line.iter()
                .zip(&widths)
                .enumerate()
                .map(|(c, (cell, width))| {
                    if c == 0 {
                        format!("{:<width$}", cell, width = *width)
                    } else {
                        format!("{:>width$}", cell, width = *width)
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect();

    lines.push(String::new());
    lines.push(format!(
        "[{} rows x {} columns]",
        table.len(),
        table.columns().len()
    ));
    lines
}

/// Column listing printed after the preview
pub fn format_columns(table: &Table) -> String {
    let quoted: Vec<String> = table
        .columns()
        .iter()
        .map(|c| format!("'{}'", c))
        .collect();
    format!("Columns:\n [{}]", quoted.join(", "))
}

/// Print the preview and column listing to stdout
pub fn print_summary(table: &Table, rows: usize) {
    let styled = std::io::stdout().is_terminal();
    for (i, line) in format_preview(table, rows).into_iter().enumerate() {
        if i == 0 && styled {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
    println!();
    println!("{}", format_columns(table));
}
