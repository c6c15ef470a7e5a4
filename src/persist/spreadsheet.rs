//! XLSX writer.

use super::{cell_text, ensure_parent, Destination, RecordSet, SaveFormat};
use crate::error::Result;
use rust_xlsxwriter::{Format, Workbook};
use serde_json::Value;

/// Longest text a single XLSX cell may hold.
pub const MAX_CELL_CHARS: usize = 32_767;

/// A single worksheet cell.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Header(String),
    Text(String),
    Number(f64),
    Bool(bool),
}

/// Every non-empty cell of the sheet, header row first.
fn sheet_cells(set: &RecordSet) -> Vec<(u32, u16, Cell)> {
    let mut cells: Vec<(u32, u16, Cell)> = set
        .columns()
        .iter()
        .enumerate()
        .map(|(col, name)| (0, col as u16, Cell::Header(name.clone())))
        .collect();

    for (index, row) in set.rows().iter().enumerate() {
        let row_num = (index + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            let cell = match value {
                Value::Null => continue,
                Value::Bool(b) => Cell::Bool(*b),
                Value::Number(n) => match n.as_f64() {
                    Some(number) => Cell::Number(number),
                    None => Cell::Text(n.to_string()),
                },
                other => Cell::Text(truncate_chars(&cell_text(other), MAX_CELL_CHARS)),
            };
            cells.push((row_num, col as u16, cell));
        }
    }
    cells
}

/// Write `<file_stem>.xlsx` with one sheet and a bold header row.
pub fn write_xlsx(set: &RecordSet, destination: &Destination) -> Result<String> {
    let path = destination.file_for(SaveFormat::Excel)?;
    ensure_parent(&path)?;

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (row, col, cell) in sheet_cells(set) {
        match cell {
            Cell::Header(name) => {
                sheet.write_string_with_format(row, col, name, &header)?;
            }
            Cell::Text(text) => {
                sheet.write_string(row, col, text)?;
            }
            Cell::Number(number) => {
                sheet.write_number(row, col, number)?;
            }
            Cell::Bool(b) => {
                sheet.write_boolean(row, col, b)?;
            }
        }
    }

    workbook.save(&path)?;
    Ok(path.display().to_string())
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
