//! Spreadsheet input reading.
//!
//! Every operation that takes a spreadsheet only cares about the first
//! column of one sheet, with no header row. Which sheet varies: the copy
//! operation prefers a sheet whose name contains "Pending", everything
//! else takes the first sheet.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::prelude::*;

/// Non-empty first-column values of the workbook's first sheet, in row
/// order.
pub fn first_column(path: &Path) -> Result<Vec<String>> {
    read_first_column(path, |names| names.first().cloned())
}

/// Like [`first_column`], but prefers a sheet whose name contains
/// "Pending" when one exists.
pub fn first_column_prefer_pending(path: &Path) -> Result<Vec<String>> {
    read_first_column(path, |names| pick_pending_sheet(names).map(str::to_string))
}

fn read_first_column(
    path: &Path,
    pick: impl Fn(&[String]) -> Option<String>,
) -> Result<Vec<String>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| eyre!("failed to open spreadsheet {}: {e}", path.display()))?;

    let sheet = pick(&workbook.sheet_names())
        .ok_or_else(|| eyre!("spreadsheet {} has no sheets", path.display()))?;

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| eyre!("failed to read sheet '{sheet}': {e}"))?;

    let mut values = Vec::new();
    for row in range.rows() {
        let Some(cell) = row.first() else { continue };
        let value = cell_to_string(cell);
        if !value.is_empty() {
            values.push(value);
        }
    }
    Ok(values)
}

/// The sheet the copy operation reads: the first one whose name contains
/// "Pending", else the first sheet.
pub fn pick_pending_sheet(names: &[String]) -> Option<&str> {
    names
        .iter()
        .find(|name| name.contains("Pending"))
        .or_else(|| names.first())
        .map(String::as_str)
}

/// Stringify a cell. Whole-number floats drop their fraction so numeric
/// identifier columns read back as "12345", not "12345.0".
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(v) if v.fract() == 0.0 => (*v as i64).to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
