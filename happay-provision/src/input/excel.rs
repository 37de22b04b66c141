//! Read provisioning rows from the first worksheet of an XLSX workbook

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook};

use super::Row;

/// Read all data rows of the first worksheet
pub fn read_xlsx(path: &Path) -> Result<Vec<Row>> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .context("Excel file has no sheets")?
        .clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    // Absolute row index of the range's first row, so line numbers match the sheet
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut rows_iter = range.rows();

    let headers: Vec<String> = match rows_iter.next() {
        Some(header_row) => header_row.iter().map(cell_text).collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();

    for (idx, row) in rows_iter.enumerate() {
        if row.iter().all(|c| cell_text(c).trim().is_empty()) {
            continue;
        }

        let cells: HashMap<String, String> = headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !header.is_empty())
            .map(|(i, header)| (header.clone(), row.get(i).map(cell_text).unwrap_or_default()))
            .collect();

        // +1 for the header row, +1 for 1-based numbering
        rows.push(Row::new(first_row + idx + 2, cells));
    }

    Ok(rows)
}

/// Render a cell the way it reads in the spreadsheet
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole numbers (phone numbers, ids) lose the trailing ".0"
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) if datetime.time() == chrono::NaiveTime::MIN => {
                datetime.format("%Y-%m-%d").to_string()
            }
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format!("{}", dt),
        },
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}
