//! Sheet normalizer: raw grid → ordered shift records.
//!
//! Layout convention of an uploaded roster:
//! - row 1: `[subgroup label, name label, date, date, ...]`
//! - row 2: sub-header, ignored
//! - row 3+: `[subgroup, name, shift, shift, ...]`
//!
//! A row whose subgroup and name are both blank is treated as trailing filler
//! and dropped.

use crate::error::{HorariosError, HorariosResult};
use crate::grid::{Cell, Grid};
use crate::types::{ParseResult, ShiftRecord};
use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

/// Sheet picked by default when the workbook has it
pub const PREFERRED_SHEET: &str = "OPS FEB";

/// Date header row + sub-header row + at least one data row
pub const MIN_ROWS: usize = 3;

/// Leading columns reserved for subgroup and name
const LABEL_COLUMNS: usize = 2;

pub const MSG_MISSING_FILE: &str = "Archivo no encontrado";
pub const MSG_SHEET_NOT_FOUND: &str = "Sheet no encontrada";
pub const MSG_INVALID_FORMAT: &str = "Formato inválido";

/// Normalize a header cell into a date key. An empty key marks a column to skip.
pub fn normalize_date_key(cell: &Cell) -> String {
    match cell {
        Cell::Number(serial) => {
            serial_to_date_key(*serial).unwrap_or_else(|| {
                warn!(serial, "header serial outside the calendar range, keeping raw value");
                serial.to_string()
            })
        }
        // Already-normalized dates and free labels both pass through trimmed
        Cell::Text(s) => s.trim().to_string(),
        Cell::Empty | Cell::Bool(_) => String::new(),
    }
}

/// Format a spreadsheet serial date (1900 date system) as `YYYY-MM-DD`.
///
/// Serial 60 is the phantom 1900-02-29 of the 1900 system and is reproduced
/// verbatim; serials before it are offset by one day accordingly.
pub fn serial_to_date_key(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let mut days = serial.floor() as i64;
    let seconds = ((serial - serial.floor()) * 86_400.0).round() as i64;
    if seconds >= 86_400 {
        days += 1;
    }

    if days == 60 {
        return Some("1900-02-29".to_string());
    }

    let epoch = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let date = epoch.checked_add_signed(Duration::try_days(days)?)?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// Turn a raw grid into shift records.
///
/// Fails with `InvalidFormat` when the grid has fewer than [`MIN_ROWS`] rows.
pub fn normalize_grid(grid: &Grid) -> HorariosResult<Vec<ShiftRecord>> {
    if grid.len() < MIN_ROWS {
        return Err(HorariosError::InvalidFormat(MSG_INVALID_FORMAT.to_string()));
    }

    let date_keys: Vec<String> = grid[0]
        .iter()
        .skip(LABEL_COLUMNS)
        .map(normalize_date_key)
        .collect();
    debug!(
        columns = date_keys.len(),
        skipped = date_keys.iter().filter(|k| k.is_empty()).count(),
        "date header normalized"
    );

    let mut records = Vec::new();
    for (offset, row) in grid.iter().skip(MIN_ROWS - 1).enumerate() {
        let subgroup = cell_text(row, 0);
        let name = cell_text(row, 1);
        if subgroup.is_empty() && name.is_empty() {
            debug!(row = offset + MIN_ROWS, "blank row skipped");
            continue;
        }

        let mut record = ShiftRecord::new(subgroup, name);
        for (idx, date) in date_keys.iter().enumerate() {
            if date.is_empty() {
                continue;
            }
            let code = cell_text(row, idx + LABEL_COLUMNS).to_uppercase();
            record.shifts.insert(date.clone(), code);
        }
        records.push(record);
    }

    Ok(records)
}

fn cell_text(row: &[Cell], col: usize) -> String {
    row.get(col)
        .map(|cell| cell.to_text().trim().to_string())
        .unwrap_or_default()
}

/// Choose which sheet to parse.
///
/// An explicit request must exist. Otherwise the preferred sheet wins when
/// present, else the first sheet.
pub fn select_sheet(
    sheets: &[String],
    requested: Option<&str>,
    preferred: &str,
) -> HorariosResult<String> {
    let not_found = || HorariosError::SheetNotFound(MSG_SHEET_NOT_FOUND.to_string());

    if let Some(name) = requested.filter(|n| !n.trim().is_empty()) {
        return sheets
            .iter()
            .find(|s| s.as_str() == name)
            .cloned()
            .ok_or_else(not_found);
    }

    if let Some(sheet) = sheets.iter().find(|s| s.as_str() == preferred) {
        return Ok(sheet.clone());
    }
    sheets.first().cloned().ok_or_else(not_found)
}

/// Normalize a chosen sheet's grid into the top-level parse artifact.
pub fn normalize_sheet(
    grid: &Grid,
    sheet_name: &str,
    available_sheets: &[String],
) -> HorariosResult<ParseResult> {
    let records = normalize_grid(grid)?;
    Ok(ParseResult {
        records,
        sheet_name: sheet_name.to_string(),
        available_sheets: available_sheets.to_vec(),
    })
}
