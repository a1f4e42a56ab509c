//! Read data rows from an Excel workbook
//!
//! Only the first sheet is read. Its first row is a header and is dropped
//! whatever it contains; every following row becomes a [`RawRow`].

use calamine::{Data, Reader, Xlsx, XlsxError, open_workbook};
use chrono::{Days, NaiveDate};
use std::path::Path;

use super::date;
use super::error::ReadError;
use super::models::RawRow;

/// Read every data row of the first sheet, in file order
pub fn read_rows<P: AsRef<Path>>(path: P) -> Result<Vec<RawRow>, ReadError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ReadError::FileNotFound(path.to_path_buf()));
    }

    let decode_error = |message: String| ReadError::Decode {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e: XlsxError| decode_error(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| decode_error("workbook has no sheets".to_string()))?
        .map_err(|e| decode_error(e.to_string()))?;

    // The used range starts at the first non-empty cell, not at A1
    let Some((start_row, start_col)) = range.start() else {
        return Ok(Vec::new());
    };
    let leading = start_col as usize;

    let blank_rows = (1..start_row).map(|_| RawRow::from_cells(Vec::new()));
    let used_rows = range.rows().map(|row| {
        let mut cells = vec![String::new(); leading];
        cells.extend(row.iter().map(cell_to_string));
        RawRow::from_cells(cells)
    });
    // Sheet row 1 is the header; it is only inside the used range when it has content
    let header_rows = if start_row == 0 { 1 } else { 0 };

    Ok(blank_rows.chain(used_rows.skip(header_rows)).collect())
}

/// Convert a cell to the text a spreadsheet would display for it
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole numbers print without a fraction so numeric ids stay digits
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                dt.as_f64().to_string()
            } else {
                serial_to_date(dt.as_f64())
                    .map(date::to_source)
                    .unwrap_or_default()
            }
        }
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, date::CANONICAL_FORMAT).ok())
            .map(date::to_source)
            .unwrap_or_else(|| s.clone()),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Convert an Excel serial day number (1900 date system) to a calendar date
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    // Day 0 is 1899-12-30 once the fictional 1900-02-29 is accounted for
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}
