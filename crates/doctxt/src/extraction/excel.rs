//! Spreadsheet text extraction using `calamine`.
//!
//! Each sheet renders as an optional `[Sheet: name]` heading followed by one
//! line per non-empty row, cells separated by ` | `. Sheets are separated by a
//! blank line.

use calamine::{Data, Range, Reader};
use std::fmt::Write as FmtWrite;
use std::io::Cursor;

use crate::error::{ConvertError, Result};
use crate::extraction::archive::ZipContainer;

pub const CELL_SEPARATOR: &str = " | ";

/// Extract text from XLSX/XLSM bytes.
pub fn extract_text(bytes: &[u8], include_sheet_names: bool, max_entry_bytes: u64) -> Result<String> {
    ZipContainer::open(bytes, max_entry_bytes, "XLSX")?.check_entry_sizes()?;

    let mut workbook = calamine::Xlsx::new(Cursor::new(bytes))
        .map_err(|e| ConvertError::conversion(format!("Failed to parse XLSX: {}", e)))?;

    let sheet_names = workbook.sheet_names();
    let mut rendered = Vec::with_capacity(sheet_names.len());

    for name in &sheet_names {
        match workbook.worksheet_range(name) {
            Ok(range) => rendered.push(render_sheet(name, &range, include_sheet_names)),
            Err(e) => tracing::warn!(sheet = %name, error = %e, "Skipping unreadable worksheet"),
        }
    }

    Ok(rendered
        .into_iter()
        .filter(|sheet| !sheet.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n"))
}

/// Render one sheet. A sheet without cells renders as just its heading, or nothing.
pub fn render_sheet(name: &str, range: &Range<Data>, include_sheet_names: bool) -> String {
    let mut out = String::new();
    if include_sheet_names {
        let _ = write!(out, "[Sheet: {}]", name);
    }

    for row in range.rows() {
        let used = row
            .iter()
            .rposition(|cell| !matches!(cell, Data::Empty))
            .map_or(0, |last| last + 1);
        if used == 0 {
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
        }
        for (idx, cell) in row[..used].iter().enumerate() {
            if idx > 0 {
                out.push_str(CELL_SEPARATOR);
            }
            format_cell_value_into(&mut out, cell);
        }
    }

    out
}

#[inline]
fn format_cell_value_into(buffer: &mut String, data: &Data) {
    match data {
        Data::Empty => {}
        Data::String(s) => buffer.push_str(s),
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                let _ = write!(buffer, "{}", *f as i64);
            } else {
                let _ = write!(buffer, "{}", f);
            }
        }
        Data::Int(i) => {
            let _ = write!(buffer, "{}", i);
        }
        Data::Bool(b) => buffer.push_str(if *b { "TRUE" } else { "FALSE" }),
        Data::DateTime(dt) => {
            if let Some(datetime) = dt.as_datetime() {
                let formatted = datetime.format("%Y-%m-%d %H:%M:%S").to_string();
                buffer.push_str(formatted.strip_suffix(" 00:00:00").unwrap_or(&formatted));
            } else {
                let _ = write!(buffer, "{}", dt.as_f64());
            }
        }
        Data::Error(e) => {
            let _ = write!(buffer, "{}", e);
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => buffer.push_str(s),
    }
}
