// Excel content import (xlsx, xls, xlsb, ods) and styled export (xlsx only)
//
// Import: only the first column of the first N rows is read; everything else
// in the workbook is ignored.
// Export: text plus bold/italic/size per row, for sharing or as a seed file.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use labsheet_core::CellAddr;
use labsheet_engine::{DocumentContent, FontStyle, FontWeight, ResolvedStyle, StyleOverlay};
use rust_xlsxwriter::{Format, Workbook};
use thiserror::Error;

/// Name of the worksheet written by [`export`]
pub const EXPORT_SHEET_NAME: &str = "Header";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to open spreadsheet: {0}")]
    Open(String),
    #[error("spreadsheet contains no sheets")]
    NoSheets,
    #[error("failed to read sheet '{name}': {message}")]
    Sheet { name: String, message: String },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write xlsx: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("failed to write {path}: {source}")]
    Io { path: String, source: std::io::Error },
}

/// Read the first column of the first `row_count` rows of the first sheet.
///
/// Rows the sheet does not have come back as empty strings, so the result
/// always has exactly `row_count` rows.
pub fn import_first_column(bytes: &[u8], row_count: usize) -> Result<DocumentContent, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ImportError::Open(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::NoSheets)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::Sheet { name: sheet_name.clone(), message: e.to_string() })?;

    let mut rows = vec![String::new(); row_count];

    // Range start offset (data may not begin at A1)
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    if start_col != 0 {
        log::warn!("sheet '{}' has no data in column A", sheet_name);
        return Ok(DocumentContent::from_rows(rows));
    }

    for (row_idx, row) in range.rows().enumerate() {
        let target_row = start_row as usize + row_idx;
        if target_row >= row_count {
            break;
        }
        if let Some(cell) = row.first() {
            rows[target_row] = cell_text(cell);
        }
    }

    Ok(DocumentContent::from_rows(rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Format nicely: integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#{:?}", e),
        other => other.to_string(),
    }
}

/// Write the document as a one-column xlsx workbook, carrying each row's
/// overlay style as a cell format.
pub fn export(
    content: &DocumentContent,
    overlay: &StyleOverlay,
    defaults: &ResolvedStyle,
) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    for (row, text) in content.rows().iter().enumerate() {
        let xlsx_row = row as u32;
        match overlay.get(CellAddr::new(row, 0)) {
            Some(patch) => {
                let format = cell_format(&patch.resolve(defaults));
                worksheet.write_string_with_format(xlsx_row, 0, text, &format)?;
            }
            None if !text.is_empty() => {
                worksheet.write_string(xlsx_row, 0, text)?;
            }
            None => {}
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// [`export`] straight to a file
pub fn export_to_path(
    path: &Path,
    content: &DocumentContent,
    overlay: &StyleOverlay,
    defaults: &ResolvedStyle,
) -> Result<(), ExportError> {
    let bytes = export(content, overlay, defaults)?;
    std::fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn cell_format(style: &ResolvedStyle) -> Format {
    let mut format = Format::new().set_font_size(style.font_size.px() as f64);
    if style.font_weight == FontWeight::Bold {
        format = format.set_bold();
    }
    if style.font_style == FontStyle::Italic {
        format = format.set_italic();
    }
    format
}
