//! Renders a [`Workbook`] to an `.xlsx` file on disk.

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use crate::error::ReportError;
use crate::sheets::{build_workbook, Cell, ReportInput, Workbook};

/// Largest string a single xlsx cell accepts, in characters.
const MAX_CELL_CHARS: usize = 32_767;
const ELLIPSIS: char = '\u{2026}';

/// Builds the report for `input` and writes it to `path`.
///
/// The file is written to a temporary sibling first and renamed into place,
/// so readers never observe a half-written workbook.
///
/// # Errors
///
/// Returns [`ReportError::Xlsx`] if the workbook cannot be serialized and
/// [`ReportError::Io`] if the destination cannot be written.
pub fn write_report(
    path: &Path,
    input: &ReportInput<'_>,
    generated_at: DateTime<Utc>,
) -> Result<(), ReportError> {
    let workbook = build_workbook(input, generated_at);
    let bytes = render(&workbook)?;
    persist_atomically(path, &bytes)?;
    tracing::info!(
        path = %path.display(),
        sheets = workbook.sheets.len(),
        "report written"
    );
    Ok(())
}

/// Serializes `workbook` into xlsx bytes.
///
/// # Errors
///
/// Returns [`ReportError::Xlsx`] on any writer failure.
pub fn render(workbook: &Workbook) -> Result<Vec<u8>, ReportError> {
    let mut out = XlsxWorkbook::new();
    let header = Format::new().set_bold();

    for sheet in &workbook.sheets {
        let ws = out.add_worksheet();
        ws.set_name(sheet.name)?;

        for (col, title) in (0u16..).zip(&sheet.headers) {
            ws.write_string_with_format(0, col, *title, &header)?;
        }
        for (row, cells) in (1u32..).zip(&sheet.rows) {
            for (col, cell) in (0u16..).zip(cells) {
                match cell {
                    Cell::Text(value) => {
                        ws.write_string(row, col, truncate_for_cell(value))?;
                    }
                    #[allow(clippy::cast_precision_loss)]
                    Cell::Int(value) => {
                        ws.write_number(row, col, *value as f64)?;
                    }
                    Cell::Float(value) => {
                        ws.write_number(row, col, *value)?;
                    }
                    Cell::Empty => {}
                }
            }
        }
        ws.set_freeze_panes(1, 0)?;
        ws.autofit();
    }

    Ok(out.save_to_buffer()?)
}

/// Cut `value` to the per-cell limit on a char boundary, marking the cut.
fn truncate_for_cell(value: &str) -> Cow<'_, str> {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        None => Cow::Borrowed(value),
        Some(_) => {
            let mut cut: String = value.chars().take(MAX_CELL_CHARS - 1).collect();
            cut.push(ELLIPSIS);
            Cow::Owned(cut)
        }
    }
}

pub(crate) fn persist_atomically(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.flush().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
