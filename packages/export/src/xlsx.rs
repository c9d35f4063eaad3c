//! XLSX workbook output via [`rust_xlsxwriter`].

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::{Cell, ExportError, Sheet, SheetSink};

/// Excel's worksheet name limit.
const MAX_SHEET_NAME: usize = 31;

const AMOUNT_FORMAT: &str = "#,##0.00";

/// Writes all sheets into one workbook at a path.
#[derive(Debug, Clone)]
pub struct XlsxSink {
    path: PathBuf,
}

impl XlsxSink {
    /// Creates a sink writing to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Builds the workbook in memory without saving it.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if a sheet name is invalid or a cell is
    /// rejected.
    pub fn workbook(sheets: &[Sheet]) -> Result<Workbook, ExportError> {
        let header_format = Format::new().set_bold();
        let amount_format = Format::new().set_num_format(AMOUNT_FORMAT);

        let mut workbook = Workbook::new();
        for sheet in sheets {
            if sheet.name.is_empty() || sheet.name.chars().count() > MAX_SHEET_NAME {
                return Err(ExportError::SheetName(sheet.name.clone()));
            }
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;
            write_sheet(worksheet, sheet, &header_format, &amount_format)?;
        }
        Ok(workbook)
    }
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &Sheet,
    header_format: &Format,
    amount_format: &Format,
) -> Result<(), XlsxError> {
    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, column(col), header, header_format)?;
    }

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let row_num = u32::try_from(row_idx + 1).unwrap_or(u32::MAX);
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(row_num, column(col), text)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number_with_format(row_num, column(col), *n, amount_format)?;
                }
                Cell::Empty => {}
            }
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn column(index: usize) -> u16 {
    u16::try_from(index).unwrap_or(u16::MAX)
}

impl SheetSink for XlsxSink {
    fn write(&self, sheets: &[Sheet]) -> Result<(), ExportError> {
        let mut workbook = Self::workbook(sheets)?;
        ensure_parent(&self.path)?;
        workbook.save(&self.path)?;
        log::info!(
            "Wrote {} sheet(s) to {}",
            sheets.len(),
            self.path.display()
        );
        Ok(())
    }

    fn target(&self) -> PathBuf {
        self.path.clone()
    }
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
