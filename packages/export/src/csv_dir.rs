//! CSV output: one file per sheet in a directory.

use std::path::{Path, PathBuf};

use crate::{ExportError, Sheet, SheetSink};

/// Writes each sheet as `<dir>/<sheet name>.csv`.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    /// Creates a sink writing into `dir`, created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the named sheet is written to.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::SheetName`] for names that are empty or would
    /// escape the directory.
    pub fn file_for(&self, sheet_name: &str) -> Result<PathBuf, ExportError> {
        let stem = file_stem(sheet_name);
        if stem.is_empty() {
            return Err(ExportError::SheetName(sheet_name.to_owned()));
        }
        Ok(self.dir.join(format!("{stem}.csv")))
    }
}

/// Lowercases the name and replaces anything but ASCII alphanumerics
/// with `_`, collapsing runs.
fn file_stem(sheet_name: &str) -> String {
    let mut stem = String::with_capacity(sheet_name.len());
    for c in sheet_name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }
    stem.trim_matches('_').to_owned()
}

fn write_sheet(path: &Path, sheet: &Sheet) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        writer.write_record(row.iter().map(crate::Cell::as_text))?;
    }
    writer.flush()?;
    Ok(())
}

impl SheetSink for CsvSink {
    fn write(&self, sheets: &[Sheet]) -> Result<(), ExportError> {
        std::fs::create_dir_all(&self.dir)?;
        for sheet in sheets {
            let path = self.file_for(&sheet.name)?;
            write_sheet(&path, sheet)?;
            log::debug!("Wrote {} row(s) to {}", sheet.rows.len(), path.display());
        }
        log::info!(
            "Wrote {} CSV file(s) to {}",
            sheets.len(),
            self.dir.display()
        );
        Ok(())
    }

    fn target(&self) -> PathBuf {
        self.dir.clone()
    }
}
