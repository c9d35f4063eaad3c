#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spreadsheet export of extraction batches.
//!
//! A batch is first flattened into a list of rectangular [`Sheet`]s
//! ([`sheets_from_batch`]), then handed to a [`SheetSink`]. Two sinks are
//! provided: [`XlsxSink`] writes one workbook, [`CsvSink`] writes one CSV
//! file per sheet into a directory.

pub mod csv_dir;
pub mod sheet;
pub mod xlsx;

use std::path::PathBuf;

pub use csv_dir::CsvSink;
pub use sheet::{COMBINED_SHEET, Cell, GENERAL_SHEET, Sheet, sheets_from_batch};
pub use xlsx::XlsxSink;

/// Errors raised while writing sheets.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The XLSX writer rejected a sheet or failed to save.
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// A CSV record could not be written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A sheet name is unusable as a file or worksheet name.
    #[error("Invalid sheet name: {0:?}")]
    SheetName(String),
}

/// A destination for a list of sheets.
pub trait SheetSink {
    /// Writes every sheet, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if any sheet cannot be written.
    fn write(&self, sheets: &[Sheet]) -> Result<(), ExportError>;

    /// Where the sheets end up, for log messages.
    fn target(&self) -> PathBuf;
}
