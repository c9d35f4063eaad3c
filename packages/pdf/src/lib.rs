#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Page layouts for GST return documents.
//!
//! The extraction engine never looks at raw PDF bytes. It consumes one
//! [`PageLayout`] per page: the page's flattened text plus zero or more
//! table-of-cells grids. This crate produces those layouts from two kinds
//! of input:
//!
//! - **PDF files**, via pure-Rust text extraction ([`pdf_extract`]) with
//!   tables recovered from whitespace-aligned columns ([`text_table`]).
//! - **JSON layout files** ([`layout_file`]), for layouts produced by an
//!   external PDF tool that already detects table cells.
//!
//! Both implement [`PageSource`]; [`open_source`] picks one by file
//! extension.

pub mod layout_file;
pub mod pdf_file;
pub mod text_table;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use layout_file::LayoutFile;
pub use pdf_file::PdfFile;

/// Errors raised while loading a document's page layouts.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// A JSON layout file could not be parsed.
    #[error("Layout parse error: {0}")]
    Layout(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file extension is not one we know how to read.
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// A rectangular grid of optional cells, row-major.
pub type TableGrid = Vec<Vec<Option<String>>>;

/// One page as seen by the extraction engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Flattened page text. Empty when the page has no text layer.
    #[serde(default)]
    pub text: String,
    /// Table-of-cells structures detected on the page.
    #[serde(default)]
    pub tables: Vec<TableGrid>,
}

impl PageLayout {
    /// Creates a page from text and tables.
    #[must_use]
    pub const fn new(text: String, tables: Vec<TableGrid>) -> Self {
        Self { text, tables }
    }

    /// Creates a page whose tables are recovered from the text's
    /// whitespace-aligned columns.
    #[must_use]
    pub fn from_text(text: String) -> Self {
        let tables = text_table::tables_from_text(&text);
        Self { text, tables }
    }
}

/// A document that can be read as a sequence of page layouts.
pub trait PageSource {
    /// Display name of the document, used to tag extracted rows.
    fn name(&self) -> &str;

    /// Loads every page of the document, in page order.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the document cannot be read or decoded.
    fn pages(&self) -> Result<Vec<PageLayout>, PdfError>;
}

/// A document whose pages are already in memory.
#[derive(Debug, Clone)]
pub struct InMemoryDocument {
    name: String,
    pages: Vec<PageLayout>,
}

impl InMemoryDocument {
    /// Wraps already-extracted pages.
    #[must_use]
    pub fn new(name: impl Into<String>, pages: Vec<PageLayout>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }
}

impl PageSource for InMemoryDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn pages(&self) -> Result<Vec<PageLayout>, PdfError> {
        Ok(self.pages.clone())
    }
}

/// Opens `path` with the reader matching its extension (`.pdf` or
/// `.json`).
///
/// # Errors
///
/// Returns [`PdfError::UnsupportedFormat`] for any other extension.
pub fn open_source(path: &Path) -> Result<Box<dyn PageSource>, PdfError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => Ok(Box::new(PdfFile::new(path))),
        "json" => Ok(Box::new(LayoutFile::new(path))),
        _ => Err(PdfError::UnsupportedFormat(path.display().to_string())),
    }
}

/// File name component of `path`, falling back to the full display path.
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}
