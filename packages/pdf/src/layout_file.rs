//! JSON page-layout files.
//!
//! Accepts either a bare array of pages or an object with a `pages` key:
//!
//! ```json
//! { "pages": [ { "text": "GSTIN 27ABCDE1234F1Z5", "tables": [[["a", null]]] } ] }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{PageLayout, PageSource, PdfError, display_name};

#[derive(Deserialize)]
#[serde(untagged)]
enum LayoutDocument {
    Wrapped { pages: Vec<PageLayout> },
    Bare(Vec<PageLayout>),
}

/// A JSON layout file on disk.
#[derive(Debug, Clone)]
pub struct LayoutFile {
    path: PathBuf,
    name: String,
}

impl LayoutFile {
    /// Creates a reader for the layout file at `path`.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            name: display_name(path),
        }
    }
}

impl PageSource for LayoutFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn pages(&self) -> Result<Vec<PageLayout>, PdfError> {
        let json = std::fs::read_to_string(&self.path)?;
        parse_layout(&json)
    }
}

/// Parses a layout document from a JSON string.
///
/// # Errors
///
/// Returns [`PdfError::Layout`] if the JSON does not describe pages.
pub fn parse_layout(json: &str) -> Result<Vec<PageLayout>, PdfError> {
    let document: LayoutDocument = serde_json::from_str(json)?;
    Ok(match document {
        LayoutDocument::Wrapped { pages } | LayoutDocument::Bare(pages) => pages,
    })
}
