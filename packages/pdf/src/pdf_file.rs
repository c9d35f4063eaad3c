//! PDF documents read with [`pdf_extract`].
//!
//! `pdf_extract` yields one text string per page but no cell structure, so
//! tables are recovered from the text with [`crate::text_table`].

use std::path::{Path, PathBuf};

use crate::{PageLayout, PageSource, PdfError, display_name};

/// A PDF file on disk.
#[derive(Debug, Clone)]
pub struct PdfFile {
    path: PathBuf,
    name: String,
}

impl PdfFile {
    /// Creates a reader for the PDF at `path`. Nothing is read until
    /// [`PageSource::pages`] is called.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            name: display_name(path),
        }
    }
}

impl PageSource for PdfFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn pages(&self) -> Result<Vec<PageLayout>, PdfError> {
        let bytes = std::fs::read(&self.path)?;

        log::debug!("Read {} bytes from {}", bytes.len(), self.path.display());

        pages_from_bytes(&bytes)
    }
}

/// Extracts page layouts from in-memory PDF bytes.
///
/// # Errors
///
/// Returns [`PdfError::Extraction`] if the bytes are not a readable PDF,
/// including when `pdf_extract` panics on a malformed font or stream.
pub fn pages_from_bytes(bytes: &[u8]) -> Result<Vec<PageLayout>, PdfError> {
    let texts = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|payload| {
        PdfError::Extraction(format!(
            "PDF extraction panicked (malformed PDF): {}",
            panic_message(payload.as_ref())
        ))
    })?
    .map_err(|e| PdfError::Extraction(format!("failed to extract text from PDF: {e}")))?;

    log::debug!("Extracted text from {} page(s)", texts.len());

    Ok(texts.into_iter().map(PageLayout::from_text).collect())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A Type0 font without `/DescendantFonts`, which `pdf_extract` panics on.
    const TYPE0_WITHOUT_DESCENDANTS: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/fixtures/type0_without_descendants.pdf"
    );

    #[test]
    fn garbage_bytes_are_an_extraction_error() {
        let result = pages_from_bytes(b"definitely not a pdf");
        assert!(matches!(result, Err(PdfError::Extraction(_))));
    }

    #[test]
    fn panicking_font_is_an_extraction_error() {
        let file = PdfFile::new(Path::new(TYPE0_WITHOUT_DESCENDANTS));
        match file.pages() {
            Err(PdfError::Extraction(message)) => {
                assert!(message.contains("Descendant fonts required"), "{message}");
            }
            other => panic!("expected extraction error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let file = PdfFile::new(Path::new("/nonexistent/gst/return.pdf"));
        assert_eq!(file.name(), "return.pdf");
        assert!(matches!(file.pages(), Err(PdfError::Io(_))));
    }
}
