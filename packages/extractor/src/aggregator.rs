//! Per-document aggregation.
//!
//! Walks a document's pages once, handing every page to every table
//! extractor of the return type, and combines the scalar fields from the
//! concatenated text with the finished tables into one
//! [`DocumentRecord`]. No individual field or table can fail the record;
//! only loading the document itself can.

use gst_extract_pdf::{PageLayout, PageSource, PdfError};
use gst_extract_returns_models::{DocumentRecord, LineItemTable};

use crate::config::ReturnProfile;
use crate::table::TableExtractor;

/// Builds [`DocumentRecord`]s with one [`ReturnProfile`].
#[derive(Debug, Clone, Copy)]
pub struct DocumentAggregator<'a> {
    profile: &'a ReturnProfile,
}

impl<'a> DocumentAggregator<'a> {
    /// Creates an aggregator for `profile`.
    #[must_use]
    pub const fn new(profile: &'a ReturnProfile) -> Self {
        Self { profile }
    }

    /// The profile in use.
    #[must_use]
    pub const fn profile(&self) -> &'a ReturnProfile {
        self.profile
    }

    /// Loads `source` and extracts its record.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the document's pages cannot be loaded.
    pub fn extract(
        &self,
        position: usize,
        source: &dyn PageSource,
    ) -> Result<DocumentRecord, PdfError> {
        let pages = source.pages()?;
        Ok(self.extract_pages(position, source.name(), &pages))
    }

    /// Extracts a record from already-loaded pages.
    #[must_use]
    pub fn extract_pages(
        &self,
        position: usize,
        file_name: &str,
        pages: &[PageLayout],
    ) -> DocumentRecord {
        let text = pages
            .iter()
            .map(|p| p.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let fields = self.profile.fields.extract(&text);

        let mut extractors: Vec<Box<dyn TableExtractor + '_>> = self
            .profile
            .tables
            .iter()
            .map(|spec| spec.start(&self.profile.normalizer))
            .collect();

        for page in pages {
            for extractor in &mut extractors {
                extractor.observe(page);
            }
        }

        let mut finished: Vec<LineItemTable> = extractors.into_iter().map(|e| e.finish()).collect();

        let tables = self
            .profile
            .kind
            .tables()
            .iter()
            .map(|kind| {
                finished
                    .iter()
                    .position(|t| t.kind == *kind)
                    .map_or_else(|| LineItemTable::empty(*kind), |i| finished.remove(i))
            })
            .collect();

        let record = DocumentRecord::new(position, file_name, self.profile.kind, fields, tables);

        log::debug!(
            "{file_name}: {} page(s), GSTIN {:?}, region {}, {} table(s)",
            pages.len(),
            record.fields.gstin,
            record.region,
            record.tables.len()
        );

        record
    }
}
