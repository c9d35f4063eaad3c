//! Batch extraction over many documents.
//!
//! Documents are processed in upload order. A document that cannot be
//! loaded becomes a [`DocumentFailure`] and never aborts the rest of the
//! batch.

use std::path::PathBuf;
use std::sync::Arc;

use gst_extract_extractor::progress::ProgressCallback;
use gst_extract_extractor::{DocumentAggregator, ReturnProfile};
use gst_extract_pdf::{PageLayout, PageSource, PdfError, display_name, open_source};
use gst_extract_returns_models::DocumentFailure;

use crate::BatchResult;

/// Extracts every source with `profile`, reporting per-document progress.
#[must_use]
pub fn extract_batch(
    profile: &ReturnProfile,
    sources: &[Box<dyn PageSource>],
    progress: &Arc<dyn ProgressCallback>,
) -> BatchResult {
    let aggregator = DocumentAggregator::new(profile);
    let mut documents = Vec::with_capacity(sources.len());
    let mut failures = Vec::new();

    progress.set_total(sources.len() as u64);

    for (position, source) in sources.iter().enumerate() {
        progress.set_message(source.name().to_owned());

        match aggregator.extract(position, source.as_ref()) {
            Ok(record) => documents.push(record),
            Err(e) => {
                log::warn!("Skipping {}: {e}", source.name());
                failures.push(DocumentFailure {
                    position,
                    file_name: source.name().to_owned(),
                    message: e.to_string(),
                });
            }
        }

        progress.inc(1);
    }

    progress.finish(format!(
        "{} extracted, {} failed",
        documents.len(),
        failures.len()
    ));
    log::info!(
        "{}: extracted {} document(s), {} failure(s)",
        profile.kind,
        documents.len(),
        failures.len()
    );

    BatchResult::new(profile.kind, documents, failures)
}

/// Stands in for a path no reader accepts, so the failure keeps its upload
/// position.
struct Unsupported {
    name: String,
    path: String,
}

impl PageSource for Unsupported {
    fn name(&self) -> &str {
        &self.name
    }

    fn pages(&self) -> Result<Vec<PageLayout>, PdfError> {
        Err(PdfError::UnsupportedFormat(self.path.clone()))
    }
}

/// Opens each path by extension and extracts the batch.
///
/// Paths with an unsupported extension are recorded as failures at their
/// upload position.
#[must_use]
pub fn extract_paths(
    profile: &ReturnProfile,
    paths: &[PathBuf],
    progress: &Arc<dyn ProgressCallback>,
) -> BatchResult {
    let sources: Vec<Box<dyn PageSource>> = paths
        .iter()
        .map(|path| {
            open_source(path).unwrap_or_else(|e| {
                log::debug!("No reader for {}: {e}", path.display());
                Box::new(Unsupported {
                    name: display_name(path),
                    path: path.display().to_string(),
                })
            })
        })
        .collect();

    extract_batch(profile, &sources, progress)
}
