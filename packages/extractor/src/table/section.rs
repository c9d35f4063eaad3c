//! Context-gated canonical-row tables (GSTR-3B table 4, "Eligible ITC").
//!
//! The table is poorly structured in practice: it wraps across pages, picks
//! up decorative rows, and sometimes loses rows entirely. Extraction
//! therefore works against a fixed list of expected row labels:
//!
//! 1. A section opens when a start marker appears in page text and stays
//!    open across pages until a page carrying an end marker has been
//!    processed. Once closed it never reopens.
//! 2. Every row of every table on an open page is classified: header rows
//!    are skipped, the first cell is matched against the expected labels
//!    (case- and whitespace-insensitive containment, first label wins), and
//!    unmatched rows are dropped.
//! 3. The output always lists every expected label, in order, with zeros
//!    for labels that were never seen.

use gst_extract_pdf::PageLayout;
use gst_extract_returns_models::{LineItemRow, LineItemTable, TableKind};

use super::{TableExtractor, clean_cell, compact, measures};
use crate::numeric::NumericNormalizer;

/// Compiled section table settings.
#[derive(Debug, Clone)]
pub struct SectionSpec {
    kind: TableKind,
    start_markers: Vec<String>,
    end_markers: Vec<String>,
    end_line_prefixes: Vec<String>,
    header_tokens: Vec<String>,
    expected_rows: Vec<String>,
    expected_keys: Vec<String>,
}

impl SectionSpec {
    /// Creates a spec. Header tokens and expected labels are matched in
    /// compacted form.
    #[must_use]
    pub fn new(
        kind: TableKind,
        start_markers: Vec<String>,
        end_markers: Vec<String>,
        end_line_prefixes: Vec<String>,
        header_tokens: &[String],
        expected_rows: Vec<String>,
    ) -> Self {
        let expected_keys = expected_rows.iter().map(|r| compact(r)).collect();
        Self {
            kind,
            start_markers,
            end_markers,
            end_line_prefixes,
            header_tokens: header_tokens.iter().map(|t| compact(t)).collect(),
            expected_rows,
            expected_keys,
        }
    }

    /// The table type this spec produces.
    #[must_use]
    pub const fn kind(&self) -> TableKind {
        self.kind
    }

    /// The canonical labels, in output order.
    #[must_use]
    pub fn expected_rows(&self) -> &[String] {
        &self.expected_rows
    }

    /// Starts extraction for a new document.
    #[must_use]
    pub fn start<'a>(&'a self, normalizer: &'a NumericNormalizer) -> SectionExtractor<'a> {
        SectionExtractor {
            spec: self,
            normalizer,
            state: SectionState::Pending,
            found: vec![None; self.expected_rows.len()],
        }
    }

    fn opens(&self, text: &str) -> bool {
        self.start_markers.iter().any(|m| text.contains(m.as_str()))
    }

    fn closes(&self, text: &str) -> bool {
        self.end_markers.iter().any(|m| text.contains(m.as_str()))
            || text.lines().any(|line| {
                let line = line.trim_start();
                self.end_line_prefixes
                    .iter()
                    .any(|p| line.starts_with(p.as_str()))
            })
    }

    fn is_header(&self, label: &str) -> bool {
        let key = compact(label);
        self.header_tokens.iter().any(|t| key.starts_with(t.as_str()))
    }

    /// Index of the first expected label contained in `label`.
    #[must_use]
    pub fn classify(&self, label: &str) -> Option<usize> {
        let key = compact(label);
        if key.is_empty() {
            return None;
        }
        self.expected_keys
            .iter()
            .position(|expected| key.contains(expected.as_str()))
    }
}

/// Where a document currently stands relative to the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    /// No start marker seen yet.
    Pending,
    /// Tables are being classified.
    Active,
    /// An end marker was seen; nothing more is read.
    Closed,
}

/// Per-document state for a [`SectionSpec`].
#[derive(Debug)]
pub struct SectionExtractor<'a> {
    spec: &'a SectionSpec,
    normalizer: &'a NumericNormalizer,
    state: SectionState,
    found: Vec<Option<Vec<f64>>>,
}

impl SectionExtractor<'_> {
    /// Current section state.
    #[must_use]
    pub const fn state(&self) -> SectionState {
        self.state
    }

    fn classify_row(&mut self, row: &[Option<String>]) {
        let label = clean_cell(row.first().and_then(Option::as_deref));
        if label.is_empty() || self.spec.is_header(&label) {
            return;
        }

        let Some(index) = self.spec.classify(&label) else {
            log::trace!("Dropping unmatched {} row {label:?}", self.spec.kind);
            return;
        };

        let values = measures(row, self.spec.kind.width(), self.normalizer);
        if self.found[index].replace(values).is_some() {
            log::debug!(
                "Row {:?} of {} seen again, keeping the later values",
                self.spec.expected_rows[index],
                self.spec.kind
            );
        }
    }
}

impl TableExtractor for SectionExtractor<'_> {
    fn kind(&self) -> TableKind {
        self.spec.kind
    }

    fn observe(&mut self, page: &PageLayout) {
        if self.state == SectionState::Pending && self.spec.opens(&page.text) {
            log::debug!("{} section opened", self.spec.kind);
            self.state = SectionState::Active;
        }

        if self.state != SectionState::Active {
            return;
        }

        for table in &page.tables {
            for row in table {
                self.classify_row(row);
            }
        }

        if self.spec.closes(&page.text) {
            log::debug!("{} section closed", self.spec.kind);
            self.state = SectionState::Closed;
        }
    }

    fn finish(self: Box<Self>) -> LineItemTable {
        let width = self.spec.kind.width();
        let rows = self
            .spec
            .expected_rows
            .iter()
            .zip(self.found)
            .map(|(label, values)| match values {
                Some(values) => LineItemRow::new(label.clone(), values, width),
                None => LineItemRow::zeroed(label.clone(), width),
            })
            .collect();
        LineItemTable::new(self.spec.kind, rows)
    }
}
