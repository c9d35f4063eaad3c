//! Table location and row classification.
//!
//! Each [`TableSpec`] produces a [`TableExtractor`] per document. The
//! aggregator feeds every page of the document to every extractor exactly
//! once, in page order, then asks each for its finished table. Extractors
//! carry whatever cross-page state they need (an active section, an
//! accumulated text buffer) so a logical table may span physical pages.

pub mod pattern;
pub mod positional;
pub mod section;

use gst_extract_pdf::PageLayout;
use gst_extract_returns_models::{LineItemTable, TableKind};

pub use pattern::PatternSpec;
pub use positional::PositionalSpec;
pub use section::SectionSpec;

use crate::numeric::NumericNormalizer;

/// Stateful per-document extraction of one table.
pub trait TableExtractor {
    /// The table type being produced.
    fn kind(&self) -> TableKind;

    /// Consumes the next page of the document.
    fn observe(&mut self, page: &PageLayout);

    /// Returns the finished table. Never fails: a table that was not found
    /// degrades to its documented default shape.
    fn finish(self: Box<Self>) -> LineItemTable;
}

/// How one table type is located, compiled from a profile.
#[derive(Debug, Clone)]
pub enum TableSpec {
    /// Canonical rows gathered across a context-gated section.
    Section(SectionSpec),
    /// Header-agnostic mapping of a single table by column position.
    Positional(PositionalSpec),
    /// One row captured from the flattened text.
    Pattern(PatternSpec),
}

impl TableSpec {
    /// The table type this spec produces.
    #[must_use]
    pub const fn kind(&self) -> TableKind {
        match self {
            Self::Section(spec) => spec.kind(),
            Self::Positional(spec) => spec.kind(),
            Self::Pattern(spec) => spec.kind(),
        }
    }

    /// Starts extraction for a new document.
    #[must_use]
    pub fn start<'a>(&'a self, normalizer: &'a NumericNormalizer) -> Box<dyn TableExtractor + 'a> {
        match self {
            Self::Section(spec) => Box::new(spec.start(normalizer)),
            Self::Positional(spec) => Box::new(spec.start(normalizer)),
            Self::Pattern(spec) => Box::new(spec.start(normalizer)),
        }
    }
}

/// Trims a cell and collapses internal whitespace (including the line
/// breaks that wrapped labels carry) to single spaces.
#[must_use]
pub fn clean_cell(cell: Option<&str>) -> String {
    cell.map(|c| c.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

/// Lowercases and removes all whitespace, for whitespace- and
/// case-insensitive comparison.
#[must_use]
pub fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalizes the cells after the label into exactly `width` measures.
#[must_use]
pub fn measures(cells: &[Option<String>], width: usize, normalizer: &NumericNormalizer) -> Vec<f64> {
    let mut values: Vec<f64> = cells
        .iter()
        .skip(1)
        .take(width)
        .map(|c| normalizer.normalize(c.as_deref()))
        .collect();
    values.resize(width, 0.0);
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_cell_collapses_wrapped_labels() {
        assert_eq!(
            clean_cell(Some("  (1) Import\nof   goods ")),
            "(1) Import of goods"
        );
        assert_eq!(clean_cell(None), "");
    }

    #[test]
    fn compact_ignores_case_and_spacing() {
        assert_eq!(compact("(1) Import of Goods"), compact("(1)import   of\ngoods"));
    }

    #[test]
    fn measures_pads_and_truncates() {
        let normalizer = NumericNormalizer::default();
        let cells = vec![Some("label".to_owned()), Some("1.00".to_owned()), None];
        assert_eq!(measures(&cells, 4, &normalizer), vec![1.0, 0.0, 0.0, 0.0]);

        let cells: Vec<Option<String>> = (0..10).map(|i| Some(i.to_string())).collect();
        assert_eq!(measures(&cells, 2, &normalizer), vec![1.0, 2.0]);
    }
}
