//! Single-row tables captured from flattened text (GSTR-1 total
//! liability).
//!
//! The GSTR-1 summary prints the total liability as one labelled line of
//! amounts that layout extraction rarely recognizes as a table, so the row
//! is matched directly against the document's concatenated text. Each
//! capture group becomes one measure.

use gst_extract_pdf::PageLayout;
use gst_extract_returns_models::{LineItemRow, LineItemTable, TableKind};
use regex::Regex;

use super::TableExtractor;
use crate::numeric::NumericNormalizer;

/// Compiled pattern table settings.
#[derive(Debug, Clone)]
pub struct PatternSpec {
    kind: TableKind,
    label: String,
    pattern: Regex,
}

impl PatternSpec {
    /// Creates a spec. The caller guarantees one capture group per measure.
    #[must_use]
    pub const fn new(kind: TableKind, label: String, pattern: Regex) -> Self {
        Self {
            kind,
            label,
            pattern,
        }
    }

    /// The table type this spec produces.
    #[must_use]
    pub const fn kind(&self) -> TableKind {
        self.kind
    }

    /// Starts extraction for a new document.
    #[must_use]
    pub const fn start<'a>(&'a self, normalizer: &'a NumericNormalizer) -> PatternExtractor<'a> {
        PatternExtractor {
            spec: self,
            normalizer,
            text: String::new(),
        }
    }

    /// Matches the row in `text`, returning its measures.
    #[must_use]
    pub fn capture(&self, text: &str, normalizer: &NumericNormalizer) -> Option<Vec<f64>> {
        let caps = self.pattern.captures(text)?;
        Some(
            caps.iter()
                .skip(1) // skip the implicit whole-match group
                .map(|m| normalizer.normalize(m.map(|m| m.as_str())))
                .collect(),
        )
    }
}

/// Per-document state for a [`PatternSpec`]: the text seen so far.
#[derive(Debug)]
pub struct PatternExtractor<'a> {
    spec: &'a PatternSpec,
    normalizer: &'a NumericNormalizer,
    text: String,
}

impl TableExtractor for PatternExtractor<'_> {
    fn kind(&self) -> TableKind {
        self.spec.kind
    }

    fn observe(&mut self, page: &PageLayout) {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(&page.text);
    }

    fn finish(self: Box<Self>) -> LineItemTable {
        let width = self.spec.kind.width();
        let row = match self.spec.capture(&self.text, self.normalizer) {
            Some(values) => LineItemRow::new(self.spec.label.clone(), values, width),
            None => {
                log::debug!("{} not found, emitting zero row", self.spec.kind);
                LineItemRow::zeroed(self.spec.label.clone(), width)
            }
        };
        LineItemTable::new(self.spec.kind, vec![row])
    }
}

#[cfg(test)]
mod tests {
    use gst_extract_returns_models::ReturnKind;

    use super::*;
    use crate::config::ReturnProfile;
    use crate::table::TableSpec;

    fn run(pages: &[&str]) -> LineItemTable {
        let profile = ReturnProfile::embedded(ReturnKind::Gstr1);
        let TableSpec::Pattern(spec) = &profile.tables[0] else {
            panic!("GSTR-1 profile has no pattern table");
        };
        let mut extractor = Box::new(spec.start(&profile.normalizer));
        for text in pages {
            extractor.observe(&PageLayout::new((*text).to_owned(), Vec::new()));
        }
        extractor.finish()
    }

    #[test]
    fn captures_total_liability_across_line_breaks() {
        let table = run(&[
            "GSTR-1 summary",
            "Total Liability (Outward supplies other than Reverse charge)\n\
             12,34,567.00  1,11,111.11\n0.00 0.00\n500.50",
        ]);

        assert_eq!(table.rows.len(), 1);
        assert_eq!(
            table.rows[0].label,
            "Total Liability (Outward supplies other than Reverse charge)"
        );
        assert_eq!(
            table.rows[0].values,
            vec![1_234_567.0, 111_111.11, 0.0, 0.0, 500.5]
        );
    }

    #[test]
    fn missing_row_is_zero() {
        let table = run(&["no summary here"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].values, vec![0.0; 5]);
    }
}
