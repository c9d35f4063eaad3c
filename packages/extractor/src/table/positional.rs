//! Single-table extraction by column position (GSTR-3B tables 3.1 and 6.1).
//!
//! Header wording changes between form revisions while column order does
//! not, so the header row is discarded and cells are mapped onto the
//! table type's declared columns purely by position.

use gst_extract_pdf::{PageLayout, TableGrid};
use gst_extract_returns_models::{LineItemRow, LineItemTable, TableKind};

use super::{TableExtractor, clean_cell, measures};
use crate::numeric::NumericNormalizer;

/// Compiled positional table settings.
#[derive(Debug, Clone)]
pub struct PositionalSpec {
    kind: TableKind,
    markers: Vec<String>,
}

impl PositionalSpec {
    /// Creates a spec. A page qualifies when its text contains every
    /// marker.
    #[must_use]
    pub const fn new(kind: TableKind, markers: Vec<String>) -> Self {
        Self { kind, markers }
    }

    /// The table type this spec produces.
    #[must_use]
    pub const fn kind(&self) -> TableKind {
        self.kind
    }

    /// Starts extraction for a new document.
    #[must_use]
    pub const fn start<'a>(&'a self, normalizer: &'a NumericNormalizer) -> PositionalExtractor<'a> {
        PositionalExtractor {
            spec: self,
            normalizer,
            rows: None,
        }
    }

    fn qualifies(&self, text: &str) -> bool {
        self.markers.iter().all(|m| text.contains(m.as_str()))
    }
}

/// Picks the page's largest table with a header row and at least one data
/// row. Ties go to the earlier table.
#[must_use]
pub fn well_formed_table(tables: &[TableGrid]) -> Option<&TableGrid> {
    tables
        .iter()
        .filter(|t| t.len() >= 2)
        .fold(None, |best: Option<&TableGrid>, table| match best {
            Some(b) if cell_count(b) >= cell_count(table) => Some(b),
            _ => Some(table),
        })
}

fn cell_count(table: &TableGrid) -> usize {
    table.iter().map(Vec::len).sum()
}

/// Per-document state for a [`PositionalSpec`].
#[derive(Debug)]
pub struct PositionalExtractor<'a> {
    spec: &'a PositionalSpec,
    normalizer: &'a NumericNormalizer,
    rows: Option<Vec<LineItemRow>>,
}

impl PositionalExtractor<'_> {
    fn map_rows(&self, table: &TableGrid) -> Vec<LineItemRow> {
        let width = self.spec.kind.width();
        table
            .iter()
            .skip(1)
            .filter(|row| row.iter().any(|c| !clean_cell(c.as_deref()).is_empty()))
            .map(|row| {
                LineItemRow::new(
                    clean_cell(row.first().and_then(Option::as_deref)),
                    measures(row, width, self.normalizer),
                    width,
                )
            })
            .collect()
    }
}

impl TableExtractor for PositionalExtractor<'_> {
    fn kind(&self) -> TableKind {
        self.spec.kind
    }

    fn observe(&mut self, page: &PageLayout) {
        if self.rows.is_some() || !self.spec.qualifies(&page.text) {
            return;
        }

        let Some(table) = well_formed_table(&page.tables) else {
            log::debug!(
                "{} markers found on a page without a usable table",
                self.spec.kind
            );
            return;
        };

        let rows = self.map_rows(table);
        log::debug!("{}: mapped {} row(s)", self.spec.kind, rows.len());
        self.rows = Some(rows);
    }

    fn finish(self: Box<Self>) -> LineItemTable {
        self.rows.map_or_else(
            || {
                log::debug!("{} not found, emitting empty table", self.spec.kind);
                LineItemTable::empty(self.spec.kind)
            },
            |rows| LineItemTable::new(self.spec.kind, rows),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[Option<&str>]]) -> TableGrid {
        rows.iter()
            .map(|r| r.iter().map(|c| c.map(str::to_owned)).collect())
            .collect()
    }

    fn run(spec: &PositionalSpec, pages: &[PageLayout]) -> LineItemTable {
        let normalizer = NumericNormalizer::default();
        let mut extractor = Box::new(spec.start(&normalizer));
        for page in pages {
            extractor.observe(page);
        }
        extractor.finish()
    }

    fn outward_supplies() -> PositionalSpec {
        PositionalSpec::new(
            TableKind::OutwardSupplies,
            vec!["3.1".to_owned(), "Nature of Supplies".to_owned()],
        )
    }

    #[test]
    fn maps_cells_by_position_ignoring_header_text() {
        let page = PageLayout::new(
            "3.1 Details of Outward supplies\nNature of Supplies".to_owned(),
            vec![grid(&[
                &[Some("Kind"), Some("Whatever"), Some("x"), Some("y"), Some("z"), Some("w")],
                &[
                    Some("(a) Outward taxable supplies"),
                    Some("1,000.00"),
                    Some("180.00"),
                    Some("0.00"),
                    Some("0.00"),
                    Some("0.00"),
                ],
                &[Some("(b) Zero rated"), Some("50.00"), None],
            ])],
        );

        let table = run(&outward_supplies(), &[page]);

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].label, "(a) Outward taxable supplies");
        assert_eq!(table.rows[0].values, vec![1000.0, 180.0, 0.0, 0.0, 0.0]);
        assert_eq!(table.rows[1].values, vec![50.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn page_must_carry_every_marker() {
        let page = PageLayout::new(
            "3.1 only".to_owned(),
            vec![grid(&[&[Some("h")], &[Some("a"), Some("1")]])],
        );
        let table = run(&outward_supplies(), &[page]);
        assert!(table.rows.is_empty());
        assert_eq!(table.kind, TableKind::OutwardSupplies);
    }

    #[test]
    fn first_qualifying_page_wins() {
        let spec = PositionalSpec::new(TableKind::TaxPayment, vec!["Payment of tax".to_owned()]);
        let no_table = PageLayout::new("6.1 Payment of tax".to_owned(), Vec::new());
        let first = PageLayout::new(
            "Payment of tax".to_owned(),
            vec![grid(&[&[Some("Description")], &[Some("Integrated Tax"), Some("10")]])],
        );
        let second = PageLayout::new(
            "Payment of tax".to_owned(),
            vec![grid(&[&[Some("Description")], &[Some("Central Tax"), Some("20")]])],
        );

        let table = run(&spec, &[no_table, first, second]);

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].label, "Integrated Tax");
        assert_eq!(table.rows[0].values.len(), 8);
        assert!((table.rows[0].values[0] - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn largest_table_is_chosen_and_blank_rows_dropped() {
        let small = grid(&[&[Some("h")], &[Some("tiny"), Some("1")]]);
        let large = grid(&[
            &[Some("h1"), Some("h2"), Some("h3")],
            &[Some("row"), Some("2"), Some("3")],
            &[None, Some(" "), None],
        ]);
        let page = PageLayout::new(
            "3.1 Nature of Supplies".to_owned(),
            vec![small.clone(), large],
        );

        let table = run(&outward_supplies(), &[page]);

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].label, "row");
        assert_eq!(well_formed_table(&[small.clone(), small]).map(Vec::len), Some(2));
    }

    #[test]
    fn header_only_tables_are_not_well_formed() {
        let header_only = grid(&[&[Some("a"), Some("b")]]);
        assert!(well_formed_table(&[header_only]).is_none());
        assert!(well_formed_table(&[]).is_none());
    }
}
