//! The combined single-sheet review view.
//!
//! For each document, in upload order: a file-info row, then that
//! document's line items from every table type in the return's fixed table
//! order, then a blank separator row.

use gst_extract_returns_models::{DocumentRecord, LineItemRow, TableKind};

/// One row of the combined view, borrowing from the batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombinedRow<'a> {
    /// Scalar fields of the document whose line items follow.
    FileInfo(&'a DocumentRecord),
    /// One line item of the preceding document.
    LineItem {
        /// Source document.
        document: &'a DocumentRecord,
        /// Table the row belongs to.
        kind: TableKind,
        /// The row.
        row: &'a LineItemRow,
    },
    /// Blank row between documents.
    Separator,
}

/// Builds the combined view over `documents`.
#[must_use]
pub fn combined_view(documents: &[DocumentRecord]) -> Vec<CombinedRow<'_>> {
    let mut rows = Vec::new();

    for document in documents {
        rows.push(CombinedRow::FileInfo(document));

        for kind in document.kind.tables() {
            let Some(table) = document.table(*kind) else {
                continue;
            };
            rows.extend(table.rows.iter().map(|row| CombinedRow::LineItem {
                document,
                kind: *kind,
                row,
            }));
        }

        rows.push(CombinedRow::Separator);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn groups_rows_by_document() {
        let documents = vec![
            record(0, "a.pdf", "27ABCDE1234F1Z5", "April"),
            record(1, "b.pdf", "29AAACB1234C1Z2", "May"),
        ];

        let view = combined_view(&documents);

        // Per document: info + 3 tables x 2 rows + separator.
        assert_eq!(view.len(), 2 * (1 + 6 + 1));
        assert!(matches!(view[0], CombinedRow::FileInfo(d) if d.file_name == "a.pdf"));
        assert!(matches!(
            view[1],
            CombinedRow::LineItem { kind: TableKind::OutwardSupplies, .. }
        ));
        assert!(matches!(
            view[6],
            CombinedRow::LineItem { kind: TableKind::TaxPayment, .. }
        ));
        assert_eq!(view[7], CombinedRow::Separator);
        assert!(matches!(view[8], CombinedRow::FileInfo(d) if d.file_name == "b.pdf"));
        assert_eq!(view.last(), Some(&CombinedRow::Separator));
    }

    #[test]
    fn line_items_stay_with_their_document() {
        let documents = vec![
            record(0, "a.pdf", "27ABCDE1234F1Z5", "April"),
            record(1, "b.pdf", "29AAACB1234C1Z2", "May"),
        ];
        let mut current = None;
        for row in combined_view(&documents) {
            match row {
                CombinedRow::FileInfo(d) => current = Some(d.position),
                CombinedRow::LineItem { document, .. } => {
                    assert_eq!(Some(document.position), current);
                }
                CombinedRow::Separator => current = None,
            }
        }
    }

    #[test]
    fn empty_batch_has_empty_view() {
        assert!(combined_view(&[]).is_empty());
    }
}
