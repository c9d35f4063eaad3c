#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cross-document reconciliation for a batch of GST returns.
//!
//! A [`BatchResult`] owns the per-document records of one extraction
//! session and the long-form tables derived from them. Derived tables are
//! always rebuilt from the records, never patched, so filtering (see
//! [`filter`]) can't leave a line-item table out of step with the records
//! it was filtered from.

pub mod batch;
pub mod combined;
pub mod filter;

use gst_extract_returns_models::{
    DocumentFailure, DocumentRecord, LineItemRow, ReturnKind, TableKind,
};
use serde::Serialize;

pub use batch::{extract_batch, extract_paths};
pub use combined::{CombinedRow, combined_view};
pub use filter::{FilterAttribute, FilterSelection, SELECT_ALL};

/// A line-item row tagged with the document it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongFormRow {
    /// Upload position of the source document.
    pub position: usize,
    /// File name of the source document.
    pub file_name: String,
    /// The row itself.
    pub row: LineItemRow,
}

/// One table type's rows concatenated across every document of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongFormTable {
    /// Which schema every row follows.
    pub kind: TableKind,
    /// Rows in batch document order, then intra-document order.
    pub rows: Vec<LongFormRow>,
}

impl LongFormTable {
    /// Concatenates `kind` rows from `documents`, tagging each with its
    /// source.
    #[must_use]
    pub fn build(kind: TableKind, documents: &[DocumentRecord]) -> Self {
        let rows = documents
            .iter()
            .filter_map(|doc| doc.table(kind).map(|table| (doc, table)))
            .flat_map(|(doc, table)| {
                table.rows.iter().map(move |row| LongFormRow {
                    position: doc.position,
                    file_name: doc.file_name.clone(),
                    row: row.clone(),
                })
            })
            .collect();
        Self { kind, rows }
    }
}

/// Everything produced by one extraction session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    /// Return type of every document in the batch.
    pub kind: ReturnKind,
    /// Successfully extracted documents, in upload order.
    pub documents: Vec<DocumentRecord>,
    /// Documents that could not be loaded, in upload order.
    pub failures: Vec<DocumentFailure>,
    /// One long-form table per entry of [`ReturnKind::tables`].
    pub tables: Vec<LongFormTable>,
}

impl BatchResult {
    /// Builds a batch, deriving the long-form tables.
    ///
    /// Documents and failures are put into upload order regardless of the
    /// order they were supplied in.
    #[must_use]
    pub fn new(
        kind: ReturnKind,
        mut documents: Vec<DocumentRecord>,
        mut failures: Vec<DocumentFailure>,
    ) -> Self {
        documents.sort_by_key(|d| d.position);
        failures.sort_by_key(|f| f.position);

        let tables = kind
            .tables()
            .iter()
            .map(|table_kind| LongFormTable::build(*table_kind, &documents))
            .collect();

        Self {
            kind,
            documents,
            failures,
            tables,
        }
    }

    /// The long-form table for `kind`, if this batch's return type has one.
    #[must_use]
    pub fn table(&self, kind: TableKind) -> Option<&LongFormTable> {
        self.tables.iter().find(|t| t.kind == kind)
    }

    /// The combined single-sheet review view.
    #[must_use]
    pub fn combined(&self) -> Vec<CombinedRow<'_>> {
        combined_view(&self.documents)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use gst_extract_returns_models::{
        DocumentFields, DocumentRecord, LineItemRow, LineItemTable, ReturnKind, TableKind,
    };

    /// A GSTR-3B record with one distinctive row per table.
    pub fn record(position: usize, file_name: &str, gstin: &str, period: &str) -> DocumentRecord {
        let fields = DocumentFields {
            gstin: Some(gstin.to_owned()),
            legal_name: Some(format!("Taxpayer {gstin}")),
            period: Some(period.to_owned()),
            financial_year: Some("2023-24".to_owned()),
            filing_date: None,
        };
        #[allow(clippy::cast_precision_loss)]
        let base = position as f64;
        let tables = ReturnKind::Gstr3b
            .tables()
            .iter()
            .map(|kind| {
                let rows = vec![
                    LineItemRow::new(format!("{kind} first"), vec![base], kind.width()),
                    LineItemRow::new(format!("{kind} second"), vec![base + 0.5], kind.width()),
                ];
                LineItemTable::new(*kind, rows)
            })
            .collect();
        DocumentRecord::new(position, file_name, ReturnKind::Gstr3b, fields, tables)
    }

    pub const fn all_tables() -> &'static [TableKind] {
        ReturnKind::Gstr3b.tables()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{all_tables, record};

    #[test]
    fn long_form_preserves_document_and_row_order() {
        let batch = BatchResult::new(
            ReturnKind::Gstr3b,
            vec![
                record(1, "b.pdf", "29AAACB1234C1Z2", "May"),
                record(0, "a.pdf", "27ABCDE1234F1Z5", "April"),
            ],
            Vec::new(),
        );

        assert_eq!(batch.tables.len(), all_tables().len());
        let table = batch.table(TableKind::EligibleItc).unwrap();
        let tags: Vec<(&str, &str)> = table
            .rows
            .iter()
            .map(|r| (r.file_name.as_str(), r.row.label.as_str()))
            .collect();
        assert_eq!(
            tags,
            vec![
                ("a.pdf", "eligible_itc first"),
                ("a.pdf", "eligible_itc second"),
                ("b.pdf", "eligible_itc first"),
                ("b.pdf", "eligible_itc second"),
            ]
        );
    }

    #[test]
    fn every_long_form_row_has_the_table_width() {
        let batch = BatchResult::new(
            ReturnKind::Gstr3b,
            vec![record(0, "a.pdf", "27ABCDE1234F1Z5", "April")],
            Vec::new(),
        );
        for table in &batch.tables {
            assert!(table.rows.iter().all(|r| r.row.values.len() == table.kind.width()));
        }
    }

    #[test]
    fn failures_are_kept_in_upload_order() {
        let failure = |position: usize| DocumentFailure {
            position,
            file_name: format!("{position}.pdf"),
            message: "unreadable".to_owned(),
        };
        let batch = BatchResult::new(ReturnKind::Gstr1, Vec::new(), vec![failure(4), failure(2)]);
        let positions: Vec<usize> = batch.failures.iter().map(|f| f.position).collect();
        assert_eq!(positions, vec![2, 4]);
        assert_eq!(batch.tables.len(), 1);
        assert!(batch.tables[0].rows.is_empty());
    }

    #[test]
    fn batch_serializes_to_json() {
        let batch = BatchResult::new(
            ReturnKind::Gstr3b,
            vec![record(0, "a.pdf", "27ABCDE1234F1Z5", "April")],
            Vec::new(),
        );
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["kind"], "GSTR-3B");
        assert_eq!(json["documents"][0]["region"], "Maharashtra");
        assert_eq!(json["tables"][1]["kind"], "eligible_itc");
    }
}
