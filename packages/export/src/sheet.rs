//! Flattening a batch into rectangular sheets.

use gst_extract_reconcile::{BatchResult, CombinedRow, LongFormTable};
use gst_extract_returns_models::{DocumentField, DocumentRecord};

/// Name of the per-document scalar fields sheet.
pub const GENERAL_SHEET: &str = "General Details";

/// Name of the single-sheet review view.
pub const COMBINED_SHEET: &str = "Combined";

const FILE_NAME: &str = "File Name";
const REGION: &str = "State";

const GENERAL_FIELDS: [DocumentField; 5] = [
    DocumentField::Gstin,
    DocumentField::LegalName,
    DocumentField::Period,
    DocumentField::FinancialYear,
    DocumentField::FilingDate,
];

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Free text.
    Text(String),
    /// A monetary amount.
    Number(f64),
    /// Nothing.
    Empty,
}

impl Cell {
    /// The cell rendered as plain text, as CSV output wants it.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Empty => String::new(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Empty, Self::from)
    }
}

/// A named rectangular table: every row has as many cells as there are
/// headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Sheet (or file) name.
    pub name: String,
    /// Column headers.
    pub headers: Vec<String>,
    /// Data rows.
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Creates an empty sheet with `headers`.
    #[must_use]
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends `row`, padded with [`Cell::Empty`] or truncated to the
    /// header width.
    pub fn push(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), Cell::Empty);
        self.rows.push(row);
    }
}

/// Builds every sheet for `batch`: general details, one long-form sheet per
/// table type of the return kind, then the combined view.
#[must_use]
pub fn sheets_from_batch(batch: &BatchResult) -> Vec<Sheet> {
    let mut sheets = Vec::with_capacity(batch.tables.len() + 2);

    sheets.push(general_sheet(&batch.documents));
    sheets.extend(batch.tables.iter().map(table_sheet));
    sheets.push(combined_sheet(batch));

    log::debug!(
        "Built {} sheet(s) for {} document(s)",
        sheets.len(),
        batch.documents.len()
    );

    sheets
}

fn general_headers() -> Vec<String> {
    let mut headers = vec![FILE_NAME.to_owned()];
    for field in GENERAL_FIELDS {
        headers.push(field.label().to_owned());
        if field == DocumentField::Gstin {
            headers.push(REGION.to_owned());
        }
    }
    headers
}

fn general_cells(document: &DocumentRecord) -> Vec<Cell> {
    let mut cells = vec![Cell::from(document.file_name.as_str())];
    for field in GENERAL_FIELDS {
        cells.push(Cell::from(document.fields.get(field)));
        if field == DocumentField::Gstin {
            cells.push(Cell::from(document.region.as_str()));
        }
    }
    cells
}

fn general_sheet(documents: &[DocumentRecord]) -> Sheet {
    let mut sheet = Sheet::new(GENERAL_SHEET, general_headers());
    for document in documents {
        sheet.push(general_cells(document));
    }
    sheet
}

fn table_sheet(table: &LongFormTable) -> Sheet {
    let headers = std::iter::once(FILE_NAME)
        .chain(table.kind.headers())
        .map(str::to_owned)
        .collect();
    let mut sheet = Sheet::new(table.kind.sheet_name(), headers);

    for long_row in &table.rows {
        let mut cells = Vec::with_capacity(table.kind.width() + 2);
        cells.push(Cell::from(long_row.file_name.as_str()));
        cells.push(Cell::from(long_row.row.label.as_str()));
        cells.extend(long_row.row.values.iter().copied().map(Cell::Number));
        sheet.push(cells);
    }

    sheet
}

fn combined_sheet(batch: &BatchResult) -> Sheet {
    let value_columns = batch
        .kind
        .tables()
        .iter()
        .map(|k| k.width())
        .max()
        .unwrap_or_default();

    let mut headers = general_headers();
    let info_width = headers.len();
    headers.push("Table".to_owned());
    headers.push("Details".to_owned());
    headers.extend((1..=value_columns).map(|i| format!("Value {i}")));

    let mut sheet = Sheet::new(COMBINED_SHEET, headers);

    for row in batch.combined() {
        match row {
            CombinedRow::FileInfo(document) => sheet.push(general_cells(document)),
            CombinedRow::LineItem {
                document,
                kind,
                row,
            } => {
                let mut cells = vec![Cell::from(document.file_name.as_str())];
                cells.resize(info_width, Cell::Empty);
                cells.push(Cell::from(kind.sheet_name()));
                cells.push(Cell::from(row.label.as_str()));
                cells.extend(row.values.iter().copied().map(Cell::Number));
                sheet.push(cells);
            }
            CombinedRow::Separator => sheet.push(Vec::new()),
        }
    }

    sheet
}

#[cfg(test)]
mod tests {
    use gst_extract_returns_models::{
        DocumentFields, LineItemRow, LineItemTable, ReturnKind, TableKind,
    };

    use super::*;

    fn gstr3b_record(position: usize, file_name: &str) -> DocumentRecord {
        let fields = DocumentFields {
            gstin: Some("27ABCDE1234F1Z5".to_owned()),
            legal_name: Some("Acme Traders".to_owned()),
            period: Some("April".to_owned()),
            financial_year: Some("2023-24".to_owned()),
            filing_date: Some("20/05/2023".to_owned()),
        };
        let tables = ReturnKind::Gstr3b
            .tables()
            .iter()
            .map(|kind| {
                LineItemTable::new(
                    *kind,
                    vec![LineItemRow::new(format!("{kind} row"), vec![1.5], kind.width())],
                )
            })
            .collect();
        DocumentRecord::new(position, file_name, ReturnKind::Gstr3b, fields, tables)
    }

    fn batch() -> BatchResult {
        BatchResult::new(
            ReturnKind::Gstr3b,
            vec![gstr3b_record(0, "a.pdf"), gstr3b_record(1, "b.pdf")],
            Vec::new(),
        )
    }

    #[test]
    fn sheet_names_follow_return_kind() {
        let names: Vec<String> = sheets_from_batch(&batch())
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(
            names,
            vec![GENERAL_SHEET, "Table 3.1", "Table 4", "Table 6.1", COMBINED_SHEET]
        );

        let gstr1 = BatchResult::new(ReturnKind::Gstr1, Vec::new(), Vec::new());
        let names: Vec<String> = sheets_from_batch(&gstr1)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec![GENERAL_SHEET, "Total Liability", COMBINED_SHEET]);
    }

    #[test]
    fn general_sheet_lists_fields_with_region() {
        let sheets = sheets_from_batch(&batch());
        let general = &sheets[0];
        assert_eq!(
            general.headers,
            vec![
                "File Name",
                "GSTIN",
                "State",
                "Legal Name",
                "Period",
                "Financial Year",
                "Date"
            ]
        );
        assert_eq!(general.rows.len(), 2);
        assert_eq!(general.rows[0][2], Cell::from("Maharashtra"));
        assert_eq!(general.rows[0][6], Cell::from("20/05/2023"));
    }

    #[test]
    fn every_sheet_is_rectangular() {
        for sheet in sheets_from_batch(&batch()) {
            for row in &sheet.rows {
                assert_eq!(row.len(), sheet.headers.len(), "{}", sheet.name);
            }
        }
    }

    #[test]
    fn table_sheet_tags_rows_with_file_name() {
        let sheets = sheets_from_batch(&batch());
        let itc = sheets.iter().find(|s| s.name == "Table 4").unwrap();
        assert_eq!(itc.headers[0], "File Name");
        assert_eq!(itc.headers[1], "Details");
        assert_eq!(itc.headers.len(), 2 + TableKind::EligibleItc.width());
        assert_eq!(itc.rows[1][0], Cell::from("b.pdf"));
        assert_eq!(itc.rows[1][2], Cell::Number(1.5));
        assert_eq!(itc.rows[1][3], Cell::Number(0.0));
    }

    #[test]
    fn combined_sheet_groups_documents_with_blank_separators() {
        let sheets = sheets_from_batch(&batch());
        let combined = sheets.last().unwrap();

        // Per document: info row, one row per table, separator.
        assert_eq!(combined.rows.len(), 2 * (1 + 3 + 1));
        assert_eq!(combined.headers.last().unwrap(), "Value 8");
        assert_eq!(combined.rows[0][1], Cell::from("27ABCDE1234F1Z5"));
        assert_eq!(combined.rows[1][7], Cell::from("Table 3.1"));
        assert_eq!(combined.rows[1][8], Cell::from("outward_supplies row"));
        assert!(combined.rows[4].iter().all(|c| *c == Cell::Empty));
    }

    #[test]
    fn missing_fields_are_empty_cells() {
        let record = DocumentRecord::new(
            0,
            "bare.pdf",
            ReturnKind::Gstr1,
            DocumentFields::default(),
            Vec::new(),
        );
        let cells = general_cells(&record);
        assert_eq!(cells[1], Cell::Empty);
        assert_eq!(cells[2], Cell::from("Unknown"));
    }

    #[test]
    fn numbers_render_plainly_as_text() {
        assert_eq!(Cell::Number(1234.5).as_text(), "1234.5");
        assert_eq!(Cell::Number(0.0).as_text(), "0");
        assert_eq!(Cell::Empty.as_text(), "");
    }
}
