#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! GST return record types and table schemas.
//!
//! Every uploaded return is reduced to one [`DocumentRecord`]: a handful of
//! scalar header fields plus one [`LineItemTable`] per [`TableKind`] the
//! return carries. Table shapes are fixed per kind so that records from
//! different documents can be concatenated without reconciliation.

pub mod region;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The type of GST return a document contains.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum ReturnKind {
    /// Statement of outward supplies.
    #[serde(rename = "GSTR-1", alias = "gstr1")]
    #[strum(to_string = "GSTR-1", serialize = "gstr1")]
    Gstr1,
    /// Monthly summary return.
    #[serde(rename = "GSTR-3B", alias = "gstr3b")]
    #[strum(to_string = "GSTR-3B", serialize = "gstr3b")]
    Gstr3b,
}

impl ReturnKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Gstr1, Self::Gstr3b]
    }

    /// Table types carried by this return, in output order.
    #[must_use]
    pub const fn tables(self) -> &'static [TableKind] {
        match self {
            Self::Gstr1 => &[TableKind::TotalLiability],
            Self::Gstr3b => &[
                TableKind::OutwardSupplies,
                TableKind::EligibleItc,
                TableKind::TaxPayment,
            ],
        }
    }
}

/// A schema-tagged line-item table type.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TableKind {
    /// GSTR-1 total liability for outward supplies other than reverse charge.
    TotalLiability,
    /// GSTR-3B table 3.1, outward and reverse charge supplies.
    OutwardSupplies,
    /// GSTR-3B table 4, eligible input tax credit.
    EligibleItc,
    /// GSTR-3B table 6.1, payment of tax.
    TaxPayment,
}

impl TableKind {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::TotalLiability,
            Self::OutwardSupplies,
            Self::EligibleItc,
            Self::TaxPayment,
        ]
    }

    /// Human-readable table title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::TotalLiability => "Total Liability (Outward supplies other than Reverse charge)",
            Self::OutwardSupplies => "Table 3.1 - Outward and Reverse Charge Supplies",
            Self::EligibleItc => "Table 4 - Eligible ITC",
            Self::TaxPayment => "Table 6.1 - Payment of Tax",
        }
    }

    /// Spreadsheet sheet name for this table's long-form view.
    #[must_use]
    pub const fn sheet_name(self) -> &'static str {
        match self {
            Self::TotalLiability => "Total Liability",
            Self::OutwardSupplies => "Table 3.1",
            Self::EligibleItc => "Table 4",
            Self::TaxPayment => "Table 6.1",
        }
    }

    /// Header of the row-label column.
    #[must_use]
    pub const fn label_column(self) -> &'static str {
        match self {
            Self::TotalLiability | Self::EligibleItc => "Details",
            Self::OutwardSupplies => "Nature of Supplies",
            Self::TaxPayment => "Description",
        }
    }

    /// Headers of the numeric measure columns, in positional order.
    #[must_use]
    pub const fn measure_columns(self) -> &'static [&'static str] {
        match self {
            Self::TotalLiability => &["Taxable Value", "IGST", "CGST", "SGST", "Cess"],
            Self::OutwardSupplies => &[
                "Total Taxable Value",
                "Integrated Tax",
                "Central Tax",
                "State/UT Tax",
                "Cess",
            ],
            Self::EligibleItc => &["Integrated Tax", "Central Tax", "State/UT Tax", "Cess"],
            Self::TaxPayment => &[
                "Total Tax Payable",
                "Tax Paid Through ITC (Integrated)",
                "Tax Paid Through ITC (Central)",
                "Tax Paid Through ITC (State/UT)",
                "Tax Paid Through ITC (Cess)",
                "Tax Paid in Cash",
                "Interest Paid in Cash",
                "Late Fee Paid in Cash",
            ],
        }
    }

    /// Number of numeric measures every row of this table carries.
    #[must_use]
    pub const fn width(self) -> usize {
        self.measure_columns().len()
    }

    /// Full header row: label column followed by the measure columns.
    #[must_use]
    pub fn headers(self) -> Vec<&'static str> {
        std::iter::once(self.label_column())
            .chain(self.measure_columns().iter().copied())
            .collect()
    }
}

/// A scalar header field extracted from a return's text.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentField {
    /// Taxpayer registration identifier.
    Gstin,
    /// Legal name of the registered person.
    LegalName,
    /// Tax period (month name).
    Period,
    /// Financial year, e.g. `2023-24`.
    FinancialYear,
    /// Date of ARN (filing date).
    FilingDate,
}

impl DocumentField {
    /// Column header used when the field is exported.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gstin => "GSTIN",
            Self::LegalName => "Legal Name",
            Self::Period => "Period",
            Self::FinancialYear => "Financial Year",
            Self::FilingDate => "Date",
        }
    }
}

/// One line of a table: a label plus a fixed number of numeric measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemRow {
    /// Row label (first cell).
    pub label: String,
    /// Measures in the table kind's declared column order.
    pub values: Vec<f64>,
}

impl LineItemRow {
    /// Creates a row with exactly `width` measures.
    ///
    /// Missing trailing measures are filled with `0.0`; extra measures are
    /// dropped.
    #[must_use]
    pub fn new(label: impl Into<String>, mut values: Vec<f64>, width: usize) -> Self {
        values.resize(width, 0.0);
        Self {
            label: label.into(),
            values,
        }
    }

    /// Creates an all-zero row.
    #[must_use]
    pub fn zeroed(label: impl Into<String>, width: usize) -> Self {
        Self::new(label, Vec::new(), width)
    }
}

/// The rows one document contributed for one [`TableKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemTable {
    /// Which schema these rows follow.
    pub kind: TableKind,
    /// Rows, each exactly [`TableKind::width`] measures wide.
    pub rows: Vec<LineItemRow>,
}

impl LineItemTable {
    /// Creates a table, normalizing every row to the kind's width.
    #[must_use]
    pub fn new(kind: TableKind, rows: Vec<LineItemRow>) -> Self {
        let width = kind.width();
        let rows = rows
            .into_iter()
            .map(|row| LineItemRow::new(row.label, row.values, width))
            .collect();
        Self { kind, rows }
    }

    /// A table with headers but no rows.
    #[must_use]
    pub const fn empty(kind: TableKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
        }
    }

    /// Returns the row with the given label, if any.
    #[must_use]
    pub fn row(&self, label: &str) -> Option<&LineItemRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}

/// Scalar fields pulled from a document's text. `None` means no rule
/// matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFields {
    /// Taxpayer registration identifier.
    pub gstin: Option<String>,
    /// Legal name of the registered person.
    pub legal_name: Option<String>,
    /// Tax period.
    pub period: Option<String>,
    /// Financial year.
    pub financial_year: Option<String>,
    /// Date of ARN.
    pub filing_date: Option<String>,
}

impl DocumentFields {
    /// Returns the value of `field`, if extracted.
    #[must_use]
    pub fn get(&self, field: DocumentField) -> Option<&str> {
        match field {
            DocumentField::Gstin => self.gstin.as_deref(),
            DocumentField::LegalName => self.legal_name.as_deref(),
            DocumentField::Period => self.period.as_deref(),
            DocumentField::FinancialYear => self.financial_year.as_deref(),
            DocumentField::FilingDate => self.filing_date.as_deref(),
        }
    }

    /// Sets `field` unless it already holds a value. Returns `true` when
    /// the value was stored.
    pub fn set_if_absent(&mut self, field: DocumentField, value: String) -> bool {
        let slot = match field {
            DocumentField::Gstin => &mut self.gstin,
            DocumentField::LegalName => &mut self.legal_name,
            DocumentField::Period => &mut self.period,
            DocumentField::FinancialYear => &mut self.financial_year,
            DocumentField::FilingDate => &mut self.filing_date,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        true
    }
}

/// Everything extracted from one uploaded return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Zero-based upload position within the batch. Stable ordering key.
    pub position: usize,
    /// Original file name, used to tag long-form rows.
    pub file_name: String,
    /// Return type the document was extracted as.
    pub kind: ReturnKind,
    /// Extracted scalar fields.
    pub fields: DocumentFields,
    /// Region derived from the GSTIN prefix (`"Unknown"` when absent).
    pub region: String,
    /// One table per entry of [`ReturnKind::tables`], in that order.
    pub tables: Vec<LineItemTable>,
}

impl DocumentRecord {
    /// Builds a record, deriving the region from the GSTIN.
    #[must_use]
    pub fn new(
        position: usize,
        file_name: impl Into<String>,
        kind: ReturnKind,
        fields: DocumentFields,
        tables: Vec<LineItemTable>,
    ) -> Self {
        let region = fields
            .gstin
            .as_deref()
            .map_or(region::UNKNOWN_REGION, region::region_for_gstin)
            .to_owned();
        Self {
            position,
            file_name: file_name.into(),
            kind,
            fields,
            region,
            tables,
        }
    }

    /// Returns this document's table of the given kind.
    #[must_use]
    pub fn table(&self, kind: TableKind) -> Option<&LineItemTable> {
        self.tables.iter().find(|t| t.kind == kind)
    }
}

/// A document that could not be read at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFailure {
    /// Zero-based upload position within the batch.
    pub position: usize,
    /// Original file name.
    pub file_name: String,
    /// Why the document could not be loaded.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn row_pads_and_truncates() {
        let short = LineItemRow::new("a", vec![1.0], 4);
        assert_eq!(short.values, vec![1.0, 0.0, 0.0, 0.0]);

        let long = LineItemRow::new("b", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 4);
        assert_eq!(long.values, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn table_normalizes_row_width() {
        let table = LineItemTable::new(
            TableKind::EligibleItc,
            vec![LineItemRow {
                label: "x".to_owned(),
                values: vec![1.0],
            }],
        );
        assert_eq!(table.rows[0].values.len(), 4);
    }

    #[test]
    fn table_widths_match_headers() {
        for kind in TableKind::all() {
            assert_eq!(kind.headers().len(), kind.width() + 1, "{kind}");
        }
        assert_eq!(TableKind::EligibleItc.width(), 4);
        assert_eq!(TableKind::OutwardSupplies.width(), 5);
        assert_eq!(TableKind::TaxPayment.width(), 8);
    }

    #[test]
    fn return_kind_parses_both_spellings() {
        assert_eq!(ReturnKind::from_str("GSTR-3B").unwrap(), ReturnKind::Gstr3b);
        assert_eq!(ReturnKind::from_str("gstr1").unwrap(), ReturnKind::Gstr1);
        assert_eq!(ReturnKind::Gstr3b.to_string(), "GSTR-3B");
    }

    #[test]
    fn record_derives_region() {
        let fields = DocumentFields {
            gstin: Some("27ABCDE1234F1Z5".to_owned()),
            ..DocumentFields::default()
        };
        let record = DocumentRecord::new(0, "a.pdf", ReturnKind::Gstr3b, fields, Vec::new());
        assert_eq!(record.region, "Maharashtra");

        let record = DocumentRecord::new(
            1,
            "b.pdf",
            ReturnKind::Gstr3b,
            DocumentFields::default(),
            Vec::new(),
        );
        assert_eq!(record.region, "Unknown");
    }

    #[test]
    fn set_if_absent_keeps_first_value() {
        let mut fields = DocumentFields::default();
        assert!(fields.set_if_absent(DocumentField::Period, "April".to_owned()));
        assert!(!fields.set_if_absent(DocumentField::Period, "May".to_owned()));
        assert_eq!(fields.get(DocumentField::Period), Some("April"));
    }
}
