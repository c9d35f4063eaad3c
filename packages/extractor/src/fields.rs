//! Label-anchored scalar field extraction.
//!
//! Government-issued returns keep their field labels stable while the
//! whitespace and line wrapping around them vary, so each field is found by
//! a single-group pattern anchored on its label and applied to the whole
//! document's text.

use chrono::NaiveDate;
use gst_extract_returns_models::{DocumentField, DocumentFields};
use regex::Regex;

/// Filing dates are printed day-first.
const FILING_DATE_FORMAT: &str = "%d/%m/%Y";

/// One `(field, label pattern)` rule. The pattern has exactly one capture
/// group.
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: DocumentField,
    pattern: Regex,
}

impl FieldRule {
    /// Creates a rule. The caller guarantees a single capture group.
    #[must_use]
    pub const fn new(field: DocumentField, pattern: Regex) -> Self {
        Self { field, pattern }
    }

    /// The field this rule fills.
    #[must_use]
    pub const fn field(&self) -> DocumentField {
        self.field
    }

    /// Returns the trimmed capture, or `None` if the rule does not match
    /// or captures only whitespace.
    #[must_use]
    pub fn apply<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|value| !value.is_empty())
    }
}

/// An ordered list of [`FieldRule`]s.
#[derive(Debug, Clone, Default)]
pub struct FieldExtractor {
    rules: Vec<FieldRule>,
}

impl FieldExtractor {
    /// Creates an extractor from rules in priority order.
    #[must_use]
    pub const fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// Whether any rules are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Extracts every field from `text`.
    ///
    /// For each field the first rule (in list order) that matches wins.
    /// Fields with no matching rule stay `None`.
    #[must_use]
    pub fn extract(&self, text: &str) -> DocumentFields {
        let mut fields = DocumentFields::default();

        for rule in &self.rules {
            if fields.get(rule.field()).is_some() {
                continue;
            }
            if let Some(value) = rule.apply(text) {
                let value = match rule.field() {
                    DocumentField::FilingDate => canonical_filing_date(value),
                    _ => value.to_owned(),
                };
                fields.set_if_absent(rule.field(), value);
            }
        }

        fields
    }
}

/// Re-renders a parseable filing date as zero-padded `dd/mm/yyyy`. Values
/// that do not parse are kept verbatim.
#[must_use]
pub fn canonical_filing_date(raw: &str) -> String {
    parse_filing_date(raw).map_or_else(
        || raw.to_owned(),
        |date| date.format(FILING_DATE_FORMAT).to_string(),
    )
}

/// Parses a `dd/mm/yyyy` filing date.
#[must_use]
pub fn parse_filing_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), FILING_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use gst_extract_returns_models::ReturnKind;

    use super::*;
    use crate::config::ReturnProfile;

    fn gstr3b(text: &str) -> DocumentFields {
        ReturnProfile::embedded(ReturnKind::Gstr3b).fields.extract(text)
    }

    fn gstr1(text: &str) -> DocumentFields {
        ReturnProfile::embedded(ReturnKind::Gstr1).fields.extract(text)
    }

    #[test]
    fn extracts_gstin_with_colon() {
        let fields = gstr3b("Form GSTR-3B\nGSTIN: 27ABCDE1234F1Z5\n");
        assert_eq!(fields.gstin.as_deref(), Some("27ABCDE1234F1Z5"));
    }

    #[test]
    fn extracts_gstr3b_header() {
        let text = "Year 2023-24\n\
                    Period April\n\
                    1. GSTIN 29AAACB1234C1Z2\n\
                    2(a). Legal name of the registered person   ACME TRADERS PRIVATE LIMITED\n\
                    Date of ARN 20/05/2023\n";
        let fields = gstr3b(text);
        assert_eq!(fields.gstin.as_deref(), Some("29AAACB1234C1Z2"));
        assert_eq!(fields.legal_name.as_deref(), Some("ACME TRADERS PRIVATE LIMITED"));
        assert_eq!(fields.financial_year.as_deref(), Some("2023-24"));
        assert_eq!(fields.period.as_deref(), Some("April"));
        assert_eq!(fields.filing_date.as_deref(), Some("20/05/2023"));
    }

    #[test]
    fn extracts_gstr1_header() {
        let text = "Financial year 2024-25\n\
                    Tax period March\n\
                    GSTIN - 07AAACB1234C1Z2\n\
                    Legal name of the registered person : Blue Ocean LLP\n";
        let fields = gstr1(text);
        assert_eq!(fields.gstin.as_deref(), Some("07AAACB1234C1Z2"));
        assert_eq!(fields.legal_name.as_deref(), Some("Blue Ocean LLP"));
        assert_eq!(fields.financial_year.as_deref(), Some("2024-25"));
        assert_eq!(fields.period.as_deref(), Some("March"));
        assert_eq!(fields.filing_date, None);
    }

    #[test]
    fn labels_match_whole_words_only() {
        let text = "Periodicity Monthly\n\
                    Period April\n\
                    Yearly turnover\n\
                    Year 2023-24\n";
        let fields = gstr3b(text);
        assert_eq!(fields.period.as_deref(), Some("April"));
        assert_eq!(fields.financial_year.as_deref(), Some("2023-24"));

        let fields = gstr1("Tax periodicity Quarterly\nTax period June\n");
        assert_eq!(fields.period.as_deref(), Some("June"));
    }

    #[test]
    fn missing_labels_leave_fields_empty() {
        let fields = gstr3b("nothing useful here");
        assert_eq!(fields, DocumentFields::default());
    }

    #[test]
    fn first_match_wins() {
        let fields = gstr3b("GSTIN 27ABCDE1234F1Z5\nGSTIN 29AAACB1234C1Z2\n");
        assert_eq!(fields.gstin.as_deref(), Some("27ABCDE1234F1Z5"));
    }

    #[test]
    fn later_rule_fills_field_when_earlier_misses() {
        // Short identifiers fail the 15-character rule but hit the fallback.
        let fields = gstr3b("GSTIN ABC123\n");
        assert_eq!(fields.gstin.as_deref(), Some("ABC123"));
    }

    #[test]
    fn whitespace_only_capture_is_absent() {
        let rule = FieldRule::new(
            DocumentField::LegalName,
            Regex::new(r"Name:([ ]*)").unwrap(),
        );
        assert_eq!(rule.apply("Name:   "), None);
    }

    #[test]
    fn filing_date_is_zero_padded() {
        assert_eq!(canonical_filing_date("5/4/2024"), "05/04/2024");
        assert_eq!(canonical_filing_date("2024/99/99"), "2024/99/99");
        assert_eq!(
            parse_filing_date("20/05/2023"),
            NaiveDate::from_ymd_opt(2023, 5, 20)
        );
    }
}
