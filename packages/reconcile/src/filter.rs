//! Multi-value inclusion filters over a batch.
//!
//! A [`FilterSelection`] holds, per [`FilterAttribute`], the set of values a
//! document must have to survive. An attribute with no selection, or whose
//! selection contains [`SELECT_ALL`], is unrestricted. Attributes combine
//! by conjunction.
//!
//! [`apply`] is a pure function of the batch and the selection. Surviving
//! documents are chosen by their own attribute values and every long-form
//! table is rebuilt from exactly those documents.

use std::collections::{BTreeMap, BTreeSet};

use gst_extract_returns_models::{DocumentField, DocumentRecord};
use serde::{Deserialize, Serialize};

use crate::BatchResult;

/// Sentinel selection value meaning "no restriction".
pub const SELECT_ALL: &str = "Select All";

/// A document attribute that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterAttribute {
    /// Taxpayer registration identifier.
    Gstin,
    /// Region derived from the GSTIN.
    Region,
    /// Legal name of the registered person.
    LegalName,
    /// Tax period.
    Period,
    /// Financial year.
    FinancialYear,
}

impl FilterAttribute {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Gstin,
            Self::Region,
            Self::LegalName,
            Self::Period,
            Self::FinancialYear,
        ]
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gstin => "GSTIN",
            Self::Region => "State",
            Self::LegalName => "Legal Name",
            Self::Period => "Period",
            Self::FinancialYear => "Financial Year",
        }
    }

    /// The attribute's value on `record`; absent fields read as `""`.
    #[must_use]
    pub fn value_of(self, record: &DocumentRecord) -> &str {
        let field = match self {
            Self::Region => return &record.region,
            Self::Gstin => DocumentField::Gstin,
            Self::LegalName => DocumentField::LegalName,
            Self::Period => DocumentField::Period,
            Self::FinancialYear => DocumentField::FinancialYear,
        };
        record.fields.get(field).unwrap_or_default()
    }
}

/// Selected values per attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    selections: BTreeMap<FilterAttribute, BTreeSet<String>>,
}

impl FilterSelection {
    /// A selection with no restrictions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `values` to the selection for `attribute`.
    #[must_use]
    pub fn with<I, S>(mut self, attribute: FilterAttribute, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select(attribute, values);
        self
    }

    /// Adds `values` to the selection for `attribute`.
    pub fn select<I, S>(&mut self, attribute: FilterAttribute, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections
            .entry(attribute)
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    /// Whether `attribute` lets every value through.
    #[must_use]
    pub fn is_unrestricted(&self, attribute: FilterAttribute) -> bool {
        self.selections
            .get(&attribute)
            .is_none_or(|values| values.is_empty() || values.contains(SELECT_ALL))
    }

    /// Whether `record` passes every restricted attribute.
    #[must_use]
    pub fn matches(&self, record: &DocumentRecord) -> bool {
        self.selections.iter().all(|(attribute, values)| {
            self.is_unrestricted(*attribute) || values.contains(attribute.value_of(record))
        })
    }
}

/// Distinct values of `attribute` across `documents`, in first-seen order.
#[must_use]
pub fn available_values(documents: &[DocumentRecord], attribute: FilterAttribute) -> Vec<String> {
    let mut seen = BTreeSet::new();
    documents
        .iter()
        .map(|d| attribute.value_of(d))
        .filter(|value| seen.insert(*value))
        .map(str::to_owned)
        .collect()
}

/// Returns the sub-batch of documents matching `selection`, with every
/// long-form table rebuilt from the survivors.
#[must_use]
pub fn apply(batch: &BatchResult, selection: &FilterSelection) -> BatchResult {
    let documents: Vec<DocumentRecord> = batch
        .documents
        .iter()
        .filter(|d| selection.matches(d))
        .cloned()
        .collect();

    log::debug!(
        "Filter kept {}/{} document(s)",
        documents.len(),
        batch.documents.len()
    );

    BatchResult::new(batch.kind, documents, batch.failures.clone())
}
