#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Field and table extraction from GST return page layouts.
//!
//! The engine is driven by a [`ReturnProfile`] per return type:
//!
//! - [`numeric`] coerces noisy cells into `f64`, never failing.
//! - [`fields`] applies the profile's label-anchored patterns to a
//!   document's concatenated text.
//! - [`table`] locates tables by section context, column position or text
//!   pattern and maps them onto fixed schemas.
//! - [`aggregator`] runs all of the above over one document's pages.
//!
//! Every missing field, missing table or unparseable cell degrades to a
//! documented default so that one bad document region never costs the
//! rest of the record.

pub mod aggregator;
pub mod config;
pub mod fields;
pub mod numeric;
pub mod progress;
pub mod table;

pub use aggregator::DocumentAggregator;
pub use config::{ConfigError, ReturnProfile};
pub use numeric::NumericNormalizer;
