//! Config-driven extraction profiles.
//!
//! A [`ReturnProfile`] captures everything specific to one return type:
//! numeric cleanup rules, the ordered field rules, and how each table is
//! located. Profiles are TOML documents; the defaults for both return
//! types are baked into the binary via [`include_str!`], and a custom
//! profile can be loaded from disk to accommodate new label variants
//! without touching extraction code.

use std::collections::BTreeSet;
use std::path::Path;

use gst_extract_returns_models::{DocumentField, ReturnKind, TableKind};
use regex::Regex;
use serde::Deserialize;

use crate::fields::{FieldExtractor, FieldRule};
use crate::numeric::NumericNormalizer;
use crate::table::{PatternSpec, PositionalSpec, SectionSpec, TableSpec};

/// TOML profiles embedded at compile time.
const PROFILE_TOMLS: &[(ReturnKind, &str)] = &[
    (ReturnKind::Gstr1, include_str!("../profiles/gstr1.toml")),
    (ReturnKind::Gstr3b, include_str!("../profiles/gstr3b.toml")),
];

/// The built-in profile TOML for `kind`, a starting point for custom
/// profiles.
///
/// # Panics
///
/// Panics if no profile is embedded for `kind`.
#[must_use]
pub fn embedded_toml(kind: ReturnKind) -> &'static str {
    PROFILE_TOMLS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, toml)| *toml)
        .unwrap_or_else(|| panic!("No embedded profile for {kind}"))
}

/// Errors raised while loading a profile.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML document is malformed or has the wrong shape.
    #[error("Invalid profile TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// A rule pattern failed to compile.
    #[error("Invalid pattern {pattern:?}: {source}")]
    Regex {
        /// The offending pattern.
        pattern: String,
        /// Compilation error.
        source: regex::Error,
    },

    /// The profile is well-formed but inconsistent.
    #[error("Invalid profile: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },

    /// The profile file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Raw TOML shape ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ProfileToml {
    kind: ReturnKind,
    #[serde(default)]
    numeric: NumericToml,
    #[serde(default)]
    fields: Vec<FieldToml>,
    #[serde(default)]
    tables: Vec<TableToml>,
}

#[derive(Debug, Deserialize)]
struct NumericToml {
    #[serde(default = "default_noise_characters")]
    noise_characters: Vec<char>,
    #[serde(default = "default_thousands_separator")]
    thousands_separator: char,
}

impl Default for NumericToml {
    fn default() -> Self {
        Self {
            noise_characters: default_noise_characters(),
            thousands_separator: default_thousands_separator(),
        }
    }
}

fn default_noise_characters() -> Vec<char> {
    vec!['E', 'F']
}

const fn default_thousands_separator() -> char {
    ','
}

#[derive(Debug, Deserialize)]
struct FieldToml {
    field: DocumentField,
    pattern: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
enum TableToml {
    /// Canonical rows gathered from every table inside a marked section.
    Section {
        kind: TableKind,
        start_markers: Vec<String>,
        #[serde(default)]
        end_markers: Vec<String>,
        #[serde(default)]
        end_line_prefixes: Vec<String>,
        #[serde(default)]
        header_tokens: Vec<String>,
        expected_rows: Vec<String>,
    },
    /// The first well-formed table on the first page carrying every marker.
    Positional { kind: TableKind, markers: Vec<String> },
    /// One row captured from the flattened text by a multi-group pattern.
    Pattern {
        kind: TableKind,
        label: String,
        pattern: String,
    },
}

// ── Compiled profile ─────────────────────────────────────────────────────

/// A compiled, validated extraction profile for one [`ReturnKind`].
#[derive(Debug, Clone)]
pub struct ReturnProfile {
    /// Return type this profile extracts.
    pub kind: ReturnKind,
    /// Numeric cleanup applied to every measure cell.
    pub normalizer: NumericNormalizer,
    /// Scalar field rules.
    pub fields: FieldExtractor,
    /// Table specs, in [`ReturnKind::tables`] order.
    pub tables: Vec<TableSpec>,
}

impl ReturnProfile {
    /// Returns the built-in profile for `kind`.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (covered by tests, since the
    /// profiles are compiled into the binary).
    #[must_use]
    pub fn embedded(kind: ReturnKind) -> Self {
        Self::from_toml_str(embedded_toml(kind))
            .unwrap_or_else(|e| panic!("Failed to parse embedded {kind} profile: {e}"))
    }

    /// Loads a profile from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or is invalid.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let toml = std::fs::read_to_string(path)?;
        let profile = Self::from_toml_str(&toml)?;
        log::info!("Loaded {} profile from {}", profile.kind, path.display());
        Ok(profile)
    }

    /// Parses and validates a profile from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed, a pattern does not
    /// compile or has the wrong number of capture groups, or a table does
    /// not belong to the profile's return type.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let raw: ProfileToml = toml::from_str(toml)?;

        let normalizer = NumericNormalizer::new(
            raw.numeric.noise_characters,
            raw.numeric.thousands_separator,
        );

        let rules = raw
            .fields
            .into_iter()
            .map(|f| {
                let pattern = compile(&f.pattern)?;
                expect_groups(&pattern, 1)?;
                Ok(FieldRule::new(f.field, pattern))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let mut seen = BTreeSet::new();
        let mut tables = Vec::with_capacity(raw.tables.len());

        for table in raw.tables {
            let spec = compile_table(table)?;
            let kind = spec.kind();
            if !raw.kind.tables().contains(&kind) {
                return Err(ConfigError::Invalid {
                    message: format!("table {kind} is not part of a {} return", raw.kind),
                });
            }
            if !seen.insert(kind) {
                return Err(ConfigError::Invalid {
                    message: format!("table {kind} is configured more than once"),
                });
            }
            tables.push(spec);
        }

        let order = raw.kind.tables();
        tables.sort_by_key(|t| order.iter().position(|k| *k == t.kind()));

        Ok(Self {
            kind: raw.kind,
            normalizer,
            fields: FieldExtractor::new(rules),
            tables,
        })
    }
}

fn compile_table(table: TableToml) -> Result<TableSpec, ConfigError> {
    Ok(match table {
        TableToml::Section {
            kind,
            start_markers,
            end_markers,
            end_line_prefixes,
            header_tokens,
            expected_rows,
        } => {
            if start_markers.is_empty() {
                return Err(ConfigError::Invalid {
                    message: format!("section table {kind} has no start markers"),
                });
            }
            if expected_rows.is_empty() {
                return Err(ConfigError::Invalid {
                    message: format!("section table {kind} has no expected rows"),
                });
            }
            TableSpec::Section(SectionSpec::new(
                kind,
                start_markers,
                end_markers,
                end_line_prefixes,
                &header_tokens,
                expected_rows,
            ))
        }
        TableToml::Positional { kind, markers } => {
            TableSpec::Positional(PositionalSpec::new(kind, markers))
        }
        TableToml::Pattern {
            kind,
            label,
            pattern,
        } => {
            let pattern = compile(&pattern)?;
            expect_groups(&pattern, kind.width())?;
            TableSpec::Pattern(PatternSpec::new(kind, label, pattern))
        }
    })
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::Regex {
        pattern: pattern.to_owned(),
        source,
    })
}

fn expect_groups(pattern: &Regex, groups: usize) -> Result<(), ConfigError> {
    // captures_len() counts the implicit whole-match group.
    let found = pattern.captures_len() - 1;
    if found == groups {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            message: format!(
                "pattern {:?} has {found} capture group(s), expected {groups}",
                pattern.as_str()
            ),
        })
    }
}
