//! Numeric cell normalization.

/// Coerces raw table cells into `f64`.
///
/// Cleanup strips the configured noise characters (footnote letters that
/// layout extraction glues onto amounts), thousands separators, and
/// whitespace, then parses. Every failure path yields `0.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericNormalizer {
    noise: Vec<char>,
    thousands_separator: char,
}

impl Default for NumericNormalizer {
    fn default() -> Self {
        Self::new(vec!['E', 'F'], ',')
    }
}

impl NumericNormalizer {
    /// Creates a normalizer with the given noise characters and thousands
    /// separator.
    #[must_use]
    pub const fn new(noise: Vec<char>, thousands_separator: char) -> Self {
        Self {
            noise,
            thousands_separator,
        }
    }

    /// Normalizes an optional cell.
    ///
    /// Absent, empty, non-numeric and non-finite input all yield `0.0`.
    #[must_use]
    pub fn normalize(&self, raw: Option<&str>) -> f64 {
        let Some(raw) = raw else {
            return 0.0;
        };

        let cleaned: String = raw
            .chars()
            .filter(|c| {
                !c.is_whitespace() && *c != self.thousands_separator && !self.noise.contains(c)
            })
            .collect();

        if cleaned.is_empty() {
            return 0.0;
        }

        match cleaned.parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            Ok(_) | Err(_) => {
                log::trace!("Unparseable numeric cell {raw:?}, using 0.0");
                0.0
            }
        }
    }
}
