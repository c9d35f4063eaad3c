//! Table recovery from whitespace-aligned PDF text.
//!
//! Text extraction flattens a table into lines whose columns are separated
//! by runs of spaces. A line is split into cells wherever two or more
//! spaces (or a tab) occur, and consecutive lines with at least two cells
//! are grouped into one table. A line with fewer cells ends the current
//! table.

use std::sync::LazyLock;

use regex::Regex;

use crate::TableGrid;

static CELL_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\t|[ \u{a0}]{2,}").unwrap_or_else(|_| unreachable!()));

/// Splits one text line into trimmed, non-empty cells.
#[must_use]
pub fn split_cells(line: &str) -> Vec<String> {
    CELL_SEPARATOR
        .split(line.trim())
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Groups the multi-cell lines of `text` into tables.
#[must_use]
pub fn tables_from_text(text: &str) -> Vec<TableGrid> {
    let mut tables = Vec::new();
    let mut current: TableGrid = Vec::new();

    for line in text.lines() {
        let cells = split_cells(line);

        if cells.len() < 2 {
            if !current.is_empty() {
                tables.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(cells.into_iter().map(Some).collect());
    }

    if !current.is_empty() {
        tables.push(current);
    }

    log::trace!("Recovered {} table(s) from page text", tables.len());

    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(row: &[Option<String>]) -> Vec<&str> {
        row.iter().map(|c| c.as_deref().unwrap_or("")).collect()
    }

    #[test]
    fn splits_on_wide_gaps_only() {
        assert_eq!(
            split_cells("(1) Import of goods    100.00   50.00\t25.00"),
            vec!["(1) Import of goods", "100.00", "50.00", "25.00"]
        );
    }

    #[test]
    fn single_spaces_stay_inside_cell() {
        assert_eq!(split_cells("Legal name of the registered person"), vec![
            "Legal name of the registered person"
        ]);
    }

    #[test]
    fn groups_consecutive_rows() {
        let text = "4. Eligible ITC\n\
                    Details   Integrated Tax   Central Tax\n\
                    (1) Import of goods   100.00   50.00\n\
                    \n\
                    5. Values of exempt supplies\n\
                    Nature of supplies   Inter-State\n";
        let tables = tables_from_text(text);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].len(), 2);
        assert_eq!(cells(&tables[0][1]), vec!["(1) Import of goods", "100.00", "50.00"]);
        assert_eq!(cells(&tables[1][0]), vec!["Nature of supplies", "Inter-State"]);
    }

    #[test]
    fn text_without_columns_has_no_tables() {
        assert!(tables_from_text("GSTIN 27ABCDE1234F1Z5\nPeriod April\n").is_empty());
        assert!(tables_from_text("").is_empty());
    }
}
