use crate::constants::YEAR_COLUMN_HINTS;
use crate::pipeline::ingestion::Table;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static YEAR_IN_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(19|20)\d{2}").unwrap());
static YEAR_EXACT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(19|20)\d{2}$").unwrap());

/// Indices of columns whose header suggests a year, time or date.
pub fn year_columns(table: &Table) -> Vec<usize> {
    table
        .headers()
        .iter()
        .enumerate()
        .filter(|(_, h)| {
            let lower = h.to_lowercase();
            YEAR_COLUMN_HINTS.iter().any(|hint| lower.contains(hint))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Year of a single row.
///
/// The first year column containing a `19xx`/`20xx` run wins; otherwise the
/// first cell anywhere in the row that is exactly such a year.
pub fn row_year(table: &Table, row: usize, year_cols: &[usize]) -> Option<i32> {
    for &col in year_cols {
        if let Some(m) = table.cell(row, col).and_then(|v| YEAR_IN_TEXT.find(v)) {
            return m.as_str().parse().ok();
        }
    }

    (0..table.column_count())
        .filter_map(|col| table.cell(row, col))
        .find(|v| YEAR_EXACT.is_match(v))
        .and_then(|v| v.parse().ok())
}

/// Sorted, de-duplicated years over the given rows.
pub fn extract_years(table: &Table, rows: &[usize]) -> Vec<i32> {
    let year_cols = year_columns(table);
    rows.iter()
        .filter_map(|&row| row_year(table, row, &year_cols))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_year_column_takes_precedence() {
        let t = table(
            &["country", "survey_date", "edition"],
            &[&["Korea", "2003-07-01", "1999"]],
        );
        assert_eq!(year_columns(&t), vec![1]);
        assert_eq!(row_year(&t, 0, &[1]), Some(2003));
    }

    #[test]
    fn test_falls_back_to_exact_year_cell() {
        let t = table(
            &["country", "edition", "value"],
            &[&["Korea", "2010", "55"], &["Korea", "FY2010", "56"]],
        );
        assert_eq!(row_year(&t, 0, &[]), Some(2010));
        assert_eq!(row_year(&t, 1, &[]), None);
    }

    #[test]
    fn test_year_column_without_year_uses_fallback() {
        let t = table(&["country", "time", "wave"], &[&["Korea", "n/a", "1988"]]);
        assert_eq!(row_year(&t, 0, &year_columns(&t)), Some(1988));
    }

    #[test]
    fn test_out_of_range_years_are_ignored() {
        let t = table(&["country", "year"], &[&["Korea", "1850"]]);
        assert_eq!(extract_years(&t, &[0]), Vec::<i32>::new());
    }

    #[test]
    fn test_extract_years_sorted_unique() {
        let t = table(
            &["country", "Year"],
            &[&["Korea", "2001"], &["Korea", "1999"], &["Korea", "2001"]],
        );
        assert_eq!(extract_years(&t, &[0, 1, 2]), vec![1999, 2001]);
    }
}
