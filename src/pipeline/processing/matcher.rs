use crate::constants::{
    COUNTRY_COLUMN_HINTS, KOREA_CODE_PATTERNS, KOREA_NAME_PATTERNS, MULTILINGUAL_COLUMN_PREFIXES,
    NORTH_KOREA_MARKERS,
};
use crate::pipeline::ingestion::{ColumnKind, Table};
use crate::types::NumericValue;
use serde::Serialize;
use std::collections::BTreeSet;

/// Korea rows found in a table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KoreaMatch {
    /// Ascending, de-duplicated row indices
    pub rows: Vec<usize>,
    /// Columns that produced at least one match, in table order
    pub columns: Vec<String>,
    /// Matched cell text, in row order (one per row)
    pub sample_values: Vec<String>,
}

impl KoreaMatch {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Whether a header names country labels or codes.
pub fn is_country_column(header: &str) -> bool {
    let lower = header.to_lowercase();
    COUNTRY_COLUMN_HINTS.iter().any(|hint| lower.contains(hint))
        || MULTILINGUAL_COLUMN_PREFIXES.iter().any(|p| lower.contains(p))
}

/// Columns scanned for Korea names: country-like headers, or every text
/// column when the file has none.
pub fn candidate_columns(table: &Table) -> Vec<usize> {
    let named: Vec<usize> = table
        .headers()
        .iter()
        .enumerate()
        .filter(|(_, h)| is_country_column(h))
        .map(|(i, _)| i)
        .collect();

    if !named.is_empty() {
        return named;
    }

    (0..table.column_count())
        .filter(|&i| table.kind(i) == ColumnKind::Text)
        .collect()
}

/// Whether a single cell refers to South Korea.
pub fn is_korea_value(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    if lower.is_empty() {
        return false;
    }
    if NORTH_KOREA_MARKERS.iter().any(|m| lower.contains(m)) {
        return false;
    }
    if KOREA_NAME_PATTERNS.iter().any(|p| lower.contains(p)) {
        return true;
    }
    // Codes are short enough to hide inside unrelated words ("ukraine") or
    // decimals ("0.732"), so they only count as whole tokens.
    lower
        .split(|c: char| !c.is_alphanumeric() && c != '.')
        .map(|token| token.trim_matches('.'))
        .any(|token| KOREA_CODE_PATTERNS.contains(&token))
}

/// Whether a numeric cell is one of the numeric Korea codes (410, 732).
pub fn is_korea_numeric_code(value: Option<NumericValue>) -> bool {
    match value {
        Some(NumericValue::Int(code)) => KOREA_CODE_PATTERNS
            .iter()
            .any(|p| p.parse::<i64>().is_ok_and(|c| c == code)),
        _ => false,
    }
}

/// Locate every row whose candidate columns mention South Korea.
pub fn find_korea_rows(table: &Table) -> KoreaMatch {
    let columns = candidate_columns(table);
    let mut rows = BTreeSet::new();
    let mut matched_columns = BTreeSet::new();
    let mut samples = std::collections::BTreeMap::new();

    for &col in &columns {
        let numeric = table.kind(col).is_numeric();
        for row in 0..table.row_count() {
            let Some(value) = table.cell(row, col) else {
                continue;
            };
            let matched = if numeric {
                is_korea_numeric_code(table.numeric(row, col))
            } else {
                is_korea_value(value)
            };
            if matched {
                rows.insert(row);
                matched_columns.insert(col);
                samples.entry(row).or_insert_with(|| value.to_string());
            }
        }
    }

    KoreaMatch {
        rows: rows.into_iter().collect(),
        columns: matched_columns
            .into_iter()
            .map(|c| table.headers()[c].clone())
            .collect(),
        sample_values: samples.into_values().collect(),
    }
}
