use crate::constants::MISSING_VALUE_MARKERS;
use crate::types::NumericValue;
use serde::Serialize;
use std::collections::HashSet;

/// Inferred type of a column, from its non-missing cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
    /// Every cell is missing
    Empty,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

/// Observed range of a numeric column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub distinct: usize,
}

/// A parsed CSV file: unique header names, rectangular rows, typed columns.
///
/// Missing cells (empty or a conventional NA spelling) are stored as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    kinds: Vec<ColumnKind>,
}

impl Table {
    /// Build a table from raw header names and raw cell strings.
    ///
    /// Rows shorter than the header are padded, longer ones truncated; the
    /// reader drops over-long records before they get here.
    pub fn new(raw_headers: Vec<String>, raw_rows: Vec<Vec<String>>) -> Self {
        let headers = dedupe_headers(raw_headers);
        let width = headers.len();

        let rows: Vec<Vec<Option<String>>> = raw_rows
            .into_iter()
            .map(|raw| {
                let mut row: Vec<Option<String>> = raw.into_iter().take(width).map(to_cell).collect();
                row.resize(width, None);
                row
            })
            .collect();

        let kinds = (0..width).map(|col| infer_kind(&rows, col)).collect();

        Self { headers, rows, kinds }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn kind(&self, col: usize) -> ColumnKind {
        self.kinds.get(col).copied().unwrap_or(ColumnKind::Empty)
    }

    /// Non-missing cell text
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }

    /// Cell value of a numeric column. Text columns never yield numbers,
    /// even when a particular cell happens to look numeric.
    pub fn numeric(&self, row: usize, col: usize) -> Option<NumericValue> {
        let kind = self.kind(col);
        if !kind.is_numeric() {
            return None;
        }
        let text = self.cell(row, col)?;
        parse_numeric(text).map(|v| match (kind, v) {
            (ColumnKind::Float, NumericValue::Int(i)) => NumericValue::Float(i as f64),
            (_, v) => v,
        })
    }

    pub fn numeric_summary(&self, col: usize) -> Option<NumericSummary> {
        if !self.kind(col).is_numeric() {
            return None;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut seen = HashSet::new();

        for row in 0..self.rows.len() {
            if let Some(v) = self.numeric(row, col) {
                let v = v.as_f64();
                min = min.min(v);
                max = max.max(v);
                // -0.0 and 0.0 are the same value
                seen.insert((v + 0.0).to_bits());
            }
        }

        if seen.is_empty() {
            return None;
        }
        Some(NumericSummary {
            min,
            max,
            distinct: seen.len(),
        })
    }
}

fn to_cell(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    let lowered = trimmed.to_lowercase();
    if MISSING_VALUE_MARKERS.contains(&lowered.as_str()) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a cell as an integer first, then as a finite float.
pub fn parse_numeric(text: &str) -> Option<NumericValue> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Some(NumericValue::Int(i));
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(NumericValue::Float(f)),
        _ => None,
    }
}

fn infer_kind(rows: &[Vec<Option<String>>], col: usize) -> ColumnKind {
    let mut kind = ColumnKind::Empty;
    for cell in rows.iter().filter_map(|r| r[col].as_deref()) {
        kind = match (kind, parse_numeric(cell)) {
            (_, None) => return ColumnKind::Text,
            (ColumnKind::Empty, Some(NumericValue::Int(_))) => ColumnKind::Integer,
            (ColumnKind::Integer, Some(NumericValue::Int(_))) => ColumnKind::Integer,
            (_, Some(_)) => ColumnKind::Float,
        };
    }
    kind
}

/// Name blank headers `Unnamed: <index>` and suffix repeats with `.<n>`.
fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());

    for (idx, header) in raw.into_iter().enumerate() {
        let base = header.trim().trim_start_matches('\u{feff}').to_string();
        let base = if base.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            base
        };

        let mut name = base.clone();
        let mut n = 1;
        while used.contains(&name) {
            name = format!("{base}.{n}");
            n += 1;
        }
        used.insert(name.clone());
        out.push(name);
    }
    out
}
