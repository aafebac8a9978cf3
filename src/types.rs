use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A numeric cell as it appeared in the source file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    Int(i64),
    Float(f64),
}

impl NumericValue {
    pub fn as_f64(self) -> f64 {
        match self {
            NumericValue::Int(v) => v as f64,
            NumericValue::Float(v) => v,
        }
    }
}

/// How an indicator column was recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorSource {
    /// Column name matched a published index
    Known,
    /// Column name contains a democracy keyword; no fixed scale
    Keyword,
    /// Numeric column whose observed range is used as its scale
    NumericRange,
}

/// A column identified as carrying a democracy indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub name: String,
    pub original_column: String,
    /// Raw (min, max) mapped onto -10..+10; `None` uses the range heuristic.
    pub scale_range: Option<(f64, f64)>,
    pub reverse: bool,
    pub categorical: bool,
    pub source: IndicatorSource,
}

/// One observation of an indicator for a year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub raw_value: NumericValue,
    pub normalized_value: f64,
}

/// A year-indexed indicator series, keyed `<dataset>_<column>` by its owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub name: String,
    pub dataset: String,
    pub original_column: String,
    pub data: BTreeMap<i32, SeriesPoint>,
}

/// Outcome of a single CSV file within a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Unreadable,
    NoKoreaData,
    KoreaData,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    pub status: FileStatus,
    pub delimiter: Option<String>,
    pub encoding: Option<String>,
    /// Records dropped for having more fields than the header
    pub skipped_lines: usize,
    pub korea_rows: usize,
    pub korea_columns: Vec<String>,
    pub years: Vec<i32>,
    pub indicator_columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn new(file: impl Into<String>, status: FileStatus) -> Self {
        Self {
            file: file.into(),
            status,
            delimiter: None,
            encoding: None,
            skipped_lines: 0,
            korea_rows: 0,
            korea_columns: Vec::new(),
            years: Vec::new(),
            indicator_columns: Vec::new(),
            error: None,
        }
    }
}

/// Everything extracted from one dataset directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetResult {
    pub dataset_name: String,
    pub files_processed: usize,
    pub korea_data_found: usize,
    pub years_covered: Vec<i32>,
    pub indicators_found: BTreeMap<String, IndicatorSpec>,
    pub time_series_data: BTreeMap<String, TimeSeries>,
    pub files: Vec<FileReport>,
}

impl DatasetResult {
    pub fn new(dataset_name: impl Into<String>) -> Self {
        Self {
            dataset_name: dataset_name.into(),
            ..Default::default()
        }
    }
}

/// Per-series entry inside a timeline year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearIndicator {
    pub name: String,
    pub dataset: String,
    pub raw_value: NumericValue,
    pub normalized_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub year: i32,
    /// Mean of the normalized values observed (or interpolated) for the year
    pub democracy_score: Option<f64>,
    pub indicators: BTreeMap<String, YearIndicator>,
    pub data_sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreScale {
    pub min: f64,
    pub max: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebMetadata {
    pub generated_at: String,
    pub total_years: usize,
    pub year_range: YearRange,
    pub datasets_used: Vec<String>,
    pub indicators_count: usize,
    pub description: String,
    pub democracy_score_scale: ScoreScale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolation_applied: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorInfo {
    pub name: String,
    pub dataset: String,
    pub original_column: String,
}

/// The document consumed by the visualization front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebData {
    pub metadata: WebMetadata,
    pub timeline: Vec<TimelineEntry>,
    pub indicators_info: BTreeMap<String, IndicatorInfo>,
}
