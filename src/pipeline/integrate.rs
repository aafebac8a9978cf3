use crate::error::{IntegrationError, Result};
use crate::metrics::{ExtractMetrics, IngestMetrics};
use crate::pipeline::ingestion::{
    delimiter_label, discover_csv_files, list_datasets, CsvReader, DatasetDir, Table,
};
use crate::pipeline::processing::{
    build_web_data, extract_years, find_korea_rows, identify_indicators, normalize_value,
    row_year, year_columns,
};
use crate::types::{
    DatasetResult, FileReport, FileStatus, IndicatorSpec, SeriesPoint, TimeSeries, WebData,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Result of integrating every dataset under the root
#[derive(Debug, Clone, Serialize)]
pub struct IntegrationResult {
    pub dataset_results: BTreeMap<String, DatasetResult>,
    pub all_years: Vec<i32>,
    pub time_series: BTreeMap<String, TimeSeries>,
    pub web_data: WebData,
}

/// Runs the read → match → extract → normalize chain over dataset directories
pub struct Integrator {
    reader: CsvReader,
}

impl Integrator {
    pub fn new(reader: CsvReader) -> Self {
        Self { reader }
    }

    /// Process every dataset below `root` and merge their series.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn integrate_all(&self, root: &Path) -> Result<IntegrationResult> {
        let datasets = list_datasets(root)?;
        info!("🚀 Integrating {} datasets", datasets.len());

        let mut dataset_results = BTreeMap::new();
        let mut all_years = BTreeSet::new();
        let mut time_series = BTreeMap::new();

        for dataset in &datasets {
            let result = self.process_dataset(dataset);
            all_years.extend(result.years_covered.iter().copied());
            time_series.extend(
                result
                    .time_series_data
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
            dataset_results.insert(dataset.name.clone(), result);
        }

        let all_years: Vec<i32> = all_years.into_iter().collect();
        info!(
            "✅ Integration summary: {} datasets, years {}-{}, {} years with data, {} series",
            dataset_results.len(),
            all_years.first().map_or("N/A".to_string(), |y| y.to_string()),
            all_years.last().map_or("N/A".to_string(), |y| y.to_string()),
            all_years.len(),
            time_series.len()
        );

        let web_data = build_web_data(&all_years, &time_series);

        Ok(IntegrationResult {
            dataset_results,
            all_years,
            time_series,
            web_data,
        })
    }

    /// Process every CSV file of one dataset. Per-file failures are recorded
    /// in the file reports and never abort the dataset.
    pub fn process_dataset(&self, dataset: &DatasetDir) -> DatasetResult {
        let span = tracing::info_span!("dataset", name = %dataset.name);
        let _enter = span.enter();

        let mut result = DatasetResult::new(&dataset.name);
        let csv_files = discover_csv_files(&dataset.path);
        info!("📂 Found {} CSV files", csv_files.len());

        for path in &csv_files {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());

            let report = match self.process_file(&dataset.name, path, &mut result) {
                Ok(report) => report,
                Err(IntegrationError::Unreadable { .. }) => {
                    warn!("Could not read {}", file_name);
                    IngestMetrics::record_file_unreadable();
                    FileReport::new(file_name, FileStatus::Unreadable)
                }
                Err(e) => {
                    warn!("Error processing {}: {}", file_name, e);
                    IngestMetrics::record_file_failed();
                    let mut report = FileReport::new(file_name, FileStatus::Failed);
                    report.error = Some(e.to_string());
                    report
                }
            };
            result.files.push(report);
        }

        let years: BTreeSet<i32> = result.years_covered.iter().copied().collect();
        result.years_covered = years.into_iter().collect();

        info!(
            "Dataset summary: {} files processed, {} with Korea data, {} years, {} series",
            result.files_processed,
            result.korea_data_found,
            result.years_covered.len(),
            result.time_series_data.len()
        );
        result
    }

    fn process_file(
        &self,
        dataset_name: &str,
        path: &Path,
        result: &mut DatasetResult,
    ) -> Result<FileReport> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        debug!("Processing {}", file_name);

        let outcome = self.reader.read_table(path)?;
        result.files_processed += 1;
        IngestMetrics::record_file_read(outcome.encoding.label());

        let mut report = FileReport::new(file_name.clone(), FileStatus::NoKoreaData);
        report.delimiter = Some(delimiter_label(outcome.delimiter));
        report.encoding = Some(outcome.encoding.label().to_string());
        report.skipped_lines = outcome.skipped_lines;
        if outcome.skipped_lines > 0 {
            warn!("{}: skipped {} over-long lines", file_name, outcome.skipped_lines);
        }

        let table = &outcome.table;
        let korea = find_korea_rows(table);
        if korea.is_empty() {
            debug!("No Korea data in {}", file_name);
            return Ok(report);
        }

        result.korea_data_found += 1;
        ExtractMetrics::record_korea_rows(dataset_name, korea.rows.len());
        info!(
            "{}: {} Korea rows in columns {:?}",
            file_name,
            korea.rows.len(),
            korea.columns
        );

        let years = extract_years(table, &korea.rows);
        result.years_covered.extend(years.iter().copied());
        if let (Some(first), Some(last)) = (years.first(), years.last()) {
            info!("{}: years {}-{} ({} years)", file_name, first, last, years.len());
        }

        let year_cols = year_columns(table);
        let indicators = identify_indicators(table, &year_cols);
        let points = extract_series(
            dataset_name,
            table,
            &korea.rows,
            &year_cols,
            &indicators,
            &mut result.time_series_data,
        );
        ExtractMetrics::record_series_points(dataset_name, points);
        info!(
            "{}: {} democracy indicators, {} series points",
            file_name,
            indicators.len(),
            points
        );

        report.status = FileStatus::KoreaData;
        report.korea_rows = korea.rows.len();
        report.korea_columns = korea.columns;
        report.years = years;
        report.indicator_columns = indicators.keys().cloned().collect();

        result.indicators_found.extend(indicators);
        Ok(report)
    }
}

/// Record every Korea row's indicator values into `<dataset>_<column>` series.
///
/// Rows without a year or without a numeric value are skipped; a later value
/// for the same series and year replaces the earlier one. Returns the number
/// of new (series, year) points; replacements are not counted.
pub fn extract_series(
    dataset_name: &str,
    table: &Table,
    korea_rows: &[usize],
    year_cols: &[usize],
    indicators: &BTreeMap<String, IndicatorSpec>,
    series: &mut BTreeMap<String, TimeSeries>,
) -> usize {
    let mut written = 0;

    for (column, spec) in indicators {
        let Some(col) = table.column_index(column) else {
            continue;
        };

        for &row in korea_rows {
            let Some(year) = row_year(table, row, year_cols) else {
                continue;
            };
            let Some(raw_value) = table.numeric(row, col) else {
                continue;
            };
            let Some(normalized_value) = normalize_value(spec, raw_value) else {
                continue;
            };

            let key = format!("{dataset_name}_{column}");
            let previous = series
                .entry(key)
                .or_insert_with(|| TimeSeries {
                    name: spec.name.clone(),
                    dataset: dataset_name.to_string(),
                    original_column: column.clone(),
                    data: BTreeMap::new(),
                })
                .data
                .insert(
                    year,
                    SeriesPoint {
                        raw_value,
                        normalized_value,
                    },
                );
            if previous.is_none() {
                written += 1;
            }
        }
    }

    written
}
