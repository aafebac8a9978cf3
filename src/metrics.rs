//! Run counters for the integration pipeline.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding process installs a recorder.

/// Metrics for the file ingestion phase
pub struct IngestMetrics;

impl IngestMetrics {
    pub fn record_file_read(encoding: &'static str) {
        ::metrics::counter!("kd_files_read_total", "encoding" => encoding).increment(1);
    }

    pub fn record_file_unreadable() {
        ::metrics::counter!("kd_files_unreadable_total").increment(1);
    }

    pub fn record_file_failed() {
        ::metrics::counter!("kd_files_failed_total").increment(1);
    }
}

/// Metrics for Korea-row matching and indicator extraction
pub struct ExtractMetrics;

impl ExtractMetrics {
    pub fn record_korea_rows(dataset: &str, rows: usize) {
        ::metrics::counter!("kd_korea_rows_total", "dataset" => dataset.to_string())
            .increment(rows as u64);
    }

    pub fn record_series_points(dataset: &str, points: usize) {
        ::metrics::counter!("kd_series_points_total", "dataset" => dataset.to_string())
            .increment(points as u64);
    }
}

/// Record the wall time of a whole run
pub fn record_run_duration(command: &'static str, duration_secs: f64) {
    ::metrics::histogram!("kd_run_duration_seconds", "command" => command).record(duration_secs);
}
