// Data processing pipeline: ingestion, processing, integration and coverage

pub mod coverage;
pub mod ingestion;
pub mod integrate;
pub mod processing;

use crate::config::Config;
use crate::error::Result;
use crate::export::Exporter;
use crate::report::{render_coverage_report, render_integration_summary};
use crate::storage::OutputStore;
use coverage::{analyze_coverage, CoverageReport};
use ingestion::CsvReader;
use integrate::{IntegrationResult, Integrator};
use processing::fill_data_gaps;
use std::time::Instant;
use tracing::{info, instrument};

/// Result of a complete integration run
#[derive(Debug)]
pub struct IntegrationRun {
    pub result: IntegrationResult,
    pub summary: String,
    pub output_files: Vec<String>,
    pub duration_secs: f64,
}

/// Result of a complete coverage run
#[derive(Debug)]
pub struct CoverageRun {
    pub report: CoverageReport,
    pub report_text: String,
    pub output_files: Vec<String>,
    pub duration_secs: f64,
}

fn reader_for(config: &Config) -> CsvReader {
    CsvReader::new().with_sample_bytes(config.reader.sample_bytes)
}

/// Integrate every dataset, fill gaps and write the web data, summary and
/// detailed results.
#[instrument(skip_all, fields(root = %config.dataset_root.display()))]
pub fn run_integration(config: &Config, store: &dyn OutputStore) -> Result<IntegrationRun> {
    let started = Instant::now();
    let integrator = Integrator::new(reader_for(config));
    let mut result = integrator.integrate_all(&config.dataset_root)?;

    fill_data_gaps(&mut result.web_data);
    info!(
        "🔧 Timeline covers {} years after gap filling",
        result.web_data.timeline.len()
    );

    let exporter = Exporter::new(store, &config.outputs);
    let mut output_files = exporter.save_web_data(&result.web_data)?.locations;

    let summary = render_integration_summary(&result.web_data);
    output_files.push(exporter.save_summary(&summary)?);
    output_files.push(exporter.save_detailed_results(&result.dataset_results)?);

    let duration_secs = started.elapsed().as_secs_f64();
    crate::metrics::record_run_duration("integrate", duration_secs);
    info!("✅ Integration finished in {:.2}s", duration_secs);

    Ok(IntegrationRun {
        result,
        summary,
        output_files,
        duration_secs,
    })
}

/// Analyze which datasets carry Korea data for which years and write the
/// coverage report.
#[instrument(skip_all, fields(root = %config.dataset_root.display()))]
pub fn run_coverage(config: &Config, store: &dyn OutputStore) -> Result<CoverageRun> {
    let started = Instant::now();
    let report = analyze_coverage(&reader_for(config), &config.dataset_root)?;
    let report_text = render_coverage_report(&report);

    let exporter = Exporter::new(store, &config.outputs);
    let output_files = exporter.save_coverage(&report, &report_text)?.locations;

    let duration_secs = started.elapsed().as_secs_f64();
    crate::metrics::record_run_duration("coverage", duration_secs);
    info!("✅ Coverage analysis finished in {:.2}s", duration_secs);

    Ok(CoverageRun {
        report,
        report_text,
        output_files,
        duration_secs,
    })
}
