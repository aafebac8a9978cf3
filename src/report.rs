//! Plain-text reports printed to the console and saved next to the JSON.

use crate::constants::INTERPOLATED_SOURCE;
use crate::pipeline::coverage::{CoverageReport, YearSpan};
use crate::pipeline::processing::timeline::mean;
use crate::types::{TimelineEntry, WebData};
use std::fmt::Write;

const RULE_WIDTH: usize = 80;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn banner(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", rule());
}

fn opt_year(year: Option<i32>) -> String {
    year.map_or_else(|| "N/A".to_string(), |y| y.to_string())
}

fn is_interpolated(entry: &TimelineEntry) -> bool {
    entry.data_sources.iter().any(|s| s == INTERPOLATED_SOURCE)
}

/// Direction of the composite score between the first and latest data point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl Trend {
    pub fn between(first: f64, last: f64) -> Self {
        if last > first {
            Trend::Improving
        } else if last < first {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Trend::Improving => "Improving",
            Trend::Declining => "Declining",
            Trend::Stable => "Stable",
        }
    }
}

/// Summary of a gap-filled integration run.
pub fn render_integration_summary(web_data: &WebData) -> String {
    let metadata = &web_data.metadata;
    let timeline = &web_data.timeline;
    let mut out = String::new();

    banner(&mut out, "KOREA DEMOCRACY DATA INTEGRATION SUMMARY");

    let scored: Vec<(i32, f64)> = timeline
        .iter()
        .filter_map(|t| t.democracy_score.map(|s| (t.year, s)))
        .collect();

    let _ = writeln!(out, "\nData Coverage:");
    let _ = writeln!(
        out,
        "  Time range: {} - {}",
        opt_year(metadata.year_range.start),
        opt_year(metadata.year_range.end)
    );
    let _ = writeln!(out, "  Total years: {}", metadata.total_years);
    let _ = writeln!(out, "  Data points: {}", scored.len());
    let _ = writeln!(out, "  Datasets used: {}", metadata.datasets_used.len());
    let _ = writeln!(out, "  Total indicators: {}", metadata.indicators_count);

    let _ = writeln!(out, "\nDemocracy Score Trends:");
    if let (Some(&(first_year, first_score)), Some(&(last_year, last_score))) =
        (scored.first(), scored.last())
    {
        let scores: Vec<f64> = scored.iter().map(|&(_, s)| s).collect();
        let average = mean(&scores).unwrap_or_default();
        let _ = writeln!(out, "  First data point: {first_year} (score: {first_score:.2})");
        let _ = writeln!(out, "  Latest data point: {last_year} (score: {last_score:.2})");
        let _ = writeln!(out, "  Average score: {average:.2}");
        let _ = writeln!(
            out,
            "  Trend: {}",
            Trend::between(first_score, last_score).label()
        );
    } else {
        let _ = writeln!(out, "  No scored years");
    }

    let _ = writeln!(out, "\nDataset Contributions:");
    for dataset in &metadata.datasets_used {
        let years: Vec<i32> = timeline
            .iter()
            .filter(|t| t.data_sources.contains(dataset))
            .map(|t| t.year)
            .collect();
        if let (Some(first), Some(last)) = (years.first(), years.last()) {
            let _ = writeln!(out, "  {dataset}: {} years ({first}-{last})", years.len());
        }
    }

    let interpolated = timeline.iter().filter(|t| is_interpolated(t)).count();
    let observed = timeline
        .iter()
        .filter(|t| t.democracy_score.is_some() && !is_interpolated(t))
        .count();
    let completeness = if timeline.is_empty() {
        0.0
    } else {
        observed as f64 / timeline.len() as f64 * 100.0
    };
    let _ = writeln!(out, "\nData Quality:");
    let _ = writeln!(out, "  Interpolated data points: {interpolated}");
    let _ = writeln!(out, "  Observed data points: {observed}");
    let _ = writeln!(out, "  Data completeness: {completeness:.1}%");

    let json_kb = serde_json::to_string(web_data).map(|s| s.len() / 1024).unwrap_or(0);
    let _ = writeln!(out, "\nWeb Integration:");
    let _ = writeln!(out, "  JSON file size: ~{json_kb}KB");

    out
}

fn span_text(span: &YearSpan) -> String {
    if span.start == span.end {
        format!("{} (1 year)", span.start)
    } else {
        format!("{}-{} ({} years)", span.start, span.end, span.len())
    }
}

/// Per-dataset coverage, common periods and recommendations.
pub fn render_coverage_report(report: &CoverageReport) -> String {
    let mut out = String::new();
    banner(&mut out, "KOREA DATA COVERAGE ANALYSIS");

    for (name, coverage) in &report.datasets {
        let _ = writeln!(out, "\n📂 {name}");
        let _ = writeln!(out, "{}", "-".repeat(60));
        for (file, details) in &coverage.file_details {
            let _ = writeln!(
                out,
                "  {file}: {} Korea rows, {} years (delimiter '{}', encoding {})",
                details.korea_rows,
                details.years.len(),
                details.delimiter,
                details.encoding
            );
            if !details.sample_korea_values.is_empty() {
                let _ = writeln!(out, "    Sample Korea values: {:?}", details.sample_korea_values);
            }
        }
        let _ = writeln!(out, "  Files analyzed: {}", coverage.files_analyzed);
        let _ = writeln!(out, "  Files with Korea data: {}", coverage.files_with_korea);
        let _ = writeln!(out, "  Total Korea rows: {}", coverage.total_korea_rows);
        let _ = writeln!(out, "  Unique years: {}", coverage.unique_years);
        if let Some(range) = &coverage.year_range {
            let _ = writeln!(out, "  Year range: {}-{}", range.start, range.end);
        }
    }

    let _ = writeln!(out);
    banner(&mut out, "OVERALL COVERAGE SUMMARY");
    for (name, years) in report.dataset_years() {
        if let (Some(first), Some(last)) = (years.first(), years.last()) {
            let _ = writeln!(out, "{name:40} | {first:4}-{last:4} | {:3} years", years.len());
        }
    }

    if let Some(common) = &report.common_periods {
        let _ = writeln!(out);
        banner(&mut out, "COMMON TIME PERIODS ANALYSIS");
        let _ = writeln!(
            out,
            "\nYears covered by at least {} dataset(s): {} years",
            common.min_datasets,
            common.years.len()
        );
        if let (Some(first), Some(last)) = (common.years.first(), common.years.last()) {
            let _ = writeln!(out, "Range: {first}-{last}");
        }
        let _ = writeln!(out, "Continuous periods:");
        for period in &common.continuous_periods {
            let _ = writeln!(out, "  - {}", span_text(period));
        }
        let _ = writeln!(
            out,
            "\nLongest continuous period: {}",
            span_text(&common.longest_period)
        );
        let _ = writeln!(out, "Contributing datasets:");
        for (name, overlap) in &common.contributing_datasets {
            if let (Some(first), Some(last)) = (overlap.first(), overlap.last()) {
                let _ = writeln!(out, "  - {name}: {} years ({first}-{last})", overlap.len());
            }
        }
    }

    if let Some(rec) = &report.recommendations {
        let _ = writeln!(out);
        banner(&mut out, "RECOMMENDATIONS");
        let _ = writeln!(
            out,
            "1. Overall data availability: {}-{} ({} unique years)",
            rec.overall_range.start, rec.overall_range.end, rec.unique_years
        );
        let _ = writeln!(out, "\n2. Datasets with most Korea data:");
        for (i, entry) in rec.top_datasets.iter().enumerate() {
            if let (Some(first), Some(last)) = (entry.years.first(), entry.years.last()) {
                let _ = writeln!(
                    out,
                    "   {}. {}: {} years ({first}-{last})",
                    i + 1,
                    entry.dataset,
                    entry.years.len()
                );
            }
        }
        if let Some(focus) = &rec.focus_period {
            let _ = writeln!(
                out,
                "\n3. Recommended focus period: {}-{}",
                focus.span.start, focus.span.end
            );
            let _ = writeln!(
                out,
                "   ({} years with data from at least {} dataset(s))",
                focus.years.len(),
                focus.min_datasets
            );
        }
    }

    out
}
