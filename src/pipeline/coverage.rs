//! Korea data coverage analysis.
//!
//! Answers "which datasets mention South Korea, for which years, and which
//! period do they cover together" before any indicator is normalized.

use crate::error::Result;
use crate::metrics::IngestMetrics;
use crate::pipeline::ingestion::{delimiter_label, discover_csv_files, list_datasets, CsvReader};
use crate::pipeline::processing::{extract_years, find_korea_rows};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Number of matched cell values kept per file as a sanity check.
const SAMPLE_VALUES_PER_FILE: usize = 3;
const TOP_DATASETS: usize = 3;

/// Inclusive range of years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearSpan {
    pub start: i32,
    pub end: i32,
}

impl YearSpan {
    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    fn of(years: &[i32]) -> Option<Self> {
        Some(Self {
            start: *years.iter().min()?,
            end: *years.iter().max()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileCoverage {
    pub korea_rows: usize,
    pub years: Vec<i32>,
    pub korea_columns: Vec<String>,
    pub sample_korea_values: Vec<String>,
    pub delimiter: String,
    pub encoding: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetCoverage {
    pub files_analyzed: usize,
    pub files_with_korea: usize,
    pub total_korea_rows: usize,
    /// Sorted, unique
    pub years_found: Vec<i32>,
    pub year_range: Option<YearSpan>,
    pub unique_years: usize,
    pub file_details: BTreeMap<String, FileCoverage>,
}

/// Years covered by at least `min_datasets` datasets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonPeriods {
    pub min_datasets: usize,
    pub years: Vec<i32>,
    pub continuous_periods: Vec<YearSpan>,
    pub longest_period: YearSpan,
    /// Per dataset, its years inside the longest period
    pub contributing_datasets: BTreeMap<String, Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetYears {
    pub dataset: String,
    pub years: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusPeriod {
    pub span: YearSpan,
    pub years: Vec<i32>,
    pub min_datasets: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub overall_range: YearSpan,
    pub unique_years: usize,
    pub top_datasets: Vec<DatasetYears>,
    pub focus_period: Option<FocusPeriod>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub datasets: BTreeMap<String, DatasetCoverage>,
    pub common_periods: Option<CommonPeriods>,
    pub recommendations: Option<Recommendations>,
}

impl CoverageReport {
    /// Datasets that yielded at least one year, with their years.
    pub fn dataset_years(&self) -> BTreeMap<String, Vec<i32>> {
        self.datasets
            .iter()
            .filter(|(_, c)| !c.years_found.is_empty())
            .map(|(name, c)| (name.clone(), c.years_found.clone()))
            .collect()
    }
}

/// Scan every dataset under `root` for Korea rows and their years.
pub fn analyze_coverage(reader: &CsvReader, root: &Path) -> Result<CoverageReport> {
    let datasets = list_datasets(root)?;
    info!("🔎 Analyzing Korea coverage across {} datasets", datasets.len());

    let mut coverage = BTreeMap::new();
    for dataset in &datasets {
        let span = tracing::info_span!("coverage", dataset = %dataset.name);
        let _enter = span.enter();

        let mut dataset_coverage = DatasetCoverage::default();
        let mut years = BTreeSet::new();

        for path in discover_csv_files(&dataset.path) {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            let outcome = match reader.read_table(&path) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Could not read {}: {}", file_name, e);
                    IngestMetrics::record_file_unreadable();
                    continue;
                }
            };
            dataset_coverage.files_analyzed += 1;

            let korea = find_korea_rows(&outcome.table);
            if korea.is_empty() {
                debug!("No Korea data in {}", file_name);
                continue;
            }

            let file_years = extract_years(&outcome.table, &korea.rows);
            dataset_coverage.files_with_korea += 1;
            dataset_coverage.total_korea_rows += korea.rows.len();
            years.extend(file_years.iter().copied());

            info!("{}: {} Korea rows, {} years", file_name, korea.rows.len(), file_years.len());

            dataset_coverage.file_details.insert(
                file_name,
                FileCoverage {
                    korea_rows: korea.rows.len(),
                    years: file_years,
                    korea_columns: korea.columns,
                    sample_korea_values: korea
                        .sample_values
                        .into_iter()
                        .take(SAMPLE_VALUES_PER_FILE)
                        .collect(),
                    delimiter: delimiter_label(outcome.delimiter),
                    encoding: outcome.encoding.label().to_string(),
                },
            );
        }

        dataset_coverage.years_found = years.into_iter().collect();
        dataset_coverage.year_range = YearSpan::of(&dataset_coverage.years_found);
        dataset_coverage.unique_years = dataset_coverage.years_found.len();
        coverage.insert(dataset.name.clone(), dataset_coverage);
    }

    let mut report = CoverageReport {
        datasets: coverage,
        common_periods: None,
        recommendations: None,
    };
    let dataset_years = report.dataset_years();
    if dataset_years.len() >= 2 {
        report.common_periods = common_periods(&dataset_years);
    }
    report.recommendations = recommend(&dataset_years);
    Ok(report)
}

/// Split sorted, unique years into maximal runs of consecutive years.
pub fn continuous_periods(years: &[i32]) -> Vec<YearSpan> {
    let mut periods = Vec::new();
    let mut iter = years.iter().copied();
    let Some(first) = iter.next() else {
        return periods;
    };

    let mut current = YearSpan { start: first, end: first };
    for year in iter {
        if year == current.end + 1 {
            current.end = year;
        } else {
            periods.push(current);
            current = YearSpan { start: year, end: year };
        }
    }
    periods.push(current);
    periods
}

fn year_counts(dataset_years: &BTreeMap<String, Vec<i32>>) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for years in dataset_years.values() {
        for &year in years {
            *counts.entry(year).or_insert(0) += 1;
        }
    }
    counts
}

/// The strictest overlap that exists: starting from "every dataset", lower
/// the required dataset count until some year qualifies.
pub fn common_periods(dataset_years: &BTreeMap<String, Vec<i32>>) -> Option<CommonPeriods> {
    let counts = year_counts(dataset_years);

    for min_datasets in (1..=dataset_years.len()).rev() {
        let years: Vec<i32> = counts
            .iter()
            .filter(|(_, &c)| c >= min_datasets)
            .map(|(&y, _)| y)
            .collect();
        if years.is_empty() {
            continue;
        }

        let periods = continuous_periods(&years);
        // First of the longest runs
        let longest = periods
            .iter()
            .copied()
            .reduce(|best, p| if p.len() > best.len() { p } else { best })?;

        let contributing = dataset_years
            .iter()
            .filter_map(|(name, ys)| {
                let overlap: Vec<i32> = ys.iter().copied().filter(|&y| longest.contains(y)).collect();
                (!overlap.is_empty()).then(|| (name.clone(), overlap))
            })
            .collect();

        return Some(CommonPeriods {
            min_datasets,
            years,
            continuous_periods: periods,
            longest_period: longest,
            contributing_datasets: contributing,
        });
    }
    None
}

/// Overall range, best-covered datasets and a focus period covered by at
/// least half of the datasets.
pub fn recommend(dataset_years: &BTreeMap<String, Vec<i32>>) -> Option<Recommendations> {
    let union: Vec<i32> = dataset_years
        .values()
        .flatten()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let overall_range = YearSpan::of(&union)?;

    let mut ranked: Vec<DatasetYears> = dataset_years
        .iter()
        .map(|(dataset, years)| DatasetYears {
            dataset: dataset.clone(),
            years: years.clone(),
        })
        .collect();
    ranked.sort_by(|a, b| b.years.len().cmp(&a.years.len()));
    ranked.truncate(TOP_DATASETS);

    let min_datasets = (dataset_years.len() / 2).max(1);
    let focus_years: Vec<i32> = year_counts(dataset_years)
        .into_iter()
        .filter(|&(_, c)| c >= min_datasets)
        .map(|(y, _)| y)
        .collect();
    let focus_period = YearSpan::of(&focus_years).map(|span| FocusPeriod {
        span,
        years: focus_years.clone(),
        min_datasets,
    });

    Some(Recommendations {
        overall_range,
        unique_years: union.len(),
        top_datasets: ranked,
        focus_period,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years_map(entries: &[(&str, &[i32])]) -> BTreeMap<String, Vec<i32>> {
        entries
            .iter()
            .map(|(name, ys)| (name.to_string(), ys.to_vec()))
            .collect()
    }

    #[test]
    fn test_continuous_periods() {
        let periods = continuous_periods(&[1990, 1991, 1992, 1995, 1997, 1998]);
        assert_eq!(
            periods,
            vec![
                YearSpan { start: 1990, end: 1992 },
                YearSpan { start: 1995, end: 1995 },
                YearSpan { start: 1997, end: 1998 },
            ]
        );
        assert!(continuous_periods(&[]).is_empty());
    }

    #[test]
    fn test_common_periods_prefers_all_datasets() {
        let map = years_map(&[
            ("fh", &[2000, 2001, 2002, 2003]),
            ("polity", &[2001, 2002, 2005]),
            ("vdem", &[2001, 2002, 2003]),
        ]);
        let common = common_periods(&map).unwrap();
        assert_eq!(common.min_datasets, 3);
        assert_eq!(common.years, vec![2001, 2002]);
        assert_eq!(common.longest_period, YearSpan { start: 2001, end: 2002 });
        assert_eq!(common.contributing_datasets.len(), 3);
    }

    #[test]
    fn test_common_periods_relaxes_when_disjoint() {
        let map = years_map(&[("a", &[1990, 1991]), ("b", &[2000, 2001, 2002])]);
        let common = common_periods(&map).unwrap();
        assert_eq!(common.min_datasets, 1);
        assert_eq!(common.longest_period, YearSpan { start: 2000, end: 2002 });
        assert_eq!(common.contributing_datasets.keys().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_longest_period_keeps_first_on_tie() {
        let map = years_map(&[("a", &[1990, 1991, 1995, 1996])]);
        let common = common_periods(&map).unwrap();
        assert_eq!(common.longest_period, YearSpan { start: 1990, end: 1991 });
    }

    #[test]
    fn test_recommendations() {
        let map = years_map(&[
            ("a", &[2000, 2001]),
            ("b", &[2001, 2002, 2003]),
            ("c", &[2001]),
            ("d", &[1999, 2001, 2002, 2003, 2004]),
        ]);
        let rec = recommend(&map).unwrap();
        assert_eq!(rec.overall_range, YearSpan { start: 1999, end: 2004 });
        assert_eq!(rec.unique_years, 6);
        let top: Vec<&str> = rec.top_datasets.iter().map(|d| d.dataset.as_str()).collect();
        assert_eq!(top, vec!["d", "b", "a"]);

        let focus = rec.focus_period.unwrap();
        assert_eq!(focus.min_datasets, 2);
        assert_eq!(focus.years, vec![2001, 2002, 2003]);
        assert_eq!(focus.span, YearSpan { start: 2001, end: 2003 });
    }

    #[test]
    fn test_recommendations_need_years() {
        assert!(recommend(&BTreeMap::new()).is_none());
    }
}
