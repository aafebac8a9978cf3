use crate::constants::{SCORE_MAX, SCORE_MIN, SCORE_SCALE_DESCRIPTION, WEB_DATA_DESCRIPTION};
use crate::types::{
    IndicatorInfo, ScoreScale, TimeSeries, TimelineEntry, WebData, WebMetadata, YearIndicator,
    YearRange,
};
use chrono::Local;
use std::collections::{BTreeMap, BTreeSet};

/// Merge every series into one entry per year.
///
/// `all_years` decides which years appear (a year can be present without any
/// indicator values); each entry's composite score is the mean of the
/// normalized values available that year.
pub fn build_web_data(all_years: &[i32], time_series: &BTreeMap<String, TimeSeries>) -> WebData {
    let years: BTreeSet<i32> = all_years.iter().copied().collect();

    let timeline: Vec<TimelineEntry> = years
        .iter()
        .map(|&year| build_entry(year, time_series))
        .collect();

    let datasets_used: BTreeSet<String> = time_series.values().map(|s| s.dataset.clone()).collect();

    let metadata = WebMetadata {
        generated_at: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        total_years: years.len(),
        year_range: YearRange {
            start: years.first().copied(),
            end: years.last().copied(),
        },
        datasets_used: datasets_used.into_iter().collect(),
        indicators_count: time_series.len(),
        description: WEB_DATA_DESCRIPTION.to_string(),
        democracy_score_scale: ScoreScale {
            min: SCORE_MIN,
            max: SCORE_MAX,
            description: SCORE_SCALE_DESCRIPTION.to_string(),
        },
        interpolation_applied: None,
    };

    let indicators_info = time_series
        .iter()
        .map(|(key, series)| {
            (
                key.clone(),
                IndicatorInfo {
                    name: series.name.clone(),
                    dataset: series.dataset.clone(),
                    original_column: series.original_column.clone(),
                },
            )
        })
        .collect();

    WebData {
        metadata,
        timeline,
        indicators_info,
    }
}

fn build_entry(year: i32, time_series: &BTreeMap<String, TimeSeries>) -> TimelineEntry {
    let mut indicators = BTreeMap::new();
    let mut sources = BTreeSet::new();
    let mut values = Vec::new();

    for (key, series) in time_series {
        if let Some(point) = series.data.get(&year) {
            indicators.insert(
                key.clone(),
                YearIndicator {
                    name: series.name.clone(),
                    dataset: series.dataset.clone(),
                    raw_value: point.raw_value,
                    normalized_value: point.normalized_value,
                },
            );
            sources.insert(series.dataset.clone());
            values.push(point.normalized_value);
        }
    }

    TimelineEntry {
        year,
        democracy_score: mean(&values),
        indicators,
        data_sources: sources.into_iter().collect(),
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NumericValue, SeriesPoint};

    fn series(dataset: &str, column: &str, points: &[(i32, f64, f64)]) -> TimeSeries {
        TimeSeries {
            name: column.to_string(),
            dataset: dataset.to_string(),
            original_column: column.to_string(),
            data: points
                .iter()
                .map(|&(year, raw, normalized)| {
                    (
                        year,
                        SeriesPoint {
                            raw_value: NumericValue::Float(raw),
                            normalized_value: normalized,
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_composite_score_is_mean_of_available_indicators() {
        let mut all = BTreeMap::new();
        all.insert("fh_pr".to_string(), series("fh", "pr", &[(2000, 2.0, 6.0), (2001, 1.0, 10.0)]));
        all.insert("polity_polity2".to_string(), series("polity", "polity2", &[(2000, 8.0, 8.0)]));

        let web = build_web_data(&[2001, 2000, 1998], &all);

        assert_eq!(web.timeline.len(), 3);
        assert_eq!(web.timeline[0].year, 1998);
        assert_eq!(web.timeline[0].democracy_score, None);
        assert!(web.timeline[0].data_sources.is_empty());

        let y2000 = &web.timeline[1];
        assert_eq!(y2000.democracy_score, Some(7.0));
        assert_eq!(y2000.indicators.len(), 2);
        assert_eq!(y2000.data_sources, vec!["fh".to_string(), "polity".to_string()]);

        assert_eq!(web.timeline[2].democracy_score, Some(10.0));

        assert_eq!(web.metadata.total_years, 3);
        assert_eq!(web.metadata.year_range.start, Some(1998));
        assert_eq!(web.metadata.year_range.end, Some(2001));
        assert_eq!(web.metadata.indicators_count, 2);
        assert_eq!(web.metadata.datasets_used, vec!["fh".to_string(), "polity".to_string()]);
        assert_eq!(web.indicators_info["fh_pr"].original_column, "pr");
    }

    #[test]
    fn test_empty_input_produces_empty_timeline() {
        let web = build_web_data(&[], &BTreeMap::new());
        assert!(web.timeline.is_empty());
        assert_eq!(web.metadata.year_range.start, None);
        assert_eq!(web.metadata.total_years, 0);
    }
}
