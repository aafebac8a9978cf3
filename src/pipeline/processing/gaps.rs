use crate::constants::INTERPOLATED_SOURCE;
use crate::types::{TimelineEntry, WebData};
use std::collections::BTreeMap;

/// Make the timeline contiguous and interpolate missing composite scores.
///
/// Every year between the first and last timeline year gets an entry. A year
/// without an observed score is linearly interpolated between the nearest
/// earlier and later observed years and tagged `interpolated`; when no
/// neighbour exists on one side its score stays `None`.
pub fn fill_data_gaps(web_data: &mut WebData) {
    if web_data.timeline.len() < 2 {
        return;
    }

    let mut by_year: BTreeMap<i32, TimelineEntry> = std::mem::take(&mut web_data.timeline)
        .into_iter()
        .map(|entry| (entry.year, entry))
        .collect();

    let observed: Vec<(i32, f64)> = by_year
        .values()
        .filter_map(|e| e.democracy_score.map(|s| (e.year, s)))
        .collect();

    let (Some(&start), Some(&end)) = (by_year.keys().next(), by_year.keys().next_back()) else {
        return;
    };

    let mut filled = Vec::with_capacity((end - start + 1) as usize);
    for year in start..=end {
        let mut entry = by_year.remove(&year).unwrap_or_else(|| TimelineEntry {
            year,
            democracy_score: None,
            indicators: BTreeMap::new(),
            data_sources: vec![INTERPOLATED_SOURCE.to_string()],
        });

        if entry.democracy_score.is_none() {
            entry.democracy_score = interpolate(&observed, year);
            if entry.democracy_score.is_some()
                && !entry.data_sources.iter().any(|s| s == INTERPOLATED_SOURCE)
            {
                entry.data_sources.push(INTERPOLATED_SOURCE.to_string());
            }
        }
        filled.push(entry);
    }

    web_data.timeline = filled;
    web_data.metadata.interpolation_applied = Some(true);
}

/// Linear interpolation between the closest observed years around `year`.
fn interpolate(observed: &[(i32, f64)], year: i32) -> Option<f64> {
    let before = observed.iter().rev().find(|(y, _)| *y < year)?;
    let after = observed.iter().find(|(y, _)| *y > year)?;

    let (x1, y1) = (f64::from(before.0), before.1);
    let (x2, y2) = (f64::from(after.0), after.1);
    Some(y1 + (y2 - y1) * (f64::from(year) - x1) / (x2 - x1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::timeline::build_web_data;
    use crate::types::{NumericValue, SeriesPoint, TimeSeries};

    fn web_with_scores(scores: &[(i32, Option<f64>)]) -> WebData {
        let mut data = BTreeMap::new();
        for &(year, score) in scores {
            if let Some(s) = score {
                data.insert(
                    year,
                    SeriesPoint {
                        raw_value: NumericValue::Float(s),
                        normalized_value: s,
                    },
                );
            }
        }
        let mut all = BTreeMap::new();
        all.insert(
            "ds_col".to_string(),
            TimeSeries {
                name: "col".to_string(),
                dataset: "ds".to_string(),
                original_column: "col".to_string(),
                data,
            },
        );
        let years: Vec<i32> = scores.iter().map(|(y, _)| *y).collect();
        build_web_data(&years, &all)
    }

    #[test]
    fn test_missing_years_are_interpolated() {
        let mut web = web_with_scores(&[(2000, Some(0.0)), (2004, Some(8.0))]);
        fill_data_gaps(&mut web);

        let years: Vec<i32> = web.timeline.iter().map(|e| e.year).collect();
        assert_eq!(years, vec![2000, 2001, 2002, 2003, 2004]);
        assert_eq!(web.timeline[1].democracy_score, Some(2.0));
        assert_eq!(web.timeline[3].democracy_score, Some(6.0));
        assert_eq!(web.timeline[2].data_sources, vec!["interpolated".to_string()]);
        assert_eq!(web.timeline[0].data_sources, vec!["ds".to_string()]);
        assert_eq!(web.metadata.interpolation_applied, Some(true));
    }

    #[test]
    fn test_present_year_without_score_is_interpolated() {
        let mut web = web_with_scores(&[(2000, Some(2.0)), (2001, None), (2002, Some(4.0))]);
        fill_data_gaps(&mut web);

        assert_eq!(web.timeline.len(), 3);
        assert_eq!(web.timeline[1].democracy_score, Some(3.0));
        assert_eq!(web.timeline[1].data_sources, vec!["interpolated".to_string()]);
    }

    #[test]
    fn test_edges_without_neighbours_stay_empty() {
        let mut web = web_with_scores(&[(1998, None), (2000, Some(5.0)), (2002, None)]);
        fill_data_gaps(&mut web);

        let scores: Vec<Option<f64>> = web.timeline.iter().map(|e| e.democracy_score).collect();
        assert_eq!(scores, vec![None, None, Some(5.0), None, None]);
        assert_eq!(web.timeline[1].data_sources, vec!["interpolated".to_string()]);
    }

    #[test]
    fn test_single_entry_is_untouched() {
        let mut web = web_with_scores(&[(2000, Some(1.0))]);
        fill_data_gaps(&mut web);
        assert_eq!(web.timeline.len(), 1);
        assert_eq!(web.metadata.interpolation_applied, None);
    }
}
