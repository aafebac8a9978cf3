use crate::constants::{
    GENERIC_DEMOCRACY_KEYWORDS, KNOWN_INDICATORS, MAX_INDICATOR_DISTINCT_VALUES,
    NUMERIC_INDICATOR_KEYWORDS, SCORE_MAX, SCORE_MIN,
};
use crate::pipeline::ingestion::Table;
use crate::types::{IndicatorSource, IndicatorSpec, NumericValue};
use std::collections::BTreeMap;

/// Identify the democracy indicator columns of a table, keyed by column name.
///
/// Published indices are recognised by name first, then generic democracy
/// keywords, then numeric columns with a small value set and a score-like
/// name. Columns in `exclude` (typically year columns) are never indicators.
pub fn identify_indicators(table: &Table, exclude: &[usize]) -> BTreeMap<String, IndicatorSpec> {
    let mut indicators = BTreeMap::new();

    for (col, header) in table.headers().iter().enumerate() {
        if exclude.contains(&col) {
            continue;
        }
        let lower = header.to_lowercase();

        if let Some(known) = KNOWN_INDICATORS
            .iter()
            .find(|k| lower == k.key || lower.ends_with(k.key))
        {
            indicators.insert(
                header.clone(),
                IndicatorSpec {
                    name: known.name.to_string(),
                    original_column: header.clone(),
                    scale_range: known.scale,
                    reverse: known.reverse,
                    categorical: known.categorical,
                    source: IndicatorSource::Known,
                },
            );
            continue;
        }

        if GENERIC_DEMOCRACY_KEYWORDS.iter().any(|k| lower.contains(k)) {
            indicators.insert(
                header.clone(),
                IndicatorSpec {
                    name: header.clone(),
                    original_column: header.clone(),
                    scale_range: None,
                    reverse: false,
                    categorical: false,
                    source: IndicatorSource::Keyword,
                },
            );
            continue;
        }

        if !NUMERIC_INDICATOR_KEYWORDS.iter().any(|k| lower.contains(k)) {
            continue;
        }
        if let Some(summary) = table.numeric_summary(col) {
            if summary.distinct < MAX_INDICATOR_DISTINCT_VALUES {
                indicators.insert(
                    header.clone(),
                    IndicatorSpec {
                        name: header.clone(),
                        original_column: header.clone(),
                        scale_range: Some((summary.min, summary.max)),
                        reverse: lower.contains("rank"),
                        categorical: false,
                        source: IndicatorSource::NumericRange,
                    },
                );
            }
        }
    }

    indicators
}

/// Linearly map `value` from `scale_range` onto -10..+10.
///
/// Reversed scales flip first so that +10 is always "most democratic".
/// A degenerate range maps to 0; NaN has no score.
pub fn normalize_to_democracy_scale(value: f64, scale_range: (f64, f64), reverse: bool) -> Option<f64> {
    if value.is_nan() {
        return None;
    }
    let (min, max) = scale_range;
    if min == max {
        return Some(0.0);
    }

    let mut normalized = (value - min) / (max - min);
    if reverse {
        normalized = 1.0 - normalized;
    }
    Some(clamp_score((normalized - 0.5) * 20.0))
}

/// Guess a scale for values of an indicator without one.
pub fn normalize_unscaled(value: f64) -> Option<f64> {
    if value.is_nan() {
        return None;
    }
    let score = if (0.0..=1.0).contains(&value) {
        (value - 0.5) * 20.0
    } else if (0.0..=100.0).contains(&value) {
        (value / 100.0 - 0.5) * 20.0
    } else {
        value
    };
    Some(clamp_score(score))
}

/// Normalized score of a raw cell under an indicator, if it has one.
pub fn normalize_value(spec: &IndicatorSpec, raw: NumericValue) -> Option<f64> {
    if spec.categorical {
        return None;
    }
    let value = raw.as_f64();
    match spec.scale_range {
        Some(range) => normalize_to_democracy_scale(value, range, spec.reverse),
        None => normalize_unscaled(value),
    }
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(SCORE_MIN, SCORE_MAX)
}
