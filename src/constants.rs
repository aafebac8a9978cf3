//! Lookup tables driving the heuristics. Everything is matched against
//! lower-cased header names or cell values.

/// Korea name variants matched as substrings of a cell.
pub const KOREA_NAME_PATTERNS: &[&str] = &[
    "south korea",
    "korea",
    "republic of korea",
    "korea, south",
    "korea (south)",
    "s. korea",
    "s korea",
    "korean",
    "korea south",
    "south-korea",
    // French
    "corée du sud",
    "corée",
    "coree du sud",
    "coree",
    // Spanish
    "corea del sur",
    "corea",
    // Portuguese
    "coreia do sul",
    "coreia",
];

/// ISO alpha-3/alpha-2, COW abbreviation, COW numeric (732) and ISO numeric (410).
pub const KOREA_CODE_PATTERNS: &[&str] = &["kor", "kr", "rok", "410", "732"];

/// A cell containing any of these names the North and never matches.
pub const NORTH_KOREA_MARKERS: &[&str] = &[
    "north",
    "dem. people",
    "democratic people",
    "dem. rep",
    "dprk",
    "du nord",
    "del norte",
    "do norte",
    "populaire",
    "popular",
];

/// Header fragments that mark a column as holding country names or codes.
pub const COUNTRY_COLUMN_HINTS: &[&str] = &[
    "country",
    "nation",
    "state",
    "iso",
    "code",
    "name",
    "territory",
];

/// Header prefixes of multilingual label columns (`en_name`, `fr_pays`, ...).
pub const MULTILINGUAL_COLUMN_PREFIXES: &[&str] = &["en_", "fr_", "es_", "ar_", "fa_", "pt_"];

pub const YEAR_COLUMN_HINTS: &[&str] = &["year", "time", "date"];

pub const GENERIC_DEMOCRACY_KEYWORDS: &[&str] = &[
    "democracy",
    "democratic",
    "freedom",
    "liberty",
    "civil",
    "political",
    "rights",
];

/// Keywords that make an otherwise anonymous numeric column an indicator.
pub const NUMERIC_INDICATOR_KEYWORDS: &[&str] = &[
    "score",
    "index",
    "rating",
    "rank",
    "freedom",
    "democracy",
    "political",
    "civil",
];

/// Numeric columns with this many distinct values or more are not indicators.
pub const MAX_INDICATOR_DISTINCT_VALUES: usize = 200;

pub const CANDIDATE_DELIMITERS: &[u8] = &[b',', b';', b'\t', b'|'];

/// Order in which delimiters are retried once the sniffed one fails.
pub const FALLBACK_DELIMITERS: &[u8] = &[b';', b',', b'\t', b'|'];

/// Cell spellings that count as missing values.
pub const MISSING_VALUE_MARKERS: &[&str] = &[
    "", "na", "n/a", "nan", "-nan", "null", "none", "#n/a", "#na", "<na>", "-1.#ind", "1.#qnan",
];

/// A published democracy index recognised by column name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnownIndicator {
    pub key: &'static str,
    pub name: &'static str,
    pub scale: Option<(f64, f64)>,
    /// Lower raw values mean "more free".
    pub reverse: bool,
    pub categorical: bool,
}

const fn scaled(key: &'static str, name: &'static str, min: f64, max: f64, reverse: bool) -> KnownIndicator {
    KnownIndicator {
        key,
        name,
        scale: Some((min, max)),
        reverse,
        categorical: false,
    }
}

/// Checked in order; the first key equal to or suffixing the column name wins.
pub const KNOWN_INDICATORS: &[KnownIndicator] = &[
    // Freedom House
    scaled("pr", "Political Rights", 1.0, 7.0, true),
    scaled("cl", "Civil Liberties", 1.0, 7.0, true),
    KnownIndicator {
        key: "status",
        name: "Freedom Status",
        scale: None,
        reverse: false,
        categorical: true,
    },
    scaled("fiw", "Freedom in the World", 1.0, 7.0, true),
    // Polity
    scaled("polity", "Polity Score", -10.0, 10.0, false),
    scaled("polity2", "Polity Score Modified", -10.0, 10.0, false),
    scaled("democ", "Democracy Score", 0.0, 10.0, false),
    scaled("autoc", "Autocracy Score", 0.0, 10.0, true),
    // V-Dem
    scaled("v2x_polyarchy", "Electoral Democracy", 0.0, 1.0, false),
    scaled("v2x_libdem", "Liberal Democracy", 0.0, 1.0, false),
    scaled("v2x_partipdem", "Participatory Democracy", 0.0, 1.0, false),
    scaled("v2x_delibdem", "Deliberative Democracy", 0.0, 1.0, false),
    scaled("v2x_egal", "Egalitarian Democracy", 0.0, 1.0, false),
    // Press freedom
    scaled("score", "Press Freedom Score", 0.0, 100.0, true),
    scaled("rank", "Press Freedom Rank", 1.0, 180.0, true),
];

pub const SCORE_MIN: f64 = -10.0;
pub const SCORE_MAX: f64 = 10.0;

pub const INTERPOLATED_SOURCE: &str = "interpolated";

pub const WEB_DATA_DESCRIPTION: &str =
    "South Korea democracy indicators integrated from multiple datasets";
pub const SCORE_SCALE_DESCRIPTION: &str =
    "Normalized democracy score where -10 is least democratic and +10 is most democratic";

pub const DEFAULT_CONFIG_FILE: &str = "korea_democracy.toml";
pub const DATASET_ROOT_ENV: &str = "KOREA_DEMOCRACY_DATASET_ROOT";
pub const OUTPUT_DIR_ENV: &str = "KOREA_DEMOCRACY_OUTPUT_DIR";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polity2_is_reachable_before_suffix_collision() {
        // "polity2" does not end with "polity", so ordering cannot shadow it.
        let hit = KNOWN_INDICATORS
            .iter()
            .find(|k| "polity2" == k.key || "polity2".ends_with(k.key))
            .unwrap();
        assert_eq!(hit.name, "Polity Score Modified");
    }

    #[test]
    fn test_only_status_is_categorical() {
        let categorical: Vec<_> = KNOWN_INDICATORS.iter().filter(|k| k.categorical).collect();
        assert_eq!(categorical.len(), 1);
        assert_eq!(categorical[0].key, "status");
        assert!(categorical[0].scale.is_none());
    }
}
