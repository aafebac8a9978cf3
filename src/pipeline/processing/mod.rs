// Pipeline processing: Korea-row matching, year extraction, indicator
// normalization, timeline aggregation and gap filling

pub mod gaps;
pub mod indicators;
pub mod matcher;
pub mod timeline;
pub mod years;

pub use gaps::fill_data_gaps;
pub use indicators::{identify_indicators, normalize_to_democracy_scale, normalize_value};
pub use matcher::{find_korea_rows, KoreaMatch};
pub use timeline::build_web_data;
pub use years::{extract_years, row_year, year_columns};
