use super::table::Table;
use crate::constants::{CANDIDATE_DELIMITERS, FALLBACK_DELIMITERS};
use crate::error::{IntegrationError, Result};
use csv::{ReaderBuilder, Trim};
use encoding_rs::{UTF_8, WINDOWS_1252};
use serde::Serialize;
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// Text encodings tried, in order, when reading a CSV file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Cp1252,
    Iso8859_1,
    Utf8Sig,
}

impl TextEncoding {
    pub const ATTEMPT_ORDER: [TextEncoding; 5] = [
        TextEncoding::Utf8,
        TextEncoding::Latin1,
        TextEncoding::Cp1252,
        TextEncoding::Iso8859_1,
        TextEncoding::Utf8Sig,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Cp1252 => "cp1252",
            TextEncoding::Iso8859_1 => "iso-8859-1",
            TextEncoding::Utf8Sig => "utf-8-sig",
        }
    }

    /// An earlier encoding in `ATTEMPT_ORDER` that decodes every byte string
    /// to the same text, making a retry with this one pointless.
    pub fn same_text_as(self) -> Option<TextEncoding> {
        match self {
            TextEncoding::Iso8859_1 => Some(TextEncoding::Latin1),
            _ => None,
        }
    }

    /// Strict decode; `None` when the bytes are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            TextEncoding::Utf8 => UTF_8.decode_without_bom_handling_and_without_replacement(bytes),
            TextEncoding::Utf8Sig => {
                let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                UTF_8.decode_without_bom_handling_and_without_replacement(body)
            }
            // Every byte is a code point in ISO-8859-1, so this cannot fail.
            TextEncoding::Latin1 | TextEncoding::Iso8859_1 => {
                Some(encoding_rs::mem::decode_latin1(bytes))
            }
            TextEncoding::Cp1252 => {
                WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes)
            }
        }
    }
}

/// Printable form of a delimiter byte
pub fn delimiter_label(delimiter: u8) -> String {
    match delimiter {
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}

/// A successfully parsed file together with how it was read
#[derive(Debug, Clone)]
pub struct ReadOutcome {
    pub table: Table,
    pub delimiter: u8,
    pub encoding: TextEncoding,
    /// Records dropped for having more fields than the header
    pub skipped_lines: usize,
}

/// CSV reader that sniffs the delimiter and retries across encodings
/// until the file parses into more than one row and column.
pub struct CsvReader {
    sample_bytes: usize,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self { sample_bytes: 1024 }
    }
}

impl CsvReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample_bytes(mut self, sample_bytes: usize) -> Self {
        self.sample_bytes = sample_bytes.max(1);
        self
    }

    pub fn read_table(&self, path: &Path) -> Result<ReadOutcome> {
        let bytes = fs::read(path)?;
        self.read_bytes(&bytes).ok_or_else(|| IntegrationError::Unreadable {
            path: path.to_path_buf(),
        })
    }

    /// Try the sniffed delimiter with every encoding, then every fallback
    /// delimiter with every encoding.
    pub fn read_bytes(&self, bytes: &[u8]) -> Option<ReadOutcome> {
        let sample_len = bytes.len().min(self.sample_bytes);
        let sample = String::from_utf8_lossy(&bytes[..sample_len]);
        let detected = detect_delimiter(&sample, sample_len < bytes.len());
        trace!("Sniffed delimiter '{}'", delimiter_label(detected));

        // Decoded lazily, each distinct decoding at most once across all delimiters
        let mut decoded: Vec<Option<Option<Cow<'_, str>>>> =
            TextEncoding::ATTEMPT_ORDER.iter().map(|_| None).collect();

        let attempts = std::iter::once(detected)
            .chain(FALLBACK_DELIMITERS.iter().copied().filter(|&d| d != detected));

        for delimiter in attempts {
            for (slot, &encoding) in decoded.iter_mut().zip(TextEncoding::ATTEMPT_ORDER.iter()) {
                if encoding.same_text_as().is_some() {
                    continue;
                }
                let Some(text) = slot.get_or_insert_with(|| encoding.decode(bytes)).as_deref() else {
                    trace!("{} cannot decode this file", encoding.label());
                    continue;
                };
                if let Some((table, skipped_lines)) = parse_table(text, delimiter) {
                    debug!(
                        "Parsed {} rows x {} columns, {} over-long lines skipped (delimiter '{}', encoding {})",
                        table.row_count(),
                        table.column_count(),
                        skipped_lines,
                        delimiter_label(delimiter),
                        encoding.label()
                    );
                    return Some(ReadOutcome {
                        table,
                        delimiter,
                        encoding,
                        skipped_lines,
                    });
                }
            }
        }
        None
    }
}

/// Detect delimiter from a content sample (comma, semicolon, tab, pipe).
///
/// Scores each candidate by how often and how consistently it appears per
/// line. When `truncated` is set the last (partial) line is ignored.
pub fn detect_delimiter(sample: &str, truncated: bool) -> u8 {
    let mut lines: Vec<&str> = sample.lines().filter(|l| !l.trim().is_empty()).collect();
    if truncated && lines.len() > 1 {
        lines.pop();
    }
    lines.truncate(10);

    let mut best_delimiter = b',';
    let mut best_score = 0.0f32;

    if lines.is_empty() {
        return best_delimiter;
    }

    for &delimiter in CANDIDATE_DELIMITERS {
        let field_counts: Vec<usize> = lines
            .iter()
            .map(|line| line.bytes().filter(|&b| b == delimiter).count())
            .collect();

        let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
        let variance = field_counts
            .iter()
            .map(|&x| (x as f32 - avg).powi(2))
            .sum::<f32>()
            / field_counts.len() as f32;

        let score = avg / (1.0 + variance.sqrt());
        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}

/// Parse with a fixed delimiter; `None` unless there is at least one data
/// row and more than one column.
fn parse_table(text: &str, delimiter: u8) -> Option<(Table, usize)> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::None)
        .flexible(true) // Allow rows with different lengths
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers().ok()?.iter().map(str::to_string).collect();
    let width = headers.len();
    if width <= 1 {
        return None;
    }

    let mut rows = Vec::new();
    let mut skipped = 0;
    for result in reader.records() {
        match result {
            Ok(record) if record.len() <= width => {
                rows.push(record.iter().map(str::to_string).collect());
            }
            Ok(_) | Err(_) => skipped += 1,
        }
    }

    if rows.is_empty() {
        return None;
    }
    Some((Table::new(headers, rows), skipped))
}
