//! Format check for the raw review dump.
//!
//! Each record is exactly 9 `key: value` lines in a fixed key order,
//! followed by a blank line. The last record may omit its blank line.
//! Running this before [`load_reviews`](crate::load::load_reviews) turns
//! a silently misparsed file into a precise error.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Keys of one record, in file order.
pub const EXPECTED_KEYS: [&str; 9] = [
    "wine/name",
    "wine/wineId",
    "wine/variant",
    "wine/year",
    "review/points",
    "review/time",
    "review/userId",
    "review/userName",
    "review/text",
];

/// Lines per record, including the trailing blank line.
pub const RECORD_LINES: usize = EXPECTED_KEYS.len() + 1;

pub const VALID_MESSAGE: &str = "All records are valid and formatted correctly.";

/// Why a review dump failed validation. Record and line numbers are 1-based.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("File length ({lines}) is not aligned with 10-line blocks.")]
    Misaligned { lines: usize },
    #[error("Missing blank line after record {record}.")]
    MissingBlank { record: usize },
    #[error("Record {record}, line {line} expected key '{expected}' but found '{found}'")]
    UnexpectedKey {
        record: usize,
        line: usize,
        expected: &'static str,
        found: String,
    },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Validate review text and return the number of records.
pub fn validate_reviews(text: &str) -> Result<usize, FormatError> {
    let mut lines: Vec<&str> = text.lines().collect();

    // Last record without its trailing blank line.
    if (lines.len() + 1) % RECORD_LINES == 0 {
        lines.push("");
    }

    if lines.len() % RECORD_LINES != 0 {
        return Err(FormatError::Misaligned { lines: lines.len() });
    }

    let records = lines.len() / RECORD_LINES;
    for (index, block) in lines.chunks(RECORD_LINES).enumerate() {
        let record = index + 1;
        if record < records && !block[EXPECTED_KEYS.len()].is_empty() {
            return Err(FormatError::MissingBlank { record });
        }

        for (j, (&expected, line)) in EXPECTED_KEYS.iter().zip(block).enumerate() {
            let has_key = line
                .strip_prefix(expected)
                .is_some_and(|rest| rest.starts_with(':'));
            if !has_key {
                let found = line.split_once(':').map_or(*line, |(key, _)| key);
                return Err(FormatError::UnexpectedKey {
                    record,
                    line: j + 1,
                    expected,
                    found: found.to_string(),
                });
            }
        }
    }

    Ok(records)
}

/// Read `path` as Latin-1 and validate it.
///
/// Latin-1 maps every byte to one char, so a file with stray non-UTF-8
/// bytes can still be checked line by line.
pub fn validate_file(path: impl AsRef<Path>) -> Result<usize, FormatError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| FormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text: String = bytes.iter().map(|&b| char::from(b)).collect();
    validate_reviews(&text)
}
