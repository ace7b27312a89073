//! Loading and cleaning the raw review dump.
//!
//! The dump is parsed leniently: every `key: value` line is collected until
//! a blank line closes the record, whatever the key order. Cleaning then
//! drops duplicate and incomplete reviews and samples the rest down to a
//! working size.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::sample::sample_in_order;

// ── Constants ──────────────────────────────────────────────────────

/// Cap on cleaned reviews kept for grouping.
pub const DEFAULT_MAX_RECORDS: usize = 50_000;

/// Seed for every sampling step.
pub const DEFAULT_SEED: u64 = 42;

/// Placeholder the dump uses for unknown values.
const MISSING: &str = "N/A";

// ── Errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// ── Records ────────────────────────────────────────────────────────

/// One parsed review. Fields are `None` when the key was absent or the
/// value was `N/A`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewRecord {
    pub name: Option<String>,
    pub wine_id: Option<String>,
    pub variant: Option<String>,
    pub year: Option<String>,
    pub points: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub text: Option<String>,
}

impl ReviewRecord {
    fn from_fields(mut fields: BTreeMap<String, String>) -> Self {
        let mut take = |key: &str| fields.remove(key).filter(|v| v != MISSING);
        let time = take("review/time")
            .and_then(|secs| secs.parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        Self {
            name: take("wine/name"),
            wine_id: take("wine/wineId"),
            variant: take("wine/variant"),
            year: take("wine/year"),
            points: take("review/points"),
            time,
            user_id: take("review/userId"),
            user_name: take("review/userName"),
            text: take("review/text"),
        }
    }

    /// The fields kept for grouping, if all of them are present.
    fn into_clean(self) -> Option<CleanReview> {
        Some(CleanReview {
            points: self.points?.parse().ok()?,
            name: self.name?,
            variant: self.variant?,
            year: self.year?,
            text: self.text?,
        })
    }
}

/// A complete review, as written to the cleaned CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanReview {
    #[serde(rename = "wine_name")]
    pub name: String,
    #[serde(rename = "wine_variant")]
    pub variant: String,
    #[serde(rename = "wine_year")]
    pub year: String,
    #[serde(rename = "review_points")]
    pub points: u32,
    #[serde(rename = "review_text")]
    pub text: String,
}

// ── Parsing ────────────────────────────────────────────────────────

/// Parse dump text into records.
///
/// Lines are trimmed, a line without `:` is ignored, and values are
/// HTML-unescaped. A final record with no blank line after it is kept.
pub fn parse_records(text: &str) -> Vec<ReviewRecord> {
    let mut records = Vec::new();
    let mut current = BTreeMap::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                records.push(ReviewRecord::from_fields(std::mem::take(&mut current)));
            }
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            let value = html_escape::decode_html_entities(value.trim());
            current.insert(key.trim().to_string(), value.into_owned());
        }
    }
    if !current.is_empty() {
        records.push(ReviewRecord::from_fields(current));
    }

    records
}

/// Drop duplicates and incomplete reviews, then sample down to
/// `max_records`.
///
/// Duplicates share `(wine_id, user_id, time)`; the first one wins.
pub fn clean_records(
    records: Vec<ReviewRecord>,
    max_records: usize,
    seed: u64,
) -> Vec<CleanReview> {
    let total = records.len();

    let times = records.iter().filter_map(|r| r.time);
    if let (Some(first), Some(last)) = (times.clone().min(), times.max()) {
        info!("Review time range: {first} → {last}");
    }

    let mut seen = HashSet::new();
    let clean: Vec<CleanReview> = records
        .into_iter()
        .filter(|r| seen.insert((r.wine_id.clone(), r.user_id.clone(), r.time)))
        .filter_map(ReviewRecord::into_clean)
        .collect();
    debug!(
        "Kept {} of {total} records after dedup and missing-value filter",
        clean.len()
    );

    if clean.len() > max_records {
        info!("Sampling {max_records} of {} clean records", clean.len());
    }
    sample_in_order(clean, max_records, seed)
}

/// Read, parse, and clean a review dump.
///
/// Invalid UTF-8 sequences are dropped.
pub fn load_reviews(
    path: impl AsRef<Path>,
    max_records: usize,
    seed: u64,
) -> Result<Vec<CleanReview>, LoadError> {
    let path = path.as_ref();
    info!("Loading reviews from {}", path.display());

    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text: String = String::from_utf8_lossy(&bytes)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect();

    let records = parse_records(&text);
    info!("Total records collected: {}", records.len());

    let clean = clean_records(records, max_records, seed);
    info!("Clean reviews: {}", clean.len());
    Ok(clean)
}

// ── CSV ────────────────────────────────────────────────────────────

pub fn write_clean_csv(
    path: impl AsRef<Path>,
    reviews: &[CleanReview],
) -> Result<(), LoadError> {
    let path = path.as_ref();
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for review in reviews {
        writer.serialize(review).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Wrote {} clean reviews to {}", reviews.len(), path.display());
    Ok(())
}

pub fn read_clean_csv(path: impl AsRef<Path>) -> Result<Vec<CleanReview>, LoadError> {
    let path = path.as_ref();
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    reader
        .deserialize()
        .collect::<Result<Vec<CleanReview>, _>>()
        .map_err(csv_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "\
wine/name: 2005 Domaine A
wine/wineId: 1
wine/variant: Pinot Noir
wine/year: 2005
review/points: 91
review/time: 1200000000
review/userId: 10
review/userName: Ann
review/text: Cherry &amp; earth.

wine/name: 2005 Domaine A
wine/wineId: 1
wine/variant: Pinot Noir
wine/year: 2005
review/points: 93
review/time: 1200000000
review/userId: 10
review/userName: Ann
review/text: Same review posted twice.

wine/name: 2007 Bodega B
wine/wineId: 2
wine/variant: Tempranillo
wine/year: N/A
review/points: 85
review/time: 1300000000
review/userId: 11
review/userName: Bo
review/text: Vanilla.

wine/name: 2010 Castello C
wine/wineId: 3
wine/variant: Sangiovese
wine/year: 2010
review/points: 88
review/time: 1250000000
review/userId: 12
review/userName: Cy
review/text: Tart cherry, dusty: good.";

    #[test]
    fn parses_records_and_unescapes_values() {
        let records = parse_records(DUMP);
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].text.as_deref(), Some("Cherry & earth."));
        assert_eq!(records[0].time, DateTime::from_timestamp(1_200_000_000, 0));
        assert_eq!(records[2].year, None);
        // Value keeps everything after the first colon.
        assert_eq!(records[3].text.as_deref(), Some("Tart cherry, dusty: good."));
    }

    #[test]
    fn cleaning_drops_duplicates_and_missing_values() {
        let clean = clean_records(parse_records(DUMP), DEFAULT_MAX_RECORDS, DEFAULT_SEED);
        let names: Vec<&str> = clean.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["2005 Domaine A", "2010 Castello C"]);
        assert_eq!(clean[0].points, 91);
        assert_eq!(clean[0].text, "Cherry & earth.");
    }

    #[test]
    fn unparseable_points_drop_the_record() {
        let record = ReviewRecord {
            name: Some("n".into()),
            variant: Some("v".into()),
            year: Some("2001".into()),
            points: Some("ninety".into()),
            text: Some("t".into()),
            ..Default::default()
        };
        assert!(clean_records(vec![record], 10, DEFAULT_SEED).is_empty());
    }

    #[test]
    fn samples_down_to_max_records() {
        let records: Vec<ReviewRecord> = (0..20)
            .map(|i| ReviewRecord {
                name: Some(format!("wine {i}")),
                wine_id: Some(i.to_string()),
                variant: Some("Merlot".into()),
                year: Some("2000".into()),
                points: Some("90".into()),
                text: Some("ok".into()),
                ..Default::default()
            })
            .collect();
        let clean = clean_records(records, 5, DEFAULT_SEED);
        assert_eq!(clean.len(), 5);
    }

    #[test]
    fn lines_without_colon_are_ignored() {
        let records = parse_records("wine/name: A\ngarbage line\nreview/text: t\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("A"));
        assert_eq!(records[0].text.as_deref(), Some("t"));
    }
}
