//! Batch summarization of review groups and the end-to-end run.
//!
//! Groups are independent: each gets its own [`Reducer`], and up to
//! `concurrency` of them run at once against the shared tokenizer and
//! capability. A failed group is recorded with its error and does not stop
//! the others.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use serde::Serialize;
use sommelier::capability::SummarizationCapability;
use sommelier::config::SummarizerConfig;
use sommelier::error::ReduceError;
use sommelier::reduce::{Reducer, Summary};
use sommelier::tokenizer::Tokenizer;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::CellarConfig;
use crate::group::{ReviewGroup, filter_min_reviews, group_reviews, sample_groups};
use crate::load::{LoadError, load_reviews, read_clean_csv, write_clean_csv};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ReduceError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// One group and what its reduction produced.
#[derive(Debug)]
pub struct GroupOutcome {
    pub group: ReviewGroup,
    pub result: Result<Summary, ReduceError>,
}

/// Summarize every group, at most `concurrency` at a time.
///
/// Outcomes come back in the order of `groups`. A `concurrency` of 0 is
/// treated as 1.
pub async fn summarize_groups(
    groups: Vec<ReviewGroup>,
    tokenizer: &dyn Tokenizer,
    capability: &dyn SummarizationCapability,
    config: &SummarizerConfig,
    concurrency: usize,
) -> Vec<GroupOutcome> {
    futures::stream::iter(groups)
        .map(|group| {
            let reducer = Reducer::new(tokenizer, capability, config.clone());
            async move {
                let result = reducer.reduce(&group.texts).await;
                match &result {
                    Ok(summary) => info!(
                        "Summarized {} / {} ({} reviews) in {} pass(es)",
                        group.variant, group.band, group.review_count, summary.pass
                    ),
                    Err(e) => warn!(
                        "Failed to summarize {} / {} [{}]: {e}",
                        group.variant,
                        group.band,
                        e.kind()
                    ),
                }
                GroupOutcome { group, result }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

// ── Output ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct OutcomeRow<'a> {
    wine_variant: &'a str,
    rating_band: &'static str,
    avg_points: f64,
    wine_years: String,
    review_count: usize,
    summary: &'a str,
    error_kind: &'static str,
    error: String,
}

impl<'a> From<&'a GroupOutcome> for OutcomeRow<'a> {
    fn from(outcome: &'a GroupOutcome) -> Self {
        let group = &outcome.group;
        let (summary, error_kind, error) = match &outcome.result {
            Ok(summary) => (summary.text.as_str(), "", String::new()),
            Err(e) => ("", e.kind().as_str(), e.to_string()),
        };
        Self {
            wine_variant: &group.variant,
            rating_band: group.band.label(),
            avg_points: group.avg_points,
            wine_years: group.vintages.join(", "),
            review_count: group.review_count,
            summary,
            error_kind,
            error,
        }
    }
}

/// Write one CSV row per outcome.
pub fn write_outcomes(
    path: impl AsRef<Path>,
    outcomes: &[GroupOutcome],
) -> Result<(), PipelineError> {
    let path = path.as_ref();
    let output_err = |source| PipelineError::Output {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(output_err)?;
    for outcome in outcomes {
        writer
            .serialize(OutcomeRow::from(outcome))
            .map_err(output_err)?;
    }
    writer
        .flush()
        .map_err(|e| output_err(csv::Error::from(e)))?;
    Ok(())
}

// ── End-to-end run ─────────────────────────────────────────────────

/// Counts from one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub reviews: usize,
    pub groups: usize,
    pub eligible: usize,
    pub summarized: usize,
    pub failed: usize,
}

impl RunReport {
    /// Format as a short log-friendly string.
    pub fn to_log_string(&self) -> String {
        format!(
            "{} reviews, {} groups ({} eligible), {} summarized, {} failed",
            self.reviews, self.groups, self.eligible, self.summarized, self.failed
        )
    }
}

/// Load, clean, group, sample, summarize, and write the results.
///
/// The summarizer settings are validated before the dump is read.
pub async fn run_pipeline(
    config: &CellarConfig,
    tokenizer: &dyn Tokenizer,
    capability: &dyn SummarizationCapability,
) -> Result<RunReport, PipelineError> {
    config.summarizer.validate()?;

    let clean = load_reviews(&config.input, config.max_records, config.seed)?;
    write_clean_csv(&config.cleaned, &clean)?;
    let reviews = read_clean_csv(&config.cleaned)?;
    info!("Reloaded {} reviews from {}", reviews.len(), config.cleaned.display());

    let groups = group_reviews(&reviews);
    let group_count = groups.len();
    let eligible = filter_min_reviews(groups, config.min_reviews);
    let eligible_count = eligible.len();
    if eligible.is_empty() {
        warn!("No group has at least {} reviews", config.min_reviews);
    }

    let sampled = sample_groups(eligible, config.sample_groups, config.seed);
    info!(
        "Generating summaries for {} group(s) with {} ({})",
        sampled.len(),
        tokenizer.name(),
        config.model
    );
    let outcomes = summarize_groups(
        sampled,
        tokenizer,
        capability,
        &config.summarizer,
        config.concurrency,
    )
    .await;

    write_outcomes(&config.output, &outcomes)?;
    info!("Summaries saved to {}", config.output.display());

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    Ok(RunReport {
        reviews: reviews.len(),
        groups: group_count,
        eligible: eligible_count,
        summarized: outcomes.len() - failed,
        failed,
    })
}
