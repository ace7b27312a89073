//! Run configuration with working defaults.
//!
//! [`CellarConfig`] carries everything one `sommelier run` needs and builds
//! the OpenRouter-backed capability via
//! [`build_summarizer`](CellarConfig::build_summarizer).

use std::path::PathBuf;

use sommelier::DEFAULT_MODEL;
use sommelier::OpenRouterClient;
use sommelier::api::{OpenRouterSummarizer, RetryConfig};
use sommelier::config::SummarizerConfig;

use crate::group::{DEFAULT_MIN_REVIEWS, DEFAULT_SAMPLE_GROUPS};
use crate::load::{DEFAULT_MAX_RECORDS, DEFAULT_SEED};

/// Configuration for one batch run.
#[derive(Debug, Clone)]
pub struct CellarConfig {
    /// Raw review dump. Default: `"data/cellartracker.txt"`.
    pub input: PathBuf,
    /// Cleaned CSV, written then reloaded. Default: `"data/cleaned_wine_reviews.csv"`.
    pub cleaned: PathBuf,
    /// Per-group results. Default: `"data/wine_group_summaries.csv"`.
    pub output: PathBuf,
    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,
    /// Chunking, length, pass, and timeout settings for each group.
    pub summarizer: SummarizerConfig,
    /// Retries per capability call on transient HTTP errors. Default: `2`.
    pub retries: u32,
    /// Minimum reviews for a group to be eligible. Default: `5`.
    pub min_reviews: usize,
    /// Eligible groups summarized per run. Default: `5`.
    pub sample_groups: usize,
    /// Cap on clean reviews. Default: `50_000`.
    pub max_records: usize,
    /// Seed for record and group sampling, and the model seed. Default: `42`.
    pub seed: u64,
    /// Groups summarized at once. Default: `4`.
    pub concurrency: usize,
}

impl Default for CellarConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/cellartracker.txt"),
            cleaned: PathBuf::from("data/cleaned_wine_reviews.csv"),
            output: PathBuf::from("data/wine_group_summaries.csv"),
            model: DEFAULT_MODEL.to_string(),
            summarizer: SummarizerConfig::default(),
            retries: 2,
            min_reviews: DEFAULT_MIN_REVIEWS,
            sample_groups: DEFAULT_SAMPLE_GROUPS,
            max_records: DEFAULT_MAX_RECORDS,
            seed: DEFAULT_SEED,
            concurrency: 4,
        }
    }
}

impl CellarConfig {
    /// Build the summarization capability for this run.
    ///
    /// Greedy decoding is fixed by the adapter; the run seed is forwarded
    /// for providers that honor it.
    pub fn build_summarizer(&self, client: OpenRouterClient) -> OpenRouterSummarizer {
        OpenRouterSummarizer::new(client, &self.model)
            .with_retry(RetryConfig::with_retries(self.retries))
            .with_seed(self.seed)
    }
}
