//! Wine review summarizer powered by sommelier.
//!
//! Reads the API key from the `OPENROUTER_KEY` environment variable. Log
//! verbosity follows `RUST_LOG` (default `info`).
//!
//! # Examples
//!
//! ```sh
//! # Check the raw dump
//! sommelier validate data/cellartracker.txt
//!
//! # Full run with a tighter summary length
//! sommelier run --min-len 40 --max-len 120 --concurrency 2
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use sommelier::config::{
    DEFAULT_MAX_LEN, DEFAULT_MAX_PASSES, DEFAULT_MAX_TOKENS_PER_CHUNK, DEFAULT_MIN_LEN,
};
use sommelier::prelude::*;
use sommelier_cellar::group::{DEFAULT_MIN_REVIEWS, DEFAULT_SAMPLE_GROUPS};
use sommelier_cellar::load::{DEFAULT_MAX_RECORDS, DEFAULT_SEED};
use sommelier_cellar::validate::VALID_MESSAGE;
use sommelier_cellar::{CellarConfig, run_pipeline, validate_file};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Wine review summarizer powered by sommelier.
#[derive(Parser)]
#[command(name = "sommelier", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that a raw review dump is well formed.
    Validate {
        /// Raw review dump.
        file: PathBuf,
    },
    /// Clean, group, and summarize reviews.
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Raw review dump.
    #[arg(long, default_value = "data/cellartracker.txt")]
    input: PathBuf,

    /// Where the cleaned reviews are written.
    #[arg(long, default_value = "data/cleaned_wine_reviews.csv")]
    cleaned: PathBuf,

    /// Where the group summaries are written.
    #[arg(long, default_value = "data/wine_group_summaries.csv")]
    output: PathBuf,

    /// Model to use for summaries.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Largest token window per summarization call.
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS_PER_CHUNK)]
    max_tokens_per_chunk: usize,

    /// Minimum summary length in tokens.
    #[arg(long, default_value_t = DEFAULT_MIN_LEN)]
    min_len: usize,

    /// Maximum summary length in tokens.
    #[arg(long, default_value_t = DEFAULT_MAX_LEN)]
    max_len: usize,

    /// Give up on a group after this many passes.
    #[arg(long, default_value_t = DEFAULT_MAX_PASSES)]
    max_passes: u32,

    /// Timeout for one summarization call, in seconds.
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Retries per call on rate limits and server errors.
    #[arg(long, default_value_t = 2)]
    retries: u32,

    /// Minimum reviews for a group to be summarized.
    #[arg(long, default_value_t = DEFAULT_MIN_REVIEWS)]
    min_reviews: usize,

    /// Number of eligible groups to summarize.
    #[arg(long, default_value_t = DEFAULT_SAMPLE_GROUPS)]
    sample_groups: usize,

    /// Cap on clean reviews kept for grouping.
    #[arg(long, default_value_t = DEFAULT_MAX_RECORDS)]
    max_records: usize,

    /// Seed for sampling.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Groups summarized at once.
    #[arg(long, default_value_t = 4)]
    concurrency: usize,
}

impl From<RunArgs> for CellarConfig {
    fn from(args: RunArgs) -> Self {
        Self {
            input: args.input,
            cleaned: args.cleaned,
            output: args.output,
            model: args.model,
            summarizer: SummarizerConfig::default()
                .with_max_tokens_per_chunk(args.max_tokens_per_chunk)
                .with_length(args.min_len, args.max_len)
                .with_max_passes(args.max_passes)
                .with_call_timeout(Duration::from_secs(args.timeout_secs)),
            retries: args.retries,
            min_reviews: args.min_reviews,
            sample_groups: args.sample_groups,
            max_records: args.max_records,
            seed: args.seed,
            concurrency: args.concurrency,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Command::Validate { file } => match validate_file(&file) {
            Ok(records) => {
                println!("{VALID_MESSAGE} ({records} records)");
            }
            Err(e) => {
                println!("{e}");
                std::process::exit(1);
            }
        },
        Command::Run(args) => run(args.into()).await,
    }
}

async fn run(config: CellarConfig) {
    let api_key = match std::env::var("OPENROUTER_KEY") {
        Ok(key) => key,
        Err(_) => {
            eprintln!("Error: OPENROUTER_KEY environment variable is not set");
            std::process::exit(1);
        }
    };

    let client = match OpenRouterClient::with_headers(
        api_key,
        "https://crates.io/crates/sommelier",
        "sommelier",
    ) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: failed to create API client: {e}");
            std::process::exit(1);
        }
    };

    let tokenizer = match TiktokenTokenizer::cl100k() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let summarizer = config.build_summarizer(client);

    match run_pipeline(&config, &tokenizer, &summarizer).await {
        Ok(report) => info!("Done: {}", report.to_log_string()),
        Err(e) => {
            error!("Run failed: {e}");
            std::process::exit(1);
        }
    }
}
