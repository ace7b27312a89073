//! Wine review ingestion and batch summarization powered by sommelier.
//!
//! `sommelier-cellar` takes a CellarTracker-style review dump (9
//! `key: value` lines per review, records separated by blank lines),
//! cleans it, groups reviews by wine variant and rating band, and
//! summarizes each group with a [`sommelier::reduce::Reducer`].
//!
//! # Library usage
//!
//! ```ignore
//! use sommelier::prelude::*;
//! use sommelier_cellar::{CellarConfig, run_pipeline};
//!
//! let config = CellarConfig::default();
//! let client = OpenRouterClient::new(std::env::var("OPENROUTER_KEY")?)?;
//! let capability = config.build_summarizer(client);
//! let tokenizer = TiktokenTokenizer::cl100k()?;
//!
//! let report = run_pipeline(&config, &tokenizer, &capability).await?;
//! println!("{}", report.to_log_string());
//! ```
//!
//! # Binary
//!
//! ```sh
//! # Check the raw file before a long run
//! sommelier validate data/cellartracker.txt
//!
//! # Clean, group, and summarize five sample groups
//! sommelier run --input data/cellartracker.txt --output data/wine_group_summaries.csv
//! ```

pub mod bands;
pub mod config;
pub mod group;
pub mod load;
pub mod pipeline;
pub mod sample;
pub mod validate;

pub use bands::RatingBand;
pub use config::CellarConfig;
pub use group::{ReviewGroup, filter_min_reviews, group_reviews, sample_groups};
pub use load::{CleanReview, LoadError, ReviewRecord, load_reviews, read_clean_csv, write_clean_csv};
pub use pipeline::{
    GroupOutcome, PipelineError, RunReport, run_pipeline, summarize_groups, write_outcomes,
};
pub use validate::{FormatError, validate_file, validate_reviews};
