//! API interaction layer for the bundled summarization capability.
//!
//! - [`summarizer`] — [`OpenRouterSummarizer`], a
//!   [`SummarizationCapability`](crate::capability::SummarizationCapability)
//!   backed by the [`OpenRouterClient`](crate::OpenRouterClient).
//! - [`retry`] — transient error detection (429, 5xx, network timeouts) with
//!   capped exponential backoff. Never retries 4xx client errors.

pub mod retry;
pub mod summarizer;

pub use retry::RetryConfig;
pub use summarizer::OpenRouterSummarizer;
