//! Summarization capability boundary.
//!
//! The reducer does not know which model writes the summaries. It hands a
//! [`SummaryRequest`] to a [`SummarizationCapability`] and gets text back.
//! [`OpenRouterSummarizer`](crate::api::summarizer::OpenRouterSummarizer)
//! is the bundled implementation; tests use scripted doubles.

use std::future::Future;
use std::pin::Pin;

use crate::reduce::LengthBudget;

/// Boxed future returned by [`SummarizationCapability::summarize`].
pub type SummaryFuture<'a> = Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>;

/// One summarization call: text plus the length bounds for the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub text: String,
    pub min_len: usize,
    pub max_len: usize,
}

impl SummaryRequest {
    pub fn new(text: impl Into<String>, budget: LengthBudget) -> Self {
        Self {
            text: text.into(),
            min_len: budget.target_min,
            max_len: budget.target_max,
        }
    }
}

/// Maps `(text, min_len, max_len)` to one summary.
///
/// Implementations must be deterministic for a fixed request (greedy
/// decoding, no sampling) and safe for concurrent calls. Errors are plain
/// strings; the reducer attaches the pass and chunk.
///
/// # Example
///
/// ```ignore
/// struct FirstSentence;
///
/// impl SummarizationCapability for FirstSentence {
///     fn summarize(&self, request: &SummaryRequest) -> SummaryFuture<'_> {
///         let text = request.text.clone();
///         Box::pin(async move {
///             Ok(text.split('.').next().unwrap_or_default().to_string())
///         })
///     }
/// }
/// ```
pub trait SummarizationCapability: Send + Sync {
    fn summarize(&self, request: &SummaryRequest) -> SummaryFuture<'_>;
}
