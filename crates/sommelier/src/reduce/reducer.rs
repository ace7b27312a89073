//! Hierarchical reduction of one group's text to a single summary.
//!
//! Each pass tokenizes its input, splits it into windows, and summarizes
//! every window in order. If a pass yields more than one summary, the
//! summaries are joined and fed to the next pass. Summaries are bounded by
//! the caller's maximum length, so each pass shrinks the text until it fits
//! one window. `max_passes` turns a configuration that never converges into
//! an error instead of an endless loop.

use std::num::NonZeroUsize;

use tracing::warn;

use crate::capability::{SummarizationCapability, SummaryRequest};
use crate::config::SummarizerConfig;
use crate::error::{CapabilityFailure, ReduceError};
use crate::events::{EventHandler, NoopHandler, ReductionEvent};
use crate::reduce::budget::LengthBudget;
use crate::reduce::chunker::chunk_tokens;
use crate::tokenizer::Tokenizer;

/// A summary tagged with the pass that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    /// 1 for a direct per-chunk summary, 2+ for merge passes.
    pub pass: u32,
}

/// Reduces a list of texts to one summary.
///
/// The tokenizer and capability are borrowed, so one expensive instance can
/// serve many reductions, including concurrent ones.
///
/// # Example
///
/// ```ignore
/// let tokenizer = TiktokenTokenizer::cl100k()?;
/// let summarizer = OpenRouterSummarizer::new(client, "openai/gpt-4o-mini");
///
/// let summary = Reducer::new(&tokenizer, &summarizer, SummarizerConfig::default())
///     .with_event_handler(&LoggingHandler)
///     .reduce(&reviews)
///     .await?;
/// println!("{}", summary.text);
/// ```
pub struct Reducer<'a> {
    tokenizer: &'a dyn Tokenizer,
    capability: &'a dyn SummarizationCapability,
    config: SummarizerConfig,
    event_handler: &'a dyn EventHandler,
}

impl<'a> Reducer<'a> {
    pub fn new(
        tokenizer: &'a dyn Tokenizer,
        capability: &'a dyn SummarizationCapability,
        config: SummarizerConfig,
    ) -> Self {
        Self {
            tokenizer,
            capability,
            config,
            event_handler: &NoopHandler,
        }
    }

    pub fn with_event_handler(mut self, handler: &'a dyn EventHandler) -> Self {
        self.event_handler = handler;
        self
    }

    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    /// Reduce `texts`, joined in order, to one summary.
    ///
    /// Fails fast on an invalid configuration or an empty group, before any
    /// capability call. Any chunk failure fails the whole reduction; partial
    /// results are discarded.
    pub async fn reduce<S: AsRef<str>>(&self, texts: &[S]) -> Result<Summary, ReduceError> {
        let window = self.config.validate()?;

        if texts.iter().all(|t| t.as_ref().trim().is_empty()) {
            return Err(ReduceError::EmptyInput);
        }

        let mut text = texts
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(&self.config.separator);
        let mut pass = 1;

        loop {
            let mut summaries = self.run_pass(pass, &text, window).await?;

            if summaries.len() == 1
                && let Some(final_text) = summaries.pop()
            {
                self.event_handler.on_event(&ReductionEvent::Finished {
                    passes: pass,
                    summary: &final_text,
                });
                return Ok(Summary {
                    text: final_text,
                    pass,
                });
            }

            if pass >= self.config.max_passes {
                warn!(
                    "Reduction did not converge: {} summaries left after {pass} passes",
                    summaries.len()
                );
                return Err(ReduceError::PassLimitExceeded {
                    max_passes: self.config.max_passes,
                    chunks: summaries.len(),
                });
            }

            text = summaries.join(&self.config.separator);
            pass += 1;
        }
    }

    /// Tokenize, chunk, and summarize `text` once, in chunk order.
    async fn run_pass(
        &self,
        pass: u32,
        text: &str,
        window: NonZeroUsize,
    ) -> Result<Vec<String>, ReduceError> {
        let tokens = self
            .tokenizer
            .encode(text)
            .map_err(|source| ReduceError::Tokenization {
                pass,
                chunk: None,
                source,
            })?;
        if tokens.is_empty() {
            return Err(ReduceError::EmptyInput);
        }

        let chunks = chunk_tokens(&tokens, window);
        let total = chunks.len();
        self.event_handler.on_event(&ReductionEvent::PassStarted {
            pass,
            input_tokens: tokens.len(),
            chunks: total,
        });

        let mut summaries = Vec::with_capacity(total);
        for chunk in &chunks {
            let chunk_text =
                self.tokenizer
                    .decode(chunk.tokens)
                    .map_err(|source| ReduceError::Tokenization {
                        pass,
                        chunk: Some(chunk.ordinal),
                        source,
                    })?;

            let budget =
                LengthBudget::for_input(chunk.len(), self.config.min_len, self.config.max_len);
            self.event_handler.on_event(&ReductionEvent::ChunkSummarizing {
                pass,
                chunk: chunk.ordinal,
                chunks: total,
                input_tokens: chunk.len(),
                budget,
            });

            let request = SummaryRequest::new(chunk_text, budget);
            let summary = self.call(&request).await.map_err(|source| {
                warn!(
                    "Chunk {}/{total} of pass {pass} failed: {source}",
                    chunk.ordinal
                );
                ReduceError::Capability {
                    pass,
                    chunk: chunk.ordinal,
                    chunks: total,
                    source,
                }
            })?;

            self.event_handler.on_event(&ReductionEvent::ChunkSummarized {
                pass,
                chunk: chunk.ordinal,
                summary: &summary,
            });
            summaries.push(summary);
        }

        self.event_handler.on_event(&ReductionEvent::PassFinished {
            pass,
            summaries: summaries.len(),
        });
        Ok(summaries)
    }

    /// One capability call bounded by the configured timeout.
    async fn call(&self, request: &SummaryRequest) -> Result<String, CapabilityFailure> {
        let timeout = self.config.call_timeout;
        match tokio::time::timeout(timeout, self.capability.summarize(request)).await {
            Ok(Ok(summary)) => Ok(summary),
            Ok(Err(e)) => Err(CapabilityFailure::Failed(e)),
            Err(_) => Err(CapabilityFailure::TimedOut(timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::SummaryFuture;
    use crate::tokenizer::TokenizerError;
    use std::sync::Mutex;

    /// One token per whitespace-separated word; ids index into a shared
    /// vocabulary.
    #[derive(Default)]
    struct WordTokenizer {
        vocab: Mutex<Vec<String>>,
    }

    impl Tokenizer for WordTokenizer {
        fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
            let mut vocab = self.vocab.lock().unwrap();
            Ok(text
                .split_whitespace()
                .map(|w| match vocab.iter().position(|v| v == w) {
                    Some(i) => i as u32,
                    None => {
                        vocab.push(w.to_string());
                        (vocab.len() - 1) as u32
                    }
                })
                .collect())
        }

        fn decode(&self, tokens: &[u32]) -> Result<String, TokenizerError> {
            let vocab = self.vocab.lock().unwrap();
            let words: Vec<&str> = tokens
                .iter()
                .map(|&t| vocab[t as usize].as_str())
                .collect();
            Ok(words.join(" "))
        }

        fn name(&self) -> &str {
            "words"
        }
    }

    /// Returns the first `min_len` words and records each request.
    #[derive(Default)]
    struct Truncating {
        requests: Mutex<Vec<SummaryRequest>>,
    }

    impl SummarizationCapability for Truncating {
        fn summarize(&self, request: &SummaryRequest) -> SummaryFuture<'_> {
            self.requests.lock().unwrap().push(request.clone());
            let out: Vec<&str> = request.text.split_whitespace().take(request.min_len).collect();
            let out = out.join(" ");
            Box::pin(async move { Ok(out) })
        }
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[tokio::test]
    async fn single_chunk_returns_direct_result() {
        let tok = WordTokenizer::default();
        let cap = Truncating::default();
        let config = SummarizerConfig::default().with_length(3, 10);
        let summary = Reducer::new(&tok, &cap, config)
            .reduce(&["alpha beta gamma delta"])
            .await
            .unwrap();
        assert_eq!(summary.text, "alpha beta gamma");
        assert_eq!(summary.pass, 1);
        assert_eq!(cap.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn texts_are_joined_with_separator() {
        let tok = WordTokenizer::default();
        let cap = Truncating::default();
        let config = SummarizerConfig::default().with_length(10, 20);
        Reducer::new(&tok, &cap, config)
            .reduce(&["first review", "second review"])
            .await
            .unwrap();
        let requests = cap.requests.lock().unwrap();
        assert_eq!(requests[0].text, "first review second review");
    }

    #[tokio::test]
    async fn multi_chunk_input_merges_in_second_pass() {
        let tok = WordTokenizer::default();
        let cap = Truncating::default();
        let config = SummarizerConfig::default()
            .with_max_tokens_per_chunk(10)
            .with_length(2, 4);
        let summary = Reducer::new(&tok, &cap, config)
            .reduce(&[words(25)])
            .await
            .unwrap();

        // Pass 1: 10 + 10 + 5 tokens -> 3 summaries of 2 words.
        // Pass 2: 6 tokens -> 1 chunk.
        assert_eq!(summary.pass, 2);
        assert_eq!(summary.text, "w0 w1");
        let requests = cap.requests.lock().unwrap();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[3].text, "w0 w1 w10 w11 w20 w21");
    }

    #[tokio::test]
    async fn empty_group_makes_no_calls() {
        let tok = WordTokenizer::default();
        let cap = Truncating::default();
        let empty: [&str; 0] = [];
        let err = Reducer::new(&tok, &cap, SummarizerConfig::default())
            .reduce(&empty)
            .await
            .unwrap_err();
        assert!(matches!(err, ReduceError::EmptyInput));

        let err = Reducer::new(&tok, &cap, SummarizerConfig::default())
            .reduce(&["  ", ""])
            .await
            .unwrap_err();
        assert!(matches!(err, ReduceError::EmptyInput));
        assert!(cap.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_config_fails_before_any_call() {
        let tok = WordTokenizer::default();
        let cap = Truncating::default();
        let config = SummarizerConfig::default().with_length(50, 10);
        let err = Reducer::new(&tok, &cap, config)
            .reduce(&["some text"])
            .await
            .unwrap_err();
        assert!(matches!(err, ReduceError::InvalidConfig(_)));
        assert!(cap.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_converging_config_hits_pass_limit() {
        let tok = WordTokenizer::default();
        let cap = Truncating::default();
        // Each 2-token window keeps both tokens, so nothing ever shrinks.
        let config = SummarizerConfig::default()
            .with_max_tokens_per_chunk(2)
            .with_length(2, 2)
            .with_max_passes(3);
        let err = Reducer::new(&tok, &cap, config)
            .reduce(&[words(6)])
            .await
            .unwrap_err();
        match err {
            ReduceError::PassLimitExceeded { max_passes, chunks } => {
                assert_eq!(max_passes, 3);
                assert_eq!(chunks, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
