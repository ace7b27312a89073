//! OpenRouter-backed [`SummarizationCapability`].
//!
//! Sends each chunk as a one-shot chat completion with temperature `0.0`
//! (greedy decoding), `max_tokens` set to the chunk's length budget, and the
//! minimum length stated in the system prompt. Transient HTTP failures are
//! retried per [`RetryConfig`].

use crate::api::retry::{RetryConfig, retry_with_backoff};
use crate::capability::{SummarizationCapability, SummaryFuture, SummaryRequest};
use crate::{ChatRequest, Message, OpenRouterClient};

/// Instruction prepended to every chunk.
pub const DEFAULT_INSTRUCTION: &str = "Summarize the following reviews for a group of wines.\n";

fn system_prompt(min_len: usize, max_len: usize) -> String {
    format!(
        "You write faithful, concise summaries of customer reviews.\n\
         - Write between {min_len} and {max_len} tokens.\n\
         - Only state what the reviews say. Do not invent details.\n\
         - Output the summary as plain prose with no preamble or headings."
    )
}

/// Summarizes chunks through the OpenRouter chat completions API.
pub struct OpenRouterSummarizer {
    client: OpenRouterClient,
    model: String,
    instruction: String,
    retry: RetryConfig,
    seed: Option<u64>,
}

impl OpenRouterSummarizer {
    pub fn new(client: OpenRouterClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            instruction: DEFAULT_INSTRUCTION.to_string(),
            retry: RetryConfig::default(),
            seed: None,
        }
    }

    /// Replace the instruction prepended to each chunk.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Fixed sampling seed, for providers that honor it.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the chat request for one chunk.
    pub fn build_request(&self, request: &SummaryRequest) -> ChatRequest {
        ChatRequest {
            model: Some(self.model.clone()),
            messages: vec![
                Message::system(system_prompt(request.min_len, request.max_len)),
                Message::user(format!("{}{}", self.instruction, request.text)),
            ],
            max_tokens: u32::try_from(request.max_len).unwrap_or(u32::MAX),
            temperature: Some(0.0),
            seed: self.seed,
        }
    }

    async fn complete(&self, body: &ChatRequest) -> Result<String, String> {
        let completion = self.client.chat(body).await?;
        let text = completion.content.unwrap_or_default();
        let text = text.trim();
        if text.is_empty() {
            return Err(format!(
                "empty completion (finish_reason: {})",
                completion.finish_reason.as_deref().unwrap_or("none")
            ));
        }
        Ok(text.to_string())
    }
}

impl SummarizationCapability for OpenRouterSummarizer {
    fn summarize(&self, request: &SummaryRequest) -> SummaryFuture<'_> {
        let body = self.build_request(request);
        Box::pin(async move { retry_with_backoff(&self.retry, || self.complete(&body)).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarizer() -> OpenRouterSummarizer {
        let client = OpenRouterClient::new("test-key").unwrap();
        OpenRouterSummarizer::new(client, "test/model")
    }

    #[test]
    fn request_is_greedy_and_bounded() {
        let req = SummaryRequest {
            text: "Lovely wine.".into(),
            min_len: 30,
            max_len: 64,
        };
        let body = summarizer().build_request(&req);
        assert_eq!(body.model.as_deref(), Some("test/model"));
        assert_eq!(body.max_tokens, 64);
        assert_eq!(body.temperature, Some(0.0));
        assert!(body.seed.is_none());
        assert!(body.messages[0].content.contains("between 30 and 64 tokens"));
        assert_eq!(
            body.messages[1].content,
            "Summarize the following reviews for a group of wines.\nLovely wine."
        );
    }

    #[test]
    fn custom_instruction_and_seed() {
        let req = SummaryRequest {
            text: "text".into(),
            min_len: 1,
            max_len: 2,
        };
        let body = summarizer()
            .with_instruction("Condense: ")
            .with_seed(42)
            .build_request(&req);
        assert_eq!(body.messages[1].content, "Condense: text");
        assert_eq!(body.seed, Some(42));
    }
}
