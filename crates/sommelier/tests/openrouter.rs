//! The OpenRouter summarizer against a mock chat completions endpoint.

use std::time::Duration;

use serde_json::json;
use sommelier::prelude::*;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS: &str = "/api/v1/chat/completions";

fn completion(content: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 24, "total_tokens": 144 }
    })
}

fn summarizer(server: &MockServer, retries: u32) -> OpenRouterSummarizer {
    let client = OpenRouterClient::new("test-key")
        .unwrap()
        .with_url(format!("{}{COMPLETIONS}", server.uri()));
    OpenRouterSummarizer::new(client, "test/model").with_retry(RetryConfig {
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        ..RetryConfig::with_retries(retries)
    })
}

fn request() -> SummaryRequest {
    SummaryRequest {
        text: "Bright cherry, soft tannins. Great with pasta.".into(),
        min_len: 30,
        max_len: 64,
    }
}

#[tokio::test]
async fn sends_greedy_bounded_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "test/model",
            "max_tokens": 64,
            "temperature": 0.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("  Fruity and soft.  ")))
        .expect(1)
        .mount(&server)
        .await;

    let summary = summarizer(&server, 0).summarize(&request()).await.unwrap();
    assert_eq!(summary, "Fruity and soft.");
}

#[tokio::test]
async fn retries_service_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Recovered.")))
        .expect(1)
        .mount(&server)
        .await;

    let summary = summarizer(&server, 3).summarize(&request()).await.unwrap();
    assert_eq!(summary, "Recovered.");
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .expect(1)
        .mount(&server)
        .await;

    let err = summarizer(&server, 3)
        .summarize(&request())
        .await
        .unwrap_err();
    assert!(err.contains("HTTP 401"), "got: {err}");
    assert!(err.contains("invalid key"));
}

#[tokio::test]
async fn empty_completion_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "" }, "finish_reason": "length" }]
        })))
        .mount(&server)
        .await;

    let err = summarizer(&server, 0)
        .summarize(&request())
        .await
        .unwrap_err();
    assert_eq!(err, "empty completion (finish_reason: length)");
}

#[tokio::test]
async fn api_error_body_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "message": "model not found" }
        })))
        .mount(&server)
        .await;

    let err = summarizer(&server, 0)
        .summarize(&request())
        .await
        .unwrap_err();
    assert!(err.contains("model not found"));
}

#[tokio::test]
async fn reducer_drives_the_http_summarizer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "Ripe plum and oak; reviewers call it a good value.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let tokenizer = TiktokenTokenizer::cl100k().unwrap();
    let capability = summarizer(&server, 0);
    let reviews = [
        "Ripe plum, a little oak. Good value.",
        "Smooth finish, would buy again at this price.",
    ];

    let summary = Reducer::new(&tokenizer, &capability, SummarizerConfig::default())
        .reduce(&reviews)
        .await
        .unwrap();
    assert_eq!(summary.pass, 1);
    assert!(summary.text.starts_with("Ripe plum"));
}
