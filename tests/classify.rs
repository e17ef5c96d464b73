//! Completion-client behavior against a stub endpoint: selection
//! extraction, quota-only retry, fail-fast on everything else.

use std::time::Duration;

use promptd::client::CompletionClient;
use promptd::config::Config;
use promptd::DispatchError;
use serde_json::json;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

/// Client wired to the mock server with a tiny retry delay.
fn client_for(server: &MockServer) -> CompletionClient {
    let mut cfg = Config::with_endpoint("test-token", format!("{}/v1/chat/completions", server.uri()));
    cfg.retry_delay = Duration::from_millis(10);
    CompletionClient::new(&cfg)
}

/// A 200 response whose first choice carries one tool call.
fn selection_response(name: &str, arguments: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_test",
                    "type": "function",
                    "function": {
                        "name": name,
                        "arguments": arguments.to_string()
                    }
                }]
            },
            "finish_reason": "tool_calls"
        }]
    }))
}

#[tokio::test]
async fn classify_returns_the_stubbed_selection() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/v1/chat/completions"))
        .respond_with(selection_response(
            "A3",
            json!({ "filename": "data/dates.txt", "targetfile": "data/sunday-count.txt", "weekday": "Sunday" }),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let selection = client_for(&server)
        .classify("count sundays in data/dates.txt")
        .await
        .expect("classify should succeed");

    assert_eq!(selection.name, "A3");
    let args: serde_json::Value = serde_json::from_str(&selection.arguments).unwrap();
    assert_eq!(args["weekday"], "Sunday");
}

#[tokio::test]
async fn quota_errors_are_retried_until_success() {
    let server = MockServer::start().await;

    // Three quota failures, then success on the fourth request.
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "You exceeded your current quota" }
        })))
        .up_to_n_times(3)
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(matchers::method("POST"))
        .respond_with(selection_response("A4", json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let selection = client_for(&server)
        .classify("sort my contacts")
        .await
        .expect("classify should succeed after retries");
    assert_eq!(selection.name, "A4");
}

#[tokio::test]
async fn quota_retries_are_bounded() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "rate limit reached" }
        })))
        .expect(4) // initial attempt + 3 retries, then give up
        .mount(&server)
        .await;

    let err = client_for(&server)
        .classify("anything")
        .await
        .expect_err("retries must be bounded");
    assert!(err.is_quota(), "exhausted quota retry should surface the quota error");
}

#[tokio::test]
async fn non_quota_errors_fail_without_retry() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .classify("anything")
        .await
        .expect_err("auth failure should not be retried");
    match err {
        DispatchError::Transport(msg) => assert!(msg.contains("401"), "got: {msg}"),
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn response_without_tool_call_is_a_contract_violation() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": { "role": "assistant", "content": "Sorry, I can't." }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).classify("anything").await.unwrap_err();
    assert!(matches!(err, DispatchError::NoFunctionSelected));
}

#[tokio::test]
async fn legacy_function_call_field_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "function_call": { "name": "A7", "arguments": "{}" }
                }
            }]
        })))
        .mount(&server)
        .await;

    let selection = client_for(&server).classify("who sent this email").await.unwrap();
    assert_eq!(selection.name, "A7");
}
