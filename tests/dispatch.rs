//! Dispatcher contract tests: catalog lookup, argument validation,
//! handler invocation, and the Sunday-count end-to-end path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use promptd::client::{CompletionClient, Selection};
use promptd::config::Config;
use promptd::dispatch::{Dispatcher, HandlerRegistry, TaskHandler};
use promptd::{tasks, DispatchError};
use serde_json::json;
use tempfile::TempDir;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

/// Client pointing at a dead endpoint — for tests that drive
/// `run_selection` directly and must never touch the network.
fn offline_client() -> CompletionClient {
    CompletionClient::new(&Config::with_endpoint(
        "test-token",
        "http://127.0.0.1:1/v1/chat/completions",
    ))
}

fn selection(name: &str, arguments: serde_json::Value) -> Selection {
    Selection {
        name: name.to_string(),
        arguments: arguments.to_string(),
    }
}

/// Spy handler that counts invocations.
fn spy() -> (TaskHandler, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let handler: TaskHandler = Arc::new(move |_args, _root| {
        let counter = counter.clone();
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(json!({ "ok": true }))
        })
    });
    (handler, calls)
}

#[tokio::test]
async fn unknown_task_is_an_explicit_failure() {
    let ws = TempDir::new().unwrap();
    let dispatcher = Dispatcher::new(offline_client(), HandlerRegistry::new(), ws.path().into());

    let err = dispatcher
        .run_selection("do something", selection("B7", json!({})))
        .await
        .unwrap_err();
    match err {
        DispatchError::UnknownTask(name) => assert_eq!(name, "B7"),
        other => panic!("expected UnknownTask, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_parameter_never_reaches_the_handler() {
    let ws = TempDir::new().unwrap();
    let (handler, calls) = spy();
    let mut reg = HandlerRegistry::new();
    reg.register("A3", handler);
    let dispatcher = Dispatcher::new(offline_client(), reg, ws.path().into());

    let err = dispatcher
        .run_selection(
            "count sundays",
            selection(
                "A3",
                json!({ "filename": "data/dates.txt", "targetfile": "data/out.txt" }),
            ),
        )
        .await
        .unwrap_err();

    match err {
        DispatchError::MissingParameter { task, param } => {
            assert_eq!(task, "A3");
            assert_eq!(param, "weekday");
        }
        other => panic!("expected MissingParameter, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0, "handler must not run");
}

#[tokio::test]
async fn malformed_arguments_are_rejected() {
    let ws = TempDir::new().unwrap();
    let dispatcher = Dispatcher::new(offline_client(), HandlerRegistry::new(), ws.path().into());

    let err = dispatcher
        .run_selection(
            "sort contacts",
            Selection {
                name: "A4".into(),
                arguments: "not valid json {".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::MalformedArguments(_)));

    // A JSON scalar is equally malformed: the payload must be an object.
    let err = dispatcher
        .run_selection("sort contacts", selection("A4", json!(42)))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::MalformedArguments(_)));
}

#[tokio::test]
async fn pattern_violation_never_reaches_the_handler() {
    let ws = TempDir::new().unwrap();
    let (handler, calls) = spy();
    let mut reg = HandlerRegistry::new();
    reg.register("A3", handler);
    let dispatcher = Dispatcher::new(offline_client(), reg, ws.path().into());

    let err = dispatcher
        .run_selection(
            "count blursdays",
            selection(
                "A3",
                json!({
                    "filename": "data/dates.txt",
                    "targetfile": "data/out.txt",
                    "weekday": "Blursday"
                }),
            ),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::InvalidParameter { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn handler_failure_passes_its_message_through() {
    let ws = TempDir::new().unwrap();
    let mut reg = HandlerRegistry::new();
    reg.register(
        "A4",
        Arc::new(|_args, _root| Box::pin(async { anyhow::bail!("contacts file is corrupt") })),
    );
    let dispatcher = Dispatcher::new(offline_client(), reg, ws.path().into());

    let err = dispatcher
        .run_selection(
            "sort contacts",
            selection(
                "A4",
                json!({ "filename": "data/contacts.json", "targetfile": "data/sorted.json" }),
            ),
        )
        .await
        .unwrap_err();

    assert!(err.to_string().contains("contacts file is corrupt"), "got: {err}");
    assert!(matches!(err, DispatchError::Handler { .. }));
}

#[tokio::test]
async fn sunday_count_end_to_end() {
    // 2025-01-05 and 2025-01-12 are Sundays; the rest are not.
    let ws = TempDir::new().unwrap();
    std::fs::create_dir_all(ws.path().join("data")).unwrap();
    std::fs::write(
        ws.path().join("data/dates.txt"),
        "2025-01-05\n2025-01-06\n2025-01-12\n06-Jan-2025\nnot a date\n",
    )
    .unwrap();

    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "A3",
                            "arguments": json!({
                                "filename": "data/dates.txt",
                                "targetfile": "data/sunday-count.txt",
                                "weekday": "Sunday"
                            }).to_string()
                        }
                    }]
                }
            }]
        })))
        .mount(&server)
        .await;

    let mut cfg = Config::with_endpoint("test-token", format!("{}/v1/chat/completions", server.uri()));
    cfg.retry_delay = Duration::from_millis(10);
    let dispatcher = Dispatcher::new(
        CompletionClient::new(&cfg),
        tasks::registry(),
        ws.path().into(),
    );

    let prompt = "count how many Sundays are in data/dates.txt and write to data/sunday-count.txt";
    let outcome = dispatcher.dispatch(prompt).await.expect("dispatch should succeed");

    assert_eq!(outcome.task, "A3");
    assert_eq!(outcome.prompt, prompt);
    assert_eq!(outcome.message, format!("A3 Task '{prompt}' executed successfully"));

    let written = std::fs::read_to_string(ws.path().join("data/sunday-count.txt")).unwrap();
    assert_eq!(written, "2");
}
