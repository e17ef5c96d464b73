//! HTTP surface.
//!
//! Serves:
//! - `GET  /ask?prompt=…`  — raw classification result (diagnostic)
//! - `POST /run?task=…`    — classify + dispatch; 200 on success, 400 on
//!   any dispatch-path failure with `{ "detail": … }`
//! - `GET  /read?path=…`   — file contents as plain text
//! - `GET  /health`        — liveness + version

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::dispatch::Dispatcher;
use crate::tasks;

static STARTUP_TIME: OnceLock<std::time::Instant> = OnceLock::new();

/// Shared state injected into axum handlers.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) dispatcher: Arc<Dispatcher>,
    pub(crate) data_root: PathBuf,
}

/// Handle returned by [`start_server`]: the task driving the server and
/// the address it actually bound (port 0 resolves here, for tests).
pub struct Server {
    pub handle: JoinHandle<()>,
    pub addr: SocketAddr,
}

/// Bind `addr` and start serving.
pub async fn start_server(
    addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
    data_root: PathBuf,
) -> std::io::Result<Server> {
    let _ = STARTUP_TIME.set(std::time::Instant::now());

    let state = AppState {
        dispatcher,
        data_root,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .route("/ask", get(ask_handler))
        .route("/run", post(run_handler))
        .route("/read", get(read_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("server error: {e}");
        }
    });

    info!(%bound_addr, "server started");

    Ok(Server {
        handle,
        addr: bound_addr,
    })
}

#[derive(Deserialize)]
struct AskQuery {
    prompt: String,
}

/// `GET /ask?prompt=…`
async fn ask_handler(
    State(state): State<AppState>,
    Query(q): Query<AskQuery>,
) -> impl IntoResponse {
    match state.dispatcher.classify(&q.prompt).await {
        Ok(selection) => (StatusCode::OK, Json(json!(selection))).into_response(),
        Err(e) => {
            warn!(error = %e, "classification failed");
            (StatusCode::BAD_REQUEST, Json(json!({ "detail": e.to_string() }))).into_response()
        }
    }
}

#[derive(Deserialize)]
struct RunQuery {
    task: String,
}

/// `POST /run?task=…`
///
/// The dispatch runs on its own spawned task so a client disconnect
/// stops the wait, not the work — handlers finish their file writes.
async fn run_handler(
    State(state): State<AppState>,
    Query(q): Query<RunQuery>,
) -> impl IntoResponse {
    let dispatcher = state.dispatcher.clone();
    let prompt = q.task.clone();
    let result = tokio::spawn(async move { dispatcher.dispatch(&prompt).await }).await;

    match result {
        Ok(Ok(outcome)) => {
            (StatusCode::OK, Json(json!({ "message": outcome.message }))).into_response()
        }
        Ok(Err(e)) => {
            warn!(task = %q.task, error = %e, "dispatch failed");
            (StatusCode::BAD_REQUEST, Json(json!({ "detail": e.to_string() }))).into_response()
        }
        Err(e) => {
            error!(task = %q.task, "dispatch task panicked: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "internal error" })),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
struct ReadQuery {
    path: String,
}

/// `GET /read?path=…`
///
/// The leading slash is stripped so `/data/x.txt` reads `data/x.txt`
/// under the data root. A missing file is 404, not a generic 500.
async fn read_handler(
    State(state): State<AppState>,
    Query(q): Query<ReadQuery>,
) -> impl IntoResponse {
    let path = match tasks::resolve_path(&state.data_root, &q.path) {
        Ok(p) => p,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "detail": e.to_string() })))
                .into_response();
        }
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(contents) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))],
            contents,
        )
            .into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "File not found" })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": e.to_string() })),
        )
            .into_response(),
    }
}

/// `GET /health`
async fn health_handler() -> impl IntoResponse {
    let uptime_secs = STARTUP_TIME
        .get()
        .map(|t| t.elapsed().as_secs())
        .unwrap_or(0);

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": uptime_secs,
    }))
}
