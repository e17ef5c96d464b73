//! Remote completion client.
//!
//! Sends one chat-completion request per incoming task with the full
//! function catalog attached (`tool_choice: "auto"`) and extracts the
//! model's selection. Transport failures that carry a quota signal are
//! retried a bounded number of times with a fixed delay; everything
//! else surfaces immediately.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::catalog;
use crate::config::Config;
use crate::error::DispatchError;

/// System message framing the classification request.
const SYSTEM_PROMPT: &str =
    "You are a function classifier that extracts structured parameters from queries.";

/// The function the model selected: name plus the raw argument payload.
///
/// `arguments` is kept as the opaque string the API returned; the
/// dispatcher owns deserialization and validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    pub name: String,
    pub arguments: String,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct CompletionClient {
    http: Client,
    endpoint: String,
    api_token: String,
    model: String,
    max_retries: usize,
    retry_delay: Duration,
}

impl CompletionClient {
    /// Build a client from an explicit configuration value.
    pub fn new(cfg: &Config) -> Self {
        Self {
            http: Client::builder()
                .timeout(cfg.request_timeout)
                .connect_timeout(cfg.connect_timeout)
                .build()
                .expect("failed to build HTTP client"),
            endpoint: cfg.endpoint.clone(),
            api_token: cfg.api_token.clone(),
            model: cfg.model.clone(),
            max_retries: cfg.max_retries,
            retry_delay: cfg.retry_delay,
        }
    }

    /// Classify a prompt into a catalog function selection.
    ///
    /// Retries quota failures up to `max_retries` times after the first
    /// attempt, sleeping `retry_delay` between attempts. Non-quota
    /// failures are returned immediately.
    pub async fn classify(&self, prompt: &str) -> Result<Selection, DispatchError> {
        let mut attempt = 0;
        loop {
            match self.request_selection(prompt).await {
                Ok(selection) => {
                    debug!(task = %selection.name, "model selected function");
                    return Ok(selection);
                }
                Err(e) if e.is_quota() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = self.max_retries,
                        error = %e,
                        "quota error from completion endpoint, retrying"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One request/response round trip, no retry.
    async fn request_selection(&self, prompt: &str) -> Result<Selection, DispatchError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "tools": catalog::tool_defs(),
            "tool_choice": "auto",
        });

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(DispatchError::Transport(format!(
                "completion endpoint returned {status}: {text}"
            )));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| DispatchError::Transport(format!("invalid response body: {e}")))?;

        parse_selection(&json).ok_or(DispatchError::NoFunctionSelected)
    }
}

/// Extract the first tool call of the first choice from an OpenAI-style
/// chat completion response.
///
/// Falls back to the legacy `function_call` field. Returns `None` when
/// the response contains no function selection at all.
pub fn parse_selection(json: &Value) -> Option<Selection> {
    let message = json.get("choices")?.get(0)?.get("message")?;

    if let Some(tc) = message
        .get("tool_calls")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
    {
        let func = tc.get("function")?;
        let name = func.get("name")?.as_str()?.to_string();
        let arguments = func
            .get("arguments")
            .and_then(Value::as_str)
            .unwrap_or("{}")
            .to_string();
        return Some(Selection { name, arguments });
    }

    // Legacy single-function field.
    if let Some(fc) = message.get("function_call").and_then(|v| v.as_object()) {
        let name = fc.get("name").and_then(Value::as_str)?.to_string();
        let arguments = fc
            .get("arguments")
            .and_then(Value::as_str)
            .unwrap_or("{}")
            .to_string();
        return Some(Selection { name, arguments });
    }

    None
}
