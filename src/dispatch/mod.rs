//! Dispatcher: classified selection → validated handler invocation.
//!
//! The dispatcher owns the contract between the untrusted model output
//! and the local handlers: the selected name must exist in the catalog,
//! the argument payload must deserialize to a JSON object, every
//! required parameter must be present, and every supplied value with a
//! declared pattern must match it. Only then is the handler invoked.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::catalog::{self, TaskDescriptor};
use crate::client::{CompletionClient, Selection};
use crate::error::DispatchError;

/// Async handler invoked with the validated argument object and the
/// data root all task file paths are resolved under.
pub type TaskHandler = Arc<
    dyn Fn(Value, PathBuf) -> Pin<Box<dyn Future<Output = anyhow::Result<Value>> + Send>>
        + Send
        + Sync,
>;

/// Table from task code to handler.
#[derive(Default)]
pub struct HandlerRegistry {
    entries: HashMap<String, TaskHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a task code. Last registration wins,
    /// which lets tests replace a builtin with a spy.
    pub fn register(&mut self, name: impl Into<String>, handler: TaskHandler) {
        self.entries.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<TaskHandler> {
        self.entries.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Successful dispatch: the task that ran and the response message.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DispatchOutcome {
    /// Task code that was executed (e.g. "A3").
    pub task: String,
    /// The original free-text prompt.
    pub prompt: String,
    /// Human-readable success message for the HTTP response.
    pub message: String,
}

/// Ties the completion client, catalog, and handler registry together.
pub struct Dispatcher {
    client: CompletionClient,
    registry: HandlerRegistry,
    data_root: PathBuf,
}

impl Dispatcher {
    pub fn new(client: CompletionClient, registry: HandlerRegistry, data_root: PathBuf) -> Self {
        Self {
            client,
            registry,
            data_root,
        }
    }

    /// Classify a prompt without dispatching (the `/ask` diagnostic path).
    pub async fn classify(&self, prompt: &str) -> Result<Selection, DispatchError> {
        self.client.classify(prompt).await
    }

    /// Classify a prompt and run the selected task end to end.
    pub async fn dispatch(&self, prompt: &str) -> Result<DispatchOutcome, DispatchError> {
        let selection = self.client.classify(prompt).await?;
        self.run_selection(prompt, selection).await
    }

    /// Validate a selection against the catalog and invoke its handler.
    pub async fn run_selection(
        &self,
        prompt: &str,
        selection: Selection,
    ) -> Result<DispatchOutcome, DispatchError> {
        let descriptor = catalog::descriptor(&selection.name)
            .ok_or_else(|| DispatchError::UnknownTask(selection.name.clone()))?;

        let args: Value = serde_json::from_str(&selection.arguments)
            .map_err(|e| DispatchError::MalformedArguments(e.to_string()))?;
        if !args.is_object() {
            return Err(DispatchError::MalformedArguments(format!(
                "expected a JSON object, got: {args}"
            )));
        }

        validate_args(descriptor, &args)?;

        let handler = self
            .registry
            .get(&selection.name)
            .ok_or_else(|| DispatchError::UnknownTask(selection.name.clone()))?;

        let result = handler(args, self.data_root.clone())
            .await
            .map_err(|e| DispatchError::Handler {
                task: selection.name.clone(),
                source: e,
            })?;

        info!(task = %selection.name, result = %result, "task executed");

        Ok(DispatchOutcome {
            task: selection.name.clone(),
            prompt: prompt.to_string(),
            message: format!("{} Task '{prompt}' executed successfully", selection.name),
        })
    }
}

/// Check the argument object against the descriptor's schema: required
/// keys must be present, declared patterns must match the string form
/// of the supplied value.
pub fn validate_args(descriptor: &TaskDescriptor, args: &Value) -> Result<(), DispatchError> {
    let map = args.as_object().ok_or_else(|| {
        DispatchError::MalformedArguments(format!("expected a JSON object, got: {args}"))
    })?;

    for param in descriptor.required() {
        if !map.contains_key(param) {
            return Err(DispatchError::MissingParameter {
                task: descriptor.name.to_string(),
                param: param.to_string(),
            });
        }
    }

    for (param, value) in map {
        if let Some(re) = catalog::pattern(descriptor.name, param) {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if !re.is_match(&text) {
                return Err(DispatchError::InvalidParameter {
                    task: descriptor.name.to_string(),
                    param: param.clone(),
                    value: text,
                });
            }
        }
    }

    Ok(())
}
