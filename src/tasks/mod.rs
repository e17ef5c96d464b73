//! The ten concrete task handlers (A1–A10).
//!
//! Each handler is a plain async function taking the data root and the
//! validated JSON argument object, and returning a JSON result value.
//! Handlers never see raw model output — the dispatcher has already
//! checked required keys and patterns — but they still re-check their
//! own arguments so they can be called directly (e.g. from tests).

pub mod card_image;
pub mod count_weekday;
pub mod docs_index;
pub mod extract_sender;
pub mod fetch_script;
pub mod format_markdown;
pub mod recent_logs;
pub mod similar_comments;
pub mod sort_contacts;
pub mod ticket_sales;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::dispatch::HandlerRegistry;

/// Build the registry wiring every task code to its builtin handler.
pub fn registry() -> HandlerRegistry {
    let mut reg = HandlerRegistry::new();
    reg.register(
        "A1",
        Arc::new(|args, root| Box::pin(async move { fetch_script::run(&root, args).await })),
    );
    reg.register(
        "A2",
        Arc::new(|args, root| Box::pin(async move { format_markdown::run(&root, args).await })),
    );
    reg.register(
        "A3",
        Arc::new(|args, root| Box::pin(async move { count_weekday::run(&root, args).await })),
    );
    reg.register(
        "A4",
        Arc::new(|args, root| Box::pin(async move { sort_contacts::run(&root, args).await })),
    );
    reg.register(
        "A5",
        Arc::new(|args, root| Box::pin(async move { recent_logs::run(&root, args).await })),
    );
    reg.register(
        "A6",
        Arc::new(|args, root| Box::pin(async move { docs_index::run(&root, args).await })),
    );
    reg.register(
        "A7",
        Arc::new(|args, root| Box::pin(async move { extract_sender::run(&root, args).await })),
    );
    reg.register(
        "A8",
        Arc::new(|args, root| Box::pin(async move { card_image::run(&root, args).await })),
    );
    reg.register(
        "A9",
        Arc::new(|args, root| Box::pin(async move { similar_comments::run(&root, args).await })),
    );
    reg.register(
        "A10",
        Arc::new(|args, root| Box::pin(async move { ticket_sales::run(&root, args).await })),
    );
    reg
}

/// Resolve a task-supplied path against the data root.
///
/// A leading slash is stripped (the model often echoes absolute-looking
/// paths like `/data/dates.txt`); `..` traversal is rejected so a
/// hostile payload cannot escape the root.
pub fn resolve_path(root: &Path, raw: &str) -> anyhow::Result<PathBuf> {
    let trimmed = raw.trim_start_matches('/');
    if trimmed.split('/').any(|part| part == "..") {
        anyhow::bail!("path traversal ('..') is not allowed: {raw}");
    }
    Ok(root.join(trimmed))
}

/// Write `contents` to `path`, creating parent directories as needed.
pub(crate) async fn write_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    Ok(())
}

/// Extract a required string argument.
pub(crate) fn require_str<'a>(args: &'a Value, key: &str) -> anyhow::Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("missing `{key}` argument"))
}

/// Extract an optional string argument with a default.
pub(crate) fn str_or<'a>(args: &'a Value, key: &str, default: &'a str) -> &'a str {
    args.get(key).and_then(Value::as_str).unwrap_or(default)
}
