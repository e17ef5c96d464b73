//! Task A7 — extract the sender's email address from a mail text file.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::{require_str, resolve_path, write_output};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email regex")
});

/// Args: `{ "filename": "data/email.txt", "output_file": "data/email-sender.txt" }`
pub async fn run(root: &Path, args: Value) -> anyhow::Result<Value> {
    let filename = require_str(&args, "filename")?;
    let output_file = require_str(&args, "output_file")?;

    let input = resolve_path(root, filename)?;
    let contents = tokio::fs::read_to_string(&input)
        .await
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", input.display()))?;

    let sender = extract_sender(&contents)
        .ok_or_else(|| anyhow::anyhow!("no email address found in {}", input.display()))?;

    let target = resolve_path(root, output_file)?;
    write_output(&target, &sender).await?;

    Ok(json!({ "sender": sender, "target": target.display().to_string() }))
}

/// Prefer the address on the `From:` header line; fall back to the
/// first address anywhere in the message.
fn extract_sender(contents: &str) -> Option<String> {
    for line in contents.lines() {
        if line.trim_start().to_ascii_lowercase().starts_with("from:") {
            if let Some(m) = EMAIL.find(line) {
                return Some(m.as_str().to_string());
            }
        }
    }
    EMAIL.find(contents).map(|m| m.as_str().to_string())
}
