//! Task A2 — format a markdown file in place with a pinned Prettier.

use std::path::Path;

use serde_json::{json, Value};
use tokio::process::Command;

use super::{require_str, resolve_path};

/// Args: `{ "prettier_version": "prettier@3.4.2", "filename": "data/format.md" }`
pub async fn run(root: &Path, args: Value) -> anyhow::Result<Value> {
    let version = require_str(&args, "prettier_version")?;
    let filename = require_str(&args, "filename")?;

    // Accept both "prettier@3.4.2" and a bare "3.4.2".
    let package = if version.starts_with("prettier@") {
        version.to_string()
    } else {
        format!("prettier@{version}")
    };

    let file = resolve_path(root, filename)?;
    if !file.is_file() {
        anyhow::bail!("no such file: {}", file.display());
    }

    let output = Command::new("npx")
        .args(["--yes", &package, "--write"])
        .arg(&file)
        .output()
        .await
        .map_err(|e| anyhow::anyhow!("cannot run npx: {e}"))?;

    if !output.status.success() {
        anyhow::bail!(
            "prettier exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(json!({ "formatted": file.display().to_string(), "package": package }))
}
