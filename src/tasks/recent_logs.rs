//! Task A5 — first line of the N most recently modified log files.

use std::path::Path;
use std::time::SystemTime;

use serde_json::{json, Value};

use super::{resolve_path, str_or, write_output};

/// Args: `{ "log_dir_path": "data/logs", "output_file_path": "data/logs-recent.txt", "num_files": 10 }`
pub async fn run(root: &Path, args: Value) -> anyhow::Result<Value> {
    let log_dir = str_or(&args, "log_dir_path", "data/logs");
    let output = str_or(&args, "output_file_path", "data/logs-recent.txt");
    let num_files = args
        .get("num_files")
        .and_then(Value::as_u64)
        .unwrap_or(10)
        .max(1) as usize;

    let dir = resolve_path(root, log_dir)?;
    let mut entries = tokio::fs::read_dir(&dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", dir.display()))?;

    let mut logs: Vec<(SystemTime, std::path::PathBuf)> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("log") {
            continue;
        }
        let modified = entry.metadata().await?.modified()?;
        logs.push((modified, path));
    }

    // Newest first.
    logs.sort_by(|a, b| b.0.cmp(&a.0));
    logs.truncate(num_files);

    let mut first_lines = Vec::with_capacity(logs.len());
    for (_, path) in &logs {
        let contents = tokio::fs::read_to_string(path).await?;
        first_lines.push(contents.lines().next().unwrap_or_default().to_string());
    }

    let target = resolve_path(root, output)?;
    write_output(&target, &(first_lines.join("\n") + "\n")).await?;

    Ok(json!({ "files": logs.len(), "target": target.display().to_string() }))
}
