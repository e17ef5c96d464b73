//! Task A6 — index markdown documents by their first H1 title.
//!
//! Walks the docs directory recursively; the index maps each file's
//! path relative to the docs dir to its title. BTreeMap keeps the
//! output deterministic.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use super::{resolve_path, str_or, write_output};

/// Args: `{ "doc_dir_path": "data/docs", "output_file_path": "data/docs/index.json" }`
pub async fn run(root: &Path, args: Value) -> anyhow::Result<Value> {
    let doc_dir = str_or(&args, "doc_dir_path", "data/docs");
    let output = str_or(&args, "output_file_path", "data/docs/index.json");

    let dir = resolve_path(root, doc_dir)?;
    if !dir.is_dir() {
        anyhow::bail!("no such directory: {}", dir.display());
    }

    let mut index: BTreeMap<String, String> = BTreeMap::new();
    for file in markdown_files(&dir)? {
        let contents = tokio::fs::read_to_string(&file).await?;
        let title = contents
            .lines()
            .find_map(|line| line.strip_prefix("# "))
            .unwrap_or_default()
            .trim()
            .to_string();
        let rel = file
            .strip_prefix(&dir)
            .unwrap_or(&file)
            .to_string_lossy()
            .replace('\\', "/");
        index.insert(rel, title);
    }

    let target = resolve_path(root, output)?;
    write_output(&target, &serde_json::to_string_pretty(&index)?).await?;

    Ok(json!({ "documents": index.len(), "target": target.display().to_string() }))
}

/// Collect every `.md` file under `dir`, depth first.
fn markdown_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|e| e.to_str()) == Some("md") {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}
