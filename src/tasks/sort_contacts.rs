//! Task A4 — sort a JSON contacts array by last name, then first name.

use std::path::Path;

use serde_json::{json, Value};

use super::{require_str, resolve_path, write_output};

/// Args: `{ "filename": "data/contacts.json", "targetfile": "data/contacts-sorted.json" }`
pub async fn run(root: &Path, args: Value) -> anyhow::Result<Value> {
    let filename = require_str(&args, "filename")?;
    let targetfile = require_str(&args, "targetfile")?;

    let input = resolve_path(root, filename)?;
    let contents = tokio::fs::read_to_string(&input)
        .await
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", input.display()))?;

    let mut contacts: Vec<Value> = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("{} is not a JSON array: {e}", input.display()))?;

    contacts.sort_by(|a, b| {
        let key = |v: &Value, field: &str| {
            v.get(field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        key(a, "last_name")
            .cmp(&key(b, "last_name"))
            .then_with(|| key(a, "first_name").cmp(&key(b, "first_name")))
    });

    let target = resolve_path(root, targetfile)?;
    write_output(&target, &serde_json::to_string(&contacts)?).await?;

    Ok(json!({ "sorted": contacts.len(), "target": target.display().to_string() }))
}
