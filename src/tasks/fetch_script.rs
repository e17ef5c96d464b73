//! Task A1 — download a Python script and run it with an email argument.

use std::path::Path;

use serde_json::{json, Value};
use tokio::process::Command;
use tracing::info;

use super::{require_str, str_or};

/// Script fetched when the arguments don't name one.
pub const DEFAULT_SCRIPT_URL: &str =
    "https://raw.githubusercontent.com/sanand0/tools-in-data-science-public/tds-2025-01/project-1/datagen.py";

/// Args: `{ "email": "…", "script_url?": "…" }`
pub async fn run(root: &Path, args: Value) -> anyhow::Result<Value> {
    let email = require_str(&args, "email")?;
    let url = str_or(&args, "script_url", DEFAULT_SCRIPT_URL);

    let body = reqwest::get(url)
        .await
        .map_err(|e| anyhow::anyhow!("cannot fetch {url}: {e}"))?
        .error_for_status()?
        .text()
        .await?;

    tokio::fs::create_dir_all(root).await?;
    let script = root.join("datagen.py");
    tokio::fs::write(&script, &body).await?;

    let output = Command::new("python3")
        .arg(&script)
        .arg(email)
        .current_dir(root)
        .output()
        .await
        .map_err(|e| anyhow::anyhow!("cannot run python3: {e}"))?;

    if !output.status.success() {
        anyhow::bail!(
            "script exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    info!(%url, email, "setup script completed");
    Ok(json!({ "script": script.display().to_string(), "email": email }))
}
