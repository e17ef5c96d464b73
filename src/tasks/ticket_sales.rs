//! Task A10 — run a read-only aggregate query against an SQLite
//! database and write the scalar result.

use std::path::Path;

use serde_json::{json, Value};

use super::{require_str, resolve_path, str_or, write_output};

/// Query used when the arguments don't supply one.
pub const DEFAULT_QUERY: &str = "SELECT SUM(units * price) FROM tickets WHERE type = 'Gold'";

/// Args: `{ "filename": "data/ticket-sales.db", "output_filename": "data/ticket-sales-gold.txt", "query?": "SELECT …" }`
pub async fn run(root: &Path, args: Value) -> anyhow::Result<Value> {
    let filename = require_str(&args, "filename")?;
    let output_filename = require_str(&args, "output_filename")?;
    let query = str_or(&args, "query", DEFAULT_QUERY).to_string();

    // The query string comes from model output; only reads are allowed.
    if !query.trim_start().to_ascii_lowercase().starts_with("select") {
        anyhow::bail!("only SELECT queries are allowed, got: {query}");
    }

    let db_path = resolve_path(root, filename)?;
    if !db_path.is_file() {
        anyhow::bail!("no such database: {}", db_path.display());
    }

    // rusqlite is blocking; keep it off the async runtime threads.
    let total: Option<f64> = tokio::task::spawn_blocking(move || -> anyhow::Result<Option<f64>> {
        let conn = rusqlite::Connection::open(&db_path)?;
        let value = conn.query_row(&query, [], |row| row.get::<_, Option<f64>>(0))?;
        Ok(value)
    })
    .await??;

    let total = total.unwrap_or(0.0);
    let rendered = if total.fract() == 0.0 {
        format!("{}", total as i64)
    } else {
        format!("{total}")
    };

    let target = resolve_path(root, output_filename)?;
    write_output(&target, &rendered).await?;

    Ok(json!({ "total": total, "target": target.display().to_string() }))
}
