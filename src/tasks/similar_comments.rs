//! Task A9 — find the most similar pair of comment lines.
//!
//! Similarity is the Dice coefficient over character bigrams, computed
//! pairwise across all non-empty lines.

use std::collections::HashSet;
use std::path::Path;

use serde_json::{json, Value};

use super::{require_str, resolve_path, write_output};

/// Args: `{ "filename": "data/comments.txt", "output_filename": "data/comments-similar.txt" }`
pub async fn run(root: &Path, args: Value) -> anyhow::Result<Value> {
    let filename = require_str(&args, "filename")?;
    let output_filename = require_str(&args, "output_filename")?;

    let input = resolve_path(root, filename)?;
    let contents = tokio::fs::read_to_string(&input)
        .await
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", input.display()))?;

    let comments: Vec<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if comments.len() < 2 {
        anyhow::bail!(
            "need at least two comments to compare, found {}",
            comments.len()
        );
    }

    let grams: Vec<HashSet<[char; 2]>> = comments.iter().map(|c| bigrams(c)).collect();
    let mut best = (0, 1, similarity(&grams[0], &grams[1]));
    for i in 0..comments.len() {
        for j in (i + 1)..comments.len() {
            let score = similarity(&grams[i], &grams[j]);
            if score > best.2 {
                best = (i, j, score);
            }
        }
    }

    let target = resolve_path(root, output_filename)?;
    write_output(&target, &format!("{}\n{}\n", comments[best.0], comments[best.1])).await?;

    Ok(json!({
        "score": best.2,
        "target": target.display().to_string(),
    }))
}

fn bigrams(text: &str) -> HashSet<[char; 2]> {
    let chars: Vec<char> = text.to_lowercase().chars().collect();
    chars.windows(2).map(|w| [w[0], w[1]]).collect()
}

/// Dice coefficient: 2·|A∩B| / (|A|+|B|), in [0, 1].
fn similarity(a: &HashSet<[char; 2]>, b: &HashSet<[char; 2]>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let shared = a.intersection(b).count();
    (2.0 * shared as f64) / ((a.len() + b.len()) as f64)
}
