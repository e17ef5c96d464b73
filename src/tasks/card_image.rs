//! Task A8 — render the card number from a credit-card text file as an
//! SVG image.
//!
//! The stack carries no raster codec, so the "image representation" is
//! an SVG document written to the requested path.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use super::{require_str, resolve_path, write_output};

static CARD_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:\d[ -]?){13,16}\b").expect("card number regex"));

/// Args: `{ "filename": "data/credit-card.txt", "image_path": "data/credit-card.svg" }`
pub async fn run(root: &Path, args: Value) -> anyhow::Result<Value> {
    let filename = require_str(&args, "filename")?;
    let image_path = require_str(&args, "image_path")?;

    let input = resolve_path(root, filename)?;
    let contents = tokio::fs::read_to_string(&input)
        .await
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", input.display()))?;

    let digits = extract_card_number(&contents)
        .ok_or_else(|| anyhow::anyhow!("no card number found in {}", input.display()))?;

    let target = resolve_path(root, image_path)?;
    write_output(&target, &render_svg(&digits)).await?;

    Ok(json!({ "digits": digits.len(), "target": target.display().to_string() }))
}

/// First 13–16 digit run (spaces/dashes between groups tolerated),
/// normalized to bare digits.
fn extract_card_number(contents: &str) -> Option<String> {
    CARD_NUMBER
        .find(contents)
        .map(|m| m.as_str().chars().filter(|c| c.is_ascii_digit()).collect())
}

fn render_svg(digits: &str) -> String {
    // Space the digits in groups of four, like a physical card.
    let grouped = digits
        .as_bytes()
        .chunks(4)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="640" height="400" viewBox="0 0 640 400">
  <rect width="640" height="400" rx="24" fill="#1f2a44"/>
  <rect x="48" y="96" width="96" height="72" rx="8" fill="#d4af37"/>
  <text x="48" y="248" font-family="monospace" font-size="44" fill="#ffffff" letter-spacing="4">{grouped}</text>
</svg>
"##
    )
}
