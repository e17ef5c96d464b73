//! Task A3 — count occurrences of a weekday in a dates file.
//!
//! The dates file mixes formats (one date per line); unparseable lines
//! are skipped rather than failing the whole count.

use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde_json::{json, Value};

use super::{require_str, resolve_path, write_output};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%b-%Y", "%b %d, %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y/%m/%d %H:%M:%S"];

/// Args: `{ "filename": "data/dates.txt", "targetfile": "data/sunday-count.txt", "weekday": "Sunday" }`
pub async fn run(root: &Path, args: Value) -> anyhow::Result<Value> {
    let filename = require_str(&args, "filename")?;
    let targetfile = require_str(&args, "targetfile")?;
    let weekday_name = require_str(&args, "weekday")?;

    let weekday = weekday_from(weekday_name)
        .ok_or_else(|| anyhow::anyhow!("unrecognized weekday: {weekday_name}"))?;

    let input = resolve_path(root, filename)?;
    let contents = tokio::fs::read_to_string(&input)
        .await
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", input.display()))?;

    let count = contents
        .lines()
        .filter_map(|line| parse_date(line.trim()))
        .filter(|d| d.weekday() == weekday)
        .count();

    let target = resolve_path(root, targetfile)?;
    write_output(&target, &count.to_string()).await?;

    Ok(json!({ "count": count, "weekday": weekday_name, "target": target.display().to_string() }))
}

/// Match a weekday name (case-insensitive, substring tolerated so
/// "Sundays" still resolves).
fn weekday_from(name: &str) -> Option<Weekday> {
    let lower = name.to_lowercase();
    const DAYS: &[(&str, Weekday)] = &[
        ("monday", Weekday::Mon),
        ("tuesday", Weekday::Tue),
        ("wednesday", Weekday::Wed),
        ("thursday", Weekday::Thu),
        ("friday", Weekday::Fri),
        ("saturday", Weekday::Sat),
        ("sunday", Weekday::Sun),
    ];
    DAYS.iter()
        .find(|(day, _)| lower.contains(day))
        .map(|(_, w)| *w)
}

fn parse_date(line: &str) -> Option<NaiveDate> {
    if line.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(line, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(line, fmt) {
            return Some(dt.date());
        }
    }
    None
}
