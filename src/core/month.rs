//! Month documents built from day records.
//!
//! Day files are visited in file-name order. Each day's lines are stably
//! sorted by their leading timestamp, the timestamp column is dropped and a
//! per-month anchor is appended:
//!
//! ```text
//! [2026-01-10 09:00:00] user: hello ^msg-000001
//! ```
//!
//! A month file is truncated the first time it is touched during a build, so
//! rebuilding re-derives every anchor from 1.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};

use tracing::{debug, info};

use super::clock::UNKNOWN_KEY;
use super::layout::{DAY_EXTENSION, OutputLayout, sorted_file_names};
use crate::error::Result;

/// Formats the anchor for the `n`th line of a month (1-based).
///
/// ```
/// assert_eq!(chatfold::core::month::anchor(7), "msg-000007");
/// ```
pub fn anchor(n: usize) -> String {
    format!("msg-{n:06}")
}

/// Month bucket of a day key: its first seven characters, or `"unknown"`.
///
/// ```
/// use chatfold::core::month::month_key;
///
/// assert_eq!(month_key("2026-01-10"), "2026-01");
/// assert_eq!(month_key("unknown"), "unknown");
/// ```
pub fn month_key(day_key: &str) -> &str {
    if day_key == UNKNOWN_KEY {
        return UNKNOWN_KEY;
    }
    match day_key.char_indices().nth(7) {
        Some((end, _)) => &day_key[..end],
        None => day_key,
    }
}

/// Leading timestamp of a day-record line, `0` when unparseable.
fn sort_key(line: &str) -> i64 {
    let head = line.split('\t').next().unwrap_or_default().trim();
    head.parse::<i64>().ok().unwrap_or_else(|| {
        head.parse::<f64>()
            .ok()
            .filter(|t| t.is_finite())
            .map_or(0, |t| t.trunc() as i64)
    })
}

/// Merges every day record under `by_day/` into `by_month/<month>.md`.
///
/// Returns the number of anchored lines per month key.
pub fn build_month_files(layout: &OutputLayout) -> Result<BTreeMap<String, usize>> {
    let month_dir = layout.month_dir();
    OutputLayout::ensure(&month_dir)?;

    let day_dir = layout.day_dir();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for name in sorted_file_names(&day_dir, DAY_EXTENSION)? {
        let day = name.trim_end_matches(&format!(".{DAY_EXTENSION}")).to_string();
        let month = month_key(&day).to_string();

        let content = fs::read_to_string(day_dir.join(&name))?;
        let mut lines: Vec<&str> = content.lines().collect();
        lines.sort_by_key(|line| sort_key(line));

        let path = layout.month_file(&month);
        let file = if counts.contains_key(&month) {
            OpenOptions::new().append(true).open(&path)?
        } else {
            File::create(&path)?
        };
        let mut writer = BufWriter::new(file);
        let count = counts.entry(month).or_insert(0);

        for line in lines {
            let Some((_, rest)) = line.split_once('\t') else {
                continue;
            };
            *count += 1;
            writeln!(writer, "{} ^{}", rest.trim(), anchor(*count))?;
        }
        writer.flush()?;
        debug!(day = %day, "day merged into month");
    }

    info!(months = counts.len(), "month files built");
    Ok(counts)
}
