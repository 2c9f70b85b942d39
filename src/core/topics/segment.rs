//! Topic boundary detection over month documents.
//!
//! A line opens a new topic when:
//!
//! | Signal | Rule |
//! |--------|------|
//! | Start | line index 0, always |
//! | Gap | its bracketed time is at least `gap_hours` after the previous bracketed time |
//! | Trigger | it contains one of the trigger phrases |
//!
//! Annotation inserts `[TOPIC_START] <date> Topic-NNN` before every boundary.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::{debug, info};

use crate::config::TopicConfig;
use crate::core::clock::{RENDER_FORMAT, UNKNOWN_KEY};
use crate::core::layout::{OutputLayout, is_preview_name, sorted_file_names};
use crate::error::Result;

/// Prefix of a topic marker line.
pub const TOPIC_START_MARKER: &str = "[TOPIC_START]";

static BRACKET_STAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\]").expect("bracket timestamp pattern")
});

/// Parses the leading `[YYYY-MM-DD HH:MM:SS]` of a month line.
///
/// The value is a wall-clock reading with no zone attached.
pub fn bracket_time(line: &str) -> Option<NaiveDateTime> {
    let caps = BRACKET_STAMP.captures(line)?;
    NaiveDateTime::parse_from_str(&caps[1], RENDER_FORMAT).ok()
}

/// Formats a topic marker line.
///
/// ```
/// use chatfold::core::topics::topic_marker;
///
/// assert_eq!(topic_marker("2026-01-10", 2), "[TOPIC_START] 2026-01-10 Topic-002");
/// ```
pub fn topic_marker(date: &str, ordinal: usize) -> String {
    format!("{TOPIC_START_MARKER} {date} Topic-{ordinal:03}")
}

/// Boundary detector configured with a gap threshold and trigger phrases.
#[derive(Debug, Clone)]
pub struct TopicSegmenter {
    gap_seconds: i64,
    triggers: Vec<String>,
}

impl Default for TopicSegmenter {
    fn default() -> Self {
        Self::new(&TopicConfig::default())
    }
}

impl TopicSegmenter {
    pub fn new(config: &TopicConfig) -> Self {
        Self {
            gap_seconds: config.gap_seconds(),
            triggers: config.triggers.clone(),
        }
    }

    /// Returns the sorted, de-duplicated boundary indices of `lines`.
    ///
    /// Index 0 is always included for non-empty input. Lines without a bracketed time never
    /// trigger a gap and do not reset the previous time.
    pub fn detect_boundaries<S: AsRef<str>>(&self, lines: &[S]) -> Vec<usize> {
        let mut boundaries = Vec::new();
        let mut last: Option<i64> = None;

        for (i, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let ts = bracket_time(line).map(|t| t.and_utc().timestamp());

            let gap = matches!((last, ts), (Some(prev), Some(now)) if now - prev >= self.gap_seconds);
            let trigger = self.triggers.iter().any(|t| line.contains(t.as_str()));
            if i == 0 || gap || trigger {
                boundaries.push(i);
            }
            if ts.is_some() {
                last = ts;
            }
        }
        boundaries
    }

    /// Returns `lines` with a numbered marker before every boundary.
    ///
    /// ```
    /// use chatfold::core::topics::TopicSegmenter;
    ///
    /// let lines = ["[2026-01-10 09:00:00] user: hi ^msg-000001"];
    /// let annotated = TopicSegmenter::default().annotate(&lines);
    /// assert_eq!(annotated[0], "[TOPIC_START] 2026-01-10 Topic-001");
    /// assert_eq!(annotated[1], lines[0]);
    /// ```
    pub fn annotate<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        if lines.is_empty() {
            return Vec::new();
        }
        let boundaries = self.detect_boundaries(lines);
        let mut out = Vec::with_capacity(lines.len() + boundaries.len());
        let mut next = boundaries.iter().peekable();
        let mut ordinal = 0;

        for (i, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            if next.next_if(|&&b| b == i).is_some() {
                ordinal += 1;
                let date = bracket_time(line)
                    .map(|t| t.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| UNKNOWN_KEY.to_string());
                out.push(topic_marker(&date, ordinal));
            }
            out.push(line.to_string());
        }
        out
    }

    /// Writes `<month>.topics.md` next to every plain month file.
    ///
    /// Existing previews are overwritten and never used as input. Empty
    /// month files are skipped. Returns the topic count per month key.
    pub fn build_topic_previews(&self, layout: &OutputLayout) -> Result<BTreeMap<String, usize>> {
        let month_dir = layout.month_dir();
        let mut topics = BTreeMap::new();

        for name in sorted_file_names(&month_dir, "md")? {
            if is_preview_name(&name) {
                continue;
            }
            let content = fs::read_to_string(month_dir.join(&name))?;
            let lines: Vec<&str> = content.lines().collect();
            if lines.is_empty() {
                debug!(file = %name, "empty month file skipped");
                continue;
            }

            let month = name.trim_end_matches(".md");
            let annotated = self.annotate(&lines);
            let count = annotated.len() - lines.len();

            let mut writer = BufWriter::new(fs::File::create(layout.preview_file(month))?);
            for line in &annotated {
                writeln!(writer, "{line}")?;
            }
            writer.flush()?;

            debug!(month, topics = count, "topic preview written");
            topics.insert(month.to_string(), count);
        }

        info!(previews = topics.len(), "topic previews built");
        Ok(topics)
    }
}
