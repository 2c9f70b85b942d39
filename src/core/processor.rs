//! Pipeline orchestration for the three operating modes.
//!
//! | Mode | Method | Reads | Writes |
//! |------|--------|-------|--------|
//! | full | [`Archive::run`] | archive JSON | `by_day/`, `by_month/` |
//! | topic preview | [`Archive::topic_preview`] | `by_month/*.md` | `by_month/*.topics.md` |
//! | split topics | [`Archive::split_topics`] | one `.topics.md` | `by_topic/<month>/` |

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::info;

use super::day::DayWriter;
use super::layout::OutputLayout;
use super::month::build_month_files;
use super::topics::{SplitSummary, TopicSegmenter, split_topics};
use crate::config::ArchiveConfig;
use crate::error::{ChatfoldError, Result};
use crate::parser::ArchiveParser;

/// Counters collected by a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    pub conversations: usize,
    pub messages: usize,
    /// Lines anchored per month key.
    pub months: BTreeMap<String, usize>,
    /// Topics detected per month key.
    pub previews: BTreeMap<String, usize>,
    /// Whether the bulk parse replaced the incremental reader.
    pub used_fallback: bool,
}

impl ProcessingStats {
    /// Total anchored lines across all months.
    pub fn anchored_lines(&self) -> usize {
        self.months.values().sum()
    }

    /// Total topics across all previews.
    pub fn topics(&self) -> usize {
        self.previews.values().sum()
    }
}

/// An output root plus the configuration used to fill it.
#[derive(Debug, Clone)]
pub struct Archive {
    layout: OutputLayout,
    config: ArchiveConfig,
}

impl Archive {
    pub fn new(out_root: impl Into<PathBuf>, config: ArchiveConfig) -> Self {
        Self {
            layout: OutputLayout::new(out_root),
            config,
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Parses `input` and appends every retained message to its day record.
    pub fn ingest(&self, input: &Path, stats: &mut ProcessingStats) -> Result<()> {
        let writer = DayWriter::new(self.layout.clone(), self.config.clock)?;
        let parser = ArchiveParser::with_config(self.config.streaming);

        let mut conversations = parser.stream(input)?;
        for conversation in conversations.by_ref() {
            let conversation = conversation?;
            stats.messages += writer.write_conversation(&conversation)?;
            stats.conversations += 1;
        }
        stats.used_fallback = conversations.is_fallback();

        info!(
            conversations = stats.conversations,
            messages = stats.messages,
            "day records written"
        );
        Ok(())
    }

    /// Full pipeline: day records, month files, then topic previews.
    pub fn run(&self, input: &Path) -> Result<ProcessingStats> {
        OutputLayout::ensure(self.layout.root())?;
        let mut stats = ProcessingStats::default();
        self.ingest(input, &mut stats)?;
        stats.months = build_month_files(&self.layout)?;
        stats.previews = self.topic_preview()?;
        Ok(stats)
    }

    /// Regenerates `.topics.md` previews from the existing month files.
    pub fn topic_preview(&self) -> Result<BTreeMap<String, usize>> {
        OutputLayout::ensure(self.layout.root())?;
        TopicSegmenter::new(&self.config.topics).build_topic_previews(&self.layout)
    }

    /// Splits one annotated month file into topic documents.
    ///
    /// Both inputs are required; a missing one is a usage error.
    pub fn split_topics(&self, month: Option<&str>, topics_file: Option<&Path>) -> Result<SplitSummary> {
        let (Some(month), Some(topics_file)) = (month, topics_file) else {
            return Err(ChatfoldError::usage(
                "split-topics requires --month and --topics-file",
            ));
        };
        split_topics(&self.layout, month, topics_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const ARCHIVE: &str = r#"[
        {"title": "A", "messages": [
            {"role": "user", "content": "hello", "create_time": 1000},
            {"role": "assistant", "content": "hi\nthere", "create_time": 1001}
        ]},
        {"title": "B", "messages": [
            {"role": "user", "content": "next day", "create_time": 90000}
        ]}
    ]"#;

    #[test]
    fn test_run_full_pipeline() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("conversations.json");
        fs::write(&input, ARCHIVE).unwrap();

        let archive = Archive::new(dir.path().join("out"), ArchiveConfig::default());
        let stats = archive.run(&input).unwrap();

        assert_eq!(stats.conversations, 2);
        assert_eq!(stats.messages, 3);
        assert_eq!(stats.anchored_lines(), 3);
        assert_eq!(stats.months.get("1970-01"), Some(&3));
        assert_eq!(stats.topics(), 2);
        assert!(!stats.used_fallback);

        let month = fs::read_to_string(archive.layout().month_file("1970-01")).unwrap();
        assert_eq!(
            month,
            "[1970-01-01 00:16:40] user: hello ^msg-000001\n\
             [1970-01-01 00:16:41] assistant: hi there ^msg-000002\n\
             [1970-01-02 01:00:00] user: next day ^msg-000003\n"
        );
        assert!(archive.layout().preview_file("1970-01").exists());
    }

    #[test]
    fn test_run_single_object_uses_fallback() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("one.json");
        fs::write(
            &input,
            r#"{"title": "Solo", "messages": [{"content": "x", "create_time": 1000}]}"#,
        )
        .unwrap();

        let stats = Archive::new(dir.path(), ArchiveConfig::default()).run(&input).unwrap();
        assert!(stats.used_fallback);
        assert_eq!(stats.messages, 1);
    }

    #[test]
    fn test_run_missing_input() {
        let dir = tempdir().unwrap();
        let err = Archive::new(dir.path(), ArchiveConfig::default())
            .run(&dir.path().join("missing.json"))
            .unwrap_err();
        assert!(!err.is_usage());
    }

    #[test]
    fn test_split_topics_requires_inputs() {
        let dir = tempdir().unwrap();
        let archive = Archive::new(dir.path(), ArchiveConfig::default());
        assert!(archive.split_topics(None, Some(Path::new("x"))).unwrap_err().is_usage());
        assert!(archive.split_topics(Some("2026-01"), None).unwrap_err().is_usage());
    }

    #[test]
    fn test_topic_preview_without_months() {
        let dir = tempdir().unwrap();
        let previews = Archive::new(dir.path(), ArchiveConfig::default())
            .topic_preview()
            .unwrap();
        assert!(previews.is_empty());
    }
}
