//! Materializes topic documents from an annotated month file.
//!
//! Each `[TOPIC_START] <title>` marker opens a topic; its lines run until the
//! next marker or end of file. A topic is written to
//! `by_topic/<month>/<slug>.md` with a small front-matter block, then the
//! anchor index is regenerated from the directory contents.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use super::segment::TOPIC_START_MARKER;
use crate::core::layout::{ANCHOR_MAPPING_FILE, OutputLayout, sorted_file_names};
use crate::core::output::{AnchorEntry, write_anchor_mapping};
use crate::error::Result;

static SLUG_UNSAFE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^0-9A-Za-z\x{4e00}-\x{9fa5}_-]+").expect("slug pattern")
});

/// Collapses every run of characters outside ASCII letters, digits, CJK
/// ideographs, `_` and `-` into a single `_`.
///
/// ```
/// use chatfold::core::topics::slugify;
///
/// assert_eq!(slugify("2026-01-10 Topic-001"), "2026-01-10_Topic-001");
/// assert_eq!(slugify("周末 / 计划!!"), "周末_计划_");
/// ```
pub fn slugify(title: &str) -> String {
    SLUG_UNSAFE.replace_all(title, "_").into_owned()
}

/// Front-matter block for a topic document.
///
/// The date is the first ten characters of the title, or empty when the
/// title is shorter.
pub fn front_matter(title: &str) -> String {
    let date = match title.char_indices().nth(10) {
        Some((end, _)) => &title[..end],
        None if title.chars().count() == 10 => title,
        None => "",
    };
    format!("---\ntitle: {title}\ndate: {date}\n---\n\n")
}

/// One topic cut from an annotated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDocument {
    /// Marker text after `[TOPIC_START]`, trimmed.
    pub title: String,
    /// Body lines, in file order.
    pub lines: Vec<String>,
}

impl TopicDocument {
    /// File name under `by_topic/<month>/`.
    pub fn file_name(&self) -> String {
        format!("{}.md", slugify(&self.title))
    }

    /// Full document text: front matter followed by the body.
    pub fn render(&self) -> String {
        let mut out = front_matter(&self.title);
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Cuts annotated lines into topic documents.
///
/// Lines before the first titled marker belong to the first topic. A marker
/// with an empty title does not close anything: its lines join the next
/// titled topic.
pub fn split_annotated<S: AsRef<str>>(lines: &[S]) -> Vec<TopicDocument> {
    let mut documents = Vec::new();
    let mut current: Option<String> = None;
    let mut buffer: Vec<String> = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if line.starts_with(TOPIC_START_MARKER) {
            if let Some(title) = current.take() {
                documents.push(TopicDocument {
                    title,
                    lines: std::mem::take(&mut buffer),
                });
            }
            let title = line.replace(TOPIC_START_MARKER, "").trim().to_string();
            current = Some(title).filter(|t| !t.is_empty());
            continue;
        }
        buffer.push(line.to_string());
    }

    if let Some(title) = current {
        documents.push(TopicDocument { title, lines: buffer });
    }
    documents
}

/// Result of [`split_topics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSummary {
    /// Topic documents written by this run.
    pub topics: usize,
    /// Location of the anchor index.
    pub index: PathBuf,
}

/// Splits `topics_file` into documents under `by_topic/<month>/` and
/// rewrites the anchor index.
///
/// Topics whose slugs collide overwrite each other; the index lists every
/// `.md` file present in the directory afterwards.
pub fn split_topics(layout: &OutputLayout, month: &str, topics_file: &Path) -> Result<SplitSummary> {
    let dir = layout.topic_dir(month);
    OutputLayout::ensure(&dir)?;

    let content = fs::read_to_string(topics_file)?;
    let lines: Vec<&str> = content.lines().collect();
    let documents = split_annotated(&lines);

    for doc in &documents {
        let path = dir.join(doc.file_name());
        let mut writer = BufWriter::new(fs::File::create(&path)?);
        writer.write_all(doc.render().as_bytes())?;
        writer.flush()?;
        debug!(title = %doc.title, lines = doc.lines.len(), "topic written");
    }

    let entries: Vec<AnchorEntry> = sorted_file_names(&dir, "md")?
        .iter()
        .map(|name| AnchorEntry::new(month, name))
        .collect();
    let index = dir.join(ANCHOR_MAPPING_FILE);
    write_anchor_mapping(&entries, &index)?;

    info!(month, topics = documents.len(), "topics split");
    Ok(SplitSummary {
        topics: documents.len(),
        index,
    })
}
