//! Output directory layout.
//!
//! ```text
//! <root>/
//! ├── by_day/<YYYY-MM-DD|unknown>.raw
//! ├── by_month/<YYYY-MM|unknown>.md
//! ├── by_month/<YYYY-MM|unknown>.topics.md
//! └── by_topic/<month>/<slug>.md
//!     └── event_anchor_mapping.csv
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension of day record files.
pub const DAY_EXTENSION: &str = "raw";

/// Suffix of annotated month files.
pub const PREVIEW_SUFFIX: &str = ".topics.md";

/// File name of the topic anchor index.
pub const ANCHOR_MAPPING_FILE: &str = "event_anchor_mapping.csv";

/// Paths under one output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Creates a layout rooted at `root`. Nothing is created on disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The output root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn day_dir(&self) -> PathBuf {
        self.root.join("by_day")
    }

    pub fn month_dir(&self) -> PathBuf {
        self.root.join("by_month")
    }

    pub fn topic_root(&self) -> PathBuf {
        self.root.join("by_topic")
    }

    /// Directory holding the topic documents of one month.
    pub fn topic_dir(&self, month: &str) -> PathBuf {
        self.topic_root().join(month)
    }

    pub fn day_file(&self, day_key: &str) -> PathBuf {
        self.day_dir().join(format!("{day_key}.{DAY_EXTENSION}"))
    }

    pub fn month_file(&self, month_key: &str) -> PathBuf {
        self.month_dir().join(format!("{month_key}.md"))
    }

    /// Annotated variant of a month file.
    pub fn preview_file(&self, month_key: &str) -> PathBuf {
        self.month_dir().join(format!("{month_key}{PREVIEW_SUFFIX}"))
    }

    /// Creates `dir` and its parents if missing.
    pub fn ensure(dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }
}

/// Returns `true` for an annotated month file name.
pub fn is_preview_name(name: &str) -> bool {
    name.ends_with(PREVIEW_SUFFIX)
}

/// Lists the file names in `dir` with the given extension, sorted.
///
/// A missing directory yields an empty list.
pub fn sorted_file_names(dir: &Path, extension: &str) -> io::Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if Path::new(&name).extension().is_some_and(|ext| ext == extension) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
