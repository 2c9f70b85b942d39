//! Topic anchor index (CSV).

use std::io::Write;
use std::path::Path;

use crate::error::{ChatfoldError, Result};

/// One row of the anchor index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorEntry {
    /// Topic file name without the `.md` extension.
    pub anchor: String,
    /// Vault-relative path, always `/`-separated.
    pub path: String,
}

impl AnchorEntry {
    /// Builds the entry for `file_name` inside `by_topic/<month>/`.
    pub fn new(month: &str, file_name: &str) -> Self {
        let anchor = file_name.strip_suffix(".md").unwrap_or(file_name);
        Self {
            anchor: anchor.to_string(),
            path: format!("by_topic/{month}/{file_name}"),
        }
    }
}

/// Writes the anchor index to `path`.
///
/// # Format
/// - Delimiter: `,`
/// - Columns: `event_anchor`, `obsidian_path`
/// - Encoding: UTF-8
pub fn write_anchor_mapping(entries: &[AnchorEntry], path: &Path) -> Result<()> {
    let writer = csv::Writer::from_path(path)?;
    write_entries(writer, entries)?;
    Ok(())
}

/// Renders the anchor index as a string.
pub fn to_anchor_mapping(entries: &[AnchorEntry]) -> Result<String> {
    let bytes = write_entries(csv::Writer::from_writer(Vec::new()), entries)?;
    String::from_utf8(bytes).map_err(|e| ChatfoldError::invalid_format("anchor index", e.to_string()))
}

fn write_entries<W: Write>(mut writer: csv::Writer<W>, entries: &[AnchorEntry]) -> Result<W> {
    writer.write_record(["event_anchor", "obsidian_path"])?;
    for entry in entries {
        writer.write_record([&entry.anchor, &entry.path])?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| ChatfoldError::Io(e.into_error()))
}
