//! Archive parser with streaming and bulk modes.
//!
//! [`ArchiveParser::stream`] reads a top-level array incrementally. If the
//! incremental reader fails for any reason (most commonly because the
//! document is an object rather than an array) the stream switches to a bulk
//! parse of the whole file and applies the same conversation extraction.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatfold::parser::ArchiveParser;
//! use std::path::Path;
//!
//! let parser = ArchiveParser::new();
//! for conversation in parser.stream(Path::new("conversations.json"))? {
//!     let conversation = conversation?;
//!     println!("{}: {} messages", conversation.title, conversation.len());
//! }
//! # Ok::<(), chatfold::ChatfoldError>(())
//! ```

use std::collections::VecDeque;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::Conversation;
use crate::config::StreamingConfig;
use crate::error::{ChatfoldError, Result};
use crate::parsing::extract_conversations;
use crate::streaming::{JsonArrayStream, StreamingError};

/// Parser for conversation archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveParser {
    config: StreamingConfig,
}

impl ArchiveParser {
    /// Creates a parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom streaming configuration.
    pub fn with_config(config: StreamingConfig) -> Self {
        Self { config }
    }

    /// Returns the human-readable name of this parser.
    pub fn name(&self) -> &'static str {
        "Conversation archive"
    }

    /// Loads the whole file into memory and extracts every conversation.
    ///
    /// # Errors
    ///
    /// Returns [`ChatfoldError::Io`] if the file cannot be read and
    /// [`ChatfoldError::Parse`] if it is not valid JSON.
    pub fn parse(&self, path: &Path) -> Result<Vec<Conversation>> {
        let content = fs::read(path)?;
        let document: Value = serde_json::from_slice(&content)
            .map_err(|e| ChatfoldError::archive_parse(e, Some(path.to_path_buf())))?;
        Ok(extract_conversations(&document))
    }

    /// Extracts every conversation from an in-memory document.
    pub fn parse_str(&self, content: &str) -> Result<Vec<Conversation>> {
        let document: Value =
            serde_json::from_str(content).map_err(|e| ChatfoldError::archive_parse(e, None))?;
        Ok(extract_conversations(&document))
    }

    /// Streams conversations, falling back to a bulk parse on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ChatfoldError::Io`] if the file cannot be opened. Later
    /// failures are reported through the iterator.
    pub fn stream(&self, path: &Path) -> Result<ConversationStream> {
        let values = JsonArrayStream::open(path, self.config).map_err(|e| match e {
            StreamingError::Io(io) => ChatfoldError::Io(io),
            other => other.into(),
        })?;
        Ok(ConversationStream {
            path: path.to_path_buf(),
            parser: *self,
            source: Source::Streaming(values),
            pending: VecDeque::new(),
            delivered: 0,
            fell_back: false,
        })
    }
}

enum Source {
    Streaming(JsonArrayStream<File>),
    Bulk(std::vec::IntoIter<Conversation>),
    Done,
}

/// Iterator over the conversations of an archive.
///
/// Conversations are produced lazily while the incremental reader works. On
/// a reader failure the remaining conversations come from a bulk parse, which
/// skips the ones already delivered so nothing is produced twice.
pub struct ConversationStream {
    path: PathBuf,
    parser: ArchiveParser,
    source: Source,
    pending: VecDeque<Conversation>,
    delivered: usize,
    fell_back: bool,
}

impl ConversationStream {
    /// Returns `true` once the stream has switched to the bulk fallback.
    pub fn is_fallback(&self) -> bool {
        self.fell_back
    }

    /// Number of conversations produced so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    fn fall_back(&mut self, cause: &ChatfoldError) -> Result<()> {
        warn!(
            path = %self.path.display(),
            delivered = self.delivered,
            "streaming parse failed ({cause}), retrying with a bulk parse"
        );
        self.fell_back = true;
        let conversations = self.parser.parse(&self.path)?;
        let mut rest = conversations.into_iter();
        if self.delivered > 0 {
            rest.nth(self.delivered - 1);
        }
        self.source = Source::Bulk(rest);
        Ok(())
    }
}

impl Iterator for ConversationStream {
    type Item = Result<Conversation>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(conversation) = self.pending.pop_front() {
                self.delivered += 1;
                return Some(Ok(conversation));
            }

            match &mut self.source {
                Source::Done => return None,
                Source::Bulk(rest) => match rest.next() {
                    Some(conversation) => {
                        self.delivered += 1;
                        return Some(Ok(conversation));
                    }
                    None => self.source = Source::Done,
                },
                Source::Streaming(values) => match values.next() {
                    Some(Ok(value)) => self.pending.extend(extract_conversations(&value)),
                    None => {
                        debug!(values = values.values_yielded(), "archive stream finished");
                        self.source = Source::Done;
                    }
                    Some(Err(e)) => {
                        let cause = ChatfoldError::from(e);
                        if let Err(fatal) = self.fall_back(&cause) {
                            self.source = Source::Done;
                            return Some(Err(fatal));
                        }
                    }
                },
            }
        }
    }
}
