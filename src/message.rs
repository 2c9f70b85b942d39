//! Normalized message and conversation types.
//!
//! Every archive record, whatever its original shape, is reduced to a
//! [`Message`]: a `{role, content, ts}` triple. A [`Conversation`] is the
//! linear transcript chosen for one archived conversation.
//!
//! # Examples
//!
//! ```
//! use chatfold::Message;
//!
//! let msg = Message::new("user", "Hello!", 1_700_000_000);
//! assert_eq!(msg.role(), "user");
//! assert!(msg.has_timestamp());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized chat message.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `role` | `String` | Author role (`user`, `assistant`, `system`, `tool`, ...) |
/// | `content` | `String` | Trimmed text, never empty once retained |
/// | `ts` | `i64` | Epoch seconds, `0` when unknown |
///
/// Messages are produced by [`normalize_message`](crate::parsing::normalize_message)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author role of the message.
    pub role: String,

    /// Text content, trimmed.
    ///
    /// May contain newlines; day records flatten them to spaces.
    pub content: String,

    /// Epoch seconds. `0` means the source carried no usable timestamp.
    #[serde(default)]
    pub ts: i64,
}

impl Message {
    /// Creates a new message.
    pub fn new(role: impl Into<String>, content: impl Into<String>, ts: i64) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            ts,
        }
    }

    /// Returns the role.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Returns the content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the epoch-seconds timestamp.
    pub fn ts(&self) -> i64 {
        self.ts
    }

    /// Returns `true` if the timestamp is known.
    pub fn has_timestamp(&self) -> bool {
        self.ts != 0
    }

    /// Returns the timestamp as a UTC datetime, if known and representable.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        if self.ts == 0 {
            return None;
        }
        DateTime::from_timestamp(self.ts, 0)
    }

    /// Returns the content with every line break replaced by a space.
    ///
    /// ```
    /// use chatfold::Message;
    ///
    /// let msg = Message::new("user", "a\nb\r\nc", 0);
    /// assert_eq!(msg.single_line_content(), "a b c");
    /// ```
    pub fn single_line_content(&self) -> String {
        self.content.replace("\r\n", " ").replace(['\n', '\r'], " ")
    }
}

/// One linearized conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation title, `"Conversation"` when the archive has none.
    pub title: String,

    /// Messages in transcript order.
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Title used when the archive carries none.
    pub const DEFAULT_TITLE: &'static str = "Conversation";

    /// Creates a conversation.
    pub fn new(title: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            title: title.into(),
            messages,
        }
    }

    /// Number of messages in the transcript.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
