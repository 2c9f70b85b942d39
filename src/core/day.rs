//! Append-only day records.
//!
//! Each retained message becomes one line in `by_day/<day>.raw`:
//!
//! ```text
//! 1700000000\t[2023-11-14 22:13:20] user: hello world
//! ```
//!
//! The day file is opened in append mode for every message and closed right
//! after the write, so no handle outlives a single message. Re-running over
//! the same input appends duplicates; clear `by_day/` first for a fresh run.

use std::fs::OpenOptions;
use std::io::Write;

use tracing::trace;

use super::clock::Clock;
use super::layout::OutputLayout;
use crate::error::Result;
use crate::{Conversation, Message};

/// Renders the day-record line for `msg`, including the trailing newline.
///
/// ```
/// use chatfold::core::clock::Clock;
/// use chatfold::core::day::render_day_line;
/// use chatfold::Message;
///
/// let line = render_day_line(Clock::Utc, &Message::new("user", "a\nb", 1000));
/// assert_eq!(line, "1000\t[1970-01-01 00:16:40] user: a b\n");
/// ```
pub fn render_day_line(clock: Clock, msg: &Message) -> String {
    format!(
        "{}\t[{}] {}: {}\n",
        msg.ts,
        clock.render(msg.ts),
        msg.role,
        msg.single_line_content()
    )
}

/// Writes normalized messages into per-day record files.
#[derive(Debug, Clone)]
pub struct DayWriter {
    layout: OutputLayout,
    clock: Clock,
}

impl DayWriter {
    /// Creates a writer and its `by_day/` directory.
    pub fn new(layout: OutputLayout, clock: Clock) -> Result<Self> {
        OutputLayout::ensure(&layout.day_dir())?;
        Ok(Self { layout, clock })
    }

    /// Appends one message to its day file.
    pub fn append(&self, msg: &Message) -> Result<()> {
        let day = self.clock.day_key(msg.ts);
        let path = self.layout.day_file(&day);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(render_day_line(self.clock, msg).as_bytes())?;
        trace!(day = %day, "day record appended");
        Ok(())
    }

    /// Appends every message of a conversation. Returns the number written.
    pub fn write_conversation(&self, conversation: &Conversation) -> Result<usize> {
        for msg in &conversation.messages {
            self.append(msg)?;
        }
        Ok(conversation.messages.len())
    }
}
