//! Configuration types for the archive pipeline.
//!
//! Clean configuration structs for library usage, without any CLI framework
//! dependencies. Defaults are compile-time constants; a config is built once
//! per invocation and never mutated afterwards.
//!
//! - [`StreamingConfig`] - incremental array reader settings
//! - [`TopicConfig`] - topic boundary detection settings
//! - [`ArchiveConfig`] - everything the pipeline needs
//!
//! # Example
//!
//! ```rust
//! use chatfold::config::{ArchiveConfig, TopicConfig};
//!
//! let config = ArchiveConfig::new()
//!     .with_topics(TopicConfig::new().with_gap_hours(6));
//! assert_eq!(config.topics.gap_hours, 6);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::clock::Clock;

/// Bytes read per chunk by the incremental array reader (1 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Silence between two messages that starts a new topic.
pub const DEFAULT_GAP_HOURS: u32 = 4;

/// Phrases that announce a change of subject.
pub const DEFAULT_TOPIC_TRIGGERS: &[&str] = &[
    "对了",
    "话说回来",
    "顺便",
    "另外",
    "再说",
    "哦对",
    "换个话题",
    "题外话",
];

/// Configuration for the incremental JSON array reader.
///
/// # Example
///
/// ```rust
/// use chatfold::config::StreamingConfig;
///
/// let config = StreamingConfig::new().with_chunk_size(64 * 1024);
/// assert_eq!(config.chunk_size, 64 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Bytes appended to the buffer per read (default: 1 MiB).
    pub chunk_size: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl StreamingConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chunk size. Zero is clamped to one byte.
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }
}

/// Configuration for topic boundary detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Minimum gap between consecutive timestamps that opens a topic.
    pub gap_hours: u32,

    /// Substrings that open a topic on the line containing them.
    pub triggers: Vec<String>,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            gap_hours: DEFAULT_GAP_HOURS,
            triggers: DEFAULT_TOPIC_TRIGGERS
                .iter()
                .map(|t| (*t).to_string())
                .collect(),
        }
    }
}

impl TopicConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the gap threshold in hours.
    #[must_use]
    pub fn with_gap_hours(mut self, hours: u32) -> Self {
        self.gap_hours = hours;
        self
    }

    /// Replaces the trigger phrases. Empty phrases are ignored.
    #[must_use]
    pub fn with_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.triggers = triggers
            .into_iter()
            .map(Into::into)
            .filter(|t: &String| !t.is_empty())
            .collect();
        self
    }

    /// Gap threshold in seconds.
    pub fn gap_seconds(&self) -> i64 {
        i64::from(self.gap_hours) * 3600
    }
}

/// Configuration for a full archive run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Incremental reader settings.
    pub streaming: StreamingConfig,

    /// Topic detection settings.
    pub topics: TopicConfig,

    /// Time zone used for day keys and rendered timestamps.
    pub clock: Clock,
}

impl ArchiveConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the streaming configuration.
    #[must_use]
    pub fn with_streaming(mut self, streaming: StreamingConfig) -> Self {
        self.streaming = streaming;
        self
    }

    /// Sets the topic configuration.
    #[must_use]
    pub fn with_topics(mut self, topics: TopicConfig) -> Self {
        self.topics = topics;
        self
    }

    /// Sets the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_config_default() {
        assert_eq!(StreamingConfig::default().chunk_size, 1024 * 1024);
    }

    #[test]
    fn test_streaming_config_zero_chunk_clamped() {
        assert_eq!(StreamingConfig::new().with_chunk_size(0).chunk_size, 1);
    }

    #[test]
    fn test_topic_config_default() {
        let config = TopicConfig::default();
        assert_eq!(config.gap_hours, 4);
        assert_eq!(config.gap_seconds(), 4 * 3600);
        assert_eq!(config.triggers.len(), DEFAULT_TOPIC_TRIGGERS.len());
        assert!(config.triggers.iter().any(|t| t == "换个话题"));
    }

    #[test]
    fn test_topic_config_with_triggers_replaces_defaults() {
        let config = TopicConfig::new().with_triggers(["by the way", "", "anyway"]);
        assert_eq!(config.triggers, vec!["by the way", "anyway"]);
    }

    #[test]
    fn test_archive_config_builder() {
        let config = ArchiveConfig::new()
            .with_streaming(StreamingConfig::new().with_chunk_size(16))
            .with_topics(TopicConfig::new().with_gap_hours(1))
            .with_clock(Clock::Local);

        assert_eq!(config.streaming.chunk_size, 16);
        assert_eq!(config.topics.gap_hours, 1);
        assert_eq!(config.clock, Clock::Local);
    }

    #[test]
    fn test_config_serde() {
        let config = ArchiveConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"clock\":\"utc\""));
        let parsed: ArchiveConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
