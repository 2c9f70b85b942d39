//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Stage`] - Operating modes
//!
//! # Using Stage in Libraries
//!
//! ```rust
//! use chatfold::cli::Stage;
//!
//! let stage: Stage = "topic-preview".parse().unwrap();
//! assert_eq!(stage, Stage::TopicPreview);
//! println!("Stage: {}", stage); // "topic-preview"
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{ArchiveConfig, DEFAULT_GAP_HOURS, StreamingConfig, TopicConfig};
use crate::core::Clock;

/// Fold a branching chat-export archive into day, month and topic
/// documents.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatfold")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatfold --input conversations.json --out vault
    chatfold --out vault --stage topic-preview --gap-hours 6
    chatfold --out vault --stage split-topics --month 2026-01 \\
             --topics-file vault/by_month/2026-01.topics.md")]
pub struct Args {
    /// Path to the conversation archive (required for the month stage)
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output root folder
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,

    /// Stage to run
    #[arg(long, value_enum, default_value_t = Stage::Month)]
    pub stage: Stage,

    /// Month key for split-topics, e.g. 2026-01
    #[arg(long, value_name = "YYYY-MM")]
    pub month: Option<String>,

    /// Path to the .topics.md file for split-topics
    #[arg(long, value_name = "FILE")]
    pub topics_file: Option<PathBuf>,

    /// Topic boundary gap in hours
    #[arg(long, value_name = "HOURS", default_value_t = DEFAULT_GAP_HOURS)]
    pub gap_hours: u32,

    /// Topic trigger phrase (repeatable, replaces the built-in list)
    #[arg(long = "trigger", value_name = "PHRASE", action = ArgAction::Append)]
    pub triggers: Vec<String>,

    /// Bucket and render timestamps in the local time zone instead of UTC
    #[arg(long)]
    pub local_time: bool,

    /// Bytes read per chunk by the incremental reader
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Builds the library configuration from the parsed flags.
    pub fn archive_config(&self) -> ArchiveConfig {
        let mut topics = TopicConfig::new().with_gap_hours(self.gap_hours);
        if !self.triggers.is_empty() {
            topics = topics.with_triggers(self.triggers.iter().cloned());
        }

        let mut streaming = StreamingConfig::new();
        if let Some(size) = self.chunk_size {
            streaming = streaming.with_chunk_size(size);
        }

        let clock = if self.local_time { Clock::Local } else { Clock::Utc };

        ArchiveConfig::new()
            .with_streaming(streaming)
            .with_topics(topics)
            .with_clock(clock)
    }

    /// Default log filter for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "chatfold=warn",
            1 => "chatfold=info",
            _ => "chatfold=debug",
        }
    }
}

/// Operating modes.
///
/// - [`Month`](Stage::Month) - parse, day records, month files, topic previews
/// - [`TopicPreview`](Stage::TopicPreview) - re-derive previews from month files
/// - [`SplitTopics`](Stage::SplitTopics) - materialize topics from one preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Full pipeline (default)
    #[default]
    Month,

    /// Topic previews from existing month files
    TopicPreview,

    /// Topic documents from one annotated month file
    SplitTopics,
}

impl Stage {
    /// Returns all stage names.
    pub fn all_names() -> &'static [&'static str] {
        &["month", "topic-preview", "split-topics"]
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Month => write!(f, "month"),
            Stage::TopicPreview => write!(f, "topic-preview"),
            Stage::SplitTopics => write!(f, "split-topics"),
        }
    }
}

impl std::str::FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" => Ok(Stage::Month),
            "topic-preview" => Ok(Stage::TopicPreview),
            "split-topics" => Ok(Stage::SplitTopics),
            _ => Err(format!(
                "Unknown stage: '{}'. Expected one of: {}",
                s,
                Stage::all_names().join(", ")
            )),
        }
    }
}
