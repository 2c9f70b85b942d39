//! # Chatfold
//!
//! A Rust library for folding branching chat-export archives into a linear,
//! time-ordered document corpus segmented by day, month and topic.
//!
//! ## Overview
//!
//! An archived conversation is a graph of message nodes: every edit or
//! regeneration opens a new branch. Chatfold picks one linear transcript per
//! conversation and then:
//!
//! - appends every message to a per-day record (`by_day/<day>.raw`)
//! - merges day records into anchored month documents (`by_month/<month>.md`)
//! - marks topic boundaries from time gaps and trigger phrases
//!   (`by_month/<month>.topics.md`)
//! - splits an annotated month into topic documents (`by_topic/<month>/`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatfold::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let archive = Archive::new("vault", ArchiveConfig::default());
//!     let stats = archive.run(Path::new("conversations.json"))?;
//!     println!("{} messages, {} topics", stats.messages, stats.topics());
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming for Large Files
//!
//! The archive is read incrementally; only one top-level array element is
//! decoded at a time:
//!
//! ```rust,no_run
//! use chatfold::parser::ArchiveParser;
//!
//! let parser = ArchiveParser::new();
//! for conversation in parser.stream("huge_export.json".as_ref())? {
//!     let conversation = conversation?;
//!     println!("{}: {} messages", conversation.title, conversation.len());
//! }
//! # Ok::<(), chatfold::ChatfoldError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - [`ArchiveParser`](parser::ArchiveParser), streaming with bulk fallback
//! - [`parsing`] - Message normalization, linearization, conversation extraction
//! - [`streaming`] - Incremental top-level JSON array reader
//! - [`core`] - Day/month aggregation, topics, the [`Archive`](core::Archive) orchestrator
//! - [`config`] - Configuration types
//! - [`cli`] - CLI types ([`Args`](cli::Args), [`Stage`](cli::Stage)), `cli` feature
//! - [`error`] - Unified error types ([`ChatfoldError`], [`Result`])
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod message;
pub mod parser;
pub mod parsing;
pub mod streaming;

// Re-export the main types at the crate root for convenience
pub use error::{ChatfoldError, Result};
pub use message::{Conversation, Message};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatfold::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Conversation, Message};

    pub use crate::error::{ChatfoldError, Result};

    pub use crate::config::{ArchiveConfig, StreamingConfig, TopicConfig};

    pub use crate::parser::{ArchiveParser, ConversationStream};
    pub use crate::parsing::{linearize, normalize_message};

    pub use crate::core::{Archive, Clock, OutputLayout, ProcessingStats, TopicSegmenter};
}
