//! Aggregation and topic stages of the pipeline.
//!
//! This module contains:
//! - [`clock`] - Day keys and rendered timestamps
//! - [`layout`] - Output directory layout
//! - [`day`] - Append-only day records
//! - [`month`] - Anchored month documents
//! - [`topics`] - Boundary detection, previews and topic documents
//! - [`output`] - Anchor index writer
//! - [`processor`] - The [`Archive`] orchestrator
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chatfold::config::ArchiveConfig;
//! use chatfold::core::Archive;
//! use std::path::Path;
//!
//! # fn main() -> chatfold::Result<()> {
//! let archive = Archive::new("vault", ArchiveConfig::default());
//! let stats = archive.run(Path::new("conversations.json"))?;
//! println!("{} messages in {} months", stats.messages, stats.months.len());
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod day;
pub mod layout;
pub mod month;
pub mod output;
pub mod processor;
pub mod topics;

pub use clock::Clock;
pub use day::{DayWriter, render_day_line};
pub use layout::OutputLayout;
pub use month::{anchor, build_month_files, month_key};
pub use processor::{Archive, ProcessingStats};
pub use topics::{SplitSummary, TopicSegmenter, split_topics};
