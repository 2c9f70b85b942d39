//! Index writers for materialized topics.
//!
//! - [`write_anchor_mapping`] / [`to_anchor_mapping`] - `event_anchor,obsidian_path` CSV
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> chatfold::Result<()> {
//! use chatfold::core::output::{AnchorEntry, to_anchor_mapping};
//!
//! let entries = vec![AnchorEntry::new("2026-01", "2026-01-10_Topic-001.md")];
//! let csv = to_anchor_mapping(&entries)?;
//! assert!(csv.starts_with("event_anchor,obsidian_path"));
//! # Ok(())
//! # }
//! ```

mod csv_writer;

pub use csv_writer::{AnchorEntry, to_anchor_mapping, write_anchor_mapping};
