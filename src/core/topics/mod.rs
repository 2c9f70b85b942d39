//! Topic segmentation and splitting.
//!
//! - [`segment`] - boundary detection and `.topics.md` previews
//! - [`split`] - topic documents and the anchor index

pub mod segment;
pub mod split;

pub use segment::{TOPIC_START_MARKER, TopicSegmenter, bracket_time, topic_marker};
pub use split::{SplitSummary, TopicDocument, front_matter, slugify, split_annotated, split_topics};
