//! Incremental reader for archives stored as one large JSON array.
//!
//! Conversation exports routinely reach several gigabytes. [`JsonArrayStream`]
//! yields the top-level array elements one at a time, keeping only the bytes
//! of the value being decoded in memory.
//!
//! # Example
//!
//! ```rust
//! use chatfold::streaming::JsonArrayStream;
//! use chatfold::config::StreamingConfig;
//!
//! let data = br#"[{"title": "a"}, {"title": "b"}]"#;
//! let stream = JsonArrayStream::new(&data[..], StreamingConfig::new().with_chunk_size(4));
//! let titles: Vec<String> = stream
//!     .filter_map(Result::ok)
//!     .map(|v| v["title"].as_str().unwrap_or_default().to_string())
//!     .collect();
//! assert_eq!(titles, ["a", "b"]);
//! ```
//!
//! # Memory Usage
//!
//! | Approach | 1GB File |
//! |----------|----------|
//! | Bulk parse | whole document as a `Value` tree |
//! | `JsonArrayStream` | one element + one chunk |

mod error;
mod json_array;

pub use error::{StreamingError, StreamingResult};
pub use json_array::JsonArrayStream;
