//! Error types for the incremental array reader.

use std::error::Error;
use std::fmt;
use std::io;

/// Result type for streaming operations.
pub type StreamingResult<T> = Result<T, StreamingError>;

/// Errors that can occur while reading a top-level JSON array incrementally.
#[derive(Debug)]
pub enum StreamingError {
    /// IO error while reading the source
    Io(io::Error),

    /// A value is syntactically invalid
    Json(serde_json::Error),

    /// The document does not open with `[`
    NotAnArray(char),

    /// The source ended in the middle of a value
    UnexpectedEof,
}

impl fmt::Display for StreamingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamingError::Io(e) => write!(f, "IO error: {e}"),
            StreamingError::Json(e) => write!(f, "JSON error: {e}"),
            StreamingError::NotAnArray(c) => {
                write!(f, "top-level value is not an array (found {c:?})")
            }
            StreamingError::UnexpectedEof => write!(f, "Unexpected end of file"),
        }
    }
}

impl Error for StreamingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StreamingError::Io(e) => Some(e),
            StreamingError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StreamingError {
    fn from(err: io::Error) -> Self {
        StreamingError::Io(err)
    }
}

impl From<serde_json::Error> for StreamingError {
    fn from(err: serde_json::Error) -> Self {
        StreamingError::Json(err)
    }
}
