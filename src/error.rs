//! Unified error types for chatfold.
//!
//! This module provides a single [`ChatfoldError`] enum that covers every
//! fatal condition in the library. Message-level irregularities are never
//! errors: the normalizer degrades them to defaults instead.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **CLI users** get clear messages and a distinct exit code for usage errors
//! - **Developers** get source error chains for debugging

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatfold operations.
///
/// # Example
///
/// ```rust
/// use chatfold::error::Result;
/// use chatfold::Conversation;
///
/// fn load() -> Result<Vec<Conversation>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatfoldError>;

/// The error type for all chatfold operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatfoldError {
    /// An I/O error occurred.
    ///
    /// Filesystem failures (missing input, permission denied, disk full) are
    /// never handled locally and surface through this variant.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid JSON, even after the bulk fallback.
    #[error("Failed to parse {format}{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// What was being parsed (e.g. "conversation archive")
        format: &'static str,
        /// The underlying parse error
        #[source]
        source: ParseErrorKind,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// The document parsed but its structure is not usable.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error (topic anchor index).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error raised by the incremental array reader.
    #[error("Streaming error: {0}")]
    Streaming(#[source] StreamingErrorKind),

    /// A mode was invoked without the inputs it requires.
    #[error("{message}")]
    Usage {
        /// Human-readable description of the missing input
        message: String,
    },
}

/// Kinds of parse errors that can occur.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// JSON parsing error
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Generic parsing error
    #[error("{0}")]
    Other(String),
}

/// Kinds of streaming errors.
#[derive(Debug, Error)]
pub enum StreamingErrorKind {
    /// IO error during streaming
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// A value failed to decode
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The document does not start with a JSON array
    #[error("top-level value is not an array (found {0:?})")]
    NotAnArray(char),
    /// The stream ended inside a value
    #[error("Unexpected end of file")]
    UnexpectedEof,
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatfoldError {
    /// Creates a parse error for a conversation archive.
    pub fn archive_parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        ChatfoldError::Parse {
            format: "conversation archive",
            source: ParseErrorKind::Json(source),
            path,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatfoldError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        ChatfoldError::Usage {
            message: message.into(),
        }
    }

    /// Creates a streaming error from components.
    pub fn streaming(kind: StreamingErrorKind) -> Self {
        ChatfoldError::Streaming(kind)
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatfoldError::Io(_))
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ChatfoldError::Parse { .. })
    }

    /// Returns `true` if this is a usage error.
    pub fn is_usage(&self) -> bool {
        matches!(self, ChatfoldError::Usage { .. })
    }

    /// Returns `true` if this came from the incremental reader.
    pub fn is_streaming(&self) -> bool {
        matches!(self, ChatfoldError::Streaming(_))
    }
}

// ============================================================================
// Integration with streaming module
// ============================================================================

impl From<crate::streaming::StreamingError> for ChatfoldError {
    fn from(err: crate::streaming::StreamingError) -> Self {
        use crate::streaming::StreamingError;

        let kind = match err {
            StreamingError::Io(e) => StreamingErrorKind::Io(e),
            StreamingError::Json(e) => StreamingErrorKind::Json(e),
            StreamingError::NotAnArray(c) => StreamingErrorKind::NotAnArray(c),
            StreamingError::UnexpectedEof => StreamingErrorKind::UnexpectedEof,
        };
        ChatfoldError::Streaming(kind)
    }
}

// ============================================================================
// Tests
// ============================================================================
