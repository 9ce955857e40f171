//! Unified error types for chatsieve.
//!
//! This module provides a single [`ChatsieveError`] enum that covers every
//! failure an operation can hit, from reading the archive to decoding a
//! request off the wire.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **The caller boundary** gets one log line per failed operation
//!   (see [`Engine::handle`](crate::engine::Engine::handle))
//! - **Developers** get source error chains for debugging
//!
//! A container missing its title, body or timestamp is *not* an error: the
//! extractor skips it silently.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatsieve operations.
///
/// # Example
///
/// ```rust
/// use chatsieve::error::Result;
/// use chatsieve::ParsedMessage;
///
/// fn my_function() -> Result<Vec<ParsedMessage>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatsieveError>;

/// The error type for all chatsieve operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatsieveError {
    /// An I/O error occurred.
    ///
    /// This typically happens when writing an output file fails.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The input archive could not be read or decoded as markup text.
    #[error("Failed to load archive (file: {}): {source}", path.display())]
    Load {
        /// The archive path
        path: PathBuf,
        /// What went wrong
        #[source]
        source: LoadErrorKind,
    },

    /// A timestamp did not match the fixed archive pattern.
    ///
    /// Fatal for the summary pass: records are never skipped individually.
    #[error("Invalid timestamp '{input}'. Expected format: {expected}")]
    TimestampParse {
        /// The raw timestamp text (trimmed)
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// The operation request is missing a field or selects no operation.
    #[error("Invalid request: {reason}")]
    InvalidRequest {
        /// Which field is missing or why the request was rejected
        reason: String,
    },

    /// A selector profile contains a selector that does not compile.
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector {
        /// The selector source text
        selector: &'static str,
        /// Parser message
        message: String,
    },

    /// A request could not be decoded from its JSON wire form.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An operation is already running on the worker.
    #[error("Busy: another operation is still running")]
    Busy,

    /// The worker thread has stopped and can no longer take requests.
    #[error("Worker disconnected")]
    WorkerDisconnected,
}

/// Kinds of load errors.
#[derive(Debug, Error)]
pub enum LoadErrorKind {
    /// The file could not be read
    #[error("{0}")]
    Io(#[from] io::Error),
    /// The bytes are not UTF-8 text
    #[error("{0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatsieveError {
    /// Creates a load error for the given archive path.
    pub fn load(path: impl Into<PathBuf>, source: impl Into<LoadErrorKind>) -> Self {
        ChatsieveError::Load {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Creates a timestamp parse error.
    pub fn timestamp(input: impl Into<String>) -> Self {
        ChatsieveError::TimestampParse {
            input: input.into(),
            expected: "MMM DD, YYYY hh:mmA",
        }
    }

    /// Creates an invalid request error.
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        ChatsieveError::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatsieveError::Io(_))
    }

    /// Returns `true` if the archive failed to load.
    pub fn is_load(&self) -> bool {
        matches!(self, ChatsieveError::Load { .. })
    }

    /// Returns `true` if this is a timestamp error.
    pub fn is_timestamp(&self) -> bool {
        matches!(self, ChatsieveError::TimestampParse { .. })
    }

    /// Returns `true` if the request was rejected before any processing.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, ChatsieveError::InvalidRequest { .. })
    }

    /// Returns `true` if the worker refused the request because it was busy.
    pub fn is_busy(&self) -> bool {
        matches!(self, ChatsieveError::Busy)
    }
}

// ============================================================================
// Tests
// ============================================================================
