//! Error types for ISO 2709 decoding.
//!
//! This module provides the [`DecodeError`] type for all decoding operations
//! and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all ISO 2709 decoding operations.
///
/// The taxonomy separates structural format errors (recoverable at the next
/// record boundary), truncation (always fatal for the current record),
/// API misuse, and plain I/O failures from the underlying source.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Leader or directory bytes cannot be parsed as declared.
    ///
    /// Carries the absolute byte offset of the failure within the input.
    /// Recoverable at the record boundary: a stream may skip to the next
    /// record terminator and continue.
    #[error("invalid record structure at byte {offset}: {reason}")]
    InvalidFormat {
        /// Absolute byte offset of the failure within the input.
        offset: u64,
        /// What could not be parsed as declared.
        reason: String,
    },

    /// End of input reached before a declared length was satisfied.
    #[error("unexpected end of input: {0}")]
    ShortFile(String),

    /// API misuse, such as reading from an exhausted or closed stream.
    #[error("invalid stream state: {0}")]
    StreamState(String),

    /// A field was added to a collection locked to a different tag.
    #[error("field tag '{found}' does not match collection tag '{expected}'")]
    TagMismatch {
        /// Tag the collection is locked to.
        expected: String,
        /// Tag of the rejected field.
        found: String,
    },

    /// IO error from the underlying source. Propagated unchanged.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// True if this error is recoverable by skipping to the next record
    /// boundary. Only format errors qualify; truncation, state, and I/O
    /// errors are fatal for the stream.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DecodeError::InvalidFormat { .. })
    }
}

/// Convenience type alias for [`std::result::Result`] with [`DecodeError`].
pub type Result<T> = std::result::Result<T, DecodeError>;
