// WHY: usage errors are part of the public contract, so they get a typed enum
// instead of the anyhow strings used by the application layer

use thiserror::Error;

/// Invalid arguments or invalid buffer state supplied by the caller.
///
/// These abort the current operation only; no buffer is left half-modified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextError {
    /// `span` start is not within `1..=len`
    #[error("invalid arguments: start offset {start} is larger than text len {len}")]
    SpanStartOutOfRange { start: i64, len: usize },

    /// `span` length runs past the end of the source buffer
    #[error("invalid length: {len} exceeds the {remaining} bytes remaining")]
    SpanLengthOutOfRange { len: usize, remaining: usize },

    #[error("cannot wipe not owned text")]
    WipeNotOwned,

    #[error("secure wipe requires an owned buffer")]
    SecureWipeOnBorrowed,

    #[error("cannot parse regexp: {pattern}, error: {message}")]
    InvalidPattern { pattern: String, message: String },
}
