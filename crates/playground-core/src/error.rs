//! Error types.

use crate::span::Line;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced by the playground engine.
///
/// Queries never fail; these are raised by operations whose preconditions are not met. Every
/// fallible operation checks before mutating, so the engine state is unchanged on error.
pub enum PlaygroundError {
    #[error("rescan changed the line count: expected {expected_len} chars, buffer has {actual_len}")]
    /// A rescan was requested for an edit that added or removed lines.
    LineCountChanged {
        /// Buffer length implied by the old line table and the rescanned lines.
        expected_len: usize,
        /// Actual buffer length.
        actual_len: usize,
    },

    #[error("line {line} is out of range (last line is {last_line})")]
    /// A line range names lines that do not exist.
    LineOutOfRange {
        /// The offending line.
        line: Line,
        /// Highest populated line number.
        last_line: Line,
    },

    #[error("invalid edit range {start}..{end} for a buffer of {len} chars")]
    /// An edit addresses characters outside the buffer.
    InvalidEdit {
        /// Start character offset of the edit.
        start: usize,
        /// Exclusive end character offset of the deleted range.
        end: usize,
        /// Buffer length in chars.
        len: usize,
    },

    #[error("deleted text does not match the buffer at offset {start}")]
    /// The edit's deleted text is not what the buffer holds.
    EditMismatch {
        /// Start character offset of the edit.
        start: usize,
    },
}
