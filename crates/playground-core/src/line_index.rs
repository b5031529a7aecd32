//! Logical line index
//!
//! Maps character offsets to 1-based line numbers and back using a table of line start offsets.
//! The table supports an incremental update for line-count-preserving edits: the edited lines are
//! re-scanned and every following line start is shifted by the net length change, without
//! touching the text of those lines.

use crate::error::PlaygroundError;
use crate::span::Line;
use ropey::Rope;
use std::ops::Range;

/// Line start offset table.
///
/// Slot `0` holds the sentinel "end of text" offset; slot `n` (for `1 <= n <= last_line()`) holds
/// the character offset at which line `n` starts. Offsets strictly increase with the line
/// number and line 1 always starts at offset 0.
///
/// A buffer ending with `'\n'` has an additional, empty last line starting at the end of the
/// text. An empty buffer consists of a single empty line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    /// Line index of the empty buffer.
    pub fn new() -> Self {
        Self { starts: vec![0, 0] }
    }

    /// Build the index by scanning `text` once.
    pub fn from_text(text: &str) -> Self {
        Self::from_chars(text.chars())
    }

    /// Build the index by scanning a rope once.
    pub fn from_rope(text: &Rope) -> Self {
        Self::from_chars(text.chars())
    }

    fn from_chars(chars: impl Iterator<Item = char>) -> Self {
        let mut starts = vec![0, 0];
        let mut offset = 0usize;
        for ch in chars {
            offset += 1;
            if ch == '\n' {
                starts.push(offset);
            }
        }
        starts[0] = offset;
        Self { starts }
    }

    /// Highest populated line number.
    pub fn last_line(&self) -> Line {
        self.starts.len() - 1
    }

    /// Character length of the indexed text (the sentinel offset).
    pub fn len_chars(&self) -> usize {
        self.starts[0]
    }

    /// Start offset of `line`, or `None` if the line does not exist.
    pub fn start_of_line(&self, line: Line) -> Option<usize> {
        if line == 0 {
            return None;
        }
        self.starts.get(line).copied()
    }

    /// Exclusive end offset of `line`, including its terminator.
    ///
    /// For the last line and for lines outside `1..=last_line()` this is the end of the text.
    pub fn end_of_line(&self, line: Line) -> usize {
        if line >= 1 && line < self.last_line() {
            self.starts[line + 1]
        } else {
            self.len_chars()
        }
    }

    /// Character range of `line` (terminator included).
    pub fn line_range(&self, line: Line) -> Option<Range<usize>> {
        let start = self.start_of_line(line)?;
        Some(start..self.end_of_line(line))
    }

    /// Line containing `offset`.
    ///
    /// The end-of-text offset belongs to the last line; offsets beyond it have no line.
    pub fn line_at(&self, offset: usize) -> Option<Line> {
        if offset > self.len_chars() {
            return None;
        }
        // Line starts <= offset; line 1 starts at 0, so this is at least 1.
        Some(self.starts[1..].partition_point(|&start| start <= offset))
    }

    /// Re-scan `lines` in the edited `text` and shift every following line start.
    ///
    /// The edit must have preserved the number of lines in the buffer and must be confined to
    /// `lines` (in old-buffer terms). The start of `lines.start` is taken from the old table.
    /// Returns the net length change of the rescanned region.
    ///
    /// Fails with [`PlaygroundError::LineCountChanged`] when the rescanned lines do not fit the old
    /// table, leaving the index untouched.
    pub fn update_lines(&mut self, lines: Range<Line>, text: &Rope) -> Result<isize, PlaygroundError> {
        if lines.is_empty() {
            return Ok(0);
        }
        let last_line = self.last_line();
        if lines.start == 0 || lines.end - 1 > last_line {
            let line = if lines.start == 0 { 0 } else { lines.end - 1 };
            return Err(PlaygroundError::LineOutOfRange { line, last_line });
        }

        let old_len = self.len_chars();
        let new_len = text.len_chars();
        let start = self.starts[lines.start];
        if start > new_len {
            return Err(PlaygroundError::LineCountChanged {
                expected_len: old_len,
                actual_len: new_len,
            });
        }

        let mut new_starts = Vec::with_capacity(lines.len());
        let mut idx = start;
        let mut terminated = 0usize;
        let mut chars = text.chars_at(start);
        for _ in lines.clone() {
            new_starts.push(idx);
            for ch in chars.by_ref() {
                idx += 1;
                if ch == '\n' {
                    terminated += 1;
                    break;
                }
            }
        }

        let old_end = self.end_of_line(lines.end - 1);
        let delta = idx as isize - old_end as isize;
        let expected_len = (old_len as isize + delta).max(0) as usize;

        let includes_last = lines.end - 1 == last_line;
        let terminators_fit = if includes_last {
            terminated == lines.len() - 1
        } else {
            terminated == lines.len()
        };
        if !terminators_fit || expected_len != new_len || (includes_last && idx != new_len) {
            return Err(PlaygroundError::LineCountChanged {
                expected_len,
                actual_len: new_len,
            });
        }

        self.starts[lines.clone()].copy_from_slice(&new_starts);
        for start in &mut self.starts[lines.end..] {
            *start = (*start as isize + delta) as usize;
        }
        self.starts[0] = new_len;
        Ok(delta)
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}
