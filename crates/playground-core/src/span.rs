//! Source positions and spans.
//!
//! Lines and columns are 1-based throughout the engine. Line `0` is reserved by
//! [`LineIndex`](crate::LineIndex) as the "end of buffer" sentinel and never names a real line.

/// 1-based line number.
pub type Line = usize;

/// 1-based column number (in `char`s).
pub type Column = usize;

/// A 1-based (line, column) position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line number (1-based).
    pub line: Line,
    /// Column number (1-based, in `char`s).
    pub column: Column,
}

impl Position {
    /// Create a new position.
    pub fn new(line: Line, column: Column) -> Self {
        Self { line, column }
    }
}

/// The extent of a token or issue.
///
/// A span starts at `start` and occupies `lines` source lines. `end_column` is the column just
/// past the last character on the final line, so the visible range on that line ends
/// (exclusive) at `line_start + end_column - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// First position covered by the span.
    pub start: Position,
    /// Number of lines the span touches (at least 1).
    pub lines: usize,
    /// Column just past the final character on the span's last line.
    pub end_column: Column,
}

impl Span {
    /// Create a span. A `lines` value of zero is normalized to one.
    pub fn new(start: Position, lines: usize, end_column: Column) -> Self {
        Self {
            start,
            lines: lines.max(1),
            end_column,
        }
    }

    /// Create a span that starts and ends on `line`.
    pub fn single_line(line: Line, column: Column, end_column: Column) -> Self {
        Self::new(Position::new(line, column), 1, end_column)
    }

    /// Last line touched by the span.
    pub fn end_line(&self) -> Line {
        self.start.line + self.lines - 1
    }

    /// Returns `true` if the span crosses at least one line terminator.
    pub fn is_multiline(&self) -> bool {
        self.lines > 1
    }

    /// Returns `true` if `line` lies within `start.line..=end_line()`.
    pub fn touches_line(&self, line: Line) -> bool {
        self.start.line <= line && line <= self.end_line()
    }
}
