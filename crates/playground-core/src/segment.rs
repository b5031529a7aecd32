//! Command segmentation by the off-side rule.
//!
//! A command starts at a line whose first character is not whitespace and extends over all
//! immediately following lines that start with whitespace or are blank.

use crate::layout::visual_rows;
use crate::span::Line;
use std::iter::FusedIterator;

/// Which characters continue the current command when they start the next line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhitespaceRule {
    /// Space, tab, and line terminators (blank lines) only.
    #[default]
    Ascii,
    /// Any Unicode whitespace (`char::is_whitespace`).
    Unicode,
}

impl WhitespaceRule {
    /// Returns `true` if a line starting with `ch` continues the current command.
    pub fn continues(self, ch: char) -> bool {
        match self {
            WhitespaceRule::Ascii => matches!(ch, ' ' | '\t' | '\n' | '\r'),
            WhitespaceRule::Unicode => ch.is_whitespace(),
        }
    }
}

/// One independently evaluable unit of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    /// Line the command starts on.
    pub start_line: Line,
    /// Command text, including the terminators of all its lines.
    pub text: &'a str,
    /// Number of source lines the command spans.
    pub lines: usize,
}

impl Command<'_> {
    /// Number of visual rows the command occupies when soft-wrapped at `wrap_width` cells.
    pub fn display_rows(&self, wrap_width: Option<usize>, tab_width: usize) -> usize {
        self.text
            .split_inclusive('\n')
            .map(|line| visual_rows(line, wrap_width, tab_width))
            .sum::<usize>()
            .max(1)
    }
}

/// Lazily cuts a buffer into [`Command`]s, top to bottom.
#[derive(Debug, Clone)]
pub struct Segmenter<'a> {
    text: &'a str,
    pos: usize,
    line: Line,
    whitespace: WhitespaceRule,
}

impl<'a> Segmenter<'a> {
    /// Segment `text` using the ASCII whitespace rule.
    pub fn new(text: &'a str) -> Self {
        Self::with_rule(text, WhitespaceRule::Ascii)
    }

    /// Segment `text` using `whitespace` as the continuation test.
    pub fn with_rule(text: &'a str, whitespace: WhitespaceRule) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            whitespace,
        }
    }

    fn consume_line(&mut self) {
        let rest = &self.text[self.pos..];
        self.pos += rest.find('\n').map_or(rest.len(), |i| i + 1);
    }
}

impl<'a> Iterator for Segmenter<'a> {
    type Item = Command<'a>;

    fn next(&mut self) -> Option<Command<'a>> {
        if self.pos >= self.text.len() {
            return None;
        }
        let start = self.pos;
        let mut lines = 0usize;
        loop {
            self.consume_line();
            lines += 1;
            match self.text[self.pos..].chars().next() {
                Some(ch) if self.whitespace.continues(ch) => {}
                _ => break,
            }
        }

        let command = Command {
            start_line: self.line,
            text: &self.text[start..self.pos],
            lines,
        };
        self.line += lines;
        Some(command)
    }
}

impl FusedIterator for Segmenter<'_> {}

/// Segment `text` into commands using `whitespace` as the continuation test.
pub fn segment(text: &str, whitespace: WhitespaceRule) -> Segmenter<'_> {
    Segmenter::with_rule(text, whitespace)
}
