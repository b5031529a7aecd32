//! Line token map
//!
//! Highlighting tokens filed per line, on top of a [`LineIndex`]. A token spanning several lines
//! is filed under every line it touches: it is the *last* token of its first line and the *first*
//! token of each continuation line, so iterating a line's list yields tokens in reading order.
//!
//! The map is built once from the full buffer and then patched incrementally: after a
//! line-count-preserving edit only the lines of a rescan window are re-tokenized, and the line
//! starts of all following lines are shifted (see [`LineIndex::update_lines`]).

use crate::error::PlaygroundError;
use crate::line_index::LineIndex;
use crate::span::{Column, Line, Span};
use ropey::Rope;
use std::ops::Range;

/// Token categories distinguished during syntax highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    /// Data constructors, type constructors and classes.
    Constructor,
    /// String and character literals.
    String,
    /// Numeric literals.
    Number,
    /// Keywords, reserved operators and special punctuation.
    Keyword,
    /// Comment running to the end of the line.
    LineComment,
    /// Delimited comment, possibly spanning several lines.
    BlockComment,
    /// Everything else (variables, operators).
    Other,
}

/// A highlighting token produced by a [`Tokenizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    /// Token category.
    pub kind: TokenKind,
    /// Source extent.
    pub span: Span,
}

impl Token {
    /// Create a token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Turns source text into highlighting tokens.
///
/// `line` and `column` give the position of the first character of `text` in the buffer; the
/// returned spans must be expressed in buffer coordinates (i.e. relative to that start) and be in
/// source order.
pub trait Tokenizer {
    /// Tokenize `text`, which starts at (`line`, `column`) in the buffer.
    fn tokenize(&mut self, line: Line, column: Column, text: &str) -> Vec<Token>;
}

impl<F> Tokenizer for F
where
    F: FnMut(Line, Column, &str) -> Vec<Token>,
{
    fn tokenize(&mut self, line: Line, column: Column, text: &str) -> Vec<Token> {
        self(line, column, text)
    }
}

/// Result of [`TokenMap::rescan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescanOutcome {
    /// Every rescanned token ends inside the window.
    Settled,
    /// A rescanned token continues up to `last_line`, past the window.
    Overflow {
        /// Furthest line the token touches.
        last_line: Line,
    },
}

/// Per-line token lists plus the line start table of the buffer they were computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMap {
    index: LineIndex,
    /// `tokens[line]` for `1..=last_line`; slot 0 is unused.
    tokens: Vec<Vec<Token>>,
}

impl TokenMap {
    /// Tokenize the whole buffer and file every token under the lines it touches.
    pub fn build<T>(text: &Rope, tokenizer: &mut T) -> Self
    where
        T: Tokenizer + ?Sized,
    {
        let index = LineIndex::from_rope(text);
        let mut map = Self {
            tokens: vec![Vec::new(); index.last_line() + 1],
            index,
        };
        let tokens = tokenizer.tokenize(1, 1, &text.to_string());
        let last_line = map.index.last_line();
        if let Some(line) = map.file_tokens(tokens, 1..last_line + 1) {
            tracing::warn!(line, last_line, "token reaches past the end of the buffer");
        }
        map
    }

    /// The line start table.
    pub fn line_index(&self) -> &LineIndex {
        &self.index
    }

    /// Highest populated line number.
    pub fn last_line(&self) -> Line {
        self.index.last_line()
    }

    /// Tokens filed under `line` (empty for unknown lines).
    pub fn tokens_on_line(&self, line: Line) -> &[Token] {
        if line == 0 {
            return &[];
        }
        self.tokens.get(line).map(Vec::as_slice).unwrap_or(&[])
    }

    /// File `tokens` under the lines of `lines` they touch. Returns the furthest line past the
    /// range reached by a token, if any; those lines are left untouched.
    fn file_tokens(&mut self, tokens: Vec<Token>, lines: Range<Line>) -> Option<Line> {
        let mut overflow = None;
        for token in tokens {
            let first = token.span.start.line;
            for line in first..first + token.span.lines {
                if lines.contains(&line) {
                    self.tokens[line].push(token);
                } else if line >= lines.end {
                    overflow = overflow.max(Some(line));
                } else {
                    tracing::warn!(
                        line,
                        kind = ?token.kind,
                        "token starts before the tokenized range; dropped for that line"
                    );
                }
            }
        }
        overflow
    }

    /// Number of extra lines to rescan before and after `lines` to cover multi-line tokens
    /// straddling the range boundaries.
    ///
    /// If the first token of the first line spans `k > 1` lines, the range is extended backwards
    /// by `k - 1`; symmetrically for the last token of the last line. The extension ignores where
    /// within the multi-line token the boundary falls, so it may over-extend but never falls
    /// short.
    pub fn rescan_offsets(&self, lines: Range<Line>) -> (usize, usize) {
        if lines.is_empty() {
            return (0, 0);
        }
        let pre = self
            .tokens_on_line(lines.start)
            .first()
            .map_or(0, |token| token.span.lines.saturating_sub(1));
        let suc = self
            .tokens_on_line(lines.end - 1)
            .last()
            .map_or(0, |token| token.span.lines.saturating_sub(1));
        (pre, suc)
    }

    /// `lines` extended by [`rescan_offsets`](Self::rescan_offsets), clamped to the buffer.
    pub fn rescan_window(&self, lines: Range<Line>) -> Range<Line> {
        if lines.is_empty() {
            return lines;
        }
        let (pre, suc) = self.rescan_offsets(lines.clone());
        let start = lines.start.saturating_sub(pre).max(1);
        let end = (lines.end + suc).min(self.last_line() + 1);
        start..end
    }

    /// [`rescan_window`](Self::rescan_window) grown until no token of the map crosses either
    /// boundary: the first token of the first line starts inside the window and the last token
    /// of the last line ends inside it.
    pub fn covering_window(&self, lines: Range<Line>) -> Range<Line> {
        let mut window = self.rescan_window(lines);
        if window.is_empty() {
            return window;
        }
        loop {
            let start = self
                .tokens_on_line(window.start)
                .first()
                .map_or(window.start, |token| token.span.start.line.min(window.start))
                .max(1);
            let end = self
                .tokens_on_line(window.end - 1)
                .last()
                .map_or(window.end, |token| (token.span.end_line() + 1).max(window.end))
                .min(self.last_line() + 1);
            if start == window.start && end == window.end {
                return window;
            }
            window = start..end;
        }
    }

    /// Re-tokenize `lines` of the edited `text`.
    ///
    /// The edit must preserve the buffer's line count and be confined to `lines`; the line
    /// starts of `lines` are recomputed and all following lines are shifted by the net length
    /// change. Only the text of `lines` is passed to the tokenizer. The token lists of exactly
    /// those lines are replaced.
    ///
    /// A token produced for the window may continue past its last line (an edit opened a block
    /// comment, say). Its tail is not filed and [`RescanOutcome::Overflow`] tells the caller to
    /// rescan a wider window.
    ///
    /// An empty range is a no-op. On error the map is left unchanged.
    pub fn rescan<T>(
        &mut self,
        lines: Range<Line>,
        text: &Rope,
        tokenizer: &mut T,
    ) -> Result<RescanOutcome, PlaygroundError>
    where
        T: Tokenizer + ?Sized,
    {
        if lines.is_empty() {
            return Ok(RescanOutcome::Settled);
        }
        let delta = self.index.update_lines(lines.clone(), text)?;
        // `update_lines` validated the range, so the start exists.
        let start = self.index.start_of_line(lines.start).unwrap_or(0);
        let end = self.index.end_of_line(lines.end - 1);
        tracing::debug!(
            first = lines.start,
            last = lines.end - 1,
            delta,
            "rescanning token lines"
        );

        let rescan_text = String::from(text.slice(start..end));
        for line in lines.clone() {
            self.tokens[line].clear();
        }
        let tokens = tokenizer.tokenize(lines.start, 1, &rescan_text);
        let last_line = self.last_line();
        match self.file_tokens(tokens, lines) {
            Some(line) if line <= last_line => Ok(RescanOutcome::Overflow { last_line: line }),
            Some(line) => {
                tracing::warn!(line, last_line, "token reaches past the end of the buffer");
                Ok(RescanOutcome::Settled)
            }
            None => Ok(RescanOutcome::Settled),
        }
    }

    /// Tokens of `line` paired with the character range each covers on that line.
    ///
    /// A token that started on an earlier line is visible from the line start; a token that
    /// continues onto a later line is visible to the end of the line (terminator included).
    pub fn tokens_with_span(&self, line: Line) -> Vec<(Token, Range<usize>)> {
        let Some(line_start) = self.index.start_of_line(line) else {
            return Vec::new();
        };
        let line_end = self.index.end_of_line(line);
        self.tokens_on_line(line)
            .iter()
            .map(|token| {
                let span = token.span;
                let start = if line == span.start.line {
                    line_start + span.start.column.saturating_sub(1)
                } else {
                    line_start
                };
                let end = if line == span.end_line() {
                    (line_start + span.end_column.saturating_sub(1)).min(line_end)
                } else {
                    line_end
                };
                (*token, start..end.max(start))
            })
            .collect()
    }

    /// Token kinds and character ranges for all tokens in `lines`, in reading order.
    pub fn highlight_spans(&self, lines: Range<Line>) -> Vec<(TokenKind, Range<usize>)> {
        lines
            .flat_map(|line| self.tokens_with_span(line))
            .map(|(token, range)| (token.kind, range))
            .collect()
    }
}
