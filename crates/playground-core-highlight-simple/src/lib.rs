#![warn(missing_docs)]
//! `playground-core-highlight-simple` - a simple (regex-based) tokenizer for `playground-core`.
//!
//! [`SimpleTokenizer`] recognizes the lexical classes a playground highlights: comments (block
//! comments may span lines and nest), string and character literals, numbers, (qualified)
//! constructors, keywords, reserved operators and special punctuation. The vocabulary comes from
//! a [`LanguageConfig`]. It is *not* a full lexer: anything it does not recognize becomes an
//! `Other` token.

use playground_core::{Column, Line, Position, Span, Token, TokenKind, Tokenizer};
use playground_core_lang::LanguageConfig;
use regex::Regex;

/// Regex based tokenizer driven by a [`LanguageConfig`].
#[derive(Debug, Clone)]
pub struct SimpleTokenizer {
    language: LanguageConfig,
    number: Regex,
    string: Regex,
    character: Regex,
    constructor: Regex,
    qualified_suffix: Regex,
    identifier: Regex,
}

impl SimpleTokenizer {
    /// Create a tokenizer for `language`.
    pub fn new(language: LanguageConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            language,
            number: Regex::new(
                r"^(?:0[xX][0-9a-fA-F]+|0[oO][0-7]+|0[bB][01]+|[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?)",
            )?,
            // Unterminated strings run to the end of the line.
            string: Regex::new(r#"^"(?:\\.|[^"\\\n])*"?"#)?,
            character: Regex::new(r"^'(?:\\[^'\n]+|[^'\\\n])'")?,
            constructor: Regex::new(r"^\p{Lu}[\w']*(?:\.\p{Lu}[\w']*)*")?,
            qualified_suffix: Regex::new(r"^\.[\p{Ll}_][\w']*")?,
            identifier: Regex::new(r"^[\p{Ll}_][\w']*")?,
        })
    }

    /// A tokenizer for Haskell source.
    pub fn haskell() -> Result<Self, regex::Error> {
        Self::new(LanguageConfig::haskell())
    }

    /// The language vocabulary.
    pub fn language(&self) -> &LanguageConfig {
        &self.language
    }

    /// Tokenize `text`, which starts at (`line`, `column`) in the buffer.
    pub fn tokens(&self, line: Line, column: Column, text: &str) -> Vec<Token> {
        let mut cursor = Cursor {
            text,
            pos: 0,
            line,
            column,
        };
        let mut tokens = Vec::new();

        while let Some(ch) = cursor.peek() {
            if ch == '\n' || ch.is_whitespace() {
                cursor.advance(ch.len_utf8());
                continue;
            }
            let rest = cursor.rest();
            let (kind, len) = self.classify(ch, rest);
            let start = cursor.position();
            cursor.advance(len);
            tokens.push(cursor.token_from(kind, start));
        }

        tracing::trace!(line, column, count = tokens.len(), "tokenized text");
        tokens
    }

    /// Kind and byte length of the token at the start of `rest` (whose first char is `ch`).
    fn classify(&self, ch: char, rest: &str) -> (TokenKind, usize) {
        let comments = &self.language.comments;
        if comments.has_block() {
            let (start, end) = (
                comments.block_start.as_deref().unwrap_or_default(),
                comments.block_end.as_deref().unwrap_or_default(),
            );
            if rest.starts_with(start) {
                return (
                    TokenKind::BlockComment,
                    block_comment_len(rest, start, end, comments.nested),
                );
            }
        }
        if let Some(line) = comments.line.as_deref().filter(|l| !l.is_empty())
            && rest.starts_with(line)
        {
            let symbol = self.symbol_len(rest);
            // `-->` is an operator, `---` a comment.
            if symbol == 0 || rest[..symbol].chars().all(|c| line.contains(c)) {
                return (TokenKind::LineComment, rest.find('\n').unwrap_or(rest.len()));
            }
        }

        if ch == '"' {
            return (TokenKind::String, match_len(&self.string, rest).unwrap_or(1));
        }
        if ch == '\''
            && let Some(len) = match_len(&self.character, rest)
        {
            return (TokenKind::String, len);
        }
        if ch.is_ascii_digit()
            && let Some(len) = match_len(&self.number, rest)
        {
            return (TokenKind::Number, len);
        }
        if ch.is_uppercase()
            && let Some(len) = match_len(&self.constructor, rest)
        {
            return match match_len(&self.qualified_suffix, &rest[len..]) {
                Some(suffix) => (TokenKind::Other, len + suffix),
                None => (TokenKind::Constructor, len),
            };
        }
        if let Some(len) = match_len(&self.identifier, rest) {
            let word = &rest[..len];
            let kind = if self.language.is_keyword(word)
                || (word.len() == 1 && self.language.is_special(ch))
            {
                TokenKind::Keyword
            } else {
                TokenKind::Other
            };
            return (kind, len);
        }

        let symbol = self.symbol_len(rest);
        if symbol > 0 {
            let op = &rest[..symbol];
            let kind = if self.language.is_reserved_operator(op) {
                TokenKind::Keyword
            } else if op.starts_with(':') {
                TokenKind::Constructor
            } else {
                TokenKind::Other
            };
            return (kind, symbol);
        }

        let kind = if self.language.is_special(ch) {
            TokenKind::Keyword
        } else {
            TokenKind::Other
        };
        (kind, ch.len_utf8())
    }

    /// Byte length of the operator symbol at the start of `rest`.
    fn symbol_len(&self, rest: &str) -> usize {
        rest.char_indices()
            .find(|&(_, c)| !self.language.is_symbol_char(c))
            .map_or(rest.len(), |(i, _)| i)
    }
}

impl Tokenizer for SimpleTokenizer {
    fn tokenize(&mut self, line: Line, column: Column, text: &str) -> Vec<Token> {
        self.tokens(line, column, text)
    }
}

fn match_len(regex: &Regex, text: &str) -> Option<usize> {
    regex
        .find(text)
        .map(|m| m.end())
        .filter(|&len| len > 0)
}

/// Byte length of the block comment at the start of `rest`; an unterminated comment runs to the
/// end of the text.
fn block_comment_len(rest: &str, start: &str, end: &str, nested: bool) -> usize {
    let mut depth = 0usize;
    let mut i = 0usize;
    while i < rest.len() {
        let tail = &rest[i..];
        if tail.starts_with(start) && (nested || depth == 0) {
            depth += 1;
            i += start.len();
        } else if tail.starts_with(end) {
            depth -= 1;
            i += end.len();
            if depth == 0 {
                return i;
            }
        } else {
            i += tail.chars().next().map_or(1, char::len_utf8);
        }
    }
    tracing::trace!("unterminated block comment");
    rest.len()
}

/// Byte position in the text plus the buffer position it corresponds to.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    line: Line,
    column: Column,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn advance(&mut self, bytes: usize) {
        let end = (self.pos + bytes).min(self.text.len());
        for ch in self.text[self.pos..end].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    /// Token from `start` up to the current position.
    fn token_from(&self, kind: TokenKind, start: Position) -> Token {
        Token::new(
            kind,
            Span::new(start, self.line - start.line + 1, self.column),
        )
    }
}
