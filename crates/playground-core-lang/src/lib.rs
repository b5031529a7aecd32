#![warn(missing_docs)]
//! `playground-core-lang` - data-driven language configuration for `playground-core`.
//!
//! This crate stays lightweight and does **not** depend on any parsing or highlighting system.
//! It describes the lexical vocabulary of a playground language (comment delimiters, keywords,
//! reserved operators, special punctuation) so tokenizers can be configured without hard-coding
//! a language.

/// Comment tokens of a language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `--`, `//`).
    pub line: Option<String>,
    /// Block comment start token (e.g. `{-`).
    pub block_start: Option<String>,
    /// Block comment end token (e.g. `-}`).
    pub block_end: Option<String>,
    /// Whether block comments nest.
    pub nested: bool,
}

impl CommentConfig {
    /// Create a config that supports only line comments.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
            ..Self::default()
        }
    }

    /// Create a config that supports only (non-nesting) block comments.
    pub fn block(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            block_start: Some(start.into()),
            block_end: Some(end.into()),
            ..Self::default()
        }
    }

    /// Create a config that supports both line and block comments.
    pub fn line_and_block(
        line: impl Into<String>,
        block_start: impl Into<String>,
        block_end: impl Into<String>,
    ) -> Self {
        Self {
            line: Some(line.into()),
            block_start: Some(block_start.into()),
            block_end: Some(block_end.into()),
            nested: false,
        }
    }

    /// Allow block comments to nest.
    pub fn nesting(mut self) -> Self {
        self.nested = true;
        self
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns `true` if both block comment tokens are configured.
    pub fn has_block(&self) -> bool {
        self.block_start.as_deref().is_some_and(|s| !s.is_empty())
            && self.block_end.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Lexical vocabulary of a playground language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanguageConfig {
    /// Language name.
    pub name: String,
    /// Comment delimiters.
    pub comments: CommentConfig,
    /// Reserved identifiers.
    pub keywords: Vec<String>,
    /// Reserved operator symbols (e.g. `=`, `->`, `::`).
    pub reserved_operators: Vec<String>,
    /// Single punctuation characters highlighted like keywords (brackets, separators).
    pub special: String,
    /// Characters that form operator symbols.
    pub symbol_chars: String,
}

const HASKELL_KEYWORDS: &[&str] = &[
    "as", "case", "class", "data", "default", "deriving", "do", "else", "family", "forall",
    "foreign", "hiding", "if", "import", "in", "infix", "infixl", "infixr", "instance", "let",
    "mdo", "module", "newtype", "of", "pattern", "qualified", "role", "then", "type", "where",
];

const HASKELL_RESERVED_OPERATORS: &[&str] = &[
    "..", ":", "::", "=", "\\", "|", "<-", "->", "@", "~", "=>", "-", "!", "*", ".",
];

impl LanguageConfig {
    /// Create an empty configuration named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Haskell: `--` line comments, nested `{- -}` block comments, the Haskell 2010 reserved
    /// identifiers plus common GHC extension keywords.
    pub fn haskell() -> Self {
        Self {
            name: "haskell".to_string(),
            comments: CommentConfig::line_and_block("--", "{-", "-}").nesting(),
            keywords: HASKELL_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            reserved_operators: HASKELL_RESERVED_OPERATORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            special: "(),;[]`{}_'".to_string(),
            symbol_chars: "!#$%&*+./<=>?@\\^|-~:".to_string(),
        }
    }

    /// Set the comment delimiters.
    pub fn with_comments(mut self, comments: CommentConfig) -> Self {
        self.comments = comments;
        self
    }

    /// Add keywords.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Add reserved operators.
    pub fn with_reserved_operators<I, S>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_operators
            .extend(operators.into_iter().map(Into::into));
        self
    }

    /// Set the special punctuation characters.
    pub fn with_special(mut self, special: impl Into<String>) -> Self {
        self.special = special.into();
        self
    }

    /// Set the operator symbol characters.
    pub fn with_symbol_chars(mut self, symbol_chars: impl Into<String>) -> Self {
        self.symbol_chars = symbol_chars.into();
        self
    }

    /// Returns `true` if `word` is a keyword.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.iter().any(|k| k == word)
    }

    /// Returns `true` if `symbol` is a reserved operator.
    pub fn is_reserved_operator(&self, symbol: &str) -> bool {
        self.reserved_operators.iter().any(|op| op == symbol)
    }

    /// Returns `true` if `ch` is special punctuation.
    pub fn is_special(&self, ch: char) -> bool {
        self.special.contains(ch)
    }

    /// Returns `true` if `ch` can be part of an operator symbol.
    pub fn is_symbol_char(&self, ch: char) -> bool {
        self.symbol_chars.contains(ch)
    }
}
