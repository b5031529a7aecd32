//! Playground configuration.

use crate::layout::DEFAULT_TAB_WIDTH;
use crate::segment::WhitespaceRule;

/// Synthetic file identifier of the playground buffer.
pub const DEFAULT_SOURCE_ID: &str = "<playground>";

/// Prefix an evaluator puts in front of the rendering of an exception.
pub const DEFAULT_EXCEPTION_MARKER: &str = "** Exception: ";

/// Default height of one display row of a result.
pub const DEFAULT_ROW_HEIGHT: f64 = 15.0;

/// Configuration for [`Playground`](crate::Playground).
#[derive(Debug, Clone, PartialEq)]
pub struct PlaygroundConfig {
    /// File identifier under which the evaluator reports diagnostics for the playground buffer.
    /// Diagnostics for any other file are forwarded upstream.
    pub source_id: String,
    /// Which characters continue a command when they start a line.
    pub whitespace: WhitespaceRule,
    /// Soft-wrap width (in cells) used for result height hints; `None` disables wrapping.
    pub wrap_width: Option<usize>,
    /// Tab width (in cells) used for result height hints.
    pub tab_width: usize,
    /// Height of one display row.
    pub row_height: f64,
    /// Value prefix that marks an exceptional result.
    pub exception_marker: String,
}

impl PlaygroundConfig {
    /// Default configuration.
    ///
    /// - `source_id` is [`DEFAULT_SOURCE_ID`]
    /// - `whitespace` is [`WhitespaceRule::Ascii`]
    /// - no soft wrapping, `tab_width` is [`DEFAULT_TAB_WIDTH`]
    /// - `row_height` is [`DEFAULT_ROW_HEIGHT`]
    /// - `exception_marker` is [`DEFAULT_EXCEPTION_MARKER`]
    pub fn new() -> Self {
        Self {
            source_id: DEFAULT_SOURCE_ID.to_string(),
            whitespace: WhitespaceRule::Ascii,
            wrap_width: None,
            tab_width: DEFAULT_TAB_WIDTH,
            row_height: DEFAULT_ROW_HEIGHT,
            exception_marker: DEFAULT_EXCEPTION_MARKER.to_string(),
        }
    }

    /// Set the playground's file identifier.
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = source_id.into();
        self
    }

    /// Set the command continuation rule.
    pub fn with_whitespace(mut self, whitespace: WhitespaceRule) -> Self {
        self.whitespace = whitespace;
        self
    }

    /// Enable soft wrapping at `width` cells for height hints.
    pub fn with_wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = Some(width);
        self
    }

    /// Set the tab width.
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    /// Set the height of one display row.
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    /// Set the exception marker prefix.
    pub fn with_exception_marker(mut self, marker: impl Into<String>) -> Self {
        self.exception_marker = marker.into();
        self
    }
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self::new()
    }
}
