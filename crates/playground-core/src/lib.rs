#![warn(missing_docs)]
//! Playground Core - Incremental Line-Indexed Annotation Engine
//!
//! # Overview
//!
//! `playground-core` keeps the annotations of an interactive code playground in step with its
//! text buffer: syntax highlighting tokens, compiler diagnostics and per-command evaluation
//! results. It does no rendering and no compiling; the host supplies a [`Tokenizer`] and an
//! [`Evaluator`] and listens to [`PlaygroundEvent`]s.
//!
//! # Core Features
//!
//! - **Line Index**: line start offsets, patched in place for line-count-preserving edits
//! - **Incremental Highlighting**: only a rescan window around an edit is re-tokenized
//! - **Diagnostics**: issues keyed by line, with a pending state while a run is in progress
//! - **Command Segmentation**: off-side rule; indented and blank lines continue a command
//! - **Result Cache**: index-addressed results that go stale instead of disappearing
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Playground (edits, runs, events)           │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Gutter State / Result Presentation         │  ← Rendering Data
//! ├──────────────────────┬──────────────────────┤
//! │  Diagnostics Store   │  Result Cache        │  ← Run Annotations
//! ├──────────────────────┴──────────────────────┤
//! │  Token Map (rescan windows)                 │  ← Highlighting
//! ├─────────────────────────────────────────────┤
//! │  Line Index                                 │  ← Line Access
//! ├─────────────────────────────────────────────┤
//! │  Rope Buffer                                │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use playground_core::{
//!     DiagnosticsSink, EvalOutput, EvalRequest, Evaluator, Issue, Playground, PlaygroundConfig,
//!     Severity, TextEdit, Token,
//! };
//!
//! struct Lengths;
//!
//! impl Evaluator for Lengths {
//!     type Error = String;
//!
//!     fn evaluate(
//!         &mut self,
//!         request: EvalRequest<'_>,
//!         diagnostics: &mut dyn DiagnosticsSink,
//!     ) -> Result<EvalOutput, String> {
//!         if request.command.contains("undefined") {
//!             diagnostics.report(Issue {
//!                 severity: Severity::Error,
//!                 filename: request.source.to_string(),
//!                 line: request.line,
//!                 column: 1,
//!                 lines: 1,
//!                 end_column: 10,
//!                 message: "Prelude.undefined".to_string(),
//!             });
//!             return Err("Prelude.undefined".to_string());
//!         }
//!         Ok(EvalOutput::new(request.command.trim().len().to_string(), "Int"))
//!     }
//! }
//!
//! let no_tokens = |_line: usize, _column: usize, _text: &str| -> Vec<Token> { Vec::new() };
//! let mut playground =
//!     Playground::new("a = 1\nb = undefined\n", PlaygroundConfig::new(), no_tokens, Lengths);
//!
//! let summary = playground.run();
//! assert_eq!(summary.commands, 2);
//! assert_eq!(summary.failures, 1);
//! assert_eq!(playground.diagnostics().issues().max_severity_at(2), Some(Severity::Error));
//! assert!(playground.results().get(1).unwrap().value.starts_with("** Exception: "));
//!
//! // Edits keep the highlighting current; results stay until the next run.
//! playground.apply_edit(&TextEdit::replace(4, "1", "2")).unwrap();
//! assert_eq!(playground.text(), "a = 2\nb = undefined\n");
//! ```
//!
//! # Module Description
//!
//! - [`span`] - line/column positions and multi-line spans
//! - [`line_index`] - line start offsets with in-place updates
//! - [`tokens`] - tokenizer interface and the incremental token map
//! - [`diagnostics`] - issues, the per-file issue map and the diagnostics store
//! - [`gutter`] - gutter marks derived from issue notifications
//! - [`segment`] - command segmentation
//! - [`results`] - result cache and result presentation
//! - [`layout`] - cell widths and visual row counts
//! - [`delta`] - buffer edit descriptors
//! - [`playground`] - the controller tying it all together
//!
//! # Coordinates
//!
//! - Lines and columns are 1-based; offsets are 0-based character (Unicode scalar) offsets
//! - `'\n'` is the only line terminator
//! - A span's `end_column` is exclusive

pub mod config;
pub mod delta;
pub mod diagnostics;
pub mod error;
pub mod gutter;
pub mod layout;
pub mod line_index;
pub mod playground;
pub mod results;
pub mod segment;
pub mod span;
pub mod tokens;

pub use config::{
    DEFAULT_EXCEPTION_MARKER, DEFAULT_ROW_HEIGHT, DEFAULT_SOURCE_ID, PlaygroundConfig,
};
pub use delta::TextEdit;
pub use diagnostics::{
    DiagnosticsSink, DiagnosticsStatus, DiagnosticsStore, Issue, IssueNotification,
    IssuesForFile, Severity, max_severity,
};
pub use error::PlaygroundError;
pub use gutter::{GutterMark, GutterState};
pub use layout::{DEFAULT_TAB_WIDTH, visual_rows};
pub use line_index::LineIndex;
pub use playground::{
    EvalOutput, EvalRequest, Evaluator, Playground, PlaygroundCallback, PlaygroundEvent,
    RunSummary, UpstreamDiagnostics,
};
pub use results::{ResultCache, ResultEmphasis, ResultEntry, ResultPresentation, ResultsChange};
pub use segment::{Command, Segmenter, WhitespaceRule, segment};
pub use span::{Column, Line, Position, Span};
pub use tokens::{RescanOutcome, Token, TokenKind, TokenMap, Tokenizer};
