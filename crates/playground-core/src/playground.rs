//! Playground controller
//!
//! [`Playground`] owns the buffer and every line-indexed annotation derived from it: the token
//! map (highlighting), the diagnostics store and the result cache. It is driven by two kinds of
//! input:
//!
//! - **Edits** ([`Playground::apply_edit`]) keep the token map current. Line-count-preserving
//!   edits re-tokenize only a rescan window, grown while a token (an opened block comment, say)
//!   runs past it; other edits rebuild the map.
//! - **Runs** ([`Playground::run`]) cut the buffer into commands, evaluate them in order and
//!   record results and diagnostics.
//!
//! Renderers never get reached into: they [`subscribe`](Playground::subscribe) to
//! [`PlaygroundEvent`]s and query the playground.
//!
//! # Example
//!
//! ```rust
//! use playground_core::{
//!     DiagnosticsSink, EvalOutput, EvalRequest, Evaluator, Playground, PlaygroundConfig, Token,
//! };
//! use std::convert::Infallible;
//!
//! struct Echo;
//!
//! impl Evaluator for Echo {
//!     type Error = Infallible;
//!
//!     fn evaluate(
//!         &mut self,
//!         request: EvalRequest<'_>,
//!         _diagnostics: &mut dyn DiagnosticsSink,
//!     ) -> Result<EvalOutput, Infallible> {
//!         Ok(EvalOutput::new(request.command.trim(), "String"))
//!     }
//! }
//!
//! let no_tokens = |_line: usize, _column: usize, _text: &str| -> Vec<Token> { Vec::new() };
//! let mut playground = Playground::new("x = 1\ny = 2\n", PlaygroundConfig::new(), no_tokens, Echo);
//!
//! let summary = playground.run();
//! assert_eq!(summary.commands, 2);
//! assert_eq!(playground.results().get(1).unwrap().value, "y = 2");
//! ```

use crate::config::PlaygroundConfig;
use crate::delta::TextEdit;
use crate::diagnostics::{DiagnosticsSink, DiagnosticsStore, Issue, IssueNotification};
use crate::error::PlaygroundError;
use crate::results::{ResultCache, ResultEntry, ResultPresentation, ResultsChange};
use crate::segment::segment;
use crate::span::Line;
use crate::tokens::{RescanOutcome, TokenKind, TokenMap, Tokenizer};
use ropey::Rope;
use std::fmt::Display;
use std::ops::{Range, RangeInclusive};

/// A command handed to an [`Evaluator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalRequest<'a> {
    /// Command text.
    pub command: &'a str,
    /// File identifier to report diagnostics for this command under.
    pub source: &'a str,
    /// Line of the buffer the command starts on.
    pub line: Line,
    /// Index of the command within the current run.
    pub index: usize,
}

/// Rendered value and type of an evaluated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalOutput {
    /// Rendered value.
    pub value: String,
    /// Rendered type.
    pub type_name: String,
}

impl EvalOutput {
    /// Create an evaluation output.
    pub fn new(value: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            type_name: type_name.into(),
        }
    }
}

/// Compiles and evaluates playground commands.
///
/// Called once per command, strictly in buffer order. Diagnostics are reported through the sink
/// while the call is in progress, tagged with the file they belong to.
pub trait Evaluator {
    /// The error type returned when a command cannot be evaluated at all.
    type Error: Display;

    /// Evaluate one command.
    fn evaluate(
        &mut self,
        request: EvalRequest<'_>,
        diagnostics: &mut dyn DiagnosticsSink,
    ) -> Result<EvalOutput, Self::Error>;

    /// Load the module that forms the context of the playground.
    ///
    /// The default implementation ignores the module.
    fn load_module(
        &mut self,
        module_text: &str,
        file: &str,
        import_paths: &[String],
        diagnostics: &mut dyn DiagnosticsSink,
    ) -> Result<(), Self::Error> {
        let _ = (module_text, file, import_paths, diagnostics);
        Ok(())
    }
}

/// Notifications for renderers.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaygroundEvent {
    /// Highlighting of these lines changed.
    LinesChanged(RangeInclusive<Line>),
    /// Diagnostics state changed.
    Issues(IssueNotification),
    /// Result rows changed.
    Results(ResultsChange),
}

/// Playground event callback type.
pub type PlaygroundCallback = Box<dyn FnMut(&PlaygroundEvent) + Send>;

/// Handler for diagnostics that belong to files other than the playground buffer.
pub type UpstreamDiagnostics = Box<dyn FnMut(Issue) + Send>;

/// Outcome of [`Playground::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of commands evaluated.
    pub commands: usize,
    /// Number of commands whose evaluation failed.
    pub failures: usize,
    /// Number of diagnostics filed for the playground buffer.
    pub issues: usize,
}

/// Routes diagnostics by file: the playground's own go to the store, the rest upstream.
struct DiagnosticsRouter<'a> {
    source_id: &'a str,
    store: &'a mut DiagnosticsStore,
    upstream: &'a mut Option<UpstreamDiagnostics>,
}

impl DiagnosticsSink for DiagnosticsRouter<'_> {
    fn report(&mut self, issue: Issue) {
        if issue.filename == self.source_id {
            self.store.file_issue(issue);
        } else if let Some(upstream) = self.upstream.as_mut() {
            upstream(issue);
        } else {
            tracing::debug!(
                file = %issue.filename,
                line = issue.line,
                "no upstream diagnostics handler; dropping issue"
            );
        }
    }
}

/// A playground instance: buffer, annotations and the collaborators that produce them.
pub struct Playground<T, E> {
    config: PlaygroundConfig,
    buffer: Rope,
    token_map: TokenMap,
    tokenizer: T,
    evaluator: E,
    diagnostics: DiagnosticsStore,
    results: ResultCache,
    callbacks: Vec<PlaygroundCallback>,
    upstream: Option<UpstreamDiagnostics>,
}

impl<T, E> Playground<T, E>
where
    T: Tokenizer,
    E: Evaluator,
{
    /// Create a playground for `text` and tokenize it.
    pub fn new(text: &str, config: PlaygroundConfig, mut tokenizer: T, evaluator: E) -> Self {
        let buffer = Rope::from_str(text);
        let token_map = TokenMap::build(&buffer, &mut tokenizer);
        let diagnostics = DiagnosticsStore::new(config.source_id.clone());
        Self {
            config,
            buffer,
            token_map,
            tokenizer,
            evaluator,
            diagnostics,
            results: ResultCache::new(),
            callbacks: Vec::new(),
            upstream: None,
        }
    }

    /// Configuration.
    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    /// The buffer.
    pub fn buffer(&self) -> &Rope {
        &self.buffer
    }

    /// The buffer contents.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Highlighting tokens per line.
    pub fn token_map(&self) -> &TokenMap {
        &self.token_map
    }

    /// Diagnostics of the playground buffer.
    pub fn diagnostics(&self) -> &DiagnosticsStore {
        &self.diagnostics
    }

    /// Per-command results.
    pub fn results(&self) -> &ResultCache {
        &self.results
    }

    /// How to display the result of command `row`, using the configured exception marker.
    pub fn presentation(&self, row: usize) -> Option<ResultPresentation> {
        self.results
            .get(row)
            .map(|entry| entry.presentation_with_marker(&self.config.exception_marker))
    }

    /// The evaluator.
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Mutable access to the evaluator.
    pub fn evaluator_mut(&mut self) -> &mut E {
        &mut self.evaluator
    }

    /// Subscribe to playground events.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&PlaygroundEvent) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Install the handler for diagnostics of files other than the playground buffer.
    pub fn set_upstream_diagnostics<F>(&mut self, handler: F)
    where
        F: FnMut(Issue) + Send + 'static,
    {
        self.upstream = Some(Box::new(handler));
    }

    fn emit(&mut self, event: PlaygroundEvent) {
        for callback in &mut self.callbacks {
            callback(&event);
        }
    }

    fn all_lines(&self) -> RangeInclusive<Line> {
        1..=self.token_map.last_line()
    }

    fn rebuild(&mut self) -> RangeInclusive<Line> {
        self.token_map = TokenMap::build(&self.buffer, &mut self.tokenizer);
        self.all_lines()
    }

    /// Replace the whole buffer and re-tokenize it.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = Rope::from_str(text);
        let lines = self.rebuild();
        tracing::debug!(lines = *lines.end(), "playground text replaced");
        self.emit(PlaygroundEvent::LinesChanged(lines));
    }

    /// Apply `edit` to the buffer and bring the token map up to date.
    ///
    /// Returns the lines whose highlighting was recomputed (also announced as
    /// [`PlaygroundEvent::LinesChanged`]).
    pub fn apply_edit(&mut self, edit: &TextEdit) -> Result<RangeInclusive<Line>, PlaygroundError> {
        let len = self.buffer.len_chars();
        let end = edit.end();
        if edit.start > len || end > len {
            return Err(PlaygroundError::InvalidEdit {
                start: edit.start,
                end,
                len,
            });
        }
        if self.buffer.slice(edit.start..end) != edit.deleted_text.as_str() {
            return Err(PlaygroundError::EditMismatch { start: edit.start });
        }

        // Lines touched by the edit, in pre-edit terms.
        let index = self.token_map.line_index();
        let first = index.line_at(edit.start).unwrap_or(1);
        let last = index.line_at(end).unwrap_or(first);
        let window = self.token_map.covering_window(first..last + 1);

        self.buffer.remove(edit.start..end);
        self.buffer.insert(edit.start, &edit.inserted_text);

        let lines = if edit.preserves_line_count() {
            match self.rescan_until_settled(window) {
                Ok(lines) => lines,
                Err(err) => {
                    tracing::warn!(%err, "incremental rescan rejected; rebuilding token map");
                    self.rebuild()
                }
            }
        } else {
            tracing::debug!(first, last, "edit changes the line count; rebuilding token map");
            self.rebuild()
        };
        self.emit(PlaygroundEvent::LinesChanged(lines.clone()));
        Ok(lines)
    }

    /// Rescan `window`, widening it while a rescanned token runs past its last line.
    ///
    /// Each retry at least doubles the window and re-covers the old tokens at the new end, so
    /// the loop stops at the latest when the window reaches the end of the buffer.
    fn rescan_until_settled(
        &mut self,
        mut window: Range<Line>,
    ) -> Result<RangeInclusive<Line>, PlaygroundError> {
        loop {
            let outcome = self
                .token_map
                .rescan(window.clone(), &self.buffer, &mut self.tokenizer)?;
            let RescanOutcome::Overflow { last_line } = outcome else {
                return Ok(window.start..=window.end - 1);
            };
            let end = (last_line + 1).max(window.end + window.len());
            let widened = self.token_map.covering_window(window.start..end);
            tracing::debug!(
                first = widened.start,
                last = widened.end - 1,
                reached = last_line,
                "token continues past the rescan window; widening"
            );
            window = widened.start.min(window.start)..widened.end;
        }
    }

    /// Highlighting spans (token kind, character range) for `lines`.
    pub fn highlight_spans(&self, lines: RangeInclusive<Line>) -> Vec<(TokenKind, Range<usize>)> {
        self.token_map
            .highlight_spans(*lines.start()..lines.end().saturating_add(1))
    }

    /// Evaluate all commands of the buffer from top to bottom.
    ///
    /// Previous diagnostics become pending and previous results stale; each command's result is
    /// reported as soon as it is available. An evaluation failure becomes an exception result
    /// for that command and the run continues.
    pub fn run(&mut self) -> RunSummary {
        let source = self.buffer.to_string();
        tracing::debug!(chars = self.buffer.len_chars(), "playground run started");

        let notification = self.diagnostics.begin_run();
        self.emit(PlaygroundEvent::Issues(notification));
        let change = self.results.invalidate();
        self.emit(PlaygroundEvent::Results(change));

        let mut commands = 0usize;
        let mut failures = 0usize;
        for (index, command) in segment(&source, self.config.whitespace).enumerate() {
            tracing::trace!(index, line = command.start_line, "evaluating command");
            let request = EvalRequest {
                command: command.text,
                source: &self.config.source_id,
                line: command.start_line,
                index,
            };
            let mut router = DiagnosticsRouter {
                source_id: &self.config.source_id,
                store: &mut self.diagnostics,
                upstream: &mut self.upstream,
            };
            let output = match self.evaluator.evaluate(request, &mut router) {
                Ok(output) => output,
                Err(err) => {
                    tracing::warn!(index, line = command.start_line, %err, "evaluation failed");
                    failures += 1;
                    EvalOutput::new(format!("{}{err}", self.config.exception_marker), "")
                }
            };

            let rows = command.display_rows(self.config.wrap_width, self.config.tab_width);
            let entry = ResultEntry::new(
                output.value,
                output.type_name,
                rows as f64 * self.config.row_height,
            );
            let change = self.results.report(index, entry);
            self.emit(PlaygroundEvent::Results(change));
            commands += 1;
        }

        if self.results.len() > commands {
            let change = self.results.prune(commands);
            self.emit(PlaygroundEvent::Results(change));
        }

        let notification = self.diagnostics.finish_run();
        self.emit(PlaygroundEvent::Issues(notification));

        let summary = RunSummary {
            commands,
            failures,
            issues: self.diagnostics.issues().len(),
        };
        tracing::debug!(?summary, "playground run finished");
        summary
    }

    /// Load the context module into the evaluator.
    ///
    /// Diagnostics are routed like those of a run: issues for the playground buffer are filed
    /// into its store, all others go upstream.
    pub fn load_context_module(
        &mut self,
        module_text: &str,
        file: &str,
        import_paths: &[String],
    ) -> Result<(), E::Error> {
        tracing::debug!(file, "loading context module");
        let mut router = DiagnosticsRouter {
            source_id: &self.config.source_id,
            store: &mut self.diagnostics,
            upstream: &mut self.upstream,
        };
        self.evaluator
            .load_module(module_text, file, import_paths, &mut router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::span::Column;
    use crate::tokens::Token;
    use pretty_assertions::assert_eq;
    use std::convert::Infallible;
    use std::sync::{Arc, Mutex};

    fn no_tokens(_line: Line, _column: Column, _text: &str) -> Vec<Token> {
        Vec::new()
    }

    fn issue(file: &str, line: Line) -> Issue {
        Issue {
            severity: Severity::Warning,
            filename: file.to_string(),
            line,
            column: 1,
            lines: 1,
            end_column: 2,
            message: "unused".to_string(),
        }
    }

    struct Echo;

    impl Evaluator for Echo {
        type Error = Infallible;

        fn evaluate(
            &mut self,
            request: EvalRequest<'_>,
            _diagnostics: &mut dyn DiagnosticsSink,
        ) -> Result<EvalOutput, Infallible> {
            Ok(EvalOutput::new(request.command.trim_end(), ""))
        }
    }

    #[test]
    fn test_router_splits_by_file() {
        let mut store = DiagnosticsStore::new("<playground>");
        let forwarded = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&forwarded);
        let mut upstream: Option<UpstreamDiagnostics> =
            Some(Box::new(move |issue: Issue| sink.lock().unwrap().push(issue)));

        let mut router = DiagnosticsRouter {
            source_id: "<playground>",
            store: &mut store,
            upstream: &mut upstream,
        };
        router.report(issue("<playground>", 3));
        router.report(issue("Context.hs", 7));

        assert_eq!(store.issues().len(), 1);
        assert_eq!(forwarded.lock().unwrap().as_slice(), &[issue("Context.hs", 7)]);
    }

    #[test]
    fn test_router_without_upstream_drops_foreign_issues() {
        let mut store = DiagnosticsStore::new("<playground>");
        let mut upstream = None;
        let mut router = DiagnosticsRouter {
            source_id: "<playground>",
            store: &mut store,
            upstream: &mut upstream,
        };
        router.report(issue("Other.hs", 1));
        assert!(store.issues().is_empty());
    }

    #[test]
    fn test_apply_edit_rejects_out_of_range() {
        let mut playground = Playground::new("ab\n", PlaygroundConfig::new(), no_tokens, Echo);
        assert_eq!(
            playground.apply_edit(&TextEdit::delete(2, "\n\n")),
            Err(PlaygroundError::InvalidEdit {
                start: 2,
                end: 4,
                len: 3
            })
        );
        assert_eq!(playground.text(), "ab\n");
    }

    #[test]
    fn test_apply_edit_rejects_mismatched_text() {
        let mut playground = Playground::new("ab\n", PlaygroundConfig::new(), no_tokens, Echo);
        assert_eq!(
            playground.apply_edit(&TextEdit::replace(0, "x", "y")),
            Err(PlaygroundError::EditMismatch { start: 0 })
        );
        assert_eq!(playground.text(), "ab\n");
    }

    #[test]
    fn test_apply_edit_reports_changed_lines() {
        let mut playground =
            Playground::new("a\nb\nc\n", PlaygroundConfig::new(), no_tokens, Echo);
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        playground.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        let lines = playground.apply_edit(&TextEdit::replace(2, "b", "bb")).unwrap();
        assert_eq!(lines, 2..=2);

        let lines = playground.apply_edit(&TextEdit::insert(0, "z\n")).unwrap();
        assert_eq!(lines, 1..=playground.token_map().last_line());

        assert_eq!(
            events.lock().unwrap().as_slice(),
            &[
                PlaygroundEvent::LinesChanged(2..=2),
                PlaygroundEvent::LinesChanged(lines),
            ]
        );
    }

    #[test]
    fn test_run_event_order() {
        let mut playground = Playground::new("a\nb\n", PlaygroundConfig::new(), no_tokens, Echo);
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        playground.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        playground.run();
        assert_eq!(
            events.lock().unwrap().as_slice(),
            &[
                PlaygroundEvent::Issues(IssueNotification::IssuesPending),
                PlaygroundEvent::Results(ResultsChange::All),
                PlaygroundEvent::Results(ResultsChange::Row(0)),
                PlaygroundEvent::Results(ResultsChange::Row(1)),
                PlaygroundEvent::Issues(IssueNotification::NoIssues),
            ]
        );
    }
}
