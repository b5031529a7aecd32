//! Line-keyed diagnostics.
//!
//! Issues reported for a file are grouped by the line they start on. The per-run store tracks
//! whether the current set is fresh or being recomputed, and produces the notifications a
//! gutter consumes (see [`crate::gutter`]).

use crate::span::{Column, Line, Position, Span};
use std::collections::{BTreeMap, BTreeSet};

/// Diagnostic severity levels, ordered `Other < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Anything that is neither an error nor a warning.
    Other,
    /// Warning diagnostics.
    Warning,
    /// Error diagnostics.
    Error,
}

/// A single diagnostic reported by the compiler or evaluator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Issue {
    /// Severity of the issue.
    pub severity: Severity,
    /// Name of the file the issue belongs to.
    pub filename: String,
    /// First line of the issue.
    pub line: Line,
    /// First column of the issue.
    pub column: Column,
    /// Number of lines covered.
    pub lines: usize,
    /// Column just past the issue's last character on its final line.
    pub end_column: Column,
    /// Human readable message.
    pub message: String,
}

impl Issue {
    /// Source extent of the issue.
    pub fn span(&self) -> Span {
        Span::new(Position::new(self.line, self.column), self.lines, self.end_column)
    }
}

/// Receives issues while a compile or evaluation is in progress.
pub trait DiagnosticsSink {
    /// Report a single issue.
    fn report(&mut self, issue: Issue);
}

impl<F> DiagnosticsSink for F
where
    F: FnMut(Issue),
{
    fn report(&mut self, issue: Issue) {
        self(issue)
    }
}

/// Highest severity among `issues`, or `None` if there are none.
pub fn max_severity<'a, I>(issues: I) -> Option<Severity>
where
    I: IntoIterator<Item = &'a Issue>,
{
    issues.into_iter().map(|issue| issue.severity).max()
}

/// All issues of one file, keyed by line.
///
/// Every key maps to a non-empty set. Identical reports collapse (set semantics); distinct
/// reports on the same line are all kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuesForFile {
    file: String,
    issues: BTreeMap<Line, BTreeSet<Issue>>,
}

impl IssuesForFile {
    /// An empty bin for `file`.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            issues: BTreeMap::new(),
        }
    }

    /// File identifier.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// File `issue` under its start line.
    pub fn add_issue(&mut self, issue: Issue) {
        self.issues.entry(issue.line).or_default().insert(issue);
    }

    /// Consuming variant of [`add_issue`](Self::add_issue).
    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.add_issue(issue);
        self
    }

    /// Issues reported on `line`.
    pub fn issues_on_line(&self, line: Line) -> Option<&BTreeSet<Issue>> {
        self.issues.get(&line)
    }

    /// Highest severity reported on `line`.
    pub fn max_severity_at(&self, line: Line) -> Option<Severity> {
        self.issues_on_line(line).and_then(max_severity)
    }

    /// Lines with at least one issue, ascending.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.issues.keys().copied()
    }

    /// All issues, by ascending line.
    pub fn iter(&self) -> impl Iterator<Item = &Issue> + '_ {
        self.issues.values().flatten()
    }

    /// Total number of issues.
    pub fn len(&self) -> usize {
        self.issues.values().map(BTreeSet::len).sum()
    }

    /// Returns `true` if no issue has been filed.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Drop all issues.
    pub fn clear(&mut self) {
        self.issues.clear();
    }
}

/// Diagnostics state as surfaced to a gutter or problems view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueNotification {
    /// The last run produced no diagnostics.
    NoIssues,
    /// A run is in progress; previously shown issues are stale.
    IssuesPending,
    /// Fresh diagnostics are available.
    Issues(IssuesForFile),
}

/// Status of a [`DiagnosticsStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticsStatus {
    /// No run in progress, and the last one (if any) reported nothing.
    NoIssues,
    /// A run is collecting diagnostics.
    Pending,
    /// No run in progress; the last one reported issues.
    Issues,
}

/// Working set of diagnostics for the playground file across runs.
#[derive(Debug, Clone)]
pub struct DiagnosticsStore {
    issues: IssuesForFile,
    status: DiagnosticsStatus,
}

impl DiagnosticsStore {
    /// Create an empty store for `file`.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            issues: IssuesForFile::new(file),
            status: DiagnosticsStatus::NoIssues,
        }
    }

    /// Current status.
    pub fn status(&self) -> DiagnosticsStatus {
        self.status
    }

    /// Issues collected so far (for a pending run) or by the last run.
    pub fn issues(&self) -> &IssuesForFile {
        &self.issues
    }

    /// Start a run: clears the working set and moves to [`DiagnosticsStatus::Pending`].
    pub fn begin_run(&mut self) -> IssueNotification {
        self.issues.clear();
        self.status = DiagnosticsStatus::Pending;
        IssueNotification::IssuesPending
    }

    /// File an issue into the working set.
    pub fn file_issue(&mut self, issue: Issue) {
        self.issues.add_issue(issue);
    }

    /// Finish a run and report the fresh state.
    pub fn finish_run(&mut self) -> IssueNotification {
        if self.issues.is_empty() {
            self.status = DiagnosticsStatus::NoIssues;
            IssueNotification::NoIssues
        } else {
            self.status = DiagnosticsStatus::Issues;
            IssueNotification::Issues(self.issues.clone())
        }
    }
}
