//! Gutter decorations derived from diagnostics notifications.
//!
//! A renderer feeds every [`IssueNotification`] into a [`GutterState`] and asks it, per visible
//! line, whether to draw a severity marker. While a run is pending, the previous issues stay
//! visible but dimmed.

use crate::diagnostics::{IssueNotification, IssuesForFile, Severity};
use crate::span::Line;

/// Marker to draw next to a line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GutterMark {
    /// Highest severity reported on the line (`Error` or `Warning`).
    pub severity: Severity,
    /// The issues are from a superseded run.
    pub dimmed: bool,
}

/// Issues currently shown in a gutter.
#[derive(Debug, Clone, Default)]
pub struct GutterState {
    issues: Option<IssuesForFile>,
    dimmed: bool,
}

impl GutterState {
    /// A gutter without issues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a diagnostics notification.
    pub fn apply(&mut self, notification: &IssueNotification) {
        match notification {
            IssueNotification::NoIssues => {
                self.dimmed = false;
                self.issues = None;
            }
            IssueNotification::IssuesPending => self.dimmed = true,
            IssueNotification::Issues(issues) => {
                self.dimmed = false;
                self.issues = Some(issues.clone());
            }
        }
    }

    /// Whether the shown issues are stale.
    pub fn is_dimmed(&self) -> bool {
        self.dimmed
    }

    /// Marker for `line`; lines whose worst issue is [`Severity::Other`] get none.
    pub fn mark(&self, line: Line) -> Option<GutterMark> {
        let severity = self.issues.as_ref()?.max_severity_at(line)?;
        match severity {
            Severity::Error | Severity::Warning => Some(GutterMark {
                severity,
                dimmed: self.dimmed,
            }),
            Severity::Other => None,
        }
    }

    /// Concatenated messages of all issues on `line`, for a popover.
    pub fn messages(&self, line: Line) -> Option<String> {
        let issues = self.issues.as_ref()?.issues_on_line(line)?;
        Some(issues.iter().map(|issue| issue.message.as_str()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Issue;

    fn issues() -> IssuesForFile {
        let issue = |severity, line, message: &str| Issue {
            severity,
            filename: "<playground>".to_string(),
            line,
            column: 1,
            lines: 1,
            end_column: 2,
            message: message.to_string(),
        };
        IssuesForFile::new("<playground>")
            .with_issue(issue(Severity::Warning, 1, "defaulting\n"))
            .with_issue(issue(Severity::Error, 1, "not in scope\n"))
            .with_issue(issue(Severity::Other, 2, "note\n"))
    }

    #[test]
    fn test_marks_follow_notifications() {
        let mut gutter = GutterState::new();
        assert_eq!(gutter.mark(1), None);

        gutter.apply(&IssueNotification::Issues(issues()));
        assert_eq!(
            gutter.mark(1),
            Some(GutterMark {
                severity: Severity::Error,
                dimmed: false
            })
        );
        assert_eq!(gutter.mark(2), None);
        assert_eq!(gutter.mark(3), None);

        gutter.apply(&IssueNotification::IssuesPending);
        assert_eq!(gutter.mark(1).map(|m| m.dimmed), Some(true));

        gutter.apply(&IssueNotification::NoIssues);
        assert_eq!(gutter.mark(1), None);
        assert!(!gutter.is_dimmed());
    }

    #[test]
    fn test_messages_concatenated() {
        let mut gutter = GutterState::new();
        gutter.apply(&IssueNotification::Issues(issues()));
        let messages = gutter.messages(1).unwrap();
        assert!(messages.contains("defaulting"));
        assert!(messages.contains("not in scope"));
        assert_eq!(gutter.messages(5), None);
    }
}
