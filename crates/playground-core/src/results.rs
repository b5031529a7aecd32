//! Per-command evaluation results.
//!
//! The cache is addressed by command index within the current buffer. Its length equals the
//! number of commands known so far; slots that have not been reported are explicitly empty.
//! Every mutation returns the [`ResultsChange`] a results view has to redisplay.

use crate::config::DEFAULT_EXCEPTION_MARKER;

/// Rows of a results view that need redisplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsChange {
    /// Only the row for this command index changed.
    Row(usize),
    /// Any row may have changed (including the row count).
    All,
}

/// The result of evaluating one command.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEntry {
    /// Rendered value.
    pub value: String,
    /// Rendered type.
    pub type_name: String,
    /// Display height hint.
    pub height: f64,
    /// The result belongs to a superseded run and is being recomputed.
    pub stale: bool,
}

/// How a value is emphasized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultEmphasis {
    /// Ordinary value.
    Plain,
    /// The value renders an exception.
    Exception,
    /// The value is an informational note (wrapped in `«…»`).
    Note,
}

/// Presentation attributes of a result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultPresentation {
    /// Emphasis of the value.
    pub emphasis: ResultEmphasis,
    /// Draw the row dimmed (stale result).
    pub dimmed: bool,
    /// Whether the value is shown at all (an empty value shows the type only).
    pub show_value: bool,
}

impl ResultEntry {
    /// A fresh result.
    pub fn new(value: impl Into<String>, type_name: impl Into<String>, height: f64) -> Self {
        Self {
            value: value.into(),
            type_name: type_name.into(),
            height,
            stale: false,
        }
    }

    /// Presentation using the default exception marker. A playground configured with another
    /// marker presents its results through `Playground::presentation`.
    pub fn presentation(&self) -> ResultPresentation {
        self.presentation_with_marker(DEFAULT_EXCEPTION_MARKER)
    }

    /// Presentation recognizing values starting with `exception_marker` as exceptions.
    pub fn presentation_with_marker(&self, exception_marker: &str) -> ResultPresentation {
        let value = self.value.as_str();
        let emphasis = if !exception_marker.is_empty() && value.starts_with(exception_marker) {
            ResultEmphasis::Exception
        } else if value.starts_with('«') && value.ends_with('»') {
            ResultEmphasis::Note
        } else {
            ResultEmphasis::Plain
        };
        ResultPresentation {
            emphasis,
            dimmed: self.stale,
            show_value: !value.is_empty(),
        }
    }
}

/// Index-addressed cache of per-command results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultCache {
    slots: Vec<Option<ResultEntry>>,
}

impl ResultCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots (commands known so far).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Result in slot `index`, if that slot exists and is populated.
    pub fn get(&self, index: usize) -> Option<&ResultEntry> {
        self.slots.get(index)?.as_ref()
    }

    /// All slots in command order.
    pub fn slots(&self) -> &[Option<ResultEntry>] {
        &self.slots
    }

    /// Height of the row for `index`; zero for empty or missing slots.
    pub fn row_height(&self, index: usize) -> f64 {
        self.get(index).map_or(0.0, |entry| entry.height)
    }

    /// Store `entry` as the fresh result of command `index`, growing the cache with empty slots
    /// if needed.
    pub fn report(&mut self, index: usize, mut entry: ResultEntry) -> ResultsChange {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        entry.stale = false;
        self.slots[index] = Some(entry);
        ResultsChange::Row(index)
    }

    /// Mark every populated slot as stale; values and the slot count are unchanged.
    pub fn invalidate(&mut self) -> ResultsChange {
        for entry in self.slots.iter_mut().flatten() {
            entry.stale = true;
        }
        ResultsChange::All
    }

    /// Discard every slot from `index` on.
    pub fn prune(&mut self, index: usize) -> ResultsChange {
        self.slots.truncate(index);
        ResultsChange::All
    }
}
