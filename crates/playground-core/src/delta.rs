//! Buffer edit descriptors.
//!
//! Edits are expressed in character offsets (Unicode scalar values) and carry the exact deleted
//! text, so the engine can check them against the buffer and tell whether the edit changes the
//! number of lines.

/// A single replacement in the playground buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Start character offset of the edit.
    pub start: usize,
    /// Exact deleted text (may be empty).
    pub deleted_text: String,
    /// Exact inserted text (may be empty).
    pub inserted_text: String,
}

impl TextEdit {
    /// Insert `text` at `start`.
    pub fn insert(start: usize, text: impl Into<String>) -> Self {
        Self::replace(start, "", text)
    }

    /// Delete `text`, which the buffer holds at `start`.
    pub fn delete(start: usize, text: impl Into<String>) -> Self {
        Self::replace(start, text, "")
    }

    /// Replace `deleted` at `start` by `inserted`.
    pub fn replace(start: usize, deleted: impl Into<String>, inserted: impl Into<String>) -> Self {
        Self {
            start,
            deleted_text: deleted.into(),
            inserted_text: inserted.into(),
        }
    }

    /// Length of `deleted_text` in characters.
    pub fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    /// Length of `inserted_text` in characters.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Exclusive end character offset in the pre-edit buffer.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.deleted_len())
    }

    /// Returns `true` if the edit removes as many line terminators as it inserts.
    pub fn preserves_line_count(&self) -> bool {
        count_newlines(&self.deleted_text) == count_newlines(&self.inserted_text)
    }
}

fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_lengths() {
        let edit = TextEdit::replace(3, "λx", "\\x ->");
        assert_eq!(edit.deleted_len(), 2);
        assert_eq!(edit.inserted_len(), 5);
        assert_eq!(edit.end(), 5);
        assert!(edit.preserves_line_count());
    }

    #[test]
    fn test_line_count_change() {
        assert!(!TextEdit::insert(0, "a\nb").preserves_line_count());
        assert!(!TextEdit::delete(0, "\n").preserves_line_count());
        assert!(TextEdit::replace(0, "a\n", "\nb").preserves_line_count());
    }
}
