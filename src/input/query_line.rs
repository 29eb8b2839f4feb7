//! Query line editing.
//!
//! Handles character insertion, deletion and cursor movement for the
//! single-line pattern input. The cursor is a char index, never a byte
//! offset, so multi-byte input edits cleanly.

/// Editing operations the frontend can apply to the query line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edit {
    Insert(char),
    DeleteBackward,
    DeleteForward,
    Left,
    Right,
    Home,
    End,
    Clear,
}

/// Single-line text buffer with a cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryLine {
    chars: Vec<char>,
    cursor: usize,
}

impl QueryLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Apply an edit. Returns true if the text changed (cursor-only moves
    /// return false).
    pub fn apply(&mut self, edit: Edit) -> bool {
        match edit {
            Edit::Insert(ch) => {
                self.chars.insert(self.cursor, ch);
                self.cursor += 1;
                true
            }
            Edit::DeleteBackward => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                self.chars.remove(self.cursor);
                true
            }
            Edit::DeleteForward => {
                if self.cursor >= self.chars.len() {
                    return false;
                }
                self.chars.remove(self.cursor);
                true
            }
            Edit::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            Edit::Right => {
                self.cursor = (self.cursor + 1).min(self.chars.len());
                false
            }
            Edit::Home => {
                self.cursor = 0;
                false
            }
            Edit::End => {
                self.cursor = self.chars.len();
                false
            }
            Edit::Clear => {
                let changed = !self.chars.is_empty();
                self.chars.clear();
                self.cursor = 0;
                changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> QueryLine {
        let mut line = QueryLine::new();
        for ch in text.chars() {
            line.apply(Edit::Insert(ch));
        }
        line
    }

    #[test]
    fn test_insert_and_backspace() {
        let mut line = typed("smith");
        assert_eq!(line.text(), "smith");
        assert_eq!(line.cursor(), 5);

        assert!(line.apply(Edit::DeleteBackward));
        assert_eq!(line.text(), "smit");
    }

    #[test]
    fn test_insert_in_middle() {
        let mut line = typed("smth");
        line.apply(Edit::Left);
        line.apply(Edit::Left);
        line.apply(Edit::Insert('i'));
        assert_eq!(line.text(), "smith");
        assert_eq!(line.cursor(), 3);
    }

    #[test]
    fn test_boundaries_do_not_change_text() {
        let mut line = typed("ab");
        assert!(!line.apply(Edit::DeleteForward));
        line.apply(Edit::Home);
        assert!(!line.apply(Edit::DeleteBackward));
        assert!(!line.apply(Edit::Left));
        assert_eq!(line.cursor(), 0);
        assert!(line.apply(Edit::DeleteForward));
        assert_eq!(line.text(), "b");
    }

    #[test]
    fn test_multibyte() {
        let mut line = QueryLine::with_text("Gödel");
        line.apply(Edit::Home);
        line.apply(Edit::Right);
        line.apply(Edit::DeleteForward);
        assert_eq!(line.text(), "Gdel");
    }

    #[test]
    fn test_clear() {
        let mut line = typed("x");
        assert!(line.apply(Edit::Clear));
        assert!(line.is_empty());
        assert!(!line.apply(Edit::Clear));
    }
}
