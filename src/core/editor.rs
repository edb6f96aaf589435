//! Input line editor and command history.

use std::collections::VecDeque;

/// Fixed-capacity line currently being typed.
///
/// Out-of-range requests (typing into a full line, deleting at column zero,
/// moving past either end) are ignored rather than reported.
#[derive(Debug, Clone)]
pub struct LineEditor {
    buffer: Vec<char>,
    cursor: usize,
    capacity: usize,
}

impl LineEditor {
    /// Create an empty line holding at most `capacity` characters.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            cursor: 0,
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of characters typed.
    #[inline]
    pub fn count(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Current contents.
    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    /// Insert a character at the cursor. Ignored when full or for control
    /// characters.
    pub fn insert(&mut self, ch: char) -> bool {
        if self.buffer.len() >= self.capacity || ch.is_control() {
            return false;
        }
        self.buffer.insert(self.cursor, ch);
        self.cursor += 1;
        true
    }

    /// Remove the character before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.buffer.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.buffer.len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.len();
    }

    /// Replace the contents, truncated to capacity, with the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.clear();
        self.buffer.extend(text.chars().filter(|c| !c.is_control()).take(self.capacity));
        self.cursor = self.buffer.len();
    }

    /// Take the contents and reset to an empty line.
    pub fn submit(&mut self) -> String {
        let line = self.text();
        self.buffer.clear();
        self.cursor = 0;
        line
    }

    /// The word the cursor sits at the end of, and where it starts.
    pub(crate) fn word_before_cursor(&self) -> (usize, String) {
        let start = self.buffer[..self.cursor]
            .iter()
            .rposition(|c| c.is_whitespace() || *c == '(')
            .map_or(0, |i| i + 1);
        (start, self.buffer[start..self.cursor].iter().collect())
    }

    /// Replace `start..cursor` with `replacement`, keeping the tail.
    pub(crate) fn replace_before_cursor(&mut self, start: usize, replacement: &str) {
        let tail: Vec<char> = self.buffer.split_off(self.cursor);
        self.buffer.truncate(start);
        self.cursor = start;
        for ch in replacement.chars() {
            self.insert(ch);
        }
        let room = self.capacity.saturating_sub(self.buffer.len());
        self.buffer.extend(tail.into_iter().take(room));
    }
}

/// Bounded in-memory history of submitted lines with up/down recall.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    /// Newest first.
    entries: VecDeque<String>,
    limit: usize,
    /// 0 = editing the draft, 1.. = recalled entry.
    index: usize,
    draft: String,
}

impl CommandHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
            index: 0,
            draft: String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Record a submitted line and reset navigation.
    pub fn push(&mut self, line: &str) {
        self.index = 0;
        self.draft.clear();

        let line = line.trim();
        if line.is_empty() || self.limit == 0 {
            return;
        }
        // Avoid duplicates at the top
        if self.entries.front().map(String::as_str) == Some(line) {
            return;
        }
        if self.entries.len() == self.limit {
            self.entries.pop_back();
        }
        self.entries.push_front(line.to_string());
    }

    /// Step to an older entry. `current` is the text being edited, saved as
    /// the draft when navigation starts.
    pub fn older(&mut self, current: &str) -> Option<&str> {
        if self.index >= self.entries.len() {
            return None;
        }
        if self.index == 0 {
            self.draft = current.to_string();
        }
        self.index += 1;
        self.entries.get(self.index - 1).map(String::as_str)
    }

    /// Step to a newer entry, ending at the saved draft.
    pub fn newer(&mut self) -> Option<&str> {
        match self.index {
            0 => None,
            1 => {
                self.index = 0;
                Some(&self.draft)
            }
            _ => {
                self.index -= 1;
                self.entries.get(self.index - 1).map(String::as_str)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backspace_on_empty_is_noop() {
        let mut editor = LineEditor::new(8);
        assert!(!editor.backspace());
        assert_eq!(editor.cursor(), 0);
        assert_eq!(editor.count(), 0);
    }

    #[test]
    fn test_insert_beyond_capacity() {
        let mut editor = LineEditor::new(3);
        for ch in "abcdef".chars() {
            editor.insert(ch);
        }
        assert_eq!(editor.count(), 3);
        assert_eq!(editor.text(), "abc");
        assert_eq!(editor.cursor(), 3);
    }

    #[test]
    fn test_submit_clears() {
        let mut editor = LineEditor::new(16);
        for ch in "get x".chars() {
            editor.insert(ch);
        }
        assert_eq!(editor.submit(), "get x");
        assert!(editor.is_empty());
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_cursor_editing() {
        let mut editor = LineEditor::new(16);
        editor.set_text("st x");
        editor.home();
        editor.move_right();
        editor.insert('e');
        assert_eq!(editor.text(), "set x");

        editor.end();
        editor.move_right();
        assert_eq!(editor.cursor(), 5);
        editor.backspace();
        assert_eq!(editor.text(), "set ");

        editor.home();
        editor.move_left();
        assert_eq!(editor.cursor(), 0);
        assert!(!editor.backspace());
    }

    #[test]
    fn test_control_chars_ignored() {
        let mut editor = LineEditor::new(16);
        assert!(!editor.insert('\n'));
        editor.set_text("a\tb");
        assert_eq!(editor.text(), "ab");
    }

    #[test]
    fn test_word_before_cursor() {
        let mut editor = LineEditor::new(32);
        editor.set_text("+ (sv_gr");
        assert_eq!(editor.word_before_cursor(), (3, "sv_gr".to_string()));

        editor.replace_before_cursor(3, "sv_gravity ");
        assert_eq!(editor.text(), "+ (sv_gravity ");
        assert_eq!(editor.cursor(), 14);
    }

    #[test]
    fn test_history_navigation() {
        let mut history = CommandHistory::new(8);
        history.push("first");
        history.push("second");

        assert_eq!(history.older("draft"), Some("second"));
        assert_eq!(history.older("ignored"), Some("first"));
        assert_eq!(history.older("ignored"), None);
        assert_eq!(history.newer(), Some("second"));
        assert_eq!(history.newer(), Some("draft"));
        assert_eq!(history.newer(), None);
    }

    #[test]
    fn test_history_dedup_and_limit() {
        let mut history = CommandHistory::new(2);
        history.push("a");
        history.push("a");
        history.push("  ");
        assert_eq!(history.len(), 1);

        history.push("b");
        history.push("c");
        let entries: Vec<_> = history.iter().collect();
        assert_eq!(entries, vec!["c", "b"]);
    }
}
