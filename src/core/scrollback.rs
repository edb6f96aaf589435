//! Bounded circular scrollback log.
//!
//! Bytes are stored in a fixed ring. Positions are tracked as absolute byte
//! counts since creation so the retained window `[written - len, written)` is
//! unambiguous after any amount of wraparound; storage slots are `pos % C`.

const NEWLINE: u8 = b'\n';

/// Fixed-capacity circular text log with line-oriented scrolling.
///
/// # Examples
///
/// ```
/// use bevy_dropdown_console::core::ScrollbackLog;
///
/// let mut log = ScrollbackLog::new(64);
/// log.print("first\nsecond\n");
///
/// let lines: Vec<_> = log.visible_lines(10);
/// assert_eq!(lines, vec!["second", "first"]);
///
/// log.scroll_up();
/// assert_eq!(log.visible_lines(10), vec!["first"]);
/// ```
#[derive(Debug, Clone)]
pub struct ScrollbackLog {
    storage: Box<[u8]>,
    /// Total bytes ever written.
    written: u64,
    /// Bytes still retained (at most the capacity).
    len: usize,
    /// Absolute position of the top of view.
    read: u64,
}

impl ScrollbackLog {
    /// Create an empty log holding at most `capacity` bytes.
    ///
    /// A capacity of zero is bumped to one byte.
    pub fn new(capacity: usize) -> Self {
        Self {
            storage: vec![0; capacity.max(1)].into_boxed_slice(),
            written: 0,
            len: 0,
            read: 0,
        }
    }

    /// Total capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of bytes currently retained.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Storage slot the next byte will be written to.
    #[inline]
    pub fn write_cursor(&self) -> usize {
        self.slot(self.written)
    }

    /// Storage slot of the top of view.
    #[inline]
    pub fn read_cursor(&self) -> usize {
        self.slot(self.read)
    }

    /// Whether the view is following the newest output.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.read == self.written
    }

    /// Append raw text. Oldest bytes are silently overwritten once the log is
    /// full, and the view snaps back to live.
    pub fn print(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let cap = self.capacity();
        // Only the last `cap` bytes of an oversized print can survive
        let skipped = bytes.len().saturating_sub(cap);
        let bytes = &bytes[skipped..];
        self.written += skipped as u64;

        let start = self.write_cursor();
        let first = bytes.len().min(cap - start);
        self.storage[start..start + first].copy_from_slice(&bytes[..first]);
        self.storage[..bytes.len() - first].copy_from_slice(&bytes[first..]);

        self.written += bytes.len() as u64;
        self.len = (self.len + bytes.len() + skipped).min(cap);
        self.read = self.written;
    }

    /// Print `text` followed by a line break.
    pub fn println(&mut self, text: &str) {
        self.print(text);
        self.print("\n");
    }

    /// Drop all retained output.
    pub fn clear(&mut self) {
        self.len = 0;
        self.read = self.written;
    }

    /// Retained bytes, oldest first.
    pub fn contents(&self) -> Vec<u8> {
        (self.oldest()..self.written).map(|pos| self.byte(pos)).collect()
    }

    /// Lines ending at the top of view, newest first.
    ///
    /// The iterator is lazy and borrows the log, so it always reflects the
    /// current contents; call again after mutating to restart.
    pub fn lines_back(&self) -> LinesBack<'_> {
        LinesBack {
            log: self,
            pos: self.read.max(self.oldest()),
        }
    }

    /// Up to `rows` lines ending at the top of view, newest first.
    pub fn visible_lines(&self, rows: usize) -> Vec<String> {
        self.lines_back().take(rows).collect()
    }

    /// Move the view back by one line. The oldest retained line always stays
    /// in view.
    pub fn scroll_up(&mut self) {
        let oldest = self.oldest();
        let top = self.read.max(oldest);
        let mut pos = top;
        if pos > oldest && self.byte(pos - 1) == NEWLINE {
            pos -= 1;
        }
        while pos > oldest && self.byte(pos - 1) != NEWLINE {
            pos -= 1;
        }
        self.read = if pos > oldest { pos } else { top };
    }

    /// Move the view forward by one line. Stops at live output.
    pub fn scroll_down(&mut self) {
        let mut pos = self.read.max(self.oldest());
        while pos < self.written {
            let b = self.byte(pos);
            pos += 1;
            if b == NEWLINE {
                break;
            }
        }
        self.read = pos;
    }

    /// Jump back to the newest output.
    pub fn scroll_to_live(&mut self) {
        self.read = self.written;
    }

    #[inline]
    fn oldest(&self) -> u64 {
        self.written - self.len as u64
    }

    #[inline]
    fn slot(&self, pos: u64) -> usize {
        (pos % self.capacity() as u64) as usize
    }

    #[inline]
    fn byte(&self, pos: u64) -> u8 {
        self.storage[self.slot(pos)]
    }
}

/// Backward line scanner returned by [`ScrollbackLog::lines_back`].
#[derive(Debug, Clone)]
pub struct LinesBack<'a> {
    log: &'a ScrollbackLog,
    pos: u64,
}

impl Iterator for LinesBack<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let oldest = self.log.oldest();
        if self.pos <= oldest {
            return None;
        }

        // A trailing line break terminates the line before it
        let mut end = self.pos;
        if self.log.byte(end - 1) == NEWLINE {
            end -= 1;
        }
        let mut start = end;
        while start > oldest && self.log.byte(start - 1) != NEWLINE {
            start -= 1;
        }

        self.pos = start;
        let bytes: Vec<u8> = (start..end).map(|pos| self.log.byte(pos)).collect();
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let mut log = ScrollbackLog::new(16);
        assert!(log.is_empty());
        assert!(log.visible_lines(5).is_empty());
        log.scroll_up();
        log.scroll_down();
        assert!(log.is_live());
        assert_eq!(log.write_cursor(), 0);
    }

    #[test]
    fn test_lines_newest_first() {
        let mut log = ScrollbackLog::new(128);
        log.print("a\nbb\nccc\n");
        assert_eq!(log.visible_lines(2), vec!["ccc", "bb"]);
        assert_eq!(log.visible_lines(10), vec!["ccc", "bb", "a"]);
    }

    #[test]
    fn test_partial_last_line() {
        let mut log = ScrollbackLog::new(128);
        log.print("done\nworking");
        assert_eq!(log.visible_lines(10), vec!["working", "done"]);
    }

    #[test]
    fn test_empty_lines_preserved() {
        let mut log = ScrollbackLog::new(128);
        log.print("a\n\nb\n");
        assert_eq!(log.visible_lines(10), vec!["b", "", "a"]);
    }

    #[test]
    fn test_full_without_wrap() {
        let mut log = ScrollbackLog::new(8);
        log.print("abc\ndef\n");
        assert_eq!(log.len(), 8);
        assert_eq!(log.write_cursor(), 0);
        assert_eq!(log.contents(), b"abc\ndef\n");
    }

    #[test]
    fn test_exact_wrap() {
        let mut log = ScrollbackLog::new(8);
        log.print("abc\ndef\n");
        log.print("gh\n");
        assert_eq!(log.write_cursor(), 3);
        assert_eq!(log.contents(), b"\ndef\ngh\n");
        // The oldest line was cut by the wrap
        assert_eq!(log.visible_lines(10), vec!["gh", "def", ""]);
    }

    #[test]
    fn test_wraparound_keeps_tail() {
        const C: usize = 256;
        let mut log = ScrollbackLog::new(C);
        let input: Vec<u8> = (0..C + 100).map(|i| b'a' + (i % 26) as u8).collect();
        let input = String::from_utf8(input).unwrap();

        // Print in uneven chunks to exercise the split copy
        for chunk in input.as_bytes().chunks(37) {
            log.print(std::str::from_utf8(chunk).unwrap());
        }

        assert_eq!(log.len(), C);
        assert_eq!(log.contents(), &input.as_bytes()[100..]);
        assert_eq!(log.write_cursor(), 100);
    }

    #[test]
    fn test_oversized_print() {
        let mut log = ScrollbackLog::new(4);
        log.print("0123456789");
        assert_eq!(log.contents(), b"6789");
        assert_eq!(log.len(), 4);
    }

    #[test]
    fn test_scroll_up_and_down() {
        let mut log = ScrollbackLog::new(128);
        log.print("one\ntwo\nthree\n");

        log.scroll_up();
        assert!(!log.is_live());
        assert_eq!(log.visible_lines(10), vec!["two", "one"]);

        log.scroll_up();
        assert_eq!(log.visible_lines(10), vec!["one"]);

        log.scroll_down();
        assert_eq!(log.visible_lines(10), vec!["two", "one"]);

        log.scroll_down();
        assert!(log.is_live());
        assert_eq!(log.visible_lines(1), vec!["three"]);
    }

    #[test]
    fn test_scroll_past_oldest_clamps() {
        let mut log = ScrollbackLog::new(128);
        log.print("one\ntwo\n");
        for _ in 0..10 {
            log.scroll_up();
        }
        assert_eq!(log.visible_lines(10), vec!["one"]);

        log.scroll_down();
        assert!(log.is_live());
        assert_eq!(log.visible_lines(10), vec!["two", "one"]);
    }

    #[test]
    fn test_single_line_never_scrolls_out() {
        let mut log = ScrollbackLog::new(128);
        log.print("only\n");
        log.scroll_up();
        assert!(log.is_live());
        assert_eq!(log.visible_lines(10), vec!["only"]);
    }

    #[test]
    fn test_scroll_past_live_clamps() {
        let mut log = ScrollbackLog::new(128);
        log.print("one\n");
        log.scroll_down();
        log.scroll_down();
        assert!(log.is_live());
        assert_eq!(log.visible_lines(10), vec!["one"]);
    }

    #[test]
    fn test_scroll_past_oldest_after_wrap() {
        let mut log = ScrollbackLog::new(10);
        log.print("line1\nline2\nline3\n");
        // Retained: "ne2\nline3\n"
        for _ in 0..5 {
            log.scroll_up();
        }
        assert_eq!(log.visible_lines(10), vec!["ne2"]);
        log.scroll_down();
        assert!(log.is_live());
        assert_eq!(log.visible_lines(10), vec!["line3", "ne2"]);
    }

    #[test]
    fn test_print_snaps_to_live() {
        let mut log = ScrollbackLog::new(128);
        log.print("a\nb\n");
        log.scroll_up();
        log.print("c\n");
        assert!(log.is_live());
        assert_eq!(log.visible_lines(1), vec!["c"]);
    }

    #[test]
    fn test_clear() {
        let mut log = ScrollbackLog::new(16);
        log.print("abc\n");
        log.clear();
        assert!(log.is_empty());
        assert!(log.visible_lines(3).is_empty());
        log.print("d\n");
        assert_eq!(log.visible_lines(3), vec!["d"]);
    }
}
