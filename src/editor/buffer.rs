use ropey::Rope;

use super::{Position, TextBuffer, TextRange};

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (characters within the line).
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    pub const fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Update column and reset column memory to match.
    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }

    const fn set_position(&mut self, pos: Position) {
        self.line = pos.line;
        self.set_col(pos.col);
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A text buffer backed by a rope data structure.
///
/// Tracks a cursor plus an optional selection anchor; the selection always
/// runs between the anchor and the cursor.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    anchor: Option<Position>,
    dirty: bool,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
            anchor: None,
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Replace the whole content. Cursor goes to the origin, selection is
    /// dropped and the buffer is marked dirty.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.cursor = Cursor::new();
        self.anchor = None;
        self.dirty = true;
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx);
        let len = self.line_len(line_idx);
        Some(line.slice(..len).to_string())
    }

    /// Length of a line in characters (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && line.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Whether a non-empty selection is active.
    pub fn has_selection(&self) -> bool {
        self.anchor.is_some_and(|anchor| anchor != self.cursor.position())
    }

    /// Drop the selection, keeping the cursor where it is.
    pub const fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// Select the whole buffer.
    pub fn select_all(&mut self) {
        self.move_to_end();
        self.anchor = Some(Position::new(0, 0));
    }

    /// Delete the selected text. Returns `true` if anything was removed.
    pub fn delete_selection(&mut self) -> bool {
        if !self.has_selection() {
            self.anchor = None;
            return false;
        }
        let range = TextBuffer::selection(self);
        self.remove(range);
        self.cursor.set_position(range.start);
        self.anchor = None;
        true
    }

    /// Insert a character at the cursor position, replacing any selection.
    pub fn insert_char(&mut self, ch: char) {
        self.delete_selection();
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, ch);
        self.cursor.set_col(self.cursor.col + 1);
        self.dirty = true;
    }

    /// Insert a string at the cursor position, replacing any selection.
    pub fn insert_str(&mut self, s: &str) {
        self.delete_selection();
        if s.is_empty() {
            return;
        }
        let char_idx = self.cursor_char_idx();
        self.rope.insert(char_idx, s);
        let end = self.position_of(char_idx + s.chars().count());
        self.cursor.set_position(end);
        self.dirty = true;
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) {
        self.delete_selection();
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, '\n');
        self.cursor.line += 1;
        self.cursor.set_col(0);
        self.dirty = true;
    }

    /// Delete the character before the cursor (Backspace), or the selection.
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return false;
        }

        let char_idx = self.cursor_char_idx();
        if self.cursor.col == 0 {
            // Join with previous line
            let prev_line_len = self.line_len(self.cursor.line - 1);
            let line_start = self.rope.line_to_char(self.cursor.line);
            let prev_end = self.rope.line_to_char(self.cursor.line - 1) + prev_line_len;
            self.rope.remove(prev_end..line_start);
            self.cursor.line -= 1;
            self.cursor.set_col(prev_line_len);
        } else {
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.set_col(self.cursor.col - 1);
        }
        self.dirty = true;
        true
    }

    /// Delete the character at the cursor (Delete key), or the selection.
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let line_len = self.line_len(self.cursor.line);

        if self.cursor.col >= line_len && self.cursor.line + 1 >= self.line_count() {
            return false;
        }

        let char_idx = self.cursor_char_idx();
        let end = if self.cursor.col >= line_len {
            self.rope.line_to_char(self.cursor.line + 1)
        } else {
            char_idx + 1
        };
        self.rope.remove(char_idx..end);
        self.dirty = true;
        true
    }

    /// Move the cursor in the given direction, optionally extending the
    /// selection.
    pub fn move_cursor(&mut self, direction: Direction, extend: bool) {
        self.prepare_move(extend);
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
        }
    }

    /// Move cursor to the beginning of the line (Home).
    pub fn move_home(&mut self, extend: bool) {
        self.prepare_move(extend);
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self, extend: bool) {
        self.prepare_move(extend);
        let len = self.line_len(self.cursor.line);
        self.cursor.set_col(len);
    }

    /// Move cursor one word to the left (Ctrl+Left).
    pub fn move_word_left(&mut self, extend: bool) {
        self.prepare_move(extend);
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.cursor.set_col(self.line_len(self.cursor.line));
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let before: Vec<char> = line.chars().take(self.cursor.col).collect();
        let mut idx = before.len();
        while idx > 0 && before[idx - 1].is_whitespace() {
            idx -= 1;
        }
        while idx > 0 && is_word_char(before[idx - 1]) {
            idx -= 1;
        }
        if idx == before.len() {
            // Punctuation directly before the cursor: step over it.
            idx -= 1;
        }
        self.cursor.set_col(idx);
    }

    /// Move cursor one word to the right (Ctrl+Right).
    pub fn move_word_right(&mut self, extend: bool) {
        self.prepare_move(extend);
        let line_len = self.line_len(self.cursor.line);

        if self.cursor.col >= line_len {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let after: Vec<char> = line.chars().skip(self.cursor.col).collect();

        // Skip current word characters, then whitespace/punctuation after it
        let word_end = after
            .iter()
            .position(|&c| !is_word_char(c))
            .unwrap_or(after.len());
        let space_end = after[word_end..]
            .iter()
            .position(|&c| is_word_char(c))
            .unwrap_or(after.len() - word_end);

        self.cursor.set_col(self.cursor.col + word_end + space_end);
    }

    /// Move cursor to a specific line and column, dropping the selection.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.anchor = None;
        let pos = self.clamp(Position::new(line, col));
        self.cursor.set_position(pos);
    }

    /// Move cursor to the start of the buffer (Ctrl+Home).
    pub fn move_to_start(&mut self, extend: bool) {
        self.prepare_move(extend);
        self.cursor.set_position(Position::new(0, 0));
    }

    /// Move cursor to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self) {
        self.anchor = None;
        let last_line = self.line_count().saturating_sub(1);
        self.cursor
            .set_position(Position::new(last_line, self.line_len(last_line)));
    }

    // --- Private helpers ---

    fn prepare_move(&mut self, extend: bool) {
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor.position());
            }
        } else {
            self.anchor = None;
        }
    }

    /// Clamp a position into the document.
    fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.line_count().saturating_sub(1));
        Position::new(line, pos.col.min(self.line_len(line)))
    }

    fn position_of(&self, char_idx: usize) -> Position {
        let char_idx = char_idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(char_idx);
        Position::new(line, char_idx - self.rope.line_to_char(line))
    }

    /// Convert cursor position to a ropey char index.
    fn cursor_char_idx(&self) -> usize {
        self.char_index(self.cursor.position())
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.set_col(self.cursor.col - 1);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);
        if self.cursor.col < line_len {
            self.cursor.set_col(self.cursor.col + 1);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.cursor.line -= 1;
            let max_col = self.line_len(self.cursor.line);
            self.cursor.col = self.cursor.col_memory.min(max_col);
        }
    }

    fn move_down(&mut self) {
        if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            let max_col = self.line_len(self.cursor.line);
            self.cursor.col = self.cursor.col_memory.min(max_col);
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl TextBuffer for EditorBuffer {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line(&self, idx: usize) -> Option<String> {
        self.line_at(idx)
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn char_index(&self, pos: Position) -> usize {
        let pos = self.clamp(pos);
        self.rope.line_to_char(pos.line) + pos.col
    }

    fn position_at(&self, char_idx: usize) -> Position {
        self.position_of(char_idx)
    }

    fn slice(&self, chars: std::ops::Range<usize>) -> String {
        let len = self.rope.len_chars();
        let end = chars.end.min(len);
        let start = chars.start.min(end);
        self.rope.slice(start..end).to_string()
    }

    fn insert(&mut self, at: Position, text: &str) {
        if text.is_empty() {
            return;
        }
        let idx = self.char_index(at);
        let inserted = text.chars().count();
        let cursor_idx = self.cursor_char_idx();
        let anchor_idx = self.anchor.map(|a| self.char_index(a));
        self.rope.insert(idx, text);
        // Keep the caret and anchor on the same text they pointed at.
        let shift = |i: usize| if i >= idx { i + inserted } else { i };
        let cursor = self.position_of(shift(cursor_idx));
        self.cursor.set_position(cursor);
        self.anchor = anchor_idx.map(|a| self.position_of(shift(a)));
        self.dirty = true;
    }

    fn remove(&mut self, range: TextRange) {
        let start = self.char_index(range.start);
        let end = self.char_index(range.end);
        if start >= end {
            return;
        }
        let cursor_idx = self.cursor_char_idx();
        let anchor_idx = self.anchor.map(|a| self.char_index(a));
        self.rope.remove(start..end);
        let shift = |i: usize| {
            if i >= end {
                i - (end - start)
            } else {
                i.min(start)
            }
        };
        let cursor = self.position_of(shift(cursor_idx));
        self.cursor.set_position(cursor);
        self.anchor = anchor_idx.map(|a| self.position_of(shift(a)));
        self.dirty = true;
    }

    fn selection(&self) -> TextRange {
        let cursor = self.cursor.position();
        TextRange::new(self.anchor.unwrap_or(cursor), cursor)
    }

    fn set_selection(&mut self, range: TextRange) {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end);
        self.anchor = (start != end).then_some(start);
        self.cursor.set_position(end);
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("anchor", &self.anchor)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
    }

    #[test]
    fn test_from_text_preserves_content() {
        let buf = EditorBuffer::from_text("hello\nworld");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some("world".to_string()));
    }

    #[test]
    fn test_from_text_trailing_newline() {
        let buf = EditorBuffer::from_text("hello\n");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some(String::new()));
    }

    #[test]
    fn test_line_at_strips_crlf() {
        let buf = EditorBuffer::from_text("hello\r\nworld");
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_len(0), 5);
    }

    #[test]
    fn test_line_at_out_of_bounds_returns_none() {
        let buf = EditorBuffer::from_text("hello");
        assert_eq!(buf.line_at(1), None);
    }

    #[test]
    fn test_text_roundtrip() {
        let content = "line one\nline two\nline three";
        let buf = EditorBuffer::from_text(content);
        assert_eq!(buf.text(), content);
    }

    #[test]
    fn test_set_text_resets_cursor_and_marks_dirty() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 3);
        buf.set_text("fresh");
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
        assert_eq!(buf.text(), "fresh");
        assert!(buf.is_dirty());
    }

    // --- Dirty tracking ---

    #[test]
    fn test_new_buffer_is_clean() {
        let buf = EditorBuffer::from_text("hello");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_mark_clean_resets_dirty() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.insert_char('!');
        assert!(buf.is_dirty());
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    // --- Insertion ---

    #[test]
    fn test_insert_char_in_middle() {
        let mut buf = EditorBuffer::from_text("hllo");
        buf.move_cursor(Direction::Right, false);
        buf.insert_char('e');
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_insert_multibyte_char_advances_one_column() {
        let mut buf = EditorBuffer::from_text("caf");
        buf.move_end(false);
        buf.insert_char('é');
        assert_eq!(buf.line_at(0), Some("café".to_string()));
        assert_eq!(buf.cursor().col, 4);
    }

    #[test]
    fn test_insert_str_multiline_moves_cursor_to_end() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.move_to(0, 1);
        buf.insert_str("x\nyz");
        assert_eq!(buf.text(), "ax\nyzb");
        assert_eq!(buf.cursor(), Cursor::at(1, 2));
    }

    #[test]
    fn test_insert_str_empty_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.insert_str("");
        assert!(!buf.is_dirty());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.set_selection(TextRange::on_line(0, 6, 11));
        buf.insert_char('X');
        assert_eq!(buf.text(), "hello X");
        assert!(!buf.has_selection());
    }

    // --- Line splitting and deletion ---

    #[test]
    fn test_split_line_in_middle() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 5);
        buf.split_line();
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some(" world".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        assert!(!buf.delete_back());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        buf.delete_back();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some("helloworld".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_joins_crlf_lines() {
        let mut buf = EditorBuffer::from_text("hello\r\nworld");
        buf.move_to(1, 0);
        buf.delete_back();
        assert_eq!(buf.text(), "helloworld");
    }

    #[test]
    fn test_delete_back_multibyte() {
        let mut buf = EditorBuffer::from_text("café");
        buf.move_end(false);
        buf.delete_back();
        assert_eq!(buf.line_at(0), Some("caf".to_string()));
    }

    #[test]
    fn test_delete_back_removes_selection() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.set_selection(TextRange::new(Position::new(0, 3), Position::new(1, 2)));
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "helrld");
        assert_eq!(buf.cursor(), Cursor::at(0, 3));
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_end(false);
        assert!(!buf.delete_forward());
    }

    #[test]
    fn test_delete_forward_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(0, 5);
        buf.delete_forward();
        assert_eq!(buf.line_at(0), Some("helloworld".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    // --- Cursor movement ---

    #[test]
    fn test_move_left_wraps_to_prev_line() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        buf.move_cursor(Direction::Left, false);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_move_right_wraps_to_next_line() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(0, 5);
        buf.move_cursor(Direction::Right, false);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_column_memory_across_short_line() {
        let mut buf = EditorBuffer::from_text("hello\nhi\nworld");
        buf.move_to(0, 4);
        buf.move_cursor(Direction::Down, false);
        assert_eq!(buf.cursor().col, 2);
        buf.move_cursor(Direction::Down, false);
        assert_eq!(buf.cursor().line, 2);
        assert_eq!(buf.cursor().col, 4);
    }

    #[test]
    fn test_move_word_left_from_middle_of_word() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 8);
        buf.move_word_left(false);
        assert_eq!(buf.cursor().col, 6);
    }

    #[test]
    fn test_move_word_left_skips_whitespace() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 6);
        buf.move_word_left(false);
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_move_word_right_from_start() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_word_right(false);
        assert_eq!(buf.cursor().col, 6);
    }

    #[test]
    fn test_move_to_clamps() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_to(100, 100);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_move_to_end() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to_end();
        assert_eq!(buf.cursor(), Cursor::at(1, 5));
    }

    // --- Selection ---

    #[test]
    fn test_shift_movement_extends_selection() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 6);
        buf.move_end(true);
        assert_eq!(buf.selection(), TextRange::on_line(0, 6, 11));
        assert_eq!(buf.text_in(buf.selection()), "world");
    }

    #[test]
    fn test_selection_is_ordered_when_extending_backwards() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 5);
        buf.move_home(true);
        assert_eq!(buf.selection(), TextRange::on_line(0, 0, 5));
    }

    #[test]
    fn test_plain_movement_clears_selection() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_end(true);
        assert!(buf.has_selection());
        buf.move_cursor(Direction::Left, false);
        assert!(!buf.has_selection());
    }

    #[test]
    fn test_select_all_covers_buffer() {
        let mut buf = EditorBuffer::from_text("a\nbc");
        buf.select_all();
        assert_eq!(buf.text_in(buf.selection()), "a\nbc");
    }

    // --- Position-addressed access ---

    #[test]
    fn test_char_index_and_position_at_are_inverse() {
        let buf = EditorBuffer::from_text("ab\ncdé\nf");
        let pos = Position::new(1, 3);
        let idx = buf.char_index(pos);
        assert_eq!(idx, 6);
        assert_eq!(buf.position_at(idx), pos);
    }

    #[test]
    fn test_slice_past_edges_is_shortened() {
        let buf = EditorBuffer::from_text("abc");
        assert_eq!(buf.slice(2..10), "c");
        assert_eq!(buf.slice(5..10), "");
    }

    #[test]
    fn test_insert_before_cursor_shifts_cursor() {
        let mut buf = EditorBuffer::from_text("world");
        buf.move_to(0, 3);
        buf.insert(Position::new(0, 0), "hello ");
        assert_eq!(buf.text(), "hello world");
        assert_eq!(buf.cursor(), Cursor::at(0, 9));
    }

    #[test]
    fn test_remove_range_spanning_lines() {
        let mut buf = EditorBuffer::from_text("one\ntwo\nthree");
        buf.remove(TextRange::new(Position::new(0, 2), Position::new(2, 1)));
        assert_eq!(buf.text(), "onhree");
        assert!(buf.is_dirty());
    }
}
