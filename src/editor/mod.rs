//! Editing core: a rope-backed text buffer, selection-aware inline style
//! toggling and the toolbar actions built on top of it.
//!
//! Everything that mutates text goes through the [`TextBuffer`] trait so the
//! style toggle and toolbar actions can run against any buffer that offers
//! position-addressed insert/remove.

mod buffer;
mod style;
pub mod toolbar;

pub use buffer::{Cursor, Direction, EditorBuffer};
pub use style::{InlineStyle, toggle_selection, toggle_style};

/// A caret location: zero-based line and character column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, counted in characters within the line.
    pub col: usize,
}

impl Position {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// An ordered pair of positions. `start == end` denotes a caret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    /// Build a range, swapping the endpoints if they are out of order.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A zero-width range at `pos`.
    pub const fn caret(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Single-line range helper: `line`, columns `start..end`.
    pub fn on_line(line: usize, start: usize, end: usize) -> Self {
        Self::new(Position::new(line, start), Position::new(line, end))
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Position-addressed access to an editable text document.
///
/// Reads and writes are synchronous: a mutation is visible to the very next
/// read. Positions outside the document are clamped, never rejected.
pub trait TextBuffer {
    /// Number of lines (an empty document has one).
    fn line_count(&self) -> usize;

    /// Text of a line without its line terminator.
    fn line(&self, idx: usize) -> Option<String>;

    /// Total length in characters, line terminators included.
    fn len_chars(&self) -> usize;

    /// Absolute character index of a position.
    fn char_index(&self, pos: Position) -> usize;

    /// Position of an absolute character index.
    fn position_at(&self, char_idx: usize) -> Position;

    /// Text between two absolute character indices. Out-of-range bounds are
    /// clamped, so reading past either edge yields a shorter string.
    fn slice(&self, chars: std::ops::Range<usize>) -> String;

    fn insert(&mut self, at: Position, text: &str);

    fn remove(&mut self, range: TextRange);

    /// The current selection, ordered.
    fn selection(&self) -> TextRange;

    fn set_selection(&mut self, range: TextRange);

    /// Text covered by `range`.
    fn text_in(&self, range: TextRange) -> String {
        self.slice(self.char_index(range.start)..self.char_index(range.end))
    }
}
