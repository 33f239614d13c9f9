//! Selection-aware inline style toggling.
//!
//! Given a selection and a marker pair, [`toggle_style`] classifies the text
//! around the selection into one of three shapes and wraps or unwraps it:
//!
//! - markers sit just outside the selection (`**|word|**`): unwrap
//! - the selection starts and ends with the markers (`|**word**|`): unwrap
//! - anything else: wrap
//!
//! Each check compares fixed-length substrings against the literal markers.
//! A read that runs off the edge of the buffer just comes back short and
//! fails the comparison; no bounds error is ever raised.

use super::{TextBuffer, TextRange};

/// The inline styles bound to toolbar shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineStyle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
}

impl InlineStyle {
    /// Opening and closing markers for this style.
    pub const fn markers(self) -> (&'static str, &'static str) {
        match self {
            Self::Bold => ("**", "**"),
            Self::Italic => ("_", "_"),
            Self::Underline => ("<u>", "</u>"),
            Self::Strikethrough => ("~~", "~~"),
            Self::Code => ("`", "`"),
        }
    }
}

/// Wrap or unwrap `range` with `opening`/`closing` and return the range the
/// selection should cover afterwards.
///
/// Both markers must be non-empty. Mutations are ordered so that the end of
/// the range is always edited before its start, keeping the start position
/// valid throughout.
pub fn toggle_style<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    range: TextRange,
    opening: &str,
    closing: &str,
) -> TextRange {
    debug_assert!(!opening.is_empty() && !closing.is_empty());
    let range = TextRange::new(range.start, range.end);
    let open_len = opening.chars().count();
    let close_len = closing.chars().count();
    let start = buffer.char_index(range.start);
    let end = buffer.char_index(range.end);

    let before = buffer.slice(start.saturating_sub(open_len)..start);
    let after = buffer.slice(end..end + close_len);
    if before == opening && after == closing {
        remove_chars(buffer, end, end + close_len);
        remove_chars(buffer, start - open_len, start);
        tracing::debug!(opening, closing, "unwrapped markers around selection");
        return TextRange::new(
            buffer.position_at(start - open_len),
            buffer.position_at(end - open_len),
        );
    }

    // A selection shorter than both markers together would make the head and
    // tail checks overlap on the same characters.
    if end - start >= open_len + close_len
        && buffer.slice(start..start + open_len) == opening
        && buffer.slice(end - close_len..end) == closing
    {
        remove_chars(buffer, end - close_len, end);
        remove_chars(buffer, start, start + open_len);
        tracing::debug!(opening, closing, "unwrapped markers inside selection");
        return TextRange::new(
            buffer.position_at(start),
            buffer.position_at(end - close_len - open_len),
        );
    }

    let end_pos = buffer.position_at(end);
    buffer.insert(end_pos, closing);
    let start_pos = buffer.position_at(start);
    buffer.insert(start_pos, opening);
    tracing::debug!(opening, closing, "wrapped selection");
    TextRange::new(
        buffer.position_at(start),
        buffer.position_at(end + open_len + close_len),
    )
}

/// Toggle `style` on the buffer's current selection and select the result.
pub fn toggle_selection<B: TextBuffer + ?Sized>(buffer: &mut B, style: InlineStyle) -> TextRange {
    let (opening, closing) = style.markers();
    let range = buffer.selection();
    let next = toggle_style(buffer, range, opening, closing);
    buffer.set_selection(next);
    next
}

fn remove_chars<B: TextBuffer + ?Sized>(buffer: &mut B, from: usize, to: usize) {
    let range = TextRange::new(buffer.position_at(from), buffer.position_at(to));
    buffer.remove(range);
}
