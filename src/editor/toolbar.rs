//! Toolbar shortcuts that prefix the cursor line or insert snippets at the
//! cursor.

use super::{EditorBuffer, Position, TextBuffer, TextRange};

/// Deepest heading level `heading` will produce.
const MAX_HEADING_LEVEL: usize = 6;

/// Placeholder URL left selected after inserting a link.
const LINK_URL_PLACEHOLDER: &str = "https://";

/// Line-prefix actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePrefix {
    Heading,
    Quote,
    BulletList,
    NumberedList,
}

/// Prefix the cursor line.
///
/// Headings and quotes nest: when the line already starts with the marker
/// character, a single bare marker is prepended; otherwise the marker plus a
/// space. List markers are always prepended as-is. Returns `false` when the
/// line was left untouched.
pub fn prefix_line<B: TextBuffer + ?Sized>(buffer: &mut B, prefix: LinePrefix) -> bool {
    let line_idx = buffer.selection().end.line;
    let line = buffer.line(line_idx).unwrap_or_default();
    let insert = match prefix {
        LinePrefix::Heading => {
            let level = line.chars().take_while(|&c| c == '#').count();
            if level >= MAX_HEADING_LEVEL {
                return false;
            }
            if level > 0 { "#" } else { "# " }
        }
        LinePrefix::Quote => {
            if line.starts_with('>') {
                ">"
            } else {
                "> "
            }
        }
        LinePrefix::BulletList => "- ",
        LinePrefix::NumberedList => "1. ",
    };
    buffer.insert(Position::new(line_idx, 0), insert);
    true
}

/// Insert a horizontal rule on its own line at the cursor.
pub fn insert_separator(buffer: &mut EditorBuffer) {
    buffer.insert_str("\n---\n");
}

/// Insert a Markdown link. The selection, if any, becomes the link text and
/// the URL placeholder is selected afterwards so it can be typed over.
pub fn insert_link(buffer: &mut EditorBuffer) {
    let selection = buffer.selection();
    let label = if selection.is_empty() {
        "link".to_string()
    } else {
        buffer.text_in(selection)
    };
    buffer.insert_str(&format!("[{label}]({LINK_URL_PLACEHOLDER})"));
    let end = buffer.cursor().position();
    let url_len = LINK_URL_PLACEHOLDER.chars().count();
    let url_end = buffer.char_index(end) - 1;
    let url_start = url_end - url_len;
    buffer.set_selection(TextRange::new(
        buffer.position_at(url_start),
        buffer.position_at(url_end),
    ));
}

/// Insert an arbitrary snippet at the cursor (used by the Google Drive
/// inserts).
pub fn insert_snippet(buffer: &mut EditorBuffer, snippet: &str) {
    buffer.clear_selection();
    buffer.insert_str(snippet);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_on_plain_line_adds_hash_and_space() {
        let mut buf = EditorBuffer::from_text("Title");
        assert!(prefix_line(&mut buf, LinePrefix::Heading));
        assert_eq!(buf.text(), "# Title");
    }

    #[test]
    fn test_heading_on_heading_line_deepens_level() {
        let mut buf = EditorBuffer::from_text("## Title");
        prefix_line(&mut buf, LinePrefix::Heading);
        assert_eq!(buf.text(), "### Title");
    }

    #[test]
    fn test_heading_stops_at_level_six() {
        let mut buf = EditorBuffer::from_text("###### Deep");
        assert!(!prefix_line(&mut buf, LinePrefix::Heading));
        assert_eq!(buf.text(), "###### Deep");
    }

    #[test]
    fn test_quote_nests() {
        let mut buf = EditorBuffer::from_text("> said");
        prefix_line(&mut buf, LinePrefix::Quote);
        assert_eq!(buf.text(), ">> said");
    }

    #[test]
    fn test_prefix_targets_cursor_line_and_keeps_cursor_on_text() {
        let mut buf = EditorBuffer::from_text("one\ntwo");
        buf.move_to(1, 2);
        prefix_line(&mut buf, LinePrefix::NumberedList);
        assert_eq!(buf.text(), "one\n1. two");
        assert_eq!(buf.cursor().position(), Position::new(1, 5));
    }

    #[test]
    fn test_bullet_list_prefix() {
        let mut buf = EditorBuffer::from_text("item");
        prefix_line(&mut buf, LinePrefix::BulletList);
        assert_eq!(buf.text(), "- item");
    }

    #[test]
    fn test_separator_inserted_at_cursor() {
        let mut buf = EditorBuffer::from_text("above");
        buf.move_end(false);
        insert_separator(&mut buf);
        assert_eq!(buf.text(), "above\n---\n");
        assert_eq!(buf.cursor().position(), Position::new(2, 0));
    }

    #[test]
    fn test_link_uses_selection_as_label_and_selects_url() {
        let mut buf = EditorBuffer::from_text("see docs here");
        buf.set_selection(TextRange::on_line(0, 4, 8));
        insert_link(&mut buf);
        assert_eq!(buf.text(), "see [docs](https://) here");
        assert_eq!(buf.text_in(buf.selection()), "https://");
    }

    #[test]
    fn test_link_without_selection_uses_placeholder_label() {
        let mut buf = EditorBuffer::empty();
        insert_link(&mut buf);
        assert_eq!(buf.text(), "[link](https://)");
    }
}
