//! Types for the rendered preview.

/// Inline styling carried by a span of preview text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: bool,
}

/// A run of text sharing one [`InlineStyle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// What kind of block a preview line belongs to; drives its base style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Heading(u8),
    Paragraph,
    ListItem(usize),
    BlockQuote,
    CodeBlock,
    Table,
    HorizontalRule,
    Image,
    Html,
    Empty,
}

/// One terminal row of the preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    content: String,
    line_type: LineType,
    spans: Option<Vec<InlineSpan>>,
}

impl RenderedLine {
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: None,
        }
    }

    pub const fn with_spans(content: String, line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        Self {
            content,
            line_type,
            spans: Some(spans),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn line_type(&self) -> &LineType {
        &self.line_type
    }

    pub fn spans(&self) -> Option<&[InlineSpan]> {
        self.spans.as_deref()
    }

    /// Prepend `prefix` (unstyled) and retype the line.
    pub(super) fn prefixed(self, prefix: &str, line_type: LineType) -> Self {
        let content = format!("{prefix}{}", self.content);
        let spans = self.spans.map(|spans| {
            let mut out = Vec::with_capacity(spans.len() + 1);
            out.push(InlineSpan::new(prefix.to_string(), InlineStyle::default()));
            out.extend(spans);
            out
        });
        Self {
            content,
            line_type,
            spans,
        }
    }
}

/// The preview of a markdown buffer, laid out for a fixed width.
#[derive(Debug, Clone, Default)]
pub struct Document {
    lines: Vec<RenderedLine>,
}

impl Document {
    pub const fn new(lines: Vec<RenderedLine>) -> Self {
        Self { lines }
    }

    pub const fn empty() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line_at(&self, idx: usize) -> Option<&RenderedLine> {
        self.lines.get(idx)
    }

    pub fn visible_lines(&self, offset: usize, count: usize) -> &[RenderedLine] {
        let start = offset.min(self.lines.len());
        let end = offset.saturating_add(count).min(self.lines.len());
        &self.lines[start..end]
    }
}
