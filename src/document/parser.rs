//! Markdown to preview lines with comrak.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue};
use comrak::{Arena, parse_document};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{Document, InlineSpan, InlineStyle, LineType, RenderedLine};

impl Document {
    /// Parse markdown and lay it out for a pane `width` columns wide.
    ///
    /// # Example
    ///
    /// ```
    /// use mdlive::document::Document;
    ///
    /// let doc = Document::parse("# Hello\n\nWorld", 40);
    /// assert!(doc.line_count() >= 3);
    /// ```
    pub fn parse(source: &str, width: u16) -> Self {
        parse_with_layout(source, width)
    }

    /// Lay out raw HTML source, hard-wrapped to `width` columns.
    pub fn html_source(html: &str, width: u16) -> Self {
        let width = usize::from(width.max(1));
        let mut lines = Vec::new();
        for raw in html.lines() {
            if raw.is_empty() {
                lines.push(RenderedLine::new(String::new(), LineType::Empty));
                continue;
            }
            for chunk in hard_wrap(raw, width) {
                lines.push(RenderedLine::new(chunk, LineType::Html));
            }
        }
        Self::new(lines)
    }
}

/// Parse markdown source into a Document with layout and wrapping.
pub fn parse_with_layout(source: &str, width: u16) -> Document {
    let arena = Arena::new();
    let mut options = comrak::Options::default();
    super::apply_extensions(&mut options);
    let root = parse_document(&arena, source, &options);

    let mut lines = Vec::new();
    process_node(root, &mut lines, 0, usize::from(width.max(1)));
    while matches!(lines.last().map(RenderedLine::line_type), Some(LineType::Empty)) {
        lines.pop();
    }
    Document::new(lines)
}

fn process_node<'a>(
    node: &'a AstNode<'a>,
    lines: &mut Vec<RenderedLine>,
    depth: usize,
    wrap_width: usize,
) {
    match &node.data.borrow().value {
        NodeValue::Document => {
            for child in node.children() {
                process_node(child, lines, depth, wrap_width);
            }
        }

        NodeValue::Heading(heading) => {
            ensure_trailing_empty_lines(lines, 1);
            let line_type = LineType::Heading(heading.level);
            let spans = collect_inline_spans(node);
            for line_spans in wrap_spans(&spans, wrap_width, "", "") {
                let content = spans_to_string(&line_spans);
                lines.push(RenderedLine::with_spans(content, line_type, line_spans));
            }
            lines.push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::Paragraph => {
            let images = paragraph_images(node);
            if images.is_empty() {
                push_wrapped(lines, node, LineType::Paragraph, wrap_width, "", "");
            } else {
                for (alt, src) in images {
                    let label = if alt.is_empty() { src } else { alt };
                    lines.push(RenderedLine::new(format!("[Image: {label}]"), LineType::Image));
                }
            }
            lines.push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::CodeBlock(code_block) => {
            let gutter = "▏ ";
            let body_width = wrap_width.saturating_sub(gutter.width()).max(1);
            for raw in code_block.literal.lines() {
                let style = InlineStyle {
                    code: true,
                    ..InlineStyle::default()
                };
                let text = truncate_to_width(raw, body_width);
                let spans = vec![
                    InlineSpan::new(gutter.to_string(), InlineStyle::default()),
                    InlineSpan::new(text, style),
                ];
                let content = spans_to_string(&spans);
                lines.push(RenderedLine::with_spans(content, LineType::CodeBlock, spans));
            }
            lines.push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::HtmlBlock(block) => {
            for raw in block.literal.lines() {
                for chunk in hard_wrap(raw, wrap_width) {
                    lines.push(RenderedLine::new(chunk, LineType::Html));
                }
            }
            lines.push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::List(list) => {
            let list_depth = depth + 1;
            let delimiter = match list.delimiter {
                ListDelimType::Paren => ')',
                ListDelimType::Period => '.',
            };
            for (index, child) in node.children().enumerate() {
                let marker = match list.list_type {
                    ListType::Bullet => "• ".to_string(),
                    ListType::Ordered => format!("{}{delimiter} ", list.start + index),
                };
                render_item(child, lines, list_depth, wrap_width, &marker);
            }
            if depth == 0 {
                lines.push(RenderedLine::new(String::new(), LineType::Empty));
            }
        }

        NodeValue::BlockQuote => {
            let mut inner = Vec::new();
            for child in node.children() {
                process_node(child, &mut inner, depth, wrap_width.saturating_sub(2).max(1));
            }
            while matches!(inner.last().map(RenderedLine::line_type), Some(LineType::Empty)) {
                inner.pop();
            }
            lines.extend(
                inner
                    .into_iter()
                    .map(|line| line.prefixed("│ ", LineType::BlockQuote)),
            );
            lines.push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::ThematicBreak => {
            lines.push(RenderedLine::new(
                "─".repeat(wrap_width),
                LineType::HorizontalRule,
            ));
            lines.push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::Table(_) => {
            for line in render_table(node, wrap_width) {
                lines.push(RenderedLine::new(line, LineType::Table));
            }
            lines.push(RenderedLine::new(String::new(), LineType::Empty));
        }

        NodeValue::FootnoteDefinition(def) => {
            let label = format!("[^{}]: ", def.name);
            let continuation = " ".repeat(label.width());
            let mut inner = Vec::new();
            for child in node.children() {
                process_node(child, &mut inner, depth, wrap_width);
            }
            let mut first = true;
            for line in inner {
                if matches!(line.line_type(), LineType::Empty) {
                    continue;
                }
                let prefix = if first { label.as_str() } else { continuation.as_str() };
                lines.push(line.prefixed(prefix, LineType::Paragraph));
                first = false;
            }
            lines.push(RenderedLine::new(String::new(), LineType::Empty));
        }

        _ => {
            for child in node.children() {
                process_node(child, lines, depth, wrap_width);
            }
        }
    }
}

fn render_item<'a>(
    item: &'a AstNode<'a>,
    lines: &mut Vec<RenderedLine>,
    depth: usize,
    wrap_width: usize,
    marker: &str,
) {
    let marker = match task_state(item) {
        Some(true) => "☑ ".to_string(),
        Some(false) => "☐ ".to_string(),
        None => marker.to_string(),
    };
    let indent = "  ".repeat(depth.saturating_sub(1));
    let prefix_first = format!("{indent}{marker}");
    let prefix_next = " ".repeat(prefix_first.width());
    let line_type = LineType::ListItem(depth);

    let mut rendered_any = false;
    for child in item_content(item) {
        match &child.data.borrow().value {
            NodeValue::Paragraph => {
                let prefix = if rendered_any { &prefix_next } else { &prefix_first };
                push_wrapped(lines, child, line_type, wrap_width, prefix, &prefix_next);
                rendered_any = true;
            }
            NodeValue::List(_) => {
                process_node(child, lines, depth, wrap_width);
            }
            _ => {
                let mut inner = Vec::new();
                let inner_width = wrap_width.saturating_sub(prefix_next.width()).max(1);
                process_node(child, &mut inner, depth, inner_width);
                for line in inner {
                    if matches!(line.line_type(), LineType::Empty) {
                        continue;
                    }
                    let prefix = if rendered_any { &prefix_next } else { &prefix_first };
                    lines.push(line.prefixed(prefix, line_type));
                    rendered_any = true;
                }
            }
        }
    }
    if !rendered_any {
        lines.push(RenderedLine::new(prefix_first, line_type));
    }
}

/// `Some(checked)` for task list items.
fn task_state<'a>(item: &'a AstNode<'a>) -> Option<bool> {
    if let NodeValue::TaskItem(symbol) = &item.data.borrow().value {
        return Some(symbol.is_some());
    }
    item.children().find_map(|child| match &child.data.borrow().value {
        NodeValue::TaskItem(symbol) => Some(symbol.is_some()),
        _ => None,
    })
}

/// Block children of an item, looking through a nested task marker node.
fn item_content<'a>(item: &'a AstNode<'a>) -> Vec<&'a AstNode<'a>> {
    item.children()
        .flat_map(|child| {
            if matches!(child.data.borrow().value, NodeValue::TaskItem(_)) {
                child.children().collect::<Vec<_>>()
            } else {
                vec![child]
            }
        })
        .collect()
}

fn push_wrapped<'a>(
    lines: &mut Vec<RenderedLine>,
    node: &'a AstNode<'a>,
    line_type: LineType,
    wrap_width: usize,
    prefix_first: &str,
    prefix_next: &str,
) {
    let spans = collect_inline_spans(node);
    for line_spans in wrap_spans(&spans, wrap_width, prefix_first, prefix_next) {
        let content = spans_to_string(&line_spans);
        lines.push(RenderedLine::with_spans(content, line_type, line_spans));
    }
}

fn ensure_trailing_empty_lines(lines: &mut Vec<RenderedLine>, count: usize) {
    if lines.is_empty() {
        return;
    }
    let existing = lines
        .iter()
        .rev()
        .take_while(|line| matches!(line.line_type(), LineType::Empty))
        .count();
    for _ in existing..count {
        lines.push(RenderedLine::new(String::new(), LineType::Empty));
    }
}

fn render_table<'a>(table_node: &'a AstNode<'a>, wrap_width: usize) -> Vec<String> {
    let (rows, has_header) = collect_table_rows(table_node);
    let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if num_cols == 0 {
        return Vec::new();
    }

    let mut col_widths = vec![1_usize; num_cols];
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            col_widths[idx] = col_widths[idx].max(cell.width());
        }
    }
    // Row width is 1 + sum(col_width + 3).
    let max_table_width = wrap_width.max(4);
    while 1 + col_widths.iter().sum::<usize>() + 3 * num_cols > max_table_width {
        let Some((widest, width)) = col_widths.iter().copied().enumerate().max_by_key(|(_, w)| *w)
        else {
            break;
        };
        if width <= 1 {
            break;
        }
        col_widths[widest] -= 1;
    }

    let mut out = Vec::new();
    out.push(table_border(&col_widths, '┌', '┬', '┐'));
    for (idx, row) in rows.iter().enumerate() {
        let mut line = String::from("│");
        for (col, width) in col_widths.iter().enumerate() {
            let cell = row.get(col).map_or("", String::as_str);
            let text = truncate_to_width(cell, *width);
            let pad = width.saturating_sub(text.width());
            line.push(' ');
            line.push_str(&text);
            line.push_str(&" ".repeat(pad + 1));
            line.push('│');
        }
        out.push(line);
        if has_header && idx == 0 {
            out.push(table_border(&col_widths, '├', '┼', '┤'));
        }
    }
    out.push(table_border(&col_widths, '└', '┴', '┘'));
    out
}

fn collect_table_rows<'a>(table_node: &'a AstNode<'a>) -> (Vec<Vec<String>>, bool) {
    let mut rows = Vec::new();
    let mut has_header = false;
    for row_node in table_node.children() {
        let NodeValue::TableRow(header) = row_node.data.borrow().value else {
            continue;
        };
        has_header |= header;
        let cells = row_node
            .children()
            .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
            .map(|cell| {
                spans_to_string(&collect_inline_spans(cell))
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        rows.push(cells);
    }
    (rows, has_header)
}

fn table_border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let mut out = String::new();
    out.push(left);
    for (idx, width) in widths.iter().enumerate() {
        out.push_str(&"─".repeat(width + 2));
        if idx + 1 < widths.len() {
            out.push(middle);
        }
    }
    out.push(right);
    out
}

/// Paragraphs holding nothing but images render as image placeholders.
fn paragraph_images<'a>(node: &'a AstNode<'a>) -> Vec<(String, String)> {
    let mut images = Vec::new();
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Image(link) => {
                let alt = spans_to_string(&collect_inline_spans(child));
                images.push((alt, link.url.clone()));
            }
            NodeValue::Text(text) if text.trim().is_empty() => {}
            NodeValue::SoftBreak | NodeValue::LineBreak => {}
            _ => return Vec::new(),
        }
    }
    images
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut underline = false;
    for child in node.children() {
        collect_inline_spans_recursive(child, InlineStyle::default(), &mut underline, &mut spans);
    }
    spans
}

/// `underline` tracks an open `<u>` tag; raw inline HTML arrives as
/// sibling nodes rather than wrapping its content.
fn collect_inline_spans_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    underline: &mut bool,
    spans: &mut Vec<InlineSpan>,
) {
    let current = InlineStyle {
        underline: style.underline || *underline,
        ..style
    };
    match &node.data.borrow().value {
        NodeValue::List(_) | NodeValue::Item(_) => {}
        NodeValue::Text(t) => {
            spans.push(InlineSpan::new(t.to_string(), current));
        }
        NodeValue::Code(code) => {
            let code_style = InlineStyle {
                code: true,
                ..current
            };
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
        }
        NodeValue::HtmlInline(html) => {
            let tag = html.trim().to_ascii_lowercase();
            match tag.as_str() {
                "<u>" | "<ins>" => *underline = true,
                "</u>" | "</ins>" => *underline = false,
                "<br>" | "<br/>" | "<br />" => {
                    spans.push(InlineSpan::new(" ".to_string(), current));
                }
                _ => {}
            }
        }
        NodeValue::Emph => {
            let next = InlineStyle {
                emphasis: true,
                ..style
            };
            recurse_children(node, next, underline, spans);
        }
        NodeValue::Strong => {
            let next = InlineStyle {
                strong: true,
                ..style
            };
            recurse_children(node, next, underline, spans);
        }
        NodeValue::Strikethrough => {
            let next = InlineStyle {
                strikethrough: true,
                ..style
            };
            recurse_children(node, next, underline, spans);
        }
        NodeValue::Link(_) => {
            let next = InlineStyle { link: true, ..style };
            recurse_children(node, next, underline, spans);
        }
        NodeValue::Image(link) => {
            let mut alt = Vec::new();
            recurse_children(node, style, underline, &mut alt);
            let alt = spans_to_string(&alt);
            let label = if alt.is_empty() { link.url.clone() } else { alt };
            let next = InlineStyle { link: true, ..style };
            spans.push(InlineSpan::new(format!("[Image: {label}]"), next));
        }
        NodeValue::FootnoteReference(reference) => {
            spans.push(InlineSpan::new(format!("[^{}]", reference.name), current));
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new(" ".to_string(), current));
        }
        _ => recurse_children(node, style, underline, spans),
    }
}

fn recurse_children<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    underline: &mut bool,
    spans: &mut Vec<InlineSpan>,
) {
    for child in node.children() {
        collect_inline_spans_recursive(child, style, underline, spans);
    }
}

fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let tokens: Vec<InlineSpan> = spans.iter().flat_map(split_inline_tokens).collect();

    let mut lines: Vec<Vec<InlineSpan>> = Vec::new();
    let mut current: Vec<InlineSpan> = Vec::new();
    let mut current_len = 0usize;
    let mut has_word = false;

    let start_new_line = |prefix: &str,
                          current: &mut Vec<InlineSpan>,
                          current_len: &mut usize,
                          has_word: &mut bool| {
        current.clear();
        *current_len = prefix.width();
        if !prefix.is_empty() {
            current.push(InlineSpan::new(prefix.to_string(), InlineStyle::default()));
        }
        *has_word = false;
    };

    start_new_line(prefix_first, &mut current, &mut current_len, &mut has_word);

    for token in tokens {
        let token_len = token.text().width();
        let token_is_ws = token.text().chars().all(char::is_whitespace);

        if current_len + token_len > width && has_word {
            lines.push(std::mem::take(&mut current));
            start_new_line(prefix_next, &mut current, &mut current_len, &mut has_word);
        }

        if token_is_ws && !has_word {
            // Drop leading whitespace at wrapped line starts.
            continue;
        }

        current_len += token_len;
        current.push(token);
        has_word = true;
    }

    lines.push(current);
    lines
}

fn split_inline_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut ws_state: Option<bool> = None;

    for ch in span.text().chars() {
        let is_ws = ch.is_whitespace();
        if ws_state.is_some_and(|state| state != is_ws) {
            out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
        }
        buf.push(ch);
        ws_state = Some(is_ws);
    }

    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }
    out
}

fn spans_to_string(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

fn hard_wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
            used = 0;
        }
        used += w;
        current.push(ch);
    }
    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}
