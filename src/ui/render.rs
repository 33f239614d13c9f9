use std::ops::Range;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::editor::{Position, TextBuffer, TextRange};
use crate::scroll::Pane;

use super::{EDITOR_WIDTH_PERCENT, PREVIEW_LEFT_PADDING, PREVIEW_WIDTH_PERCENT, status, style};

/// Split the main area into the editor (left) and preview (right) panes.
pub fn split_panes(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(EDITOR_WIDTH_PERCENT),
            Constraint::Percentage(PREVIEW_WIDTH_PERCENT),
        ])
        .split(area)
}

/// Width available to preview text for a terminal of `total_width` columns.
pub fn preview_content_width(total_width: u16) -> u16 {
    let area = Rect::new(0, 0, total_width, 1);
    split_panes(area)[1]
        .width
        .saturating_sub(PREVIEW_LEFT_PADDING)
        .max(1)
}

/// Which pane a terminal column belongs to.
pub fn pane_at(column: u16, total_width: u16) -> Pane {
    let area = Rect::new(0, 0, total_width, 1);
    if column < split_panes(area)[1].x {
        Pane::Editor
    } else {
        Pane::Preview
    }
}

/// Digits needed to number `total_lines` lines.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}

/// Gutter width including the space after the number.
pub const fn editor_gutter_width(total_lines: usize) -> u16 {
    line_number_width(total_lines) + 1
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();

    let prompt_active = model.prompt.is_some();
    let toast_active = model.active_toast().is_some();
    let footer_rows = 1 + u16::from(prompt_active) + u16::from(toast_active);
    let main_area = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };
    let prompt_area = Rect {
        y: area.y + area.height.saturating_sub(1 + u16::from(prompt_active)),
        height: 1,
        ..area
    };
    let toast_area = Rect {
        y: area
            .y
            .saturating_add(area.height)
            .saturating_sub(1 + u16::from(prompt_active) + u16::from(toast_active)),
        height: 1,
        ..area
    };

    let panes = split_panes(main_area);
    frame.render_widget(Clear, main_area);
    render_editor(model, frame, panes[0]);
    render_preview(model, frame, panes[1]);

    if toast_active {
        status::render_toast_bar(model, frame, toast_area);
    }
    if prompt_active {
        status::render_prompt_bar(model, frame, prompt_area);
    }
    status::render_status_bar(model, frame, status_area);
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(style::gutter_style());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let buf = &model.buffer;
    let total_lines = buf.line_count();
    let gutter_width = editor_gutter_width(total_lines).min(inner.width);
    let gutter_area = Rect {
        width: gutter_width,
        ..inner
    };
    let text_area = Rect {
        x: inner.x + gutter_width,
        width: inner.width.saturating_sub(gutter_width),
        ..inner
    };

    let start = model.editor_viewport.offset();
    let end = (start + inner.height as usize).min(total_lines);
    let cursor = buf.cursor().position();
    let selection = buf.selection();

    let mut numbers: Vec<Line> = Vec::with_capacity(end.saturating_sub(start));
    let mut content: Vec<Line> = Vec::with_capacity(end.saturating_sub(start));
    for line_idx in start..end {
        numbers.push(Line::styled(
            format!(
                "{:>width$} ",
                line_idx + 1,
                width = line_number_width(total_lines) as usize
            ),
            style::gutter_style(),
        ));
        let text = buf.line_at(line_idx).unwrap_or_default();
        content.push(Line::from(editor_line_spans(
            &text, line_idx, selection, cursor,
        )));
    }

    // Keep the caret column on screen for long lines.
    let text_width = usize::from(text_area.width.max(1));
    let hscroll = (cursor.col + 1).saturating_sub(text_width);
    let hscroll = u16::try_from(hscroll).unwrap_or(u16::MAX);

    frame.render_widget(Paragraph::new(numbers), gutter_area);
    frame.render_widget(Paragraph::new(content).scroll((0, hscroll)), text_area);
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let visible = model.preview.visible_lines(
        model.preview_viewport.offset(),
        model.preview_viewport.height() as usize,
    );

    let content: Vec<Line> = visible
        .iter()
        .map(|line| {
            let line_style = style::style_for_line_type(line.line_type());
            match line.spans() {
                Some(spans) => Line::from(
                    spans
                        .iter()
                        .map(|span| {
                            Span::styled(
                                span.text().to_string(),
                                style::style_for_inline(line_style, span.style()),
                            )
                        })
                        .collect::<Vec<_>>(),
                ),
                None => Line::styled(line.content().to_string(), line_style),
            }
        })
        .collect();

    let block = Block::default()
        .borders(Borders::NONE)
        .padding(Padding::left(PREVIEW_LEFT_PADDING));
    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Spans for one editor line with the selection and caret highlighted.
fn editor_line_spans(
    text: &str,
    line_idx: usize,
    selection: TextRange,
    cursor: Position,
) -> Vec<Span<'static>> {
    let chars: Vec<char> = text.chars().collect();
    let selected = selected_columns(selection, line_idx, chars.len());
    let caret = (cursor.line == line_idx).then_some(cursor.col.min(chars.len()));
    let cell_style = |col: usize| {
        if caret == Some(col) {
            style::cursor_style()
        } else if selected.contains(&col) {
            style::selection_style()
        } else {
            Style::default()
        }
    };

    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    for (col, ch) in chars.iter().enumerate() {
        let cell = cell_style(col);
        if cell != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = cell;
        run.push(*ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    if caret == Some(chars.len()) {
        spans.push(Span::styled(" ", style::cursor_style()));
    }
    spans
}

/// Columns of `line_idx` covered by `selection`.
fn selected_columns(selection: TextRange, line_idx: usize, line_len: usize) -> Range<usize> {
    if selection.is_empty() || line_idx < selection.start.line || line_idx > selection.end.line {
        return 0..0;
    }
    let from = if line_idx == selection.start.line {
        selection.start.col
    } else {
        0
    };
    let to = if line_idx == selection.end.line {
        selection.end.col
    } else {
        line_len
    };
    from.min(line_len)..to.min(line_len)
}
