use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;

use crate::app::model::PromptKind;
use crate::app::{App, Message, Model};
use crate::editor::Direction;
use crate::editor::InlineStyle;
use crate::editor::toolbar::LinePrefix;
use crate::scroll::Pane;

use super::event_loop::ResizeDebouncer;

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) if model.prompt.is_none() => {
                Some(Message::InsertText(text.replace("\r\n", "\n")))
            }
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        let pane = crate::ui::pane_at(mouse.column, model.terminal_size().0);
        match mouse.kind {
            MouseEventKind::ScrollDown => Some(Message::ScrollDown(pane, WHEEL_LINES)),
            MouseEventKind::ScrollUp => Some(Message::ScrollUp(pane, WHEEL_LINES)),
            MouseEventKind::Down(MouseButton::Left) if pane == Pane::Editor => {
                if mouse.row >= model.editor_viewport.height() {
                    return None;
                }
                let gutter = crate::ui::editor_gutter_width(model.buffer.line_count());
                let line = model.editor_viewport.offset() + usize::from(mouse.row);
                let col = usize::from(mouse.column.saturating_sub(gutter));
                Some(Message::MoveTo(line, col))
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if let Some(prompt) = model.prompt.as_ref() {
            return match key.code {
                KeyCode::Esc => Some(Message::PromptCancel),
                KeyCode::Enter => Some(match prompt.kind {
                    PromptKind::OpenFile => Message::OpenFile(prompt.input.trim().into()),
                    PromptKind::DriveImage => Message::InsertDriveImage(prompt.input.clone()),
                    PromptKind::DriveFile => Message::InsertDriveFile(prompt.input.clone()),
                }),
                KeyCode::Backspace => Some(Message::PromptBackspace),
                KeyCode::Char(c)
                    if !key.modifiers.contains(KeyModifiers::CONTROL)
                        && !key.modifiers.contains(KeyModifiers::ALT) =>
                {
                    Some(Message::PromptInput(c))
                }
                _ => None,
            };
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if ctrl {
            return match key.code {
                KeyCode::Char('q' | 'c') => Some(Message::Quit),
                KeyCode::Char('s') => Some(Message::Save),
                KeyCode::Char('o') => Some(Message::StartPrompt(PromptKind::OpenFile)),
                KeyCode::Char('e') => Some(Message::ExportHtml),
                KeyCode::Char('y') => Some(Message::CopyMarkdown),
                KeyCode::Char('r') => Some(Message::Reset),
                KeyCode::Char('g') => Some(Message::StartPrompt(PromptKind::DriveImage)),
                KeyCode::Char('p') => Some(Message::TogglePreviewMode),
                KeyCode::Char('l') => Some(Message::ToggleSync),
                KeyCode::Char('a') => Some(Message::SelectAll),
                KeyCode::Left => Some(Message::MoveWordLeft(shift)),
                KeyCode::Right => Some(Message::MoveWordRight(shift)),
                KeyCode::Home => Some(Message::MoveToStart(shift)),
                KeyCode::End => Some(Message::MoveToEnd),
                _ => None,
            };
        }

        if alt {
            return match key.code {
                KeyCode::Char('b') => Some(Message::ToggleStyle(InlineStyle::Bold)),
                KeyCode::Char('i') => Some(Message::ToggleStyle(InlineStyle::Italic)),
                KeyCode::Char('u') => Some(Message::ToggleStyle(InlineStyle::Underline)),
                KeyCode::Char('s') => Some(Message::ToggleStyle(InlineStyle::Strikethrough)),
                KeyCode::Char('`') => Some(Message::ToggleStyle(InlineStyle::Code)),
                KeyCode::Char('h') => Some(Message::PrefixLine(LinePrefix::Heading)),
                KeyCode::Char('q') => Some(Message::PrefixLine(LinePrefix::Quote)),
                KeyCode::Char('l') => Some(Message::PrefixLine(LinePrefix::BulletList)),
                KeyCode::Char('n') => Some(Message::PrefixLine(LinePrefix::NumberedList)),
                KeyCode::Char('r') => Some(Message::InsertSeparator),
                KeyCode::Char('k') => Some(Message::InsertLink),
                KeyCode::Char('c') => Some(Message::CopyHtml),
                KeyCode::Char('g') => Some(Message::StartPrompt(PromptKind::DriveFile)),
                KeyCode::Up => Some(Message::ScrollUp(Pane::Preview, 1)),
                KeyCode::Down => Some(Message::ScrollDown(Pane::Preview, 1)),
                KeyCode::PageUp => Some(Message::PageUp(Pane::Preview)),
                KeyCode::PageDown => Some(Message::PageDown(Pane::Preview)),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Left => Some(Message::MoveCursor(Direction::Left, shift)),
            KeyCode::Right => Some(Message::MoveCursor(Direction::Right, shift)),
            KeyCode::Up => Some(Message::MoveCursor(Direction::Up, shift)),
            KeyCode::Down => Some(Message::MoveCursor(Direction::Down, shift)),
            KeyCode::Home => Some(Message::MoveHome(shift)),
            KeyCode::End => Some(Message::MoveEnd(shift)),
            KeyCode::PageUp => Some(Message::PageUp(Pane::Editor)),
            KeyCode::PageDown => Some(Message::PageDown(Pane::Editor)),
            KeyCode::Enter => Some(Message::InsertNewline),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Tab => Some(Message::InsertText("    ".to_string())),
            KeyCode::Char(c) => Some(Message::InsertChar(c)),
            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}
