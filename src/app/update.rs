use std::path::PathBuf;

use crate::app::model::{Prompt, PromptKind};
use crate::app::{Model, ToastLevel};
use crate::drive;
use crate::editor::toolbar::{self, LinePrefix};
use crate::editor::{Direction, InlineStyle, toggle_selection};
use crate::scroll::Pane;

pub const RESET_CONFIRM_MESSAGE: &str =
    "Are you sure you want to reset? Your changes will be lost.";
const QUIT_CONFIRM_MESSAGE: &str = "Unsaved changes! Press Ctrl+Q again to quit, or Ctrl+S to save";

/// All possible events and actions in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Type a character, replacing the selection
    InsertChar(char),
    /// Insert pasted or generated text, replacing the selection
    InsertText(String),
    /// Split the line at the caret (Enter)
    InsertNewline,
    /// Backspace
    DeleteBack,
    /// Delete
    DeleteForward,
    SelectAll,

    // Caret movement; `true` extends the selection
    MoveCursor(Direction, bool),
    MoveHome(bool),
    MoveEnd(bool),
    MoveWordLeft(bool),
    MoveWordRight(bool),
    MoveToStart(bool),
    MoveToEnd,
    /// Place the caret at (line, col), e.g. from a mouse click
    MoveTo(usize, usize),

    // Toolbar
    /// Wrap or unwrap the selection with an inline style
    ToggleStyle(InlineStyle),
    PrefixLine(LinePrefix),
    InsertSeparator,
    InsertLink,

    // Prompts
    StartPrompt(PromptKind),
    PromptInput(char),
    PromptBackspace,
    PromptCancel,
    /// Open the file at the given path
    OpenFile(PathBuf),
    /// Insert a Google Drive image from a share URL
    InsertDriveImage(String),
    /// Insert a Google Drive download button from a share URL
    InsertDriveFile(String),

    // Scrolling
    ScrollUp(Pane, usize),
    ScrollDown(Pane, usize),
    PageUp(Pane),
    PageDown(Pane),

    // Session
    /// Restore the template (asks first when there are edits)
    Reset,
    Save,
    ExportHtml,
    CopyMarkdown,
    CopyHtml,
    TogglePreviewMode,
    ToggleSync,
    /// The backing file changed on disk
    FileChanged,

    // Window
    Resize(u16, u16),

    // Application
    Quit,
}

/// Pure state transition. File I/O, clipboard and store writes happen in
/// the effects that run after it.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Confirmation flags only survive a repeat of the confirmed action.
    // Save keeps the quit flag so Ctrl+S can complete a pending quit.
    if !matches!(msg, Message::Quit | Message::Save) {
        model.quit_confirmed = false;
    }
    if !matches!(msg, Message::Reset) {
        model.reset_confirmed = false;
    }

    match msg {
        // Editing
        Message::InsertChar(ch) => {
            model.buffer.insert_char(ch);
            model.on_text_changed();
        }
        Message::InsertText(text) => {
            model.buffer.insert_str(&text);
            model.on_text_changed();
        }
        Message::InsertNewline => {
            model.buffer.split_line();
            model.on_text_changed();
        }
        Message::DeleteBack => {
            if model.buffer.delete_back() {
                model.on_text_changed();
            }
        }
        Message::DeleteForward => {
            if model.buffer.delete_forward() {
                model.on_text_changed();
            }
        }
        Message::SelectAll => {
            model.buffer.select_all();
            model.ensure_cursor_visible();
        }

        // Movement
        Message::MoveCursor(direction, extend) => {
            model.buffer.move_cursor(direction, extend);
            model.ensure_cursor_visible();
        }
        Message::MoveHome(extend) => {
            model.buffer.move_home(extend);
            model.ensure_cursor_visible();
        }
        Message::MoveEnd(extend) => {
            model.buffer.move_end(extend);
            model.ensure_cursor_visible();
        }
        Message::MoveWordLeft(extend) => {
            model.buffer.move_word_left(extend);
            model.ensure_cursor_visible();
        }
        Message::MoveWordRight(extend) => {
            model.buffer.move_word_right(extend);
            model.ensure_cursor_visible();
        }
        Message::MoveToStart(extend) => {
            model.buffer.move_to_start(extend);
            model.ensure_cursor_visible();
        }
        Message::MoveToEnd => {
            model.buffer.move_to_end();
            model.ensure_cursor_visible();
        }
        Message::MoveTo(line, col) => {
            model.buffer.move_to(line, col);
            model.ensure_cursor_visible();
        }

        // Toolbar
        Message::ToggleStyle(style) => {
            toggle_selection(&mut model.buffer, style);
            model.on_text_changed();
        }
        Message::PrefixLine(prefix) => {
            if toolbar::prefix_line(&mut model.buffer, prefix) {
                model.on_text_changed();
            }
        }
        Message::InsertSeparator => {
            toolbar::insert_separator(&mut model.buffer);
            model.on_text_changed();
        }
        Message::InsertLink => {
            toolbar::insert_link(&mut model.buffer);
            model.on_text_changed();
        }

        // Prompts
        Message::StartPrompt(kind) => {
            model.prompt = Some(Prompt::new(kind));
        }
        Message::PromptInput(ch) => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.input.push(ch);
            }
        }
        Message::PromptBackspace => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.input.pop();
            }
        }
        // OpenFile reads the file in the effects.
        Message::PromptCancel | Message::OpenFile(_) => {
            model.prompt = None;
        }
        Message::InsertDriveImage(url) => {
            model.prompt = None;
            insert_drive_link(&mut model, drive::image_markdown(url.trim()));
        }
        Message::InsertDriveFile(url) => {
            model.prompt = None;
            insert_drive_link(&mut model, drive::file_button_markdown(url.trim()));
        }

        // Scrolling
        Message::ScrollUp(pane, n) => model.scroll_pane(pane, |vp| vp.scroll_up(n)),
        Message::ScrollDown(pane, n) => model.scroll_pane(pane, |vp| vp.scroll_down(n)),
        Message::PageUp(pane) => model.scroll_pane(pane, |vp| vp.page_up()),
        Message::PageDown(pane) => model.scroll_pane(pane, |vp| vp.page_down()),

        // Session
        Message::Reset => {
            let edited = model.has_edited || model.buffer.text() != model.default_input;
            if edited && !model.reset_confirmed {
                model.show_toast(ToastLevel::Warning, RESET_CONFIRM_MESSAGE);
                model.reset_confirmed = true;
            } else {
                let template = model.default_input.clone();
                model.preset_value(&template);
                model.editor_viewport.go_to_top();
                model.preview_viewport.go_to_top();
                model.reset_confirmed = false;
            }
        }
        Message::TogglePreviewMode => {
            model.preview_mode = model.preview_mode.toggled();
            model.refresh_preview();
        }
        Message::ToggleSync => {
            let enabled = !model.scroll_sync.is_enabled();
            model.scroll_sync.set_enabled(enabled);
            model.show_toast(
                ToastLevel::Info,
                if enabled {
                    "Scroll sync on"
                } else {
                    "Scroll sync off"
                },
            );
        }
        // Side effects only
        Message::Save
        | Message::ExportHtml
        | Message::CopyMarkdown
        | Message::CopyHtml
        | Message::FileChanged => {}

        // Window
        Message::Resize(width, height) => {
            model.resize(width, height);
        }

        // Application
        Message::Quit => {
            if model.buffer.is_dirty() && !model.quit_confirmed {
                model.show_toast(ToastLevel::Warning, QUIT_CONFIRM_MESSAGE);
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }
    }
    model
}

fn insert_drive_link(model: &mut Model, markdown: Result<String, drive::DriveLinkError>) {
    match markdown {
        Ok(markdown) => {
            toolbar::insert_snippet(&mut model.buffer, &markdown);
            model.on_text_changed();
        }
        Err(err) => {
            tracing::warn!(%err, "drive link rejected");
            model.show_toast(ToastLevel::Error, err.to_string());
        }
    }
}
