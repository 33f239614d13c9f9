use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::document::{self, Document, PreviewMode};
use crate::editor::EditorBuffer;
use crate::scroll::{self, Pane, ScrollSync};
use crate::ui::viewport::Viewport;

/// Name used for saving when no file was opened.
pub const DEFAULT_FILE_NAME: &str = "document.md";
/// How long the status bar says "Copied!" after a copy.
pub const COPIED_LABEL_MS: u64 = 1_000;
const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// What a bottom-line prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    OpenFile,
    DriveImage,
    DriveFile,
}

impl PromptKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OpenFile => "Open file: ",
            Self::DriveImage => "Google Drive image URL: ",
            Self::DriveFile => "Google Drive file URL: ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

impl Prompt {
    pub const fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }
}

/// The complete editor session.
///
/// All state lives here; the event loop owns the only instance.
pub struct Model {
    /// Markdown source being edited
    pub buffer: EditorBuffer,
    /// Template used by reset and for empty documents
    pub default_input: String,
    /// Whether the text has diverged from the template since the last preset
    pub has_edited: bool,
    /// Name shown in the status bar and used for save/export
    pub current_file_name: String,
    /// Backing file, when one was opened
    pub file_path: Option<PathBuf>,
    pub editor_viewport: Viewport,
    pub preview_viewport: Viewport,
    pub scroll_sync: ScrollSync,
    pub preview_mode: PreviewMode,
    /// Laid-out preview of `buffer`
    pub preview: Document,
    /// Active bottom-line prompt
    pub prompt: Option<Prompt>,
    /// Stylesheet embedded into exported HTML
    pub css: Option<String>,
    pub watch_enabled: bool,
    /// Milliseconds since the event loop started
    pub now_ms: u64,
    /// Set after the first reset press with edits; a second press confirms
    pub reset_confirmed: bool,
    /// Set after the first quit press with unsaved changes
    pub quit_confirmed: bool,
    pub should_quit: bool,
    toast: Option<Toast>,
    copied_until_ms: Option<u64>,
    persist_requested: bool,
    preview_width: u16,
    terminal_size: (u16, u16),
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("current_file_name", &self.current_file_name)
            .field("file_path", &self.file_path)
            .field("has_edited", &self.has_edited)
            .field("preview_mode", &self.preview_mode)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create an empty session for a terminal of the given size.
    pub fn new(terminal_size: (u16, u16)) -> Self {
        let mut model = Self {
            buffer: EditorBuffer::empty(),
            default_input: String::new(),
            has_edited: false,
            current_file_name: DEFAULT_FILE_NAME.to_string(),
            file_path: None,
            editor_viewport: Viewport::default(),
            preview_viewport: Viewport::default(),
            scroll_sync: ScrollSync::default(),
            preview_mode: PreviewMode::default(),
            preview: Document::empty(),
            prompt: None,
            css: None,
            watch_enabled: false,
            now_ms: 0,
            reset_confirmed: false,
            quit_confirmed: false,
            should_quit: false,
            toast: None,
            copied_until_ms: None,
            persist_requested: false,
            preview_width: 1,
            terminal_size,
        };
        model.resize(terminal_size.0, terminal_size.1);
        model
    }

    /// Lay both panes out for a new terminal size. The bottom row is the
    /// status bar.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        let pane_height = height.saturating_sub(1);
        let panes = crate::ui::split_panes(ratatui::layout::Rect::new(0, 0, width, pane_height));
        self.editor_viewport
            .resize(panes[0].width.saturating_sub(1), pane_height);
        self.preview_width = crate::ui::preview_content_width(width);
        self.preview_viewport.resize(self.preview_width, pane_height);
        self.editor_viewport
            .set_total_lines(self.buffer.line_count());
        self.refresh_preview();
    }

    /// Replace the text with `text` as a fresh starting point: caret at the
    /// end of the first line, `has_edited` cleared.
    pub fn preset_value(&mut self, text: &str) {
        self.buffer.set_text(text);
        if self.file_path.is_none() {
            self.buffer.mark_clean();
        }
        self.buffer.move_to(0, self.buffer.line_len(0));
        self.has_edited = false;
        self.editor_viewport
            .set_total_lines(self.buffer.line_count());
        self.refresh_preview();
        self.persist_requested = true;
    }

    /// Bookkeeping after any edit of the buffer text.
    pub fn on_text_changed(&mut self) {
        let text = self.buffer.text();
        self.has_edited |= text != self.default_input;
        self.editor_viewport
            .set_total_lines(self.buffer.line_count());
        self.layout_preview(&text);
        self.ensure_cursor_visible();
        self.persist_requested = true;
    }

    /// Re-lay the preview from the current text.
    pub fn refresh_preview(&mut self) {
        let text = self.buffer.text();
        self.layout_preview(&text);
    }

    fn layout_preview(&mut self, text: &str) {
        self.preview = document::layout(text, self.preview_mode, self.preview_width);
        self.preview_viewport
            .set_total_lines(self.preview.line_count());
    }

    /// Switch to a file's contents.
    pub fn load_file(&mut self, path: &Path, text: &str) {
        self.buffer = EditorBuffer::from_text(text);
        self.file_path = Some(path.to_path_buf());
        self.current_file_name = path.file_name().map_or_else(
            || DEFAULT_FILE_NAME.to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        self.has_edited = text != self.default_input;
        self.editor_viewport
            .set_total_lines(self.buffer.line_count());
        self.refresh_preview();
        self.editor_viewport.go_to_top();
        self.preview_viewport.go_to_top();
        self.persist_requested = true;
    }

    /// Take new contents of the backing file, keeping the caret where it was.
    pub fn reload_text(&mut self, text: &str) {
        let cursor = self.buffer.cursor();
        self.buffer = EditorBuffer::from_text(text);
        self.buffer.move_to(cursor.line, cursor.col);
        self.on_text_changed();
    }

    pub const fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Where Save writes.
    pub fn save_path(&self) -> PathBuf {
        self.file_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.current_file_name))
    }

    /// `<stem>.html` next to the save path.
    pub fn export_path(&self) -> PathBuf {
        self.save_path().with_extension("html")
    }

    /// File stem used as the exported page title.
    pub fn document_title(&self) -> String {
        Path::new(&self.current_file_name)
            .file_stem()
            .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned())
    }

    pub const fn viewport(&self, pane: Pane) -> &Viewport {
        match pane {
            Pane::Editor => &self.editor_viewport,
            Pane::Preview => &self.preview_viewport,
        }
    }

    /// Scroll `pane` and let the other pane follow.
    pub(super) fn scroll_pane(&mut self, pane: Pane, apply: impl FnOnce(&mut Viewport)) {
        let viewport = match pane {
            Pane::Editor => &mut self.editor_viewport,
            Pane::Preview => &mut self.preview_viewport,
        };
        let before = viewport.offset();
        apply(viewport);
        if viewport.offset() != before {
            self.sync_scroll(pane);
        }
    }

    /// Keep the caret line inside the editor pane.
    pub(super) fn ensure_cursor_visible(&mut self) {
        let line = self.buffer.cursor().line;
        self.scroll_pane(Pane::Editor, |vp| vp.ensure_visible(line));
    }

    fn sync_scroll(&mut self, source: Pane) {
        if !self.scroll_sync.on_scroll(source, self.now_ms) {
            return;
        }
        match source {
            Pane::Editor => scroll::follow(&self.editor_viewport, &mut self.preview_viewport),
            Pane::Preview => scroll::follow(&self.preview_viewport, &mut self.editor_viewport),
        }
        tracing::trace!(
            ?source,
            editor = self.editor_viewport.offset(),
            preview = self.preview_viewport.offset(),
            "scroll synced"
        );
    }

    /// Advance the clock. Returns `true` when something visible changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.now_ms = now_ms;
        self.scroll_sync.settle(now_ms);
        if self.copied_until_ms.is_some_and(|until| until <= now_ms) {
            self.copied_until_ms = None;
            return true;
        }
        false
    }

    pub(super) const fn mark_copied(&mut self) {
        self.copied_until_ms = Some(self.now_ms + COPIED_LABEL_MS);
    }

    /// Label of the copy indicator in the status bar.
    pub const fn copy_label(&self) -> &'static str {
        if self.copied_until_ms.is_some() {
            "Copied!"
        } else {
            "Copy"
        }
    }

    /// Whether the last-state store should be written. Clears the request.
    pub fn take_persist_request(&mut self) -> bool {
        std::mem::replace(&mut self.persist_requested, false)
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Needed for `std::mem::take` in the event loop.
impl Default for Model {
    fn default() -> Self {
        Self::new((80, 24))
    }
}
