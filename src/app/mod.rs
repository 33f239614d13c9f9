//! Editor session state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: the complete session state
//! - [`Message`]: all possible events and actions
//! - [`update`]: pure function for state transitions
//! - [`App::run`]: main event loop with rendering and side effects

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{COPIED_LABEL_MS, DEFAULT_FILE_NAME, Model, Prompt, PromptKind, ToastLevel};
pub use update::{Message, RESET_CONFIRM_MESSAGE, update};

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::document::PreviewMode;
use crate::scroll::{DEFAULT_SYNC_DEBOUNCE_MS, ScrollSync};
use crate::store::{self, KeyValueStore};
use crate::watcher::FileWatcher;

/// Starting text when no `--template` is given.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../assets/template.md");

/// Owns the collaborators around a [`Model`]: the last-state store, the
/// file watcher and the startup options.
pub struct App {
    file_path: Option<PathBuf>,
    template_path: Option<PathBuf>,
    css_path: Option<PathBuf>,
    preview_mode: PreviewMode,
    sync_enabled: bool,
    sync_delay_ms: u64,
    restore_enabled: bool,
    watch_enabled: bool,
    store: Option<Box<dyn KeyValueStore>>,
    watcher: Option<FileWatcher>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("file_path", &self.file_path)
            .field("preview_mode", &self.preview_mode)
            .field("watch_enabled", &self.watch_enabled)
            .finish_non_exhaustive()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub const fn new() -> Self {
        Self {
            file_path: None,
            template_path: None,
            css_path: None,
            preview_mode: PreviewMode::Rendered,
            sync_enabled: true,
            sync_delay_ms: DEFAULT_SYNC_DEBOUNCE_MS,
            restore_enabled: true,
            watch_enabled: true,
            store: None,
            watcher: None,
        }
    }

    /// Open this file instead of restoring the last state.
    #[must_use]
    pub fn with_file(mut self, path: Option<PathBuf>) -> Self {
        self.file_path = path;
        self
    }

    /// Markdown file used as the default document and reset target.
    #[must_use]
    pub fn with_template(mut self, path: Option<PathBuf>) -> Self {
        self.template_path = path;
        self
    }

    /// Stylesheet embedded into exported HTML.
    #[must_use]
    pub fn with_css(mut self, path: Option<PathBuf>) -> Self {
        self.css_path = path;
        self
    }

    #[must_use]
    pub const fn with_preview_mode(mut self, mode: PreviewMode) -> Self {
        self.preview_mode = mode;
        self
    }

    #[must_use]
    pub const fn with_sync(mut self, enabled: bool, delay_ms: u64) -> Self {
        self.sync_enabled = enabled;
        self.sync_delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub const fn with_restore(mut self, enabled: bool) -> Self {
        self.restore_enabled = enabled;
        self
    }

    #[must_use]
    pub const fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Where the last editor contents are kept between sessions.
    #[must_use]
    pub fn with_store(mut self, store: Box<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the starting session: the FILE argument when given, otherwise
    /// the restored last state, otherwise the template.
    pub fn initial_model(&mut self, terminal_size: (u16, u16)) -> Model {
        let mut model = Model::new(terminal_size);
        model.preview_mode = self.preview_mode;
        model.scroll_sync = ScrollSync::new(self.sync_delay_ms);
        model.scroll_sync.set_enabled(self.sync_enabled);
        model.watch_enabled = self.watch_enabled;
        model.default_input = self.load_template(&mut model);
        model.css = self.load_css(&mut model);

        if let Some(path) = self.file_path.clone() {
            match fs::read_to_string(&path) {
                Ok(text) => {
                    tracing::info!(path = %path.display(), "opened");
                    model.load_file(&path, &text);
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    model.load_file(&path, "");
                    model.show_toast(ToastLevel::Info, format!("New file {}", path.display()));
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "open failed");
                    model.show_toast(ToastLevel::Error, format!("Open failed: {err}"));
                }
            }
        } else if self.restore_enabled {
            let restored = self.store.as_deref().and_then(|s| store::load_last_state(s));
            if let Some(text) = restored {
                tracing::debug!(bytes = text.len(), "restored last state");
                model.preset_value(&text);
                model.has_edited = text != model.default_input;
                model.editor_viewport.go_to_top();
                model.preview_viewport.go_to_top();
            }
        }

        if model.file_path.is_none() && model.buffer.text().is_empty() {
            let template = model.default_input.clone();
            model.preset_value(&template);
        }
        model
    }

    fn load_template(&self, model: &mut Model) -> String {
        let Some(path) = self.template_path.as_deref() else {
            return DEFAULT_TEMPLATE.to_string();
        };
        match fs::read_to_string(path) {
            Ok(text) => {
                tracing::debug!(path = %path.display(), "template loaded");
                text
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "template load failed");
                model.show_toast(ToastLevel::Warning, format!("Template load failed: {err}"));
                DEFAULT_TEMPLATE.to_string()
            }
        }
    }

    fn load_css(&self, model: &mut Model) -> Option<String> {
        let path = self.css_path.as_deref()?;
        match fs::read_to_string(path) {
            Ok(css) => Some(css),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "stylesheet load failed");
                model.show_toast(ToastLevel::Warning, format!("Stylesheet load failed: {err}"));
                None
            }
        }
    }
}
