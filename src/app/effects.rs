use std::fs;
use std::io::{Write, stdout};
use std::path::Path;

use base64::Engine;

use crate::app::{App, Message, Model, ToastLevel};
use crate::html;
use crate::store;
use crate::watcher::FileWatcher;

/// Quiet period before an external change is reported.
const WATCH_DEBOUNCE_MS: u64 = 200;

impl App {
    /// (Re)start watching the model's file, or stop when watching is off.
    pub(super) fn restart_watcher(&mut self, model: &mut Model) {
        self.watcher = None;
        if !model.watch_enabled {
            return;
        }
        let Some(path) = model.file_path.as_deref() else {
            return;
        };
        if !path.exists() {
            return;
        }
        match FileWatcher::new(path, WATCH_DEBOUNCE_MS) {
            Ok(watcher) => self.watcher = Some(watcher),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "file watch unavailable");
                model.show_toast(ToastLevel::Warning, format!("Watch unavailable: {err}"));
            }
        }
    }

    pub(super) fn handle_message_side_effects(&mut self, model: &mut Model, msg: &Message) {
        match msg {
            Message::Save => self.save(model),
            Message::ExportHtml => export_html(model),
            Message::CopyMarkdown => {
                let text = model.buffer.text();
                copy_and_report(model, &text);
            }
            Message::CopyHtml => {
                let rendered = html::markdown_to_html(&model.buffer.text());
                copy_and_report(model, &rendered);
            }
            Message::OpenFile(path) => self.open_file(model, path),
            Message::FileChanged => reload_from_disk(model),
            _ => {}
        }
    }

    /// Write the editor contents to the last-state store.
    pub(super) fn persist(&mut self, model: &Model) {
        let Some(store) = self.store.as_deref_mut() else {
            return;
        };
        if let Err(err) = store::save_last_state(store, &model.buffer.text()) {
            tracing::warn!(%err, "failed to persist last state");
        }
    }

    fn save(&mut self, model: &mut Model) {
        let path = model.save_path();
        match fs::write(&path, model.buffer.text()) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "saved");
                model.buffer.mark_clean();
                let first_save = model.file_path.is_none();
                model.file_path = Some(path);
                model.show_toast(ToastLevel::Info, format!("Saved {}", model.current_file_name));
                if first_save || self.watcher.is_none() {
                    self.restart_watcher(model);
                }
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "save failed");
                model.show_toast(ToastLevel::Error, format!("Save failed: {err}"));
            }
        }
    }

    fn open_file(&mut self, model: &mut Model, path: &Path) {
        if path.as_os_str().is_empty() {
            return;
        }
        match fs::read_to_string(path) {
            Ok(text) => {
                tracing::info!(path = %path.display(), bytes = text.len(), "opened");
                model.load_file(path, &text);
                model.show_toast(ToastLevel::Info, format!("Opened {}", model.current_file_name));
                self.restart_watcher(model);
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "open failed");
                model.show_toast(ToastLevel::Error, format!("Open failed: {err}"));
            }
        }
    }
}

fn export_html(model: &mut Model) {
    let path = model.export_path();
    let body = html::markdown_to_html(&model.buffer.text());
    let css = model.css.as_deref().unwrap_or(html::DEFAULT_CSS);
    let page = html::standalone_document(&body, &model.document_title(), css);
    match fs::write(&path, page) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "exported html");
            model.show_toast(ToastLevel::Info, format!("Exported {}", path.display()));
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "export failed");
            model.show_toast(ToastLevel::Error, format!("Export failed: {err}"));
        }
    }
}

/// Pick up an external edit of the backing file. Our own saves read back
/// identical and are ignored; unsaved edits are never overwritten.
fn reload_from_disk(model: &mut Model) {
    let Some(path) = model.file_path.clone() else {
        return;
    };
    match fs::read_to_string(&path) {
        Ok(text) if text == model.buffer.text() => {
            tracing::trace!(path = %path.display(), "disk matches buffer");
        }
        Ok(text) if !model.buffer.is_dirty() => {
            tracing::info!(path = %path.display(), "reloaded after external change");
            model.reload_text(&text);
            model.show_toast(ToastLevel::Info, format!("Reloaded {}", model.current_file_name));
        }
        Ok(_) => {
            tracing::warn!(path = %path.display(), "external change while buffer is dirty");
            model.show_toast(
                ToastLevel::Warning,
                format!(
                    "{} changed on disk; unsaved edits kept",
                    model.current_file_name
                ),
            );
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "reload failed");
            model.show_toast(ToastLevel::Error, format!("Reload failed: {err}"));
        }
    }
}

fn copy_and_report(model: &mut Model, text: &str) {
    match copy_to_clipboard(text) {
        Ok(()) => {
            tracing::debug!(bytes = text.len(), "copied to clipboard");
            model.mark_copied();
        }
        Err(err) => {
            tracing::warn!(%err, "clipboard copy failed");
            model.show_toast(ToastLevel::Error, format!("Copy failed: {err}"));
        }
    }
}

fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        if copy_to_pbcopy(text).is_ok() {
            return Ok(());
        }
    }
    copy_to_clipboard_osc52(text)
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy failed"))
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_osc52_sequence_encodes_text() {
        assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_export_writes_standalone_page_next_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let mut model = Model::new((80, 24));
        model.load_file(&path, "# Hi\n\n<script>alert(1)</script>\n");

        export_html(&mut model);

        let page = fs::read_to_string(dir.path().join("notes.html")).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>notes</title>"));
        assert!(page.contains("<h1>Hi</h1>"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn test_reload_skips_own_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.md");
        fs::write(&path, "same").unwrap();
        let mut model = Model::new((80, 24));
        model.load_file(&path, "same");

        reload_from_disk(&mut model);
        assert!(model.active_toast().is_none());
    }

    #[test]
    fn test_reload_replaces_clean_buffer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.md");
        fs::write(&path, "new text").unwrap();
        let mut model = Model::new((80, 24));
        model.load_file(&path, "old");

        reload_from_disk(&mut model);
        assert_eq!(model.buffer.text(), "new text");
        assert!(!model.buffer.is_dirty());
        assert_eq!(model.active_toast().map(|t| t.1), Some(ToastLevel::Info));
    }

    #[test]
    fn test_reload_keeps_dirty_buffer_and_warns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.md");
        fs::write(&path, "theirs").unwrap();
        let mut model = Model::new((80, 24));
        model.load_file(&path, "mine");
        model.buffer.insert_char('!');

        reload_from_disk(&mut model);
        assert_eq!(model.buffer.text(), "!mine");
        assert_eq!(model.active_toast().map(|t| t.1), Some(ToastLevel::Warning));
    }
}
