// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorBuffer)
    clippy::module_name_repetitions
)]

//! # mdlive
//!
//! A terminal Markdown editor with a live preview.
//!
//! mdlive shows the Markdown source on the left and its rendering on the
//! right, with:
//! - Toolbar shortcuts that wrap or unwrap inline styles around the selection
//! - Rendered or sanitized-HTML preview modes
//! - Proportional scroll sync between the panes
//! - Last-state restore between sessions
//! - File watching for external edits
//!
//! ## Architecture
//!
//! mdlive uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`editor`]: Text buffer, style toggling and toolbar actions
//! - [`document`]: Markdown parsing and preview layout
//! - [`html`]: HTML rendering, sanitizing and export
//! - [`scroll`]: Scroll sync between the panes
//! - [`store`]: Expiring key-value store for the last state
//! - [`drive`]: Google Drive link helpers
//! - [`ui`]: Terminal UI components
//! - [`watcher`]: File watching
//! - [`config`]: Saved defaults and paths

pub mod app;
pub mod config;
pub mod document;
pub mod drive;
pub mod editor;
pub mod html;
pub mod scroll;
pub mod store;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{Document, PreviewMode};
    pub use crate::editor::{EditorBuffer, InlineStyle, Position, TextBuffer, TextRange};
    pub use crate::ui::viewport::Viewport;
}
