//! Terminal UI components.
//!
//! - [`viewport`]: scroll position and visible range of one pane
//! - [`style`]: theming and colors

pub mod style;
pub mod viewport;

mod render;
mod status;

pub use render::{
    editor_gutter_width, line_number_width, pane_at, preview_content_width, render, split_panes,
};

/// Blank columns between the pane divider and the preview text.
pub const PREVIEW_LEFT_PADDING: u16 = 2;
pub const EDITOR_WIDTH_PERCENT: u16 = 50;
pub const PREVIEW_WIDTH_PERCENT: u16 = 50;

#[cfg(test)]
mod tests;
