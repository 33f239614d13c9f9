//! Markdown preview layout.
//!
//! Parses markdown with comrak and lays it out as styled terminal lines for
//! the preview pane. [`crate::html`] shares the same extension set so both
//! preview modes agree on what the source means.

mod parser;
mod types;

pub use parser::parse_with_layout;
pub use types::{Document, InlineSpan, InlineStyle, LineType, RenderedLine};

/// Enable the GitHub-flavoured extensions used throughout the editor.
pub(crate) fn apply_extensions(options: &mut comrak::Options) {
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
}

/// Which view the preview pane shows.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewMode {
    /// Styled terminal rendering of the markdown.
    #[default]
    Rendered,
    /// The sanitized HTML the export would contain.
    Html,
}

impl PreviewMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Rendered => Self::Html,
            Self::Html => Self::Rendered,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Rendered => "Preview",
            Self::Html => "HTML",
        }
    }

    /// Parse a CLI/config value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rendered" | "preview" => Some(Self::Rendered),
            "html" => Some(Self::Html),
            _ => None,
        }
    }
}

/// Lay out `source` for the preview pane in the given mode.
pub fn layout(source: &str, mode: PreviewMode, width: u16) -> Document {
    match mode {
        PreviewMode::Rendered => Document::parse(source, width),
        PreviewMode::Html => Document::html_source(&crate::html::markdown_to_html(source), width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_mode_toggles() {
        assert_eq!(PreviewMode::Rendered.toggled(), PreviewMode::Html);
        assert_eq!(PreviewMode::Html.toggled(), PreviewMode::Rendered);
    }

    #[test]
    fn test_preview_mode_from_name() {
        assert_eq!(PreviewMode::from_name("HTML"), Some(PreviewMode::Html));
        assert_eq!(PreviewMode::from_name("rendered"), Some(PreviewMode::Rendered));
        assert_eq!(PreviewMode::from_name("pdf"), None);
    }

    #[test]
    fn test_layout_html_mode_shows_tags() {
        let doc = layout("**hi**", PreviewMode::Html, 80);
        assert_eq!(doc.line_at(0).unwrap().content(), "<p><strong>hi</strong></p>");
    }

    #[test]
    fn test_layout_rendered_mode_hides_markers() {
        let doc = layout("**hi**", PreviewMode::Rendered, 80);
        assert_eq!(doc.line_at(0).unwrap().content(), "hi");
    }
}
