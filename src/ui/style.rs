//! Colors for the preview pane and the editor chrome.
//!
//! Uses ANSI colors that follow the terminal palette, switching to darker
//! indexed colors when the terminal background is light.

use std::sync::{Mutex, OnceLock};

use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeMode;
use crate::document::{InlineStyle, LineType};

static THEME_OVERRIDE: OnceLock<Mutex<ThemeMode>> = OnceLock::new();

/// Force a light or dark palette. `Auto` goes back to detection.
pub fn set_theme_mode(mode: ThemeMode) {
    let lock = THEME_OVERRIDE.get_or_init(|| Mutex::new(ThemeMode::Auto));
    if let Ok(mut guard) = lock.lock() {
        *guard = mode;
    }
}

/// Whether colors should be picked for a light background.
pub fn is_light_background() -> bool {
    let lock = THEME_OVERRIDE.get_or_init(|| Mutex::new(ThemeMode::Auto));
    match lock.lock().map(|guard| *guard) {
        Ok(ThemeMode::Light) => true,
        Ok(ThemeMode::Dark) => false,
        _ => light_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref()),
    }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); a background index of
/// 7 or more is a light palette slot.
fn light_from_colorfgbg(colorfgbg: Option<&str>) -> bool {
    colorfgbg
        .and_then(|value| value.rsplit(';').next())
        .and_then(|bg| bg.parse::<u8>().ok())
        .is_some_and(|bg| bg >= 7)
}

const fn pick(light_bg: bool, light: Color, dark: Color) -> Color {
    if light_bg { light } else { dark }
}

/// Style for a preview line of the given type.
pub fn style_for_line_type(line_type: &LineType) -> Style {
    let light_bg = is_light_background();
    match line_type {
        LineType::Heading(1) => Style::default()
            .fg(pick(light_bg, Color::Indexed(24), Color::Cyan))
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineType::Heading(2) => Style::default()
            .fg(pick(light_bg, Color::Indexed(22), Color::Green))
            .add_modifier(Modifier::BOLD),
        LineType::Heading(3) => Style::default()
            .fg(pick(light_bg, Color::Indexed(58), Color::Yellow))
            .add_modifier(Modifier::BOLD),
        LineType::Heading(4) => Style::default()
            .fg(pick(light_bg, Color::Indexed(24), Color::Blue))
            .add_modifier(Modifier::BOLD),
        LineType::Heading(5) => Style::default()
            .fg(pick(light_bg, Color::Indexed(54), Color::Magenta))
            .add_modifier(Modifier::BOLD),
        LineType::Heading(_) => Style::default()
            .fg(pick(light_bg, Color::Indexed(24), Color::Cyan))
            .add_modifier(Modifier::BOLD),

        LineType::CodeBlock => Style::default()
            .fg(pick(light_bg, Color::Indexed(238), Color::Indexed(245)))
            .add_modifier(Modifier::DIM),

        LineType::BlockQuote => Style::default()
            .fg(pick(light_bg, Color::Indexed(24), Color::Blue))
            .add_modifier(Modifier::ITALIC),

        LineType::HorizontalRule => Style::default()
            .fg(pick(light_bg, Color::Indexed(241), Color::Indexed(240)))
            .add_modifier(Modifier::DIM),

        // Placeholder for an image the terminal cannot show.
        LineType::Image => Style::default()
            .fg(pick(light_bg, Color::Indexed(90), Color::Magenta))
            .add_modifier(Modifier::ITALIC),

        // HTML source view.
        LineType::Html => Style::default().fg(pick(light_bg, Color::Indexed(52), Color::Indexed(180))),

        LineType::ListItem(_) | LineType::Table | LineType::Paragraph | LineType::Empty => {
            Style::default()
        }
    }
}

/// Merge an inline span's style onto its line's base style.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let light_bg = is_light_background();
    let mut style = base;

    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style
            .add_modifier(Modifier::UNDERLINED)
            .fg(pick(light_bg, Color::Blue, Color::LightBlue));
    }
    if inline.code {
        style = style
            .fg(pick(light_bg, Color::Indexed(88), Color::Red))
            .add_modifier(Modifier::BOLD)
            .remove_modifier(Modifier::DIM);
    }

    style
}

/// Editor line-number gutter.
pub fn gutter_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Selected text in the editor.
pub fn selection_style() -> Style {
    Style::default().bg(pick(is_light_background(), Color::Indexed(153), Color::Indexed(238)))
}

/// The character cell under the caret.
pub fn cursor_style() -> Style {
    Style::default().bg(Color::White).fg(Color::Black)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_styles_are_bold() {
        for level in 1..=6 {
            let style = style_for_line_type(&LineType::Heading(level));
            assert!(style.add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn test_h1_is_underlined() {
        let style = style_for_line_type(&LineType::Heading(1));
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_code_block_and_html_have_color() {
        assert!(style_for_line_type(&LineType::CodeBlock).fg.is_some());
        assert!(style_for_line_type(&LineType::Html).fg.is_some());
    }

    #[test]
    fn test_inline_underline_and_strike() {
        let inline = InlineStyle {
            underline: true,
            strikethrough: true,
            ..InlineStyle::default()
        };
        let style = style_for_inline(Style::default(), inline);
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
        assert!(style.add_modifier.contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn test_inline_code_removes_dim() {
        let base = Style::default().add_modifier(Modifier::DIM);
        let inline = InlineStyle {
            code: true,
            ..InlineStyle::default()
        };
        let styled = style_for_inline(base, inline);
        assert!(!styled.add_modifier.contains(Modifier::DIM));
        assert!(styled.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_colorfgbg_detection() {
        assert!(!light_from_colorfgbg(Some("15;0")));
        assert!(light_from_colorfgbg(Some("0;15")));
        assert!(light_from_colorfgbg(Some("0;default;15")));
        assert!(!light_from_colorfgbg(Some("garbage")));
        assert!(!light_from_colorfgbg(None));
    }

    #[test]
    fn test_theme_override() {
        set_theme_mode(ThemeMode::Light);
        assert!(is_light_background());
        set_theme_mode(ThemeMode::Dark);
        assert!(!is_light_background());
        set_theme_mode(ThemeMode::Auto);
    }
}
