use super::*;
use crate::app::{Message, Model, PromptKind, update};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(80, 24);
    Terminal::new(backend).unwrap()
}

fn create_test_model(text: &str) -> Model {
    let mut model = Model::new((80, 24));
    model.default_input = text.to_string();
    model.preset_value(text);
    model
}

fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol())
        .collect()
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    (0..terminal.backend().buffer().area.height)
        .map(|y| row_text(terminal, y))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_status_bar_shows_file_and_cursor() {
    let mut terminal = create_test_terminal();
    let model = create_test_model("# Title\nbody");

    terminal.draw(|frame| render(&model, frame)).unwrap();

    let status = row_text(&terminal, 23);
    assert!(status.contains("document.md"));
    assert!(status.contains("Ln 1, Col 8"));
    assert!(status.contains("[Preview]"));
    assert!(status.contains("[sync]"));
    assert!(status.contains("Copy"));
    assert!(!status.contains("[modified]"));
}

#[test]
fn test_status_bar_marks_unsaved_changes() {
    let mut terminal = create_test_terminal();
    let model = create_test_model("text");
    let model = update(model, Message::InsertChar('!'));

    terminal.draw(|frame| render(&model, frame)).unwrap();

    assert!(row_text(&terminal, 23).contains("[modified]"));
}

#[test]
fn test_editor_pane_shows_line_numbers_and_text() {
    let mut terminal = create_test_terminal();
    let model = create_test_model("first\nsecond");

    terminal.draw(|frame| render(&model, frame)).unwrap();

    let gutter = usize::from(editor_gutter_width(2));
    let row0 = row_text(&terminal, 0);
    let row1 = row_text(&terminal, 1);
    assert!(row0.starts_with("1 "));
    assert_eq!(&row0[gutter..gutter + 5], "first");
    assert!(row1.starts_with("2 "));
    assert_eq!(&row1[gutter..gutter + 6], "second");
}

#[test]
fn test_preview_pane_renders_markdown() {
    let mut terminal = create_test_terminal();
    let model = create_test_model("# Heading\n\nSome **bold** text");

    terminal.draw(|frame| render(&model, frame)).unwrap();

    let preview_x = usize::from(split_panes(Rect::new(0, 0, 80, 23))[1].x);
    let screen = screen_text(&terminal);
    let preview: Vec<String> = screen
        .lines()
        .map(|line| line.chars().skip(preview_x).collect())
        .collect();
    assert!(preview.iter().any(|line| line.contains("Heading")));
    assert!(preview.iter().any(|line| line.contains("Some bold text")));
}

#[test]
fn test_html_preview_mode_shows_tags() {
    let mut terminal = create_test_terminal();
    let model = create_test_model("# Heading");
    let model = update(model, Message::TogglePreviewMode);

    terminal.draw(|frame| render(&model, frame)).unwrap();

    assert!(screen_text(&terminal).contains("<h1>"));
    assert!(row_text(&terminal, 23).contains("[HTML]"));
}

#[test]
fn test_prompt_bar_shows_label_and_input() {
    let mut terminal = create_test_terminal();
    let model = create_test_model("");
    let model = update(model, Message::StartPrompt(PromptKind::OpenFile));
    let model = update(model, Message::PromptInput('a'));

    terminal.draw(|frame| render(&model, frame)).unwrap();

    let prompt = row_text(&terminal, 22);
    assert!(prompt.starts_with("Open file: a"));
    assert!(prompt.contains("Esc: cancel"));
}

#[test]
fn test_toast_bar_above_status() {
    let mut terminal = create_test_terminal();
    let model = create_test_model("");
    let model = update(model, Message::ToggleSync);

    terminal.draw(|frame| render(&model, frame)).unwrap();

    assert!(row_text(&terminal, 22).starts_with("[info] Scroll sync off"));
    assert!(row_text(&terminal, 23).contains("[nosync]"));
}

#[test]
fn test_long_line_scrolls_to_keep_caret_visible() {
    let mut terminal = create_test_terminal();
    let long = format!("{}END", "x".repeat(100));
    let model = create_test_model(&long);

    terminal.draw(|frame| render(&model, frame)).unwrap();

    let editor_width = usize::from(split_panes(Rect::new(0, 0, 80, 23))[0].width);
    let row0: String = row_text(&terminal, 0).chars().take(editor_width).collect();
    assert!(row0.contains("END"));
}

#[test]
fn test_render_tiny_terminal_does_not_panic() {
    let backend = TestBackend::new(4, 2);
    let mut terminal = Terminal::new(backend).unwrap();
    let model = Model::new((4, 2));
    terminal.draw(|frame| render(&model, frame)).unwrap();
}
