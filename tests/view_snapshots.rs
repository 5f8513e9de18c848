//! Rendering tests for the terminal host
//!
//! Uses ratatui TestBackend to check what the sheet looks like on screen at
//! rest, mid-transition, and after dismissal.

use bottomsheet::config::{ResolvedConfig, SheetConfig};
use bottomsheet::model::Rgba;
use bottomsheet::state::SheetPhase;
use bottomsheet::view::{BottomSheet, SheetApp, GRAB_HANDLE, SCREEN_BACKGROUND};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;
use ratatui::Terminal;
use std::time::Duration;

// ===== Test Helpers =====

/// Convert a ratatui buffer to a string representation.
///
/// Empty trailing lines are removed to keep comparisons readable.
fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area();
    let mut lines = Vec::new();

    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        lines.push(line.trim_end().to_string());
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

fn create_app(width: u16, height: u16, config: ResolvedConfig) -> SheetApp<TestBackend> {
    let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    SheetApp::with_terminal(terminal, &config, true).unwrap()
}

fn press(app: &mut SheetApp<TestBackend>, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn screen(app: &mut SheetApp<TestBackend>) -> String {
    app.draw().expect("draw succeeds");
    buffer_to_string(app.terminal().backend().buffer())
}

fn config_with_items(items: usize) -> ResolvedConfig {
    ResolvedConfig {
        items,
        ..ResolvedConfig::default()
    }
}

// ===== Tests =====

#[test]
fn hidden_screen_shows_key_hints_only() {
    let mut app = create_app(40, 12, config_with_items(3));
    let text = screen(&mut app);

    assert!(text.contains("space/p"));
    assert!(text.contains("phase: Hidden"));
    assert!(!text.contains('╭'));
}

#[test]
fn resting_sheet_occupies_bottom_rows() {
    let mut app = create_app(30, 12, config_with_items(2));
    press(&mut app, KeyCode::Char(' '));
    app.tick(Duration::from_secs(1));
    assert_eq!(app.phase(), SheetPhase::Resting);

    let text = screen(&mut app);
    let lines: Vec<&str> = text.lines().collect();
    // 2 items + 3 chrome rows at the bottom of 12 rows.
    assert_eq!(lines.len(), 12);
    assert!(lines[7].starts_with('╭') && lines[7].ends_with('╮'));
    assert!(lines[8].contains(GRAB_HANDLE));
    assert_eq!(lines[9].trim_matches(|c| c == '│' || c == ' '), "1");
    assert_eq!(lines[10].trim_matches(|c| c == '│' || c == ' '), "2");
    assert!(lines[11].starts_with('╰') && lines[11].ends_with('╯'));
}

#[test]
fn sheet_starts_below_the_screen() {
    let mut app = create_app(30, 12, config_with_items(2));
    press(&mut app, KeyCode::Char('p'));

    let text = screen(&mut app);
    assert!(!text.contains('╭'), "sheet should start off screen:\n{text}");
    assert_eq!(app.pose().dim_alpha, 0.0);
}

#[test]
fn sheet_is_partially_visible_mid_entry() {
    let mut app = create_app(30, 12, config_with_items(2));
    press(&mut app, KeyCode::Char(' '));
    app.tick(Duration::from_millis(150));

    let text = screen(&mut app);
    let top = text
        .lines()
        .position(|line| line.starts_with('╭'))
        .expect("top border visible mid-entry");
    assert!(top > 7 && top < 12, "top border at row {top}");

    let dim = app.pose().dim_alpha;
    assert!(dim > 0.0 && dim < 1.0, "dim was {dim}");
}

#[test]
fn backdrop_darkens_as_sheet_presents() {
    let mut app = create_app(20, 10, config_with_items(1));
    screen(&mut app);
    let before = app.terminal().backend().buffer()[(0, 0)].bg;
    let (r, g, b) = SCREEN_BACKGROUND;
    assert_eq!(before, Color::Rgb(r, g, b));

    press(&mut app, KeyCode::Char(' '));
    app.tick(Duration::from_secs(1));
    screen(&mut app);
    let after = app.terminal().backend().buffer()[(0, 0)].bg;

    // Default backdrop: black at 0.6 over the screen background.
    let expected = Rgba::BLACK.with_alpha(0.6).over(SCREEN_BACKGROUND, 1.0);
    assert_eq!(after, Color::Rgb(expected.0, expected.1, expected.2));
}

#[test]
fn dismissed_sheet_leaves_screen_clean() {
    let mut app = create_app(30, 12, config_with_items(2));
    press(&mut app, KeyCode::Char(' '));
    app.tick(Duration::from_secs(1));
    press(&mut app, KeyCode::Esc);
    app.tick(Duration::from_secs(1));

    let text = screen(&mut app);
    assert!(!text.contains('╭'));
    assert!(text.contains("phase: Hidden"));
}

#[test]
fn fixed_height_sheet_uses_configured_rows() {
    let mut config = config_with_items(2);
    config.height_rows = Some(6);
    config.sheet.fixed_height = Some(96.0);

    let mut app = create_app(30, 12, config);
    press(&mut app, KeyCode::Char(' '));
    app.tick(Duration::from_secs(1));

    let text = screen(&mut app);
    let top = text
        .lines()
        .position(|line| line.starts_with('╭'))
        .expect("top border visible");
    assert_eq!(top, 6);
}

#[test]
fn widget_renders_standalone() {
    let config = SheetConfig {
        corner_radius: 0.0,
        ..SheetConfig::default()
    };
    let area = Rect::new(0, 0, 10, 4);
    let mut buffer = Buffer::empty(area);
    BottomSheet::new(&config, Some(Rect::new(0, 1, 10, 3)), 1.0)
        .render(area, &mut buffer);

    let text = buffer_to_string(&buffer);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "");
    assert_eq!(lines[1], "┌────────┐");
    assert_eq!(lines[3], "└────────┘");
}
