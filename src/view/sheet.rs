//! Bottom sheet and backdrop rendering.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use crate::config::SheetConfig;
use crate::model::Rgba;

/// Background the demo screen is painted with; the backdrop blends over it.
pub const SCREEN_BACKGROUND: (u8, u8, u8) = (0x1e, 0x22, 0x2a);

/// Grab handle drawn on the first row inside the sheet.
pub const GRAB_HANDLE: &str = "━━━━━━";

/// Dimmed backdrop plus the sheet panel.
///
/// `sheet` is the cell rectangle the sheet currently covers (already clipped
/// to the area), `dim_alpha` the presented dim factor. The backdrop is drawn
/// over the whole area first with `background_color` at
/// `background_color.alpha * dim_alpha` opacity.
#[derive(Debug, Clone)]
pub struct BottomSheet<'a> {
    config: &'a SheetConfig,
    sheet: Option<Rect>,
    dim_alpha: f32,
    items: usize,
    use_color: bool,
}

impl<'a> BottomSheet<'a> {
    /// Widget for one frame; `sheet` is `None` while the sheet is off screen.
    pub fn new(config: &'a SheetConfig, sheet: Option<Rect>, dim_alpha: f32) -> Self {
        Self {
            config,
            sheet,
            dim_alpha,
            items: 0,
            use_color: true,
        }
    }

    /// Number of item rows to list under the grab handle.
    pub fn items(mut self, items: usize) -> Self {
        self.items = items;
        self
    }

    /// Monochrome terminals: no backdrop tint, default sheet colors.
    pub fn use_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    fn render_backdrop(&self, area: Rect, buf: &mut Buffer) {
        if !self.use_color {
            return;
        }
        let tint = rgb(self
            .config
            .background_color
            .over(SCREEN_BACKGROUND, self.dim_alpha));
        buf.set_style(area, Style::default().bg(tint));
    }

    fn render_sheet(&self, sheet: Rect, buf: &mut Buffer) {
        Clear.render(sheet, buf);

        let border_type = if self.config.corner_radius > 0.0 {
            BorderType::Rounded
        } else {
            BorderType::Plain
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type);
        if self.use_color {
            let surface = surface_color(self.config.content_background_color);
            block = block.style(Style::default().bg(surface).fg(readable_on(surface)));
        }

        let inner = block.inner(sheet);
        block.render(sheet, buf);

        let width = usize::from(inner.width);
        let lines: Vec<Line> = std::iter::once(GRAB_HANDLE.to_string())
            .chain((1..=self.items).map(|n| n.to_string()))
            .map(|label| Line::from(truncate_to_width(&label, width)))
            .collect();

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

impl Widget for BottomSheet<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_backdrop(area, buf);
        if let Some(sheet) = self.sheet.map(|sheet| sheet.intersection(area)) {
            if sheet.height > 0 && sheet.width > 0 {
                self.render_sheet(sheet, buf);
            }
        }
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// The sheet surface is composited over the screen background.
fn surface_color(color: Rgba) -> Color {
    rgb(color.over(SCREEN_BACKGROUND, 1.0))
}

fn readable_on(background: Color) -> Color {
    match background {
        Color::Rgb(r, g, b) => {
            let luma = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
            if luma > 140.0 {
                Color::Black
            } else {
                Color::White
            }
        }
        _ => Color::Reset,
    }
}

/// Cut `text` to at most `max_width` display columns.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.right())
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate_to_width("12345", 3), "123");
        assert_eq!(truncate_to_width("━━━━", 2), "━━");
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("日本", 3), "日");
    }

    #[test]
    fn backdrop_is_screen_color_when_undimmed() {
        let config = SheetConfig::default();
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        BottomSheet::new(&config, None, 0.0).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].bg, rgb(SCREEN_BACKGROUND));
    }

    #[test]
    fn backdrop_blends_configured_alpha_times_dim() {
        let config = SheetConfig {
            background_color: Rgba::BLACK.with_alpha(0.5),
            ..SheetConfig::default()
        };
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        BottomSheet::new(&config, None, 1.0).render(area, &mut buf);

        // Half-opaque black over the screen background halves each channel.
        assert_eq!(buf[(3, 2)].bg, Color::Rgb(0x0f, 0x11, 0x15));
    }

    #[test]
    fn sheet_draws_rounded_border_handle_and_items() {
        let config = SheetConfig::default();
        let area = Rect::new(0, 0, 12, 8);
        let mut buf = Buffer::empty(area);
        BottomSheet::new(&config, Some(Rect::new(0, 3, 12, 5)), 1.0)
            .items(2)
            .render(area, &mut buf);

        assert_eq!(row_text(&buf, 3), "╭──────────╮");
        assert!(row_text(&buf, 4).contains(GRAB_HANDLE));
        assert!(row_text(&buf, 5).contains('1'));
        assert!(row_text(&buf, 6).contains('2'));
        assert_eq!(row_text(&buf, 7), "╰──────────╯");
    }

    #[test]
    fn zero_corner_radius_draws_square_border() {
        let config = SheetConfig {
            corner_radius: 0.0,
            ..SheetConfig::default()
        };
        let area = Rect::new(0, 0, 6, 3);
        let mut buf = Buffer::empty(area);
        BottomSheet::new(&config, Some(area), 1.0).render(area, &mut buf);

        assert_eq!(row_text(&buf, 0), "┌────┐");
    }

    #[test]
    fn sheet_surface_uses_content_background() {
        let config = SheetConfig::default();
        let area = Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        BottomSheet::new(&config, Some(area), 1.0).render(area, &mut buf);

        assert_eq!(buf[(3, 1)].bg, Color::Rgb(255, 255, 255));
        assert_eq!(buf[(3, 1)].fg, Color::Black);
    }

    #[test]
    fn monochrome_leaves_colors_alone() {
        let config = SheetConfig::default();
        let area = Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        BottomSheet::new(&config, Some(Rect::new(0, 1, 8, 3)), 1.0)
            .use_color(false)
            .render(area, &mut buf);

        assert_eq!(buf[(0, 0)].bg, Color::Reset);
        assert_eq!(buf[(3, 2)].bg, Color::Reset);
    }

    #[test]
    fn sheet_outside_area_is_skipped() {
        let config = SheetConfig::default();
        let area = Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        BottomSheet::new(&config, Some(Rect::new(0, 10, 8, 3)), 0.0).render(area, &mut buf);

        assert_eq!(row_text(&buf, 3), "        ");
    }
}
