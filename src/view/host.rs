//! Terminal implementation of [`SheetHost`].

use ratatui::layout::Rect;
use tracing::debug;

use crate::lifecycle::SheetHost;
use crate::model::{CellMetrics, Frame, Point};
use crate::state::SheetLayout;

/// Rows the sheet chrome takes besides its items: top border, grab handle,
/// bottom border.
pub const SHEET_CHROME_ROWS: u16 = 3;

/// Hosts the sheet on the full terminal viewport.
///
/// The container is the viewport converted to points with [`CellMetrics`].
/// The viewport is read once per `layout` call, so a resize mid-session does
/// not move the resting position until the sheet is presented again.
#[derive(Debug, Clone)]
pub struct TerminalHost {
    viewport: Rect,
    metrics: CellMetrics,
    items: usize,
    attached: bool,
}

impl TerminalHost {
    /// Host for a sheet listing `items` rows on `viewport`.
    pub fn new(viewport: Rect, items: usize) -> Self {
        Self {
            viewport,
            metrics: CellMetrics::default(),
            items,
            attached: false,
        }
    }

    /// Current viewport in cells.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Record a new viewport. Takes effect at the next `layout` call.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Cell size used for point conversion.
    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// Number of item rows the sheet lists.
    pub fn items(&self) -> usize {
        self.items
    }

    /// Whether the sheet is currently attached.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Rows needed to show every item plus the sheet chrome.
    pub fn intrinsic_rows(&self) -> u16 {
        let items = u16::try_from(self.items).unwrap_or(u16::MAX);
        items.saturating_add(SHEET_CHROME_ROWS)
    }

    /// Viewport bounds in points.
    pub fn container_frame(&self) -> Frame {
        let origin = self.metrics.cell_origin(self.viewport.x, self.viewport.y);
        Frame::new(
            origin.x,
            origin.y,
            self.metrics.columns_to_points(self.viewport.width),
            self.metrics.rows_to_points(self.viewport.height),
        )
    }

    /// Point under a terminal cell, as reported by a mouse event.
    pub fn point_at(&self, column: u16, row: u16) -> Point {
        self.metrics.cell_origin(column, row)
    }

    /// Cell rectangle covered by a sheet whose center is at `offset`.
    ///
    /// Rows are rounded to the nearest cell boundary and clipped to the
    /// viewport; `None` once the sheet is entirely below it.
    pub fn sheet_rect(&self, offset: f32, content_height: f32) -> Option<Rect> {
        let top = self.metrics.points_to_row(offset - content_height / 2.0);
        let bottom = self.metrics.points_to_row(offset + content_height / 2.0);

        let viewport_top = i32::from(self.viewport.y);
        let viewport_bottom = i32::from(self.viewport.bottom());
        let top = top.max(viewport_top);
        let bottom = bottom.min(viewport_bottom);
        if bottom <= top || self.viewport.width == 0 {
            return None;
        }

        // Both bounds lie within the viewport, which fits in u16.
        let y = u16::try_from(top).ok()?;
        let height = u16::try_from(bottom - top).ok()?;
        Some(Rect::new(self.viewport.x, y, self.viewport.width, height))
    }
}

impl SheetHost for TerminalHost {
    fn attach(&mut self) {
        debug!(viewport = ?self.viewport, "sheet attached to terminal");
        self.attached = true;
    }

    fn detach(&mut self) {
        debug!("sheet detached from terminal");
        self.attached = false;
    }

    fn layout(&self) -> SheetLayout {
        let height = self.metrics.rows_to_points(self.intrinsic_rows());
        SheetLayout::bottom_anchored(self.container_frame(), height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(items: usize) -> TerminalHost {
        TerminalHost::new(Rect::new(0, 0, 40, 20), items)
    }

    #[test]
    fn container_is_viewport_in_points() {
        assert_eq!(
            host(5).container_frame(),
            Frame::new(0.0, 0.0, 320.0, 320.0)
        );
    }

    #[test]
    fn intrinsic_layout_fits_items_and_chrome() {
        let layout = host(5).layout();
        // 5 items + 3 chrome rows = 8 rows = 128pt, anchored to the 320pt bottom.
        assert_eq!(layout.content, Frame::new(0.0, 192.0, 320.0, 128.0));
    }

    #[test]
    fn oversized_sheet_is_clamped_to_viewport() {
        let layout = host(500).layout();
        assert_eq!(layout.content.height, 320.0);
        assert_eq!(layout.content.min_y(), 0.0);
    }

    #[test]
    fn sheet_rect_at_rest_covers_bottom_rows() {
        let host = host(5);
        let layout = host.layout();
        let rect = host.sheet_rect(layout.content.center().y, layout.content.height);
        assert_eq!(rect, Some(Rect::new(0, 12, 40, 8)));
    }

    #[test]
    fn sheet_rect_is_clipped_while_sliding_in() {
        let host = host(5);
        // Center 64pt below rest: half the sheet is below the viewport.
        let rect = host.sheet_rect(256.0 + 64.0, 128.0);
        assert_eq!(rect, Some(Rect::new(0, 16, 40, 4)));
    }

    #[test]
    fn sheet_rect_none_when_offscreen() {
        let host = host(5);
        assert_eq!(host.sheet_rect(256.0 + 128.0, 128.0), None);
    }

    #[test]
    fn attach_and_detach_toggle_state() {
        let mut host = host(1);
        host.attach();
        assert!(host.is_attached());
        host.detach();
        assert!(!host.is_attached());
    }

    #[test]
    fn point_at_maps_cells_to_points() {
        assert_eq!(host(1).point_at(2, 3), Point::new(16.0, 48.0));
    }
}
