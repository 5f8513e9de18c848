//! Logical-point geometry.
//!
//! All coordinates are in logical points with the origin at the top-left of
//! the host surface and y growing downward. Hosts convert their native units
//! (terminal cells, physical pixels) into points before talking to the core.

use std::ops::{Add, Sub};

/// A position in logical points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position, growing downward.
    pub y: f32,
}

impl Point {
    /// Top-left corner of the host surface.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Point at `(x, y)`.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A displacement or rate in logical points (per second for velocities).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    /// Horizontal component.
    pub dx: f32,
    /// Vertical component, positive downward.
    pub dy: f32,
}

impl Vector {
    /// No displacement.
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    /// Vector from its components.
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Pure vertical vector.
    pub fn vertical(dy: f32) -> Self {
        Self { dx: 0.0, dy }
    }

    /// Squared length, for slop comparisons without a sqrt.
    pub fn length_squared(&self) -> f32 {
        self.dx * self.dx + self.dy * self.dy
    }

    /// Scale both components.
    pub fn scale(&self, factor: f32) -> Self {
        Self {
            dx: self.dx * factor,
            dy: self.dy * factor,
        }
    }
}

impl Sub for Point {
    type Output = Vector;

    fn sub(self, rhs: Point) -> Vector {
        Vector {
            dx: self.x - rhs.x,
            dy: self.y - rhs.y,
        }
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, rhs: Vector) -> Point {
        Point {
            x: self.x + rhs.dx,
            y: self.y + rhs.dy,
        }
    }
}

/// Axis-aligned rectangle in logical points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width in points.
    pub width: f32,
    /// Height in points.
    pub height: f32,
}

impl Frame {
    /// Frame from its origin and size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge.
    pub fn min_y(&self) -> f32 {
        self.y
    }

    /// Bottom edge.
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Same size, moved so its vertical center sits at `center_y`.
    pub fn with_center_y(&self, center_y: f32) -> Self {
        Self {
            y: center_y - self.height / 2.0,
            ..*self
        }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// Size of one character cell in logical points, for grid-based hosts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    /// Width of one column.
    pub column_width: f32,
    /// Height of one row.
    pub row_height: f32,
}

impl CellMetrics {
    /// Metrics for a cell of the given size.
    pub fn new(column_width: f32, row_height: f32) -> Self {
        Self {
            column_width,
            row_height,
        }
    }

    /// Height of `rows` rows.
    pub fn rows_to_points(&self, rows: u16) -> f32 {
        f32::from(rows) * self.row_height
    }

    /// Width of `columns` columns.
    pub fn columns_to_points(&self, columns: u16) -> f32 {
        f32::from(columns) * self.column_width
    }

    /// Top-left corner of a cell.
    pub fn cell_origin(&self, column: u16, row: u16) -> Point {
        Point {
            x: self.columns_to_points(column),
            y: self.rows_to_points(row),
        }
    }

    /// Nearest row boundary for a y coordinate, which may lie off-grid.
    pub fn points_to_row(&self, y: f32) -> i32 {
        (y / self.row_height).round() as i32
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            column_width: 8.0,
            row_height: 16.0,
        }
    }
}
