//! Domain types shared by the interaction core and its hosts.

pub mod color;
pub mod drag;
pub mod error;
pub mod geometry;

pub use color::{InvalidColor, Rgba};
pub use drag::{DragPhase, DragSample};
pub use error::{AppError, PresentError};
pub use geometry::{CellMetrics, Frame, Point, Vector};
