//! Drag samples delivered by a gesture source.

use super::geometry::Vector;

/// Phase of a pan gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Pointer moved past the slop; no translation applied yet.
    Began,
    /// Pointer moved; `translation` is the delta since the previous sample.
    Changed,
    /// Pointer released; `velocity` is the release velocity.
    Ended,
}

/// One tick of a pan gesture.
///
/// Samples are consumed immediately and never retained. `translation` is
/// incremental (the gesture source resets it after every sample), and
/// `velocity` is in points per second with +y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    /// Movement since the previous sample.
    pub translation: Vector,
    /// Pointer velocity, points per second.
    pub velocity: Vector,
    /// Where in the gesture this sample falls.
    pub phase: DragPhase,
}

impl DragSample {
    /// A `Began` sample.
    pub fn began() -> Self {
        Self {
            translation: Vector::ZERO,
            velocity: Vector::ZERO,
            phase: DragPhase::Began,
        }
    }

    /// A `Changed` sample moving by `translation`.
    pub fn changed(translation: Vector, velocity: Vector) -> Self {
        Self {
            translation,
            velocity,
            phase: DragPhase::Changed,
        }
    }

    /// A vertical-only `Changed` sample, mostly for tests and scripted drags.
    pub fn moved_by(dy: f32) -> Self {
        Self::changed(Vector::vertical(dy), Vector::ZERO)
    }

    /// An `Ended` sample released with `velocity`.
    pub fn ended(velocity: Vector) -> Self {
        Self {
            translation: Vector::ZERO,
            velocity,
            phase: DragPhase::Ended,
        }
    }

    /// A vertical-only `Ended` sample.
    pub fn released_at(velocity_y: f32) -> Self {
        Self::ended(Vector::vertical(velocity_y))
    }
}
