//! Raw pointer events to drag samples.
//!
//! A host that only sees press/move/release positions (a terminal, a test
//! script) uses [`PointerTracker`] to get what a platform pan recognizer
//! would hand over: slop-filtered `Began`/`Changed` samples carrying
//! incremental translation, and an `Ended` sample with release velocity.

use std::collections::VecDeque;
use std::time::Duration;

use crate::model::{DragSample, Point, Vector};

/// Movement, in points, a press may wander before it stops being a tap.
pub const DRAG_SLOP: f32 = 8.0;

/// Window of recent samples used for the release velocity estimate.
pub const VELOCITY_HORIZON: Duration = Duration::from_millis(100);

/// What a release turned out to be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// Press and release without leaving the slop radius.
    Tap(Point),
    /// Release of a drag; carries the `Ended` sample.
    Drag(DragSample),
    /// Release with no matching press.
    Ignored,
}

#[derive(Debug, Clone)]
struct Press {
    origin: Point,
    last: Point,
    dragging: bool,
    history: VecDeque<(Duration, Point)>,
}

impl Press {
    fn record(&mut self, at: Duration, point: Point) {
        self.history.push_back((at, point));
        while let Some(&(t, _)) = self.history.front() {
            if at.saturating_sub(t) > VELOCITY_HORIZON {
                self.history.pop_front();
            } else {
                break;
            }
        }
    }

    fn velocity(&self) -> Vector {
        let (Some(&(t0, p0)), Some(&(t1, p1))) = (self.history.front(), self.history.back())
        else {
            return Vector::ZERO;
        };
        let dt = t1.saturating_sub(t0).as_secs_f32();
        if dt <= f32::EPSILON {
            return Vector::ZERO;
        }
        (p1 - p0).scale(1.0 / dt)
    }
}

/// Single-pointer pan/tap recognizer.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    press: Option<Press>,
}

impl PointerTracker {
    /// Tracker with no press in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a press is in progress.
    pub fn is_tracking(&self) -> bool {
        self.press.is_some()
    }

    /// Whether the current press has turned into a drag.
    pub fn is_dragging(&self) -> bool {
        self.press.as_ref().is_some_and(|press| press.dragging)
    }

    /// Pointer went down at `point`. Replaces any press in progress.
    pub fn press(&mut self, point: Point, at: Duration) {
        let mut history = VecDeque::with_capacity(8);
        history.push_back((at, point));
        self.press = Some(Press {
            origin: point,
            last: point,
            dragging: false,
            history,
        });
    }

    /// Pointer moved to `point`.
    ///
    /// Returns nothing while inside the slop radius. The first move beyond it
    /// yields `Began` followed by `Changed` with the full distance from the
    /// press; later moves yield one `Changed` with the delta since the
    /// previous move.
    pub fn moved(&mut self, point: Point, at: Duration) -> Vec<DragSample> {
        let Some(press) = self.press.as_mut() else {
            return Vec::new();
        };

        press.record(at, point);
        let mut samples = Vec::with_capacity(2);

        if !press.dragging {
            if (point - press.origin).length_squared() <= DRAG_SLOP * DRAG_SLOP {
                return samples;
            }
            press.dragging = true;
            samples.push(DragSample::began());
        }

        let delta = point - press.last;
        press.last = point;
        samples.push(DragSample::changed(delta, press.velocity()));
        samples
    }

    /// Pointer went up at `point`.
    ///
    /// Hosts whose release event carries a new position should call
    /// [`moved`](Self::moved) with it first so the final delta is applied.
    pub fn release(&mut self, point: Point, at: Duration) -> PointerOutcome {
        let Some(mut press) = self.press.take() else {
            return PointerOutcome::Ignored;
        };

        if !press.dragging && (point - press.origin).length_squared() <= DRAG_SLOP * DRAG_SLOP {
            return PointerOutcome::Tap(point);
        }

        press.record(at, point);
        PointerOutcome::Drag(DragSample::ended(press.velocity()))
    }

    /// Abandon the current press without emitting anything.
    pub fn cancel(&mut self) {
        self.press = None;
    }
}
