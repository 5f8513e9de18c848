//! Animation driver seam.
//!
//! The state machine never interpolates anything itself. It describes where
//! the sheet should end up ([`AnimationRequest`]) and the [`Animator`] renders
//! the in-between frames, reporting back when a request has finished. The
//! bundled [`Timeline`] is a frame-driven implementation for hosts that own
//! their render loop.

mod easing;
mod timeline;

pub use easing::Easing;
pub use timeline::Timeline;

use std::time::Duration;

/// Identifies one animate call so its completion can be matched later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

impl AnimationId {
    /// Wrap a raw id.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// The two scalars animated together: sheet center y and backdrop opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetPose {
    /// Sheet center y.
    pub offset: f32,
    /// Backdrop opacity multiplier in [0, 1].
    pub dim_alpha: f32,
}

impl SheetPose {
    /// Pose from its two channels.
    pub fn new(offset: f32, dim_alpha: f32) -> Self {
        Self { offset, dim_alpha }
    }
}

/// Partial pose: channels left as `None` are not touched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseUpdate {
    /// Target sheet center y.
    pub offset: Option<f32>,
    /// Target backdrop opacity.
    pub dim_alpha: Option<f32>,
}

impl PoseUpdate {
    /// Offset only.
    pub fn offset(offset: f32) -> Self {
        Self {
            offset: Some(offset),
            dim_alpha: None,
        }
    }

    /// Dim alpha only.
    pub fn dim_alpha(dim_alpha: f32) -> Self {
        Self {
            offset: None,
            dim_alpha: Some(dim_alpha),
        }
    }

    /// Both channels.
    pub fn both(offset: f32, dim_alpha: f32) -> Self {
        Self {
            offset: Some(offset),
            dim_alpha: Some(dim_alpha),
        }
    }
}

/// An animate call: move the given channels to their targets over `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRequest {
    /// Reported back by the animator once the request finishes.
    pub id: AnimationId,
    /// Channels to move and where to.
    pub target: PoseUpdate,
    /// Zero completes on the next frame.
    pub duration: Duration,
    /// Timing curve.
    pub easing: Easing,
}

/// Position animator strategy.
///
/// Implementations own the presented (on-screen) pose. Retargeting a channel
/// that is already animating starts from its current presented value; the
/// superseded request never reports completion.
pub trait Animator {
    /// Place channels immediately, cancelling any in-flight animation on them.
    fn snap(&mut self, update: PoseUpdate);

    /// Start animating toward `request.target`.
    fn animate(&mut self, request: AnimationRequest);
}
