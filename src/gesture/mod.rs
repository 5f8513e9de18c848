//! Gesture interpretation for the sheet.
//!
//! Pure per-event transforms: nothing here holds state between samples. The
//! state machine feeds in its current offset and resting position and applies
//! whatever comes back.

mod tracker;

pub use tracker::{PointerOutcome, PointerTracker, DRAG_SLOP, VELOCITY_HORIZON};

use crate::config::SheetConfig;

/// Result of applying one `Changed` sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate {
    /// The sheet would rise above its resting position; it is pinned there
    /// and the delta is dropped.
    Clamped {
        /// The resting position.
        offset: f32,
    },
    /// The sheet follows the pointer. `ratio` drives backdrop dimming.
    Follow {
        /// Proposed center y, at or below rest.
        offset: f32,
        /// Travel below rest relative to the resting position, in [0, 1].
        ratio: f32,
    },
}

impl DragUpdate {
    /// New sheet center y, whichever way the sample resolved.
    pub fn offset(&self) -> f32 {
        match *self {
            DragUpdate::Clamped { offset } | DragUpdate::Follow { offset, .. } => offset,
        }
    }
}

/// Apply a vertical delta to the sheet center.
///
/// `ratio` is travel below rest divided by the resting center y, clamped to
/// [0, 1]. A degenerate resting position (at or above the top edge of the
/// host) yields 0 with no travel and 1 otherwise.
pub fn interpret_change(current_offset: f32, resting: f32, delta_y: f32) -> DragUpdate {
    let proposed = current_offset + delta_y;
    if proposed < resting {
        return DragUpdate::Clamped { offset: resting };
    }

    let travel = proposed - resting;
    let ratio = if resting > f32::EPSILON {
        (travel / resting).clamp(0.0, 1.0)
    } else if travel > 0.0 {
        1.0
    } else {
        0.0
    };

    DragUpdate::Follow {
        offset: proposed,
        ratio,
    }
}

/// Backdrop opacity for a drag ratio: opaque at rest, clear at full travel.
pub fn dim_alpha_for_ratio(ratio: f32) -> f32 {
    1.0 - ratio.clamp(0.0, 1.0)
}

/// Everything a dismiss policy may look at when the pointer is released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseContext {
    /// Vertical release velocity, points per second, +y downward.
    pub velocity_y: f32,
    /// Current sheet center y.
    pub offset: f32,
    /// Resting sheet center y.
    pub resting: f32,
    /// Height of the sheet content.
    pub content_height: f32,
}

impl ReleaseContext {
    /// How far below rest the sheet has been dragged.
    pub fn travel(&self) -> f32 {
        self.offset - self.resting
    }

    /// Current y of the sheet's top edge.
    pub fn top_edge(&self) -> f32 {
        self.offset - self.content_height / 2.0
    }
}

/// What a release turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseDecision {
    /// Slide off screen and detach.
    Dismiss,
    /// Slide back to rest.
    Restore,
}

/// Velocity-threshold policy seam: decides dismiss vs restore on release.
pub trait DismissPolicy {
    /// `true` if the sheet should dismiss for this release.
    fn should_dismiss(&self, release: &ReleaseContext) -> bool;
}

impl<F> DismissPolicy for F
where
    F: Fn(&ReleaseContext) -> bool,
{
    fn should_dismiss(&self, release: &ReleaseContext) -> bool {
        self(release)
    }
}

/// Default policy: a fast downward flick or a far-enough drag dismisses.
///
/// `dismiss ⟺ velocity_y > threshold || travel >= fraction * content_height`.
/// With `fraction = 0.5` the distance rule is "top edge at or past the
/// resting center". Both comparisons treat negative settings as 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    /// Downward release velocity (points/s) above which the sheet dismisses.
    pub velocity_threshold: f32,
    /// Fraction of the content height of travel that dismisses a slow release.
    pub distance_fraction: f32,
}

impl ThresholdPolicy {
    /// Negative and NaN settings are stored as 0.
    pub fn new(velocity_threshold: f32, distance_fraction: f32) -> Self {
        Self {
            velocity_threshold: non_negative(velocity_threshold),
            distance_fraction: non_negative(distance_fraction),
        }
    }

    /// Policy for the thresholds in `config`.
    pub fn from_config(config: &SheetConfig) -> Self {
        Self::new(
            config.dismiss_velocity_threshold,
            config.dismiss_distance_fraction,
        )
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::from_config(&SheetConfig::default())
    }
}

impl DismissPolicy for ThresholdPolicy {
    fn should_dismiss(&self, release: &ReleaseContext) -> bool {
        let fast = release.velocity_y > self.velocity_threshold;
        let far = release.travel() >= self.distance_fraction * release.content_height;
        fast || far
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// Decide what a release does.
pub fn release_decision(policy: &dyn DismissPolicy, release: &ReleaseContext) -> ReleaseDecision {
    if policy.should_dismiss(release) {
        ReleaseDecision::Dismiss
    } else {
        ReleaseDecision::Restore
    }
}
