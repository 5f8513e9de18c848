//! Sheet interaction state machine.

use tracing::{debug, trace};

use crate::animation::{AnimationId, AnimationRequest, PoseUpdate};
use crate::config::SheetConfig;
use crate::gesture::{
    dim_alpha_for_ratio, interpret_change, release_decision, DismissPolicy, DragUpdate,
    ReleaseContext, ReleaseDecision, ThresholdPolicy,
};
use crate::model::{DragPhase, DragSample, Frame};

/// Geometry reported by the host when the sheet appears.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetLayout {
    /// Area the sheet and its backdrop cover.
    pub container: Frame,
    /// Final (resting) frame of the sheet content.
    pub content: Frame,
}

impl SheetLayout {
    /// Layout from explicit frames.
    pub fn new(container: Frame, content: Frame) -> Self {
        Self { container, content }
    }

    /// A content frame of `height` anchored to the bottom of `container`.
    pub fn bottom_anchored(container: Frame, height: f32) -> Self {
        let height = height.clamp(0.0, container.height.max(0.0));
        let content = Frame::new(
            container.x,
            container.max_y() - height,
            container.width,
            height,
        );
        Self { container, content }
    }
}

/// Interaction phase of one presentation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetPhase {
    /// Not on screen. Initial and terminal phase.
    Hidden,
    /// Sliding up from below the container.
    Presenting,
    /// Presented and idle.
    Resting,
    /// Following the pointer.
    Dragging,
    /// Sliding off screen; ends in `Hidden`.
    Dismissing,
    /// Sliding back to rest; ends in `Resting`.
    Restoring,
}

impl SheetPhase {
    /// Whether a tracked position animation is in flight.
    pub fn is_animating(&self) -> bool {
        matches!(
            self,
            SheetPhase::Presenting | SheetPhase::Dismissing | SheetPhase::Restoring
        )
    }

    /// Whether the sheet accepts drag samples and dismiss requests.
    pub fn is_interactive(&self) -> bool {
        matches!(self, SheetPhase::Resting | SheetPhase::Dragging)
    }
}

/// Work the embedding layer must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetEffect {
    /// Place channels immediately.
    Snap(PoseUpdate),
    /// Start an animation; position animations report back through
    /// [`SheetMachine::animation_completed`].
    Animate(AnimationRequest),
    /// Remove the sheet from the host without animation. Emitted once, when
    /// dismissal finishes.
    Detach,
}

/// State machine for one presentation session.
///
/// Owns the resting position, the sheet offset (model value; animations set
/// it to their target immediately) and the backdrop dim factor. Every input
/// is a synchronous call returning the effects to apply, and inputs that
/// arrive while a position animation is in flight are ignored.
pub struct SheetMachine {
    config: SheetConfig,
    policy: Box<dyn DismissPolicy>,
    phase: SheetPhase,
    resting: f32,
    content_height: f32,
    offset: f32,
    dim_alpha: f32,
    in_flight: Option<AnimationId>,
    next_id: u64,
}

impl std::fmt::Debug for SheetMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetMachine")
            .field("phase", &self.phase)
            .field("resting", &self.resting)
            .field("content_height", &self.content_height)
            .field("offset", &self.offset)
            .field("dim_alpha", &self.dim_alpha)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl SheetMachine {
    /// New hidden machine using the default [`ThresholdPolicy`] for `config`.
    pub fn new(config: SheetConfig) -> Self {
        let policy = ThresholdPolicy::from_config(&config);
        Self::with_policy(config, Box::new(policy))
    }

    /// New hidden machine with a custom dismiss policy.
    pub fn with_policy(config: SheetConfig, policy: Box<dyn DismissPolicy>) -> Self {
        Self {
            config,
            policy,
            phase: SheetPhase::Hidden,
            resting: 0.0,
            content_height: 0.0,
            offset: 0.0,
            dim_alpha: 0.0,
            in_flight: None,
            next_id: 0,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SheetPhase {
        self.phase
    }

    /// Configuration latched for this session.
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Resting center y captured when the sheet appeared.
    pub fn resting_position(&self) -> f32 {
        self.resting
    }

    /// Height of the sheet content for this session.
    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    /// Current (model) center y of the sheet.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Current (model) backdrop dim factor in [0, 1].
    pub fn dim_alpha(&self) -> f32 {
        self.dim_alpha
    }

    /// Top edge of the sheet at the current offset.
    pub fn top_edge(&self) -> f32 {
        self.offset - self.content_height / 2.0
    }

    /// Center y that puts the sheet fully below the container.
    pub fn offscreen_position(&self) -> f32 {
        self.resting + self.content_height
    }

    /// Id of the tracked position animation, if one is running.
    pub fn in_flight(&self) -> Option<AnimationId> {
        self.in_flight
    }

    /// Hidden → Presenting.
    ///
    /// Captures the resting position from `layout`, drops the sheet one
    /// content height below it with a clear backdrop, then animates both back.
    /// A configured fixed height replaces the host's content height; the
    /// content stays anchored to the bottom of the container.
    pub fn appear(&mut self, layout: SheetLayout) -> Vec<SheetEffect> {
        if self.phase != SheetPhase::Hidden {
            debug!(phase = ?self.phase, "appear ignored: session already active");
            return Vec::new();
        }

        let layout = match self.config.fixed_height {
            Some(height) if height.is_finite() => {
                SheetLayout::bottom_anchored(layout.container, height)
            }
            _ => layout,
        };

        self.resting = layout.content.center().y;
        self.content_height = layout.content.height.max(0.0);
        let start = self.offscreen_position();

        debug!(
            resting = self.resting,
            content_height = self.content_height,
            "sheet appearing"
        );

        let mut effects = vec![SheetEffect::Snap(PoseUpdate::both(start, 0.0))];
        self.offset = start;
        self.dim_alpha = 0.0;
        effects.push(self.start_tracked(PoseUpdate::both(self.resting, 1.0)));
        self.set_phase(SheetPhase::Presenting);
        effects
    }

    /// Feed one drag sample.
    pub fn drag(&mut self, sample: DragSample) -> Vec<SheetEffect> {
        if !self.phase.is_interactive() {
            trace!(phase = ?self.phase, ?sample, "drag sample ignored");
            return Vec::new();
        }

        match sample.phase {
            DragPhase::Began => Vec::new(),
            DragPhase::Changed => self.drag_changed(sample),
            DragPhase::Ended if self.phase == SheetPhase::Resting => {
                debug!("release without a prior change; restoring");
                self.begin_restore()
            }
            DragPhase::Ended => self.drag_ended(sample),
        }
    }

    fn drag_changed(&mut self, sample: DragSample) -> Vec<SheetEffect> {
        let update = interpret_change(self.offset, self.resting, sample.translation.dy);
        trace!(?update, delta = sample.translation.dy, "drag changed");
        self.set_phase(SheetPhase::Dragging);

        match update {
            DragUpdate::Clamped { offset } => {
                if offset == self.offset {
                    return Vec::new();
                }
                self.offset = offset;
                let mut effects = vec![SheetEffect::Snap(PoseUpdate::offset(offset))];
                // Pinned at rest: the drag ratio is 0 again.
                let dim_alpha = dim_alpha_for_ratio(0.0);
                if self.dim_alpha != dim_alpha {
                    effects.push(self.smooth_dim_to(dim_alpha));
                }
                effects
            }
            DragUpdate::Follow { offset, ratio } => {
                self.offset = offset;
                vec![
                    SheetEffect::Snap(PoseUpdate::offset(offset)),
                    self.smooth_dim_to(dim_alpha_for_ratio(ratio)),
                ]
            }
        }
    }

    /// Dim smoothing is untracked: only position animations gate phases.
    fn smooth_dim_to(&mut self, dim_alpha: f32) -> SheetEffect {
        self.dim_alpha = dim_alpha;
        SheetEffect::Animate(AnimationRequest {
            id: self.allocate_id(),
            target: PoseUpdate::dim_alpha(dim_alpha),
            duration: self.config.transition_duration,
            easing: self.config.easing,
        })
    }

    fn drag_ended(&mut self, sample: DragSample) -> Vec<SheetEffect> {
        let release = ReleaseContext {
            velocity_y: sample.velocity.dy,
            offset: self.offset,
            resting: self.resting,
            content_height: self.content_height,
        };

        match release_decision(self.policy.as_ref(), &release) {
            ReleaseDecision::Dismiss => {
                debug!(?release, "release dismisses");
                self.begin_dismiss()
            }
            ReleaseDecision::Restore => {
                debug!(?release, "release restores");
                self.begin_restore()
            }
        }
    }

    /// External dismiss (backdrop tap). No effect unless Resting or Dragging.
    pub fn request_dismiss(&mut self) -> Vec<SheetEffect> {
        if !self.phase.is_interactive() {
            debug!(phase = ?self.phase, "dismiss request ignored");
            return Vec::new();
        }
        self.begin_dismiss()
    }

    /// Completion of an animation previously emitted by this machine.
    ///
    /// Only the tracked position animation advances the phase; anything else
    /// (drag-dim smoothing, stale ids) is ignored.
    pub fn animation_completed(&mut self, id: AnimationId) -> Vec<SheetEffect> {
        if self.in_flight != Some(id) {
            trace!(?id, "untracked animation completed");
            return Vec::new();
        }
        self.in_flight = None;

        match self.phase {
            SheetPhase::Presenting | SheetPhase::Restoring => {
                self.set_phase(SheetPhase::Resting);
                Vec::new()
            }
            SheetPhase::Dismissing => {
                self.set_phase(SheetPhase::Hidden);
                vec![SheetEffect::Detach]
            }
            SheetPhase::Hidden | SheetPhase::Resting | SheetPhase::Dragging => Vec::new(),
        }
    }

    fn begin_dismiss(&mut self) -> Vec<SheetEffect> {
        let target = PoseUpdate::both(self.offscreen_position(), 0.0);
        let effect = self.start_tracked(target);
        self.set_phase(SheetPhase::Dismissing);
        vec![effect]
    }

    fn begin_restore(&mut self) -> Vec<SheetEffect> {
        let effect = self.start_tracked(PoseUpdate::both(self.resting, 1.0));
        self.set_phase(SheetPhase::Restoring);
        vec![effect]
    }

    fn start_tracked(&mut self, target: PoseUpdate) -> SheetEffect {
        let id = self.allocate_id();
        self.in_flight = Some(id);
        if let Some(offset) = target.offset {
            self.offset = offset;
        }
        if let Some(dim_alpha) = target.dim_alpha {
            self.dim_alpha = dim_alpha;
        }
        SheetEffect::Animate(AnimationRequest {
            id,
            target,
            duration: self.config.transition_duration,
            easing: self.config.easing,
        })
    }

    fn allocate_id(&mut self) -> AnimationId {
        self.next_id += 1;
        AnimationId::new(self.next_id)
    }

    fn set_phase(&mut self, phase: SheetPhase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "sheet phase changed");
            self.phase = phase;
        }
    }
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;
