//! Frame-driven animator.

use std::time::Duration;

use tracing::trace;

use super::{AnimationId, AnimationRequest, Animator, Easing, PoseUpdate, SheetPose};

/// Per-channel tweening animator advanced explicitly by the host's frame loop.
///
/// The host calls [`Timeline::advance`] once per frame with the elapsed time,
/// reads [`Timeline::pose`] to render, and forwards the returned ids to the
/// presentation controller.
#[derive(Debug, Clone)]
pub struct Timeline {
    offset: Channel,
    dim_alpha: Channel,
}

#[derive(Debug, Clone)]
struct Channel {
    value: f32,
    track: Option<Track>,
}

#[derive(Debug, Clone)]
struct Track {
    id: AnimationId,
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Channel {
    fn new(value: f32) -> Self {
        Self { value, track: None }
    }

    fn snap(&mut self, value: f32) {
        self.track = None;
        self.value = value;
    }

    fn start(&mut self, id: AnimationId, to: f32, duration: Duration, easing: Easing) {
        self.track = Some(Track {
            id,
            from: self.value,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        });
    }

    /// Step the track; returns its id when it reaches the target.
    fn advance(&mut self, dt: Duration) -> Option<AnimationId> {
        let track = self.track.as_mut()?;
        track.elapsed = track.elapsed.saturating_add(dt);

        let linear = if track.duration.is_zero() {
            1.0
        } else {
            (track.elapsed.as_secs_f32() / track.duration.as_secs_f32()).clamp(0.0, 1.0)
        };

        if linear >= 1.0 {
            let id = track.id;
            self.value = track.to;
            self.track = None;
            return Some(id);
        }

        let progress = track.easing.transform(linear);
        self.value = track.from + (track.to - track.from) * progress;
        None
    }

    fn is_running(&self, id: AnimationId) -> bool {
        self.track.as_ref().is_some_and(|track| track.id == id)
    }
}

impl Timeline {
    /// Idle timeline presenting `pose`.
    pub fn new(pose: SheetPose) -> Self {
        Self {
            offset: Channel::new(pose.offset),
            dim_alpha: Channel::new(pose.dim_alpha),
        }
    }

    /// Presented pose, i.e. what should be on screen this frame.
    pub fn pose(&self) -> SheetPose {
        SheetPose {
            offset: self.offset.value,
            dim_alpha: self.dim_alpha.value,
        }
    }

    /// `true` while any channel has a running track.
    pub fn is_animating(&self) -> bool {
        self.offset.track.is_some() || self.dim_alpha.track.is_some()
    }

    /// Advance every running track by `dt`.
    ///
    /// Returns the ids whose last running channel finished during this step,
    /// in ascending order, each at most once.
    pub fn advance(&mut self, dt: Duration) -> Vec<AnimationId> {
        let mut finished: Vec<AnimationId> = [self.offset.advance(dt), self.dim_alpha.advance(dt)]
            .into_iter()
            .flatten()
            .filter(|id| !self.offset.is_running(*id) && !self.dim_alpha.is_running(*id))
            .collect();
        finished.sort();
        finished.dedup();

        if !finished.is_empty() {
            trace!(?finished, "animations completed");
        }
        finished
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(SheetPose::new(0.0, 0.0))
    }
}

impl Animator for Timeline {
    fn snap(&mut self, update: PoseUpdate) {
        if let Some(offset) = update.offset {
            self.offset.snap(offset);
        }
        if let Some(dim_alpha) = update.dim_alpha {
            self.dim_alpha.snap(dim_alpha);
        }
    }

    fn animate(&mut self, request: AnimationRequest) {
        let AnimationRequest {
            id,
            target,
            duration,
            easing,
        } = request;
        if let Some(offset) = target.offset {
            self.offset.start(id, offset, duration, easing);
        }
        if let Some(dim_alpha) = target.dim_alpha {
            self.dim_alpha.start(id, dim_alpha, duration, easing);
        }
    }
}
