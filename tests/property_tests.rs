//! Property-based tests for the interaction invariants.
//!
//! Tests validate:
//! 1. The sheet never rises above its resting position during a drag
//! 2. Every release from an interactive phase starts exactly one transition
//! 3. Backdrop dimming is monotonic in the drag ratio
//! 4. Timeline interpolation stays between its endpoints

use bottomsheet::animation::{
    AnimationId, AnimationRequest, Animator, Easing, PoseUpdate, SheetPose, Timeline,
};
use bottomsheet::config::SheetConfig;
use bottomsheet::gesture::{dim_alpha_for_ratio, interpret_change, DragUpdate};
use bottomsheet::model::{DragSample, Frame};
use bottomsheet::state::{SheetEffect, SheetLayout, SheetMachine, SheetPhase};
use proptest::prelude::*;
use std::time::Duration;

fn resting_machine(container_height: f32, content_height: f32) -> SheetMachine {
    let mut machine = SheetMachine::new(SheetConfig::default());
    let layout =
        SheetLayout::bottom_anchored(Frame::new(0.0, 0.0, 400.0, container_height), content_height);
    let effects = machine.appear(layout);
    for effect in effects {
        if let SheetEffect::Animate(request) = effect {
            machine.animation_completed(request.id);
        }
    }
    machine
}

fn easing() -> impl Strategy<Value = Easing> {
    prop_oneof![
        Just(Easing::Linear),
        Just(Easing::EaseIn),
        Just(Easing::EaseOut),
        Just(Easing::EaseInOut),
    ]
}

// ===== Property 1: Upper Clamp =====

proptest! {
    #[test]
    fn offset_never_rises_above_rest(
        container in 100.0f32..2000.0,
        fraction in 0.05f32..1.0,
        deltas in prop::collection::vec(-600.0f32..600.0, 1..40),
    ) {
        let mut machine = resting_machine(container, container * fraction);
        let resting = machine.resting_position();
        prop_assert_eq!(machine.phase(), SheetPhase::Resting);

        for delta in deltas {
            machine.drag(DragSample::moved_by(delta));
            prop_assert!(
                machine.offset() >= resting,
                "offset {} rose above resting {}",
                machine.offset(),
                resting
            );
        }
    }

    #[test]
    fn interpret_change_ratio_is_unit_bounded(
        current in 0.0f32..2000.0,
        resting in -100.0f32..2000.0,
        delta in -2000.0f32..2000.0,
    ) {
        match interpret_change(current, resting, delta) {
            DragUpdate::Clamped { offset } => prop_assert_eq!(offset, resting),
            DragUpdate::Follow { offset, ratio } => {
                prop_assert!(offset >= resting);
                prop_assert!((0.0..=1.0).contains(&ratio));
            }
        }
    }
}

// ===== Property 2: Release Enters Exactly One Transition =====

proptest! {
    #[test]
    fn release_enters_dismissing_or_restoring(
        deltas in prop::collection::vec(-300.0f32..300.0, 0..20),
        velocity in -5000.0f32..5000.0,
    ) {
        let mut machine = resting_machine(800.0, 300.0);
        for delta in deltas {
            machine.drag(DragSample::moved_by(delta));
        }

        let effects = machine.drag(DragSample::released_at(velocity));
        prop_assert!(matches!(
            machine.phase(),
            SheetPhase::Dismissing | SheetPhase::Restoring
        ));
        let animations = effects
            .iter()
            .filter(|effect| matches!(effect, SheetEffect::Animate(_)))
            .count();
        prop_assert_eq!(animations, 1);
        prop_assert!(machine.in_flight().is_some());
    }

    #[test]
    fn fast_flick_always_dismisses(
        delta in 0.0f32..100.0,
        excess in 0.001f32..5000.0,
    ) {
        let mut machine = resting_machine(800.0, 300.0);
        machine.drag(DragSample::moved_by(delta));
        let threshold = machine.config().dismiss_velocity_threshold;

        machine.drag(DragSample::released_at(threshold + excess));
        prop_assert_eq!(machine.phase(), SheetPhase::Dismissing);
    }
}

// ===== Property 3: Dimming =====

proptest! {
    #[test]
    fn dim_alpha_is_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(dim_alpha_for_ratio(low) >= dim_alpha_for_ratio(high));
    }

    #[test]
    fn dim_alpha_stays_in_unit_range(ratio in -10.0f32..10.0) {
        let dim = dim_alpha_for_ratio(ratio);
        prop_assert!((0.0..=1.0).contains(&dim));
    }
}

// ===== Property 4: Timeline Interpolation =====

proptest! {
    #[test]
    fn timeline_interpolates_between_endpoints(
        from in -1000.0f32..1000.0,
        to in -1000.0f32..1000.0,
        duration_ms in 1u64..1000,
        steps in prop::collection::vec(0u64..50, 1..60),
        easing in easing(),
    ) {
        let mut timeline = Timeline::new(SheetPose::new(from, 0.0));
        let id = AnimationId::new(1);
        timeline.animate(AnimationRequest {
            id,
            target: PoseUpdate::offset(to),
            duration: Duration::from_millis(duration_ms),
            easing,
        });

        let (low, high) = if from <= to { (from, to) } else { (to, from) };
        let tolerance = 1e-3 * (high - low).max(1.0);
        let mut previous = from;
        let mut completed = false;

        for step in steps {
            let finished = timeline.advance(Duration::from_millis(step));
            let value = timeline.pose().offset;
            prop_assert!(value >= low - tolerance && value <= high + tolerance);
            // Monotonic toward the target.
            if to >= from {
                prop_assert!(value + tolerance >= previous);
            } else {
                prop_assert!(value - tolerance <= previous);
            }
            previous = value;

            if finished.contains(&id) {
                prop_assert!(!completed, "completion reported twice");
                completed = true;
                prop_assert_eq!(value, to);
            }
        }
    }
}
