// Host-side tests for pointer smoothing and engagement easing.

use fx_core::pointer::ease_fraction;
use fx_core::{client_to_surface, PointerInput, PointerTracker, POINTER_PARK, REFERENCE_FRAME_MS};
use glam::Vec2;

#[test]
fn starts_parked_and_disengaged() {
    let tracker = PointerTracker::default();
    let state = tracker.state();
    assert_eq!(state.position, Vec2::from_array(POINTER_PARK));
    assert_eq!(state.engagement, 0.0);
}

#[test]
fn engagement_converges_monotonically_without_overshoot() {
    let mut tracker = PointerTracker::default();
    tracker.on_enter();
    let mut last = 0.0;
    for _ in 0..120 {
        let e = tracker.tick(REFERENCE_FRAME_MS).engagement;
        assert!(e >= last, "engagement went backwards");
        assert!(e <= 1.0, "engagement overshot");
        last = e;
    }
    // about two seconds at 60 fps is visually converged
    assert!(last > 0.99);

    tracker.on_leave();
    for _ in 0..120 {
        let e = tracker.tick(REFERENCE_FRAME_MS).engagement;
        assert!(e <= last);
        assert!(e >= 0.0);
        last = e;
    }
    assert!(last < 0.01);
}

#[test]
fn position_approaches_target_from_either_side() {
    for k in [0.05, 0.15, 0.5, 0.95] {
        for (start, target) in [(0.0, 100.0), (300.0, -40.0)] {
            let mut tracker = PointerTracker::new(k, 0.1);
            tracker.on_move(start, start);
            // jump the smoothed value to the start point
            for _ in 0..2000 {
                tracker.tick(REFERENCE_FRAME_MS);
            }
            tracker.on_move(target, target);
            let mut prev = tracker.state().position.x;
            for _ in 0..200 {
                let x = tracker.tick(REFERENCE_FRAME_MS).position.x;
                let before = (target - prev).abs();
                let after = (target - x).abs();
                assert!(after <= before, "k={k}: moved away from target");
                // never crosses the target
                assert!((target - x).signum() == (target - start).signum() || after < 1e-3);
                prev = x;
            }
        }
    }
}

#[test]
fn one_reference_frame_applies_the_nominal_coefficient() {
    let mut tracker = PointerTracker::new(0.15, 0.1);
    tracker.on_enter();
    let e = tracker.tick(REFERENCE_FRAME_MS).engagement;
    assert!((e - 0.1).abs() < 1e-5);
}

#[test]
fn throttled_frames_match_many_small_frames() {
    let mut slow = PointerTracker::default();
    let mut fast = PointerTracker::default();
    slow.on_enter();
    fast.on_enter();
    slow.tick(REFERENCE_FRAME_MS * 4.0);
    for _ in 0..4 {
        fast.tick(REFERENCE_FRAME_MS);
    }
    assert!((slow.state().engagement - fast.state().engagement).abs() < 1e-5);
}

#[test]
fn zero_or_negative_dt_changes_nothing() {
    let mut tracker = PointerTracker::default();
    tracker.on_enter();
    tracker.on_move(50.0, 50.0);
    let before = tracker.state();
    tracker.tick(0.0);
    tracker.tick(-16.0);
    assert_eq!(tracker.state(), before);
}

#[test]
fn leave_parks_the_target_off_surface() {
    let mut tracker = PointerTracker::default();
    tracker.on_enter();
    tracker.on_move(10.0, 20.0);
    tracker.on_leave();
    assert_eq!(tracker.raw_position(), Vec2::from_array(POINTER_PARK));
    assert_eq!(tracker.engagement_target(), 0.0);
}

#[test]
fn ease_fraction_stays_in_unit_range() {
    assert_eq!(ease_fraction(0.15, 0.0), 0.0);
    assert!((ease_fraction(0.15, 1.0) - 0.15).abs() < 1e-6);
    assert!(ease_fraction(0.15, 10_000.0) <= 1.0);
}

#[test]
fn client_points_map_into_surface_pixels() {
    // element at (100, 50), shown at 200x100 CSS px, backing store 400x200
    let p = client_to_surface(
        Vec2::new(150.0, 75.0),
        Vec2::new(100.0, 50.0),
        Vec2::new(200.0, 100.0),
        Vec2::new(400.0, 200.0),
    );
    assert_eq!(p, Vec2::new(100.0, 50.0));

    let degenerate = client_to_surface(Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, Vec2::ONE);
    assert_eq!(degenerate, Vec2::from_array(POINTER_PARK));
}

#[test]
fn input_recorded_before_the_tracker_exists_is_replayed() {
    // cursor entered and moved while the effect was still loading
    let mut input = PointerInput::default();
    input.on_enter();
    input.on_move(40.0, 60.0);

    let mut tracker = PointerTracker::default();
    input.replay(&mut tracker);
    assert_eq!(tracker.engagement_target(), 1.0);
    assert_eq!(tracker.raw_position(), Vec2::new(40.0, 60.0));
    for _ in 0..60 {
        tracker.tick(REFERENCE_FRAME_MS);
    }
    assert!(tracker.state().engagement > 0.9);
}

#[test]
fn replay_after_leave_stays_parked() {
    let mut input = PointerInput::default();
    input.on_enter();
    input.on_move(10.0, 10.0);
    input.on_leave();

    let mut tracker = PointerTracker::default();
    input.replay(&mut tracker);
    assert_eq!(tracker.engagement_target(), 0.0);
    assert_eq!(tracker.raw_position(), Vec2::from_array(POINTER_PARK));
}

#[test]
fn enter_without_move_keeps_the_parked_target() {
    let mut input = PointerInput::default();
    input.on_enter();
    let mut tracker = PointerTracker::default();
    input.replay(&mut tracker);
    assert_eq!(tracker.engagement_target(), 1.0);
    assert_eq!(tracker.raw_position(), Vec2::from_array(POINTER_PARK));
}
