// Host-side tests for the frame clock and the single-subscription loop.

use fx_core::{FrameClock, FrameLoop, FrameTime};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn counting_loop() -> (FrameLoop, Rc<Cell<usize>>) {
    let frames = FrameLoop::new();
    let ticks = Rc::new(Cell::new(0));
    let t = ticks.clone();
    frames.start(move |_| t.set(t.get() + 1));
    (frames, ticks)
}

#[test]
fn first_tick_has_zero_delta() {
    let mut clock = FrameClock::new();
    clock.start();
    let first = clock.tick(1234.0).unwrap();
    assert_eq!(first.delta_ms, 0.0);
    assert_eq!(first.elapsed_ms, 0.0);

    let second = clock.tick(1250.0).unwrap();
    assert_eq!(second.delta_ms, 16.0);
    assert_eq!(second.elapsed_ms, 16.0);
}

#[test]
fn tick_before_start_delivers_nothing() {
    let mut clock = FrameClock::new();
    assert!(clock.tick(10.0).is_none());
    // stop without start is fine, and so is stopping twice
    clock.stop();
    clock.stop();
    assert!(!clock.is_running());
}

#[test]
fn elapsed_never_decreases_even_with_backwards_timestamps() {
    let mut clock = FrameClock::new();
    clock.start();
    let stamps = [0.0, 16.0, 33.0, 20.0, 50.0, 49.0, 5000.0];
    let mut last = 0.0;
    for ts in stamps {
        let time = clock.tick(ts).unwrap();
        assert!(time.delta_ms >= 0.0);
        assert!(time.elapsed_ms >= last);
        last = time.elapsed_ms;
    }
    // 0 -> 16 -> 33, hold at 33, 33 -> 50, hold, 50 -> 5000
    assert_eq!(last, 5000.0);
}

#[test]
fn large_gaps_pass_through_unclamped() {
    let mut clock = FrameClock::new();
    clock.start();
    clock.tick(0.0);
    let after_pause = clock.tick(60_000.0).unwrap();
    assert_eq!(after_pause.delta_ms, 60_000.0);
}

#[test]
fn stop_after_n_ticks_delivers_no_more() {
    for n in 0..5 {
        let (frames, ticks) = counting_loop();
        for i in 0..n {
            assert!(frames.pump(i as f64 * 16.0));
        }
        frames.stop();
        for i in 0..10 {
            assert!(!frames.pump(1000.0 + i as f64));
        }
        assert_eq!(ticks.get(), n);
    }
}

#[test]
fn stop_from_inside_tick_prevents_further_ticks() {
    let frames = FrameLoop::new();
    let ticks = Rc::new(Cell::new(0));
    let handle = frames.clone();
    let t = ticks.clone();
    frames.start(move |_| {
        t.set(t.get() + 1);
        if t.get() == 3 {
            handle.stop();
        }
    });

    let mut scheduled = 0;
    for i in 0..10 {
        if frames.pump(i as f64 * 16.0) {
            scheduled += 1;
        }
    }
    assert_eq!(ticks.get(), 3);
    // the third tick asked not to be rescheduled
    assert_eq!(scheduled, 2);
    assert!(!frames.is_running());
}

#[test]
fn restart_replaces_previous_subscription() {
    let frames = FrameLoop::new();
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));

    let f = first.clone();
    frames.start(move |_| f.set(f.get() + 1));
    let stale_generation = frames.generation();
    frames.pump(0.0);

    let s = second.clone();
    frames.start(move |_| s.set(s.get() + 1));

    // a frame queued for the old subscription is dropped
    assert!(!frames.pump_for(stale_generation, 16.0));
    frames.pump(32.0);
    frames.pump(48.0);

    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 2);
}

#[test]
fn restart_resets_elapsed_time() {
    let frames = FrameLoop::new();
    let seen: Rc<RefCell<Vec<FrameTime>>> = Rc::default();
    let s = seen.clone();
    frames.start(move |t| s.borrow_mut().push(t));
    frames.pump(0.0);
    frames.pump(100.0);

    let s = seen.clone();
    frames.start(move |t| s.borrow_mut().push(t));
    frames.pump(500.0);

    let seen = seen.borrow();
    assert_eq!(seen[1].elapsed_ms, 100.0);
    assert_eq!(seen[2].elapsed_ms, 0.0);
}

#[test]
fn stop_is_idempotent_and_safe_without_start() {
    let frames = FrameLoop::new();
    frames.stop();
    frames.stop();
    assert!(!frames.pump(0.0));

    let (frames, ticks) = counting_loop();
    frames.pump(0.0);
    frames.stop();
    let generation = frames.generation();
    frames.stop();
    // second stop does not open another generation
    assert_eq!(frames.generation(), generation);
    assert_eq!(ticks.get(), 1);
}
