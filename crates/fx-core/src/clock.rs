//! Frame timing for the per-frame effects.
//!
//! `FrameClock` turns host timestamps into elapsed/delta pairs. `FrameLoop`
//! wraps a clock and a single tick callback behind a cloneable handle so the
//! host's animation-frame callback only has to call [`FrameLoop::pump`].

use std::cell::RefCell;
use std::rc::Rc;

/// Time handed to every tick callback, in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    pub elapsed_ms: f64,
    pub delta_ms: f64,
}

impl FrameTime {
    #[inline]
    pub fn delta_f32(&self) -> f32 {
        self.delta_ms as f32
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    running: bool,
    elapsed_ms: f64,
    last_timestamp: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset and start counting from the next tick.
    pub fn start(&mut self) {
        self.running = true;
        self.elapsed_ms = 0.0;
        self.last_timestamp = None;
    }

    /// Idempotent; safe before `start` was ever called.
    pub fn stop(&mut self) {
        self.running = false;
        self.last_timestamp = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Advance to `timestamp_ms`. The first tick after `start` has zero delta;
    /// a timestamp earlier than the previous one also counts as zero so that
    /// elapsed time never decreases. Large gaps (hidden tab) pass through.
    pub fn tick(&mut self, timestamp_ms: f64) -> Option<FrameTime> {
        if !self.running {
            return None;
        }
        let delta_ms = match self.last_timestamp {
            Some(prev) => (timestamp_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(match self.last_timestamp {
            Some(prev) => prev.max(timestamp_ms),
            None => timestamp_ms,
        });
        self.elapsed_ms += delta_ms;
        Some(FrameTime {
            elapsed_ms: self.elapsed_ms,
            delta_ms,
        })
    }
}

type TickFn = Box<dyn FnMut(FrameTime)>;

struct LoopState {
    clock: FrameClock,
    generation: u64,
    on_tick: Option<TickFn>,
}

/// Single-subscription animation loop.
///
/// Cloning yields another handle to the same loop, which lets a tick callback
/// stop (or restart) its own loop. Every `start` opens a new generation; a
/// frame pumped for an older generation, or after `stop`, delivers nothing.
#[derive(Clone)]
pub struct FrameLoop {
    inner: Rc<RefCell<LoopState>>,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(LoopState {
                clock: FrameClock::new(),
                generation: 0,
                on_tick: None,
            })),
        }
    }

    /// Replace any active subscription with `on_tick` and restart the clock.
    pub fn start(&self, on_tick: impl FnMut(FrameTime) + 'static) {
        let mut s = self.inner.borrow_mut();
        if s.clock.is_running() {
            log::debug!("[clock] restart replaces generation {}", s.generation);
        }
        s.generation = s.generation.wrapping_add(1);
        s.clock.start();
        s.on_tick = Some(Box::new(on_tick));
    }

    /// No tick is delivered after this returns, including from inside a tick.
    pub fn stop(&self) {
        let mut s = self.inner.borrow_mut();
        if !s.clock.is_running() && s.on_tick.is_none() {
            return;
        }
        s.generation = s.generation.wrapping_add(1);
        s.clock.stop();
        s.on_tick = None;
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().clock.is_running()
    }

    pub fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }

    /// Deliver one tick at `timestamp_ms`. Returns `true` when the host should
    /// request another frame for this same subscription.
    pub fn pump(&self, timestamp_ms: f64) -> bool {
        let generation = self.generation();
        self.pump_for(generation, timestamp_ms)
    }

    /// Like [`pump`](Self::pump) but only delivers if `generation` is still
    /// the active subscription. Hosts capture the generation when they queue
    /// a frame so that a frame queued before a restart is dropped.
    pub fn pump_for(&self, generation: u64, timestamp_ms: f64) -> bool {
        let (generation, time, mut on_tick) = {
            let mut s = self.inner.borrow_mut();
            if s.generation != generation {
                return false;
            }
            let Some(time) = s.clock.tick(timestamp_ms) else {
                return false;
            };
            let Some(on_tick) = s.on_tick.take() else {
                return false;
            };
            (s.generation, time, on_tick)
        };

        // No borrow is held here so the callback may call stop()/start().
        on_tick(time);

        let mut s = self.inner.borrow_mut();
        if s.generation == generation && s.clock.is_running() {
            s.on_tick = Some(on_tick);
            true
        } else {
            false
        }
    }
}
