use fx_core::{FrameLoop, FrameTime};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Drives a [`FrameLoop`] from `requestAnimationFrame`.
///
/// Only one frame request is ever outstanding. Each request remembers the
/// loop generation it was made for, so a frame that was already queued when
/// the loop stopped or restarted delivers nothing.
pub struct RafDriver {
    frames: FrameLoop,
    epoch: Instant,
    pending: Cell<Option<i32>>,
    tick: RefCell<Option<Closure<dyn FnMut()>>>,
    queued_generation: Cell<u64>,
}

impl RafDriver {
    pub fn new() -> Rc<Self> {
        let driver = Rc::new(Self {
            frames: FrameLoop::new(),
            epoch: Instant::now(),
            pending: Cell::new(None),
            tick: RefCell::new(None),
            queued_generation: Cell::new(0),
        });
        // The closure only holds a weak handle so dropping the driver frees it.
        let weak: Weak<Self> = Rc::downgrade(&driver);
        *driver.tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if let Some(driver) = weak.upgrade() {
                driver.on_frame();
            }
        }) as Box<dyn FnMut()>));
        driver
    }

    pub fn frames(&self) -> &FrameLoop {
        &self.frames
    }

    /// Start (or restart) the loop with `on_tick`.
    pub fn start(&self, on_tick: impl FnMut(FrameTime) + 'static) {
        self.cancel_pending();
        self.frames.start(on_tick);
        self.request();
    }

    /// Stop ticking. Safe to call repeatedly and from inside a tick.
    pub fn stop(&self) {
        self.cancel_pending();
        self.frames.stop();
    }

    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    fn request(&self) {
        let Some(window) = web::window() else {
            return;
        };
        let tick = self.tick.borrow();
        let Some(closure) = tick.as_ref() else {
            return;
        };
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => {
                self.pending.set(Some(id));
                self.queued_generation.set(self.frames.generation());
            }
            Err(e) => log::warn!("[frame] requestAnimationFrame failed: {:?}", e),
        }
    }

    fn cancel_pending(&self) {
        if let Some(id) = self.pending.take() {
            if let Some(window) = web::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    fn on_frame(&self) {
        self.pending.set(None);
        let generation = self.queued_generation.get();
        if self.frames.pump_for(generation, self.now_ms()) && self.pending.get().is_none() {
            self.request();
        }
    }
}

impl Drop for RafDriver {
    fn drop(&mut self) {
        self.cancel_pending();
        self.frames.stop();
    }
}
