//! Scenes painted onto a [`Surface`](crate::surface::Surface) every frame.

pub mod code_lens;
pub mod glyphs;
pub mod monitor;

use crate::clock::FrameTime;
use crate::pointer::PointerTracker;
use crate::surface::Surface;

pub use code_lens::{CodeLens, CodeLensConfig};
pub use glyphs::{GlyphMatrix, GlyphMatrixConfig};
pub use monitor::{MonitorConfig, Signal, SignalMonitor};

/// A per-frame visual effect.
///
/// `advance` owns all state changes (timers, particles, pointer easing);
/// `render` only reads that state and paints.
pub trait Effect {
    fn name(&self) -> &'static str;

    fn advance(&mut self, time: FrameTime);

    fn render(&mut self, surface: &mut Surface);

    /// Pointer-driven effects expose their tracker so the host can feed
    /// enter/move/leave events into it.
    fn pointer_mut(&mut self) -> Option<&mut PointerTracker> {
        None
    }

    /// Page scroll progress in \[0, 1\].
    fn set_scroll_progress(&mut self, _progress: f32) {}
}

/// One frame: smoothing and timers first, then paint.
pub fn run_frame(effect: &mut dyn Effect, time: FrameTime, surface: &mut Surface) {
    effect.advance(time);
    effect.render(surface);
}
