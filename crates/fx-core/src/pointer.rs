use crate::constants::{
    POINTER_ENGAGEMENT_EASE, POINTER_PARK, POINTER_POSITION_EASE, REFERENCE_FRAME_MS,
};
use glam::Vec2;

/// Smoothed pointer state read by the renderers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub engagement: f32,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            position: Vec2::from_array(POINTER_PARK),
            engagement: 0.0,
        }
    }
}

/// Converts raw enter/move/leave events into an eased position and an
/// engagement scalar in \[0, 1\].
///
/// Producers (input events) only write targets; `tick` is the single
/// consumer that moves the smoothed values toward them.
#[derive(Clone, Debug)]
pub struct PointerTracker {
    raw: Vec2,
    smoothed: Vec2,
    engagement_target: f32,
    engagement: f32,
    position_ease: f32,
    engagement_ease: f32,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(POINTER_POSITION_EASE, POINTER_ENGAGEMENT_EASE)
    }
}

impl PointerTracker {
    /// `position_ease` and `engagement_ease` are the fractions of the
    /// remaining distance covered per reference frame; both must be in (0, 1).
    pub fn new(position_ease: f32, engagement_ease: f32) -> Self {
        let park = Vec2::from_array(POINTER_PARK);
        Self {
            raw: park,
            smoothed: park,
            engagement_target: 0.0,
            engagement: 0.0,
            position_ease: position_ease.clamp(f32::EPSILON, 1.0 - f32::EPSILON),
            engagement_ease: engagement_ease.clamp(f32::EPSILON, 1.0 - f32::EPSILON),
        }
    }

    pub fn on_move(&mut self, x: f32, y: f32) {
        self.raw = Vec2::new(x, y);
    }

    pub fn on_enter(&mut self) {
        self.engagement_target = 1.0;
    }

    /// Fade out and park the target off-surface. The smoothed position keeps
    /// gliding while engagement decays, so nothing snaps while still visible.
    pub fn on_leave(&mut self) {
        self.engagement_target = 0.0;
        self.raw = Vec2::from_array(POINTER_PARK);
    }

    pub fn raw_position(&self) -> Vec2 {
        self.raw
    }

    pub fn engagement_target(&self) -> f32 {
        self.engagement_target
    }

    pub fn state(&self) -> PointerState {
        PointerState {
            position: self.smoothed,
            engagement: self.engagement,
        }
    }

    /// Advance the easing by `dt_ms` and return the new state.
    pub fn tick(&mut self, dt_ms: f32) -> PointerState {
        let frames = (dt_ms.max(0.0)) / REFERENCE_FRAME_MS;
        let kp = ease_fraction(self.position_ease, frames);
        let ke = ease_fraction(self.engagement_ease, frames);
        self.smoothed += (self.raw - self.smoothed) * kp;
        self.engagement += (self.engagement_target - self.engagement) * ke;
        self.engagement = self.engagement.clamp(0.0, 1.0);
        self.state()
    }
}

/// Raw targets recorded while no tracker exists yet (an effect still
/// loading its assets). Replayed into the tracker once it is built.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerInput {
    pub inside: bool,
    pub position: Option<Vec2>,
}

impl PointerInput {
    pub fn on_move(&mut self, x: f32, y: f32) {
        self.position = Some(Vec2::new(x, y));
    }

    pub fn on_enter(&mut self) {
        self.inside = true;
    }

    pub fn on_leave(&mut self) {
        self.inside = false;
        self.position = None;
    }

    /// Bring `tracker`'s targets in line with the recorded input.
    pub fn replay(&self, tracker: &mut PointerTracker) {
        if !self.inside {
            tracker.on_leave();
            return;
        }
        tracker.on_enter();
        if let Some(p) = self.position {
            tracker.on_move(p.x, p.y);
        }
    }
}

/// Fraction of the remaining distance to cover after `frames` reference
/// frames when each frame covers `k`. Always within \[0, 1\].
#[inline]
pub fn ease_fraction(k: f32, frames: f32) -> f32 {
    if frames <= 0.0 {
        return 0.0;
    }
    (1.0 - (1.0 - k).powf(frames)).clamp(0.0, 1.0)
}

/// Map a client-space point into surface pixels given the element rect.
/// A degenerate rect maps to the park position.
#[inline]
pub fn client_to_surface(client: Vec2, rect_origin: Vec2, rect_size: Vec2, surface_size: Vec2) -> Vec2 {
    if rect_size.x <= 0.0 || rect_size.y <= 0.0 {
        return Vec2::from_array(POINTER_PARK);
    }
    (client - rect_origin) / rect_size * surface_size
}
