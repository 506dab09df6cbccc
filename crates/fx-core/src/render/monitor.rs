//! Oscilloscope-style "signal monitor" panel.
//!
//! Drawn with a trail: each frame blends a translucent base color over the
//! previous one instead of clearing, so older frames decay geometrically.

use crate::clock::FrameTime;
use crate::color::Color;
use crate::constants::*;
use crate::error::FxError;
use crate::particles::{Bounds, FieldConfig, Layout, ParticleField};
use crate::render::Effect;
use crate::surface::{Surface, TextAlign, TextBaseline};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::{smallvec, SmallVec};
use std::f32::consts::PI;

/// One sine component of the waveform display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Signal {
    pub freq: f32,
    pub amp: f32,
    pub phase: f32,
    /// Phase advance per reference frame.
    pub speed: f32,
    pub alpha: f32,
}

#[derive(Clone, Debug)]
pub struct MonitorConfig {
    pub width: f32,
    pub height: f32,
    pub accent: [u8; 3],
    pub trail_alpha: f32,
    pub signals: SmallVec<[Signal; 4]>,
    pub grid_spacing: f32,
    pub grid_margin: f32,
    pub mote_count: usize,
    pub bar_count: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            width: MONITOR_WIDTH,
            height: MONITOR_HEIGHT,
            accent: ACCENT_RGB,
            trail_alpha: MONITOR_TRAIL_ALPHA,
            signals: smallvec![
                Signal { freq: 0.02, amp: 40.0, phase: 0.0, speed: 0.015, alpha: 0.6 },
                Signal { freq: 0.035, amp: 25.0, phase: PI / 3.0, speed: 0.02, alpha: 0.35 },
                Signal { freq: 0.015, amp: 55.0, phase: PI / 2.0, speed: 0.01, alpha: 0.2 },
            ],
            grid_spacing: MONITOR_GRID_SPACING,
            grid_margin: MONITOR_GRID_MARGIN,
            mote_count: MONITOR_MOTE_COUNT,
            bar_count: MONITOR_BAR_COUNT,
        }
    }
}

pub struct SignalMonitor {
    config: MonitorConfig,
    dots: ParticleField,
    motes: ParticleField,
    rng: StdRng,
    // time in reference frames
    t: f32,
    wave: Vec<Vec2>,
}

impl SignalMonitor {
    pub fn new(config: MonitorConfig, rng: &mut impl Rng) -> Result<Self, FxError> {
        if config.width <= 0.0 || config.height <= 0.0 {
            return Err(FxError::InvalidConfig("monitor size must be positive"));
        }
        if config.grid_spacing <= 0.0 {
            return Err(FxError::InvalidConfig("grid spacing must be positive"));
        }
        let m = config.grid_margin;
        // Grid points at margin, margin + spacing, ... while < extent - margin.
        let span = |extent: f32| ((extent - 2.0 * m) / config.grid_spacing).ceil().max(0.0) as usize;
        let dots = ParticleField::create(
            &FieldConfig {
                layout: Layout::Grid {
                    cols: span(config.width),
                    rows: span(config.height),
                    origin: Vec2::splat(m),
                    spacing: Vec2::splat(config.grid_spacing),
                },
                ..FieldConfig::default()
            },
            rng,
        )?;
        let bounds = Bounds {
            width: config.width,
            height: config.height,
        };
        let motes = ParticleField::create(
            &FieldConfig {
                layout: Layout::Scatter {
                    count: config.mote_count,
                    bounds,
                },
                opacity: 0.1..0.5,
                size: 0.5..2.5,
                max_speed: MONITOR_MOTE_SPEED_PER_FRAME * FRAMES_PER_MS,
                wrap: Some(bounds),
                ..FieldConfig::default()
            },
            rng,
        )?;
        let samples = (config.width / 2.0).ceil() as usize;
        log::debug!(
            "[monitor] {} grid dots, {} motes",
            dots.len(),
            motes.len()
        );
        Ok(Self {
            dots,
            motes,
            rng: StdRng::seed_from_u64(rng.gen()),
            t: 0.0,
            wave: Vec::with_capacity(samples),
            config,
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn motes(&self) -> &ParticleField {
        &self.motes
    }

    /// Vertical offset of signal `idx` at column `x`, relative to the center line.
    pub fn wave_offset(&self, idx: usize, x: f32) -> f32 {
        let s = self.config.signals[idx];
        let noise = (x * 0.1 + self.t * 0.05).sin() * 10.0;
        (x * s.freq + self.t * s.speed + s.phase).sin() * s.amp + noise
    }

    /// Top of the scan band's center line.
    pub fn scan_y(&self) -> f32 {
        (self.t * MONITOR_SCAN_SPEED_PER_FRAME) % (self.config.height + 100.0) - 50.0
    }

    fn accent(&self, alpha: f32) -> Color {
        Color::rgba(self.config.accent, alpha)
    }

    fn paint_grid(&self, surface: &mut Surface) {
        for dot in self.dots.tokens() {
            let pulse = (self.t * 0.02 + dot.phase).sin() * 0.5 + 0.5;
            let size = 1.0 + pulse * 1.5;
            let alpha = 0.1 + pulse * 0.15;
            surface.fill_circle(dot.position, size, self.accent(alpha));
        }
    }

    fn paint_waves(&mut self, surface: &mut Surface) {
        let center_y = self.config.height / 2.0;
        let mut wave = std::mem::take(&mut self.wave);
        for idx in 0..self.config.signals.len() {
            wave.clear();
            let mut x = 0.0;
            while x < self.config.width {
                wave.push(Vec2::new(x, center_y + self.wave_offset(idx, x)));
                x += 2.0;
            }
            let width = (1.5 - idx as f32 * 0.3).max(0.1);
            surface.stroke_polyline(&wave, width, self.accent(self.config.signals[idx].alpha));
        }
        self.wave = wave;
    }

    fn paint_scan(&self, surface: &mut Surface) {
        let y = self.scan_y();
        let h = MONITOR_SCAN_HALF_HEIGHT;
        surface.fill_rect_gradient_v(
            0.0,
            y - h,
            self.config.width,
            h * 2.0,
            &[
                (0.0, Color::TRANSPARENT),
                (0.5, self.accent(0.15)),
                (1.0, Color::TRANSPARENT),
            ],
        );
    }

    fn paint_motes(&self, surface: &mut Surface) {
        for mote in self.motes.tokens() {
            surface.fill_circle(mote.position, mote.size, self.accent(mote.opacity));
        }
    }

    fn paint_bars(&self, surface: &mut Surface) {
        let x = self.config.width - 50.0;
        for i in 0..self.config.bar_count {
            let fi = i as f32;
            let len = (self.t * 0.03 + fi * 0.5).sin().abs() * 30.0 + 5.0;
            let alpha = 0.3 + (self.t * 0.05 + fi).sin() * 0.2;
            surface.fill_rect(x, 80.0 + fi * 8.0, 3.0 + len, 2.0, self.accent(alpha));
        }
    }

    fn paint_brackets(&self, surface: &mut Surface) {
        let (w, h) = (self.config.width, self.config.height);
        let c = self.accent(0.3);
        let corners: [[Vec2; 3]; 4] = [
            [Vec2::new(20.0, 50.0), Vec2::new(20.0, 20.0), Vec2::new(50.0, 20.0)],
            [Vec2::new(w - 50.0, 20.0), Vec2::new(w - 20.0, 20.0), Vec2::new(w - 20.0, 50.0)],
            [Vec2::new(20.0, h - 50.0), Vec2::new(20.0, h - 20.0), Vec2::new(50.0, h - 20.0)],
            [Vec2::new(w - 50.0, h - 20.0), Vec2::new(w - 20.0, h - 20.0), Vec2::new(w - 20.0, h - 50.0)],
        ];
        for corner in &corners {
            surface.stroke_polyline(corner, 1.0, c);
        }
    }

    fn paint_labels(&self, surface: &mut Surface) {
        let (w, h) = (self.config.width, self.config.height);
        let c = self.accent(0.4);
        let size = 10.0;
        let bottom = TextBaseline::Bottom;
        surface.draw_text("0x00", Vec2::new(25.0, 35.0), size, c, TextAlign::Left, bottom);
        surface.draw_text(&hex_label(w), Vec2::new(w - 25.0, 35.0), size, c, TextAlign::Right, bottom);
        surface.draw_text(&hex_label(h), Vec2::new(w - 25.0, h - 25.0), size, c, TextAlign::Right, bottom);
        surface.draw_text("0x00", Vec2::new(25.0, h - 25.0), size, c, TextAlign::Left, bottom);
    }

    fn paint_crosshair(&self, surface: &mut Surface) {
        let center = Vec2::new(self.config.width / 2.0, self.config.height / 2.0);
        let s = MONITOR_CROSS_SIZE;
        let alpha = 0.2 + (self.t * 0.03).sin() * 0.1;
        let c = self.accent(alpha);
        surface.stroke_line(center - Vec2::new(s, 0.0), center + Vec2::new(s, 0.0), 1.0, c);
        surface.stroke_line(center - Vec2::new(0.0, s), center + Vec2::new(0.0, s), 1.0, c);
        surface.fill_circle(center, 2.0, self.accent(alpha + 0.2));
    }
}

/// `500.0` -> `"1F4h"`.
pub fn hex_label(value: f32) -> String {
    format!("{:X}h", value.max(0.0) as u32)
}

impl Effect for SignalMonitor {
    fn name(&self) -> &'static str {
        "signal-monitor"
    }

    fn advance(&mut self, time: FrameTime) {
        self.t = time.elapsed_ms as f32 * FRAMES_PER_MS;
        self.motes.advance(time.delta_f32(), 1.0, &mut self.rng);
    }

    fn render(&mut self, surface: &mut Surface) {
        surface.fill(Color::rgba(MONITOR_TRAIL_RGB, self.config.trail_alpha));
        self.paint_grid(surface);
        self.paint_waves(surface);
        self.paint_scan(surface);
        self.paint_motes(surface);
        self.paint_bars(surface);
        self.paint_brackets(surface);
        self.paint_labels(surface);
        self.paint_crosshair(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_labels_match_panel_size() {
        assert_eq!(hex_label(400.0), "190h");
        assert_eq!(hex_label(500.0), "1F4h");
    }
}
