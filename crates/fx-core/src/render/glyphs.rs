//! Full-page ambient glyph grid.
//!
//! A sparse grid of faint characters that occasionally swap glyphs and drift
//! upward. Churn speeds up near the top of the page.

use crate::clock::FrameTime;
use crate::color::Color;
use crate::constants::*;
use crate::error::FxError;
use crate::particles::{FieldConfig, Layout, ParticleField};
use crate::render::Effect;
use crate::surface::{Surface, TextAlign, TextBaseline};
use glam::{Mat4, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Clone, Debug)]
pub struct GlyphMatrixConfig {
    pub glyphs: String,
    pub cols: usize,
    pub rows: usize,
    pub tile_size: f32,
    pub tile_spacing: f32,
    pub density: f32,
    pub interval_ms: std::ops::Range<f32>,
    pub opacity: std::ops::Range<f32>,
    pub drift_per_ms: f32,
    pub color: [f32; 3],
}

impl Default for GlyphMatrixConfig {
    fn default() -> Self {
        Self {
            glyphs: GLYPHS.to_string(),
            cols: GLYPH_GRID_COLS,
            rows: GLYPH_GRID_ROWS,
            tile_size: GLYPH_TILE_SIZE,
            tile_spacing: GLYPH_TILE_SPACING,
            density: GLYPH_DENSITY,
            interval_ms: GLYPH_INTERVAL_MIN_MS..GLYPH_INTERVAL_MAX_MS,
            opacity: GLYPH_OPACITY_MIN..GLYPH_OPACITY_MAX,
            drift_per_ms: GLYPH_DRIFT_UNITS_PER_MS,
            color: GLYPH_RGB,
        }
    }
}

pub struct GlyphMatrix {
    config: GlyphMatrixConfig,
    glyphs: Vec<char>,
    field: ParticleField,
    rng: StdRng,
    scroll_progress: f32,
    elapsed_ms: f64,
}

impl GlyphMatrix {
    pub fn new(config: GlyphMatrixConfig, rng: &mut impl Rng) -> Result<Self, FxError> {
        let glyphs: Vec<char> = config.glyphs.chars().collect();
        if config.tile_spacing <= 0.0 {
            return Err(FxError::InvalidConfig("tile spacing must be positive"));
        }
        let spacing = config.tile_spacing;
        let field = ParticleField::create(
            &FieldConfig {
                layout: Layout::Grid {
                    cols: config.cols,
                    rows: config.rows,
                    // grid centered on the origin
                    origin: -Vec2::new(config.cols as f32, config.rows as f32) * spacing / 2.0,
                    spacing: Vec2::splat(spacing),
                },
                density: config.density,
                variants: glyphs.len(),
                interval_ms: Some(config.interval_ms.clone()),
                opacity: config.opacity.clone(),
                ..FieldConfig::default()
            },
            rng,
        )?;
        log::debug!(
            "[glyphs] {}x{} grid, {} visible",
            config.cols,
            config.rows,
            field.visible().count()
        );
        Ok(Self {
            glyphs,
            field,
            rng: StdRng::seed_from_u64(rng.gen()),
            scroll_progress: 0.0,
            elapsed_ms: 0.0,
            config,
        })
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn scroll_progress(&self) -> f32 {
        self.scroll_progress
    }

    /// Mutation rate multiplier: `1 + boost` at the top of the page, 1 at
    /// the bottom.
    pub fn rate_scale(&self) -> f32 {
        1.0 + (1.0 - self.scroll_progress) * GLYPH_SCROLL_JITTER_BOOST
    }

    /// Upward drift in world units, always within `[0, tile_spacing)`.
    pub fn drift(&self) -> f32 {
        (self.elapsed_ms as f32 * self.config.drift_per_ms).rem_euclid(self.config.tile_spacing)
    }

    /// World-space position of a grid token after drift; rows wrap over the
    /// grid height.
    fn world_position(&self, base: Vec2) -> Vec2 {
        let grid_h = self.config.rows as f32 * self.config.tile_spacing;
        let y = (base.y + grid_h / 2.0 + self.drift()).rem_euclid(grid_h) - grid_h / 2.0;
        Vec2::new(base.x, y)
    }
}

/// Camera looking down -Z from `GLYPH_CAMERA_Z` at the grid plane.
fn view_projection(aspect: f32) -> Mat4 {
    let proj = Mat4::perspective_rh(GLYPH_CAMERA_FOV_DEG.to_radians(), aspect, 0.1, 100.0);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, GLYPH_CAMERA_Z), Vec3::ZERO, Vec3::Y);
    proj * view
}

/// Surface units per world unit on the z = 0 plane.
pub fn units_per_world(surface_height: f32) -> f32 {
    let view_h = 2.0 * GLYPH_CAMERA_Z * (GLYPH_CAMERA_FOV_DEG.to_radians() / 2.0).tan();
    surface_height / view_h
}

impl Effect for GlyphMatrix {
    fn name(&self) -> &'static str {
        "glyph-matrix"
    }

    fn advance(&mut self, time: FrameTime) {
        self.elapsed_ms = time.elapsed_ms;
        let rate = self.rate_scale();
        self.field.advance(time.delta_f32(), rate, &mut self.rng);
    }

    fn render(&mut self, surface: &mut Surface) {
        surface.clear();
        let size = surface.logical_size();
        if size.y <= 0.0 {
            return;
        }
        let vp = view_projection(size.x / size.y);
        let tile_px = self.config.tile_size * units_per_world(size.y);
        let text_size = tile_px * 0.7;
        let [r, g, b] = self.config.color;
        for token in self.field.visible() {
            let world = self.world_position(token.position);
            let ndc = vp.project_point3(world.extend(0.0));
            if ndc.x.abs() > 1.05 || ndc.y.abs() > 1.05 {
                continue;
            }
            let screen = Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y);
            let ch = self.glyphs[token.variant];
            surface.draw_text(
                ch.encode_utf8(&mut [0; 4]),
                screen,
                text_size,
                Color::new(r, g, b, token.opacity),
                TextAlign::Center,
                TextBaseline::Middle,
            );
        }
    }

    fn set_scroll_progress(&mut self, progress: f32) {
        self.scroll_progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }
}
