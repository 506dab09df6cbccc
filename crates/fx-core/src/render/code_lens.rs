//! Hover lens that reveals scrolling code inside an image silhouette.
//!
//! The base image is drawn every frame. While the pointer is engaged, an
//! offscreen code layer is painted, cut by a circle around the smoothed
//! pointer and by the image's own alpha channel, then composited on top with
//! targeting overlays.

use crate::clock::FrameTime;
use crate::color::Color;
use crate::constants::*;
use crate::error::FxError;
use crate::mask::{reveal_mask, AlphaMask, CircleMask};
use crate::pointer::PointerTracker;
use crate::render::Effect;
use crate::surface::{Surface, TextAlign, TextBaseline};
use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;

pub static CODE_SNIPPETS: &[&str] = &[
    "const init = async () => {",
    "  await connect();",
    "  return system.ready;",
    "};",
    "export default function",
    "interface Config {",
    "  readonly id: string;",
    "  status: boolean;",
    "}",
    "const [state, setState]",
    "useEffect(() => {",
    "  // initialize",
    "}, []);",
    "async function fetch() {",
    "  const res = await api",
    "  return res.data;",
    "}",
    "type Props = {",
    "  children: ReactNode;",
    "  className?: string;",
    "};",
    "const router = useRouter",
    "import { motion }",
    "from 'framer-motion'",
    ".then(data => data)",
    ".catch(err => null)",
    "module.exports = cfg",
    "npm run build",
    "git commit -m 'fix'",
    "docker compose up",
    "SELECT * FROM users",
    "WHERE id = $1",
    "ORDER BY created_at",
    "fn main() -> Result",
    "pub struct System {",
    "  nodes: Vec<Node>,",
    "}",
    "impl Iterator for",
    "match result {",
    "  Ok(v) => v,",
    "  Err(_) => panic!",
    "}",
];

// Syntax-highlight palette: (rgb, alpha)
pub static CODE_COLORS: &[([u8; 3], f32)] = &[
    ([129, 162, 190], 0.9),
    ([181, 206, 168], 0.9),
    ([206, 145, 120], 0.9),
    ([156, 220, 254], 0.9),
    ([220, 220, 170], 0.85),
    ([197, 134, 192], 0.9),
];

#[derive(Clone, Debug)]
pub struct CodeLensConfig {
    pub columns: usize,
    /// Opacity of the code layer at full engagement.
    pub layer_opacity: f32,
    /// Lens radius at full engagement, as a fraction of `min(w, h)`.
    pub radius_fraction: f32,
    pub accent: [u8; 3],
    pub background: [u8; 3],
}

impl Default for CodeLensConfig {
    fn default() -> Self {
        Self {
            columns: LENS_COLUMNS,
            layer_opacity: LENS_LAYER_OPACITY,
            radius_fraction: LENS_RADIUS_FRACTION,
            accent: ACCENT_RGB,
            background: LENS_BACKGROUND_RGB,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CodeRow {
    pub text: &'static str,
    pub color: Color,
    pub x: f32,
}

/// Text metrics of the code layer, derived from the surface height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CodeMetrics {
    pub font_size: f32,
    pub line_height: f32,
    pub rows_per_column: usize,
    pub total_height: f32,
}

impl CodeMetrics {
    pub fn for_height(height: u32) -> Self {
        let font_size = (height as f32 / LENS_FONT_DIVISOR).floor().max(LENS_MIN_FONT_PX);
        let line_height = font_size * LENS_LINE_HEIGHT;
        let rows_per_column = (height as f32 / line_height).ceil() as usize * 2;
        Self {
            font_size,
            line_height,
            rows_per_column,
            total_height: rows_per_column as f32 * line_height,
        }
    }
}

pub struct CodeLens {
    config: CodeLensConfig,
    base: Surface,
    silhouette: AlphaMask,
    code_layer: Surface,
    mask: AlphaMask,
    rows: Vec<CodeRow>,
    metrics: CodeMetrics,
    scroll_offset: f32,
    pointer: PointerTracker,
}

impl CodeLens {
    /// `base` is the decoded image at canvas resolution; its alpha channel
    /// becomes the silhouette.
    pub fn new(base: Surface, config: CodeLensConfig, rng: &mut impl Rng) -> Result<Self, FxError> {
        if config.columns == 0 {
            return Err(FxError::InvalidConfig("code lens needs at least one column"));
        }
        let (w, h) = (base.width(), base.height());
        let metrics = CodeMetrics::for_height(h);
        let column_width = w as f32 / config.columns as f32;
        let mut rows = Vec::with_capacity(config.columns * metrics.rows_per_column);
        for col in 0..config.columns {
            for _ in 0..metrics.rows_per_column {
                let text = CODE_SNIPPETS.choose(rng).copied().unwrap_or_default();
                let (rgb, a) = CODE_COLORS.choose(rng).copied().unwrap_or((ACCENT_RGB, 0.9));
                rows.push(CodeRow {
                    text,
                    color: Color::rgba(rgb, a),
                    x: column_width * col as f32 + 10.0 + rng.gen::<f32>() * 15.0,
                });
            }
        }
        log::debug!(
            "[lens] {}x{} surface, {} code rows, font {}px",
            w,
            h,
            rows.len(),
            metrics.font_size
        );
        Ok(Self {
            silhouette: AlphaMask::from_alpha_channel(&base),
            code_layer: Surface::new(w, h)?,
            mask: AlphaMask::new(w, h),
            base,
            rows,
            metrics,
            scroll_offset: 0.0,
            pointer: PointerTracker::default(),
            config,
        })
    }

    pub fn metrics(&self) -> CodeMetrics {
        self.metrics
    }

    pub fn rows(&self) -> &[CodeRow] {
        &self.rows
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Lens mask of the last rendered frame.
    pub fn mask(&self) -> &AlphaMask {
        &self.mask
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    /// Current lens radius in pixels (scales with engagement).
    pub fn radius(&self) -> f32 {
        let base = self.base.width().min(self.base.height()) as f32 * self.config.radius_fraction;
        base * self.pointer.state().engagement
    }

    fn paint_code_layer(&mut self) {
        let m = self.metrics;
        let h = self.code_layer.height() as f32;
        self.code_layer.clear();
        self.code_layer.fill(Color::rgba(self.config.background, 1.0));
        for (i, row) in self.rows.iter().enumerate() {
            let column = i / m.rows_per_column;
            let row_in_column = i % m.rows_per_column;
            let column_scroll = self.scroll_offset * (1.0 + column as f32 * 0.15);
            let mut y = row_in_column as f32 * m.line_height - column_scroll % m.total_height;
            if y < -m.line_height {
                y += m.total_height;
            }
            if y > -m.line_height && y < h + m.line_height {
                self.code_layer.draw_text(
                    row.text,
                    Vec2::new(row.x, y),
                    m.font_size,
                    row.color,
                    TextAlign::Left,
                    TextBaseline::Top,
                );
            }
        }
    }

    fn paint_overlays(&self, surface: &mut Surface, center: Vec2, radius: f32, e: f32) {
        let accent = |a: f32| Color::rgba(self.config.accent, a);
        surface.stroke_ring_glow(center, radius, LENS_GLOW_SIZE, accent(0.2 * e));
        surface.stroke_circle(center, radius, 2.0, accent(0.6 * e));

        let s = LENS_BRACKET_SIZE;
        let o = radius * LENS_BRACKET_OFFSET;
        let c = accent(0.7 * e);
        for (dx, dy) in [(-1.0f32, -1.0f32), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
            let corner = center + Vec2::new(dx * o, dy * o);
            // arms point back toward the lens center
            surface.stroke_polyline(
                &[
                    corner - Vec2::new(0.0, dy * s),
                    corner,
                    corner - Vec2::new(dx * s, 0.0),
                ],
                2.0,
                c,
            );
        }
        surface.fill_circle(center, 2.5, accent(0.8 * e));
    }
}

impl Effect for CodeLens {
    fn name(&self) -> &'static str {
        "code-lens"
    }

    fn advance(&mut self, time: FrameTime) {
        let dt = time.delta_f32();
        let state = self.pointer.tick(dt);
        if state.engagement > LENS_SCROLL_THRESHOLD {
            self.scroll_offset += LENS_SCROLL_PER_FRAME * dt * FRAMES_PER_MS;
            if self.scroll_offset >= self.metrics.total_height / 2.0 {
                self.scroll_offset = 0.0;
            }
        }
    }

    fn render(&mut self, surface: &mut Surface) {
        surface.clear();
        surface.draw_surface(&self.base, 1.0);

        let state = self.pointer.state();
        let e = state.engagement;
        if e <= LENS_PAINT_THRESHOLD {
            self.mask.fill(0.0);
            return;
        }
        let radius = self.radius();
        let circle = CircleMask {
            center: state.position,
            radius,
        };
        self.paint_code_layer();
        let composited = reveal_mask(&mut self.mask, &circle, &self.silhouette, e)
            .and_then(|_| surface.composite_masked(&self.code_layer, &self.mask, self.config.layer_opacity));
        if let Err(err) = composited {
            log::warn!("[lens] composite skipped: {}", err);
            return;
        }
        self.paint_overlays(surface, state.position, radius, e);
    }

    fn pointer_mut(&mut self) -> Option<&mut PointerTracker> {
        Some(&mut self.pointer)
    }
}
