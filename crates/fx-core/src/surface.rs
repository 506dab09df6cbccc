//! Software drawing surface.
//!
//! A straight-alpha RGBA8 buffer with source-over blending and a small set of
//! Canvas2D-like primitives. Geometry is given in logical units and scaled by
//! [`Surface::scale`] (the device pixel ratio) before rasterizing.

use crate::color::{blend_over, Color, Rgba8};
use crate::constants::MAX_SURFACE_PIXELS;
use crate::error::FxError;
use crate::font;
use crate::mask::AlphaMask;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TextBaseline {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Clone, Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    scale: f32,
    pixels: Vec<Rgba8>,
    // scratch coverage for polylines, reused across frames
    coverage: Vec<f32>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Result<Self, FxError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            scale: 1.0,
            pixels: vec![Rgba8::TRANSPARENT; width as usize * height as usize],
            coverage: Vec::new(),
        })
    }

    /// Wrap an existing RGBA8 byte buffer (e.g. decoded image data).
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, FxError> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(FxError::BufferSize {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            scale: 1.0,
            pixels: bytemuck::cast_slice::<u8, Rgba8>(bytes).to_vec(),
            coverage: Vec::new(),
        })
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.set_scale(scale);
        self
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Logical size (pixel size divided by scale).
    pub fn logical_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) / self.scale
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Bytes in `ImageData` order (r, g, b, a per pixel).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Rgba8::TRANSPARENT);
    }

    /// Blend `color` over the whole surface. With alpha below one this is the
    /// trail effect: earlier frames decay geometrically.
    pub fn fill(&mut self, color: Color) {
        for px in &mut self.pixels {
            blend_over(px, color, 1.0);
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let s = self.scale;
        self.fill_rect_px(x * s, y * s, (x + w) * s, (y + h) * s, color);
    }

    /// Box-filtered rectangle in pixel coordinates; partial edge pixels get
    /// fractional coverage.
    fn fill_rect_px(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Color) {
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        let Some((px0, py0, px1, py1)) = self.pixel_span(x0, y0, x1, y1) else {
            return;
        };
        for py in py0..py1 {
            let cy = overlap(y0, y1, py as f32);
            if cy <= 0.0 {
                continue;
            }
            for px in px0..px1 {
                let cx = overlap(x0, x1, px as f32);
                if cx > 0.0 {
                    let i = self.index(px, py);
                    blend_over(&mut self.pixels[i], color, cx * cy);
                }
            }
        }
    }

    /// Vertical linear gradient. `stops` are `(offset 0..1, color)` pairs in
    /// ascending order, interpolated like a canvas linear gradient from the
    /// top edge of the rect to its bottom edge.
    pub fn fill_rect_gradient_v(&mut self, x: f32, y: f32, w: f32, h: f32, stops: &[(f32, Color)]) {
        if stops.is_empty() || h <= 0.0 {
            return;
        }
        let s = self.scale;
        let (x0, x1) = (x * s, (x + w) * s);
        let (y0, y1) = (y * s, (y + h) * s);
        let Some((px0, py0, px1, py1)) = self.pixel_span(x0, y0, x1, y1) else {
            return;
        };
        for py in py0..py1 {
            let t = ((py as f32 + 0.5) - y0) / (y1 - y0);
            let color = gradient_at(stops, t);
            let cy = overlap(y0, y1, py as f32);
            for px in px0..px1 {
                let cx = overlap(x0, x1, px as f32);
                let i = self.index(px, py);
                blend_over(&mut self.pixels[i], color, cx * cy);
            }
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let c = center * self.scale;
        let r = radius * self.scale;
        self.shade_disc(c, r + 1.0, |d| (r - d + 0.5).clamp(0.0, 1.0), color);
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        let c = center * self.scale;
        let r = radius * self.scale;
        let half = width * self.scale * 0.5;
        self.shade_disc(
            c,
            r + half + 1.0,
            |d| (half - (d - r).abs() + 0.5).clamp(0.0, 1.0),
            color,
        );
    }

    /// Ring whose alpha peaks at `radius` and falls linearly to zero at
    /// `radius ± half_width` (a three-stop radial gradient stroked over the
    /// ring).
    pub fn stroke_ring_glow(&mut self, center: Vec2, radius: f32, half_width: f32, color: Color) {
        let c = center * self.scale;
        let r = radius * self.scale;
        let hw = (half_width * self.scale).max(f32::EPSILON);
        self.shade_disc(
            c,
            r + hw + 1.0,
            |d| (1.0 - (d - r).abs() / hw).clamp(0.0, 1.0),
            color,
        );
    }

    /// Evaluate `coverage(distance_from_center)` for every pixel within
    /// `extent` of `c` (pixel space) and blend.
    fn shade_disc(&mut self, c: Vec2, extent: f32, coverage: impl Fn(f32) -> f32, color: Color) {
        let Some((px0, py0, px1, py1)) =
            self.pixel_span(c.x - extent, c.y - extent, c.x + extent, c.y + extent)
        else {
            return;
        };
        for py in py0..py1 {
            let dy = py as f32 + 0.5 - c.y;
            for px in px0..px1 {
                let dx = px as f32 + 0.5 - c.x;
                let cov = coverage((dx * dx + dy * dy).sqrt());
                if cov > 0.0 {
                    let i = self.index(px, py);
                    blend_over(&mut self.pixels[i], color, cov);
                }
            }
        }
    }

    pub fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, color: Color) {
        self.stroke_polyline(&[a, b], width, color);
    }

    /// Stroke connected segments. Coverage is merged with `max` before
    /// blending so segment joints are not painted twice.
    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: Color) {
        if points.len() < 2 {
            return;
        }
        let s = self.scale;
        let half = (width * s * 0.5).max(0.0);
        let pad = half + 1.0;
        let (mut min, mut max) = (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN));
        for p in points {
            let p = *p * s;
            min = min.min(p);
            max = max.max(p);
        }
        let Some((bx0, by0, bx1, by1)) =
            self.pixel_span(min.x - pad, min.y - pad, max.x + pad, max.y + pad)
        else {
            return;
        };
        let bw = (bx1 - bx0) as usize;
        let bh = (by1 - by0) as usize;
        let mut coverage = std::mem::take(&mut self.coverage);
        coverage.clear();
        coverage.resize(bw * bh, 0.0);

        for seg in points.windows(2) {
            let (a, b) = (seg[0] * s, seg[1] * s);
            let lo = a.min(b) - Vec2::splat(pad);
            let hi = a.max(b) + Vec2::splat(pad);
            let sx0 = (lo.x.floor().max(bx0 as f32)) as u32;
            let sy0 = (lo.y.floor().max(by0 as f32)) as u32;
            let sx1 = (hi.x.ceil().min(bx1 as f32)) as u32;
            let sy1 = (hi.y.ceil().min(by1 as f32)) as u32;
            for py in sy0..sy1 {
                for px in sx0..sx1 {
                    let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                    let d = distance_to_segment(p, a, b);
                    let cov = (half - d + 0.5).clamp(0.0, 1.0);
                    if cov > 0.0 {
                        let ci = (py - by0) as usize * bw + (px - bx0) as usize;
                        if cov > coverage[ci] {
                            coverage[ci] = cov;
                        }
                    }
                }
            }
        }

        for row in 0..bh {
            for col in 0..bw {
                let cov = coverage[row * bw + col];
                if cov > 0.0 {
                    let i = self.index(bx0 + col as u32, by0 + row as u32);
                    blend_over(&mut self.pixels[i], color, cov);
                }
            }
        }
        self.coverage = coverage;
    }

    /// Draw `text` with the built-in bitmap font. `size` is the cell height in
    /// logical units (8 font rows).
    pub fn draw_text(
        &mut self,
        text: &str,
        anchor: Vec2,
        size: f32,
        color: Color,
        align: TextAlign,
        baseline: TextBaseline,
    ) {
        if text.is_empty() || size <= 0.0 || color.a <= 0.0 {
            return;
        }
        let unit = size * self.scale / font::GLYPH_ROWS as f32;
        let width = font::text_units(text) as f32 * unit;
        let height = font::GLYPH_ROWS as f32 * unit;
        let a = anchor * self.scale;
        let x0 = match align {
            TextAlign::Left => a.x,
            TextAlign::Center => a.x - width * 0.5,
            TextAlign::Right => a.x - width,
        };
        let y0 = match baseline {
            TextBaseline::Top => a.y,
            TextBaseline::Middle => a.y - height * 0.5,
            TextBaseline::Bottom => a.y - height,
        };
        if x0 > self.width as f32 || y0 > self.height as f32 || x0 + width < 0.0 || y0 + height < 0.0 {
            return;
        }
        for (n, ch) in text.chars().enumerate() {
            let gx = x0 + (n * font::ADVANCE) as f32 * unit;
            if gx > self.width as f32 {
                break;
            }
            if gx + font::GLYPH_COLUMNS as f32 * unit < 0.0 || ch == ' ' {
                continue;
            }
            self.draw_glyph_px(ch, Vec2::new(gx, y0), unit, color);
        }
    }

    fn draw_glyph_px(&mut self, ch: char, origin: Vec2, unit: f32, color: Color) {
        let columns = font::glyph(ch);
        for (col, bits) in columns.iter().enumerate() {
            if *bits == 0 {
                continue;
            }
            for row in 0..font::GLYPH_ROWS {
                if bits & (1 << row) != 0 {
                    let x = origin.x + col as f32 * unit;
                    let y = origin.y + row as f32 * unit;
                    self.fill_rect_px(x, y, x + unit, y + unit, color);
                }
            }
        }
    }

    /// Blend `src` onto this surface at the origin with a global alpha.
    /// Only the overlapping region is drawn.
    pub fn draw_surface(&mut self, src: &Surface, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let w = self.width.min(src.width);
        let h = self.height.min(src.height);
        for y in 0..h {
            for x in 0..w {
                let sp = src.pixels[src.index(x, y)];
                if sp.a == 0 {
                    continue;
                }
                let i = self.index(x, y);
                blend_over(&mut self.pixels[i], Color::from_rgba8(sp), alpha);
            }
        }
    }

    /// Blend `src` through a per-pixel coverage mask scaled by `alpha`.
    /// All three buffers must share dimensions.
    pub fn composite_masked(&mut self, src: &Surface, mask: &AlphaMask, alpha: f32) -> Result<(), FxError> {
        if src.width != self.width || src.height != self.height {
            return Err(FxError::MaskMismatch {
                mask_width: src.width,
                mask_height: src.height,
                width: self.width,
                height: self.height,
            });
        }
        if mask.width() != self.width || mask.height() != self.height {
            return Err(FxError::MaskMismatch {
                mask_width: mask.width(),
                mask_height: mask.height(),
                width: self.width,
                height: self.height,
            });
        }
        if alpha <= 0.0 {
            return Ok(());
        }
        for (i, (dst, m)) in self.pixels.iter_mut().zip(mask.values()).enumerate() {
            if *m <= 0.0 {
                continue;
            }
            let sp = src.pixels[i];
            blend_over(dst, Color::from_rgba8(sp), m * alpha);
        }
        Ok(())
    }

    /// Clip a pixel-space rect to the surface; `None` when fully outside.
    fn pixel_span(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> Option<(u32, u32, u32, u32)> {
        if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
            return None;
        }
        let px0 = x0.floor().max(0.0);
        let py0 = y0.floor().max(0.0);
        let px1 = x1.ceil().min(self.width as f32);
        let py1 = y1.ceil().min(self.height as f32);
        (px1 > px0 && py1 > py0).then_some((px0 as u32, py0 as u32, px1 as u32, py1 as u32))
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), FxError> {
    if width == 0 || height == 0 {
        return Err(FxError::InvalidSurface { width, height });
    }
    if width as u64 * height as u64 > MAX_SURFACE_PIXELS {
        return Err(FxError::SurfaceTooLarge { width, height });
    }
    Ok(())
}

/// Length of `[lo, hi]` ∩ `[p, p + 1]`.
#[inline]
fn overlap(lo: f32, hi: f32, p: f32) -> f32 {
    (hi.min(p + 1.0) - lo.max(p)).clamp(0.0, 1.0)
}

#[inline]
fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn gradient_at(stops: &[(f32, Color)], t: f32) -> Color {
    let first = stops[0];
    if t <= first.0 {
        return first.1;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.0 {
            let span = (b.0 - a.0).max(f32::EPSILON);
            return a.1.lerp(b.1, (t - a.0) / span);
        }
    }
    stops[stops.len() - 1].1
}
