use bytemuck::{Pod, Zeroable};

/// One stored pixel, straight (non-premultiplied) alpha, laid out like
/// browser `ImageData` so a surface can be handed over without conversion.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Rgba8 = Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn alpha_f32(self) -> f32 {
        self.a as f32 / 255.0
    }
}

/// Paint color with channels in 0..1 and straight alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Equivalent of CSS `rgba(r, g, b, a)`.
    #[inline]
    pub fn rgba(rgb: [u8; 3], a: f32) -> Self {
        Self {
            r: rgb[0] as f32 / 255.0,
            g: rgb[1] as f32 / 255.0,
            b: rgb[2] as f32 / 255.0,
            a: a.clamp(0.0, 1.0),
        }
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    #[inline]
    pub fn from_rgba8(px: Rgba8) -> Self {
        Self {
            r: px.r as f32 / 255.0,
            g: px.g as f32 / 255.0,
            b: px.b as f32 / 255.0,
            a: px.alpha_f32(),
        }
    }
}

/// Source-over blend of `src` (scaled by `coverage`) onto `dst`.
#[inline]
pub fn blend_over(dst: &mut Rgba8, src: Color, coverage: f32) {
    let sa = (src.a * coverage).clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst.alpha_f32();
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba8::TRANSPARENT;
        return;
    }
    let keep = da * (1.0 - sa);
    let mix = |s: f32, d: u8| -> u8 {
        let v = (s * sa + (d as f32 / 255.0) * keep) / out_a;
        to_u8(v)
    };
    dst.r = mix(src.r, dst.r);
    dst.g = mix(src.g, dst.g);
    dst.b = mix(src.b, dst.b);
    dst.a = to_u8(out_a);
}

#[inline]
pub(crate) fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_source_replaces_destination() {
        let mut px = Rgba8::new(10, 20, 30, 255);
        blend_over(&mut px, Color::rgba([200, 100, 50], 1.0), 1.0);
        assert_eq!(px, Rgba8::new(200, 100, 50, 255));
    }

    #[test]
    fn translucent_over_transparent_keeps_source_color() {
        let mut px = Rgba8::TRANSPARENT;
        blend_over(&mut px, Color::rgba([74, 158, 255], 0.5), 1.0);
        assert_eq!((px.r, px.g, px.b), (74, 158, 255));
        assert_eq!(px.a, 128);
    }

    #[test]
    fn zero_coverage_is_a_no_op() {
        let mut px = Rgba8::new(1, 2, 3, 4);
        blend_over(&mut px, Color::rgba([255, 255, 255], 1.0), 0.0);
        assert_eq!(px, Rgba8::new(1, 2, 3, 4));
    }
}
