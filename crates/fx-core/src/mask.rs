//! Per-pixel coverage buffers used by the code lens.

use crate::error::FxError;
use crate::surface::Surface;
use glam::Vec2;

/// Coverage in \[0, 1\] for every pixel of a surface-sized area.
#[derive(Clone, Debug, PartialEq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl AlphaMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width as usize * height as usize],
        }
    }

    /// Take the alpha channel of `surface`; this is the silhouette of a
    /// transparent-background image.
    pub fn from_alpha_channel(surface: &Surface) -> Self {
        Self {
            width: surface.width(),
            height: surface.height(),
            values: surface.pixels().iter().map(|p| p.alpha_f32()).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        (x < self.width && y < self.height)
            .then(|| self.values[y as usize * self.width as usize + x as usize])
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn fill(&mut self, value: f32) {
        self.values.fill(value.clamp(0.0, 1.0));
    }
}

/// Hard-edged disc in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleMask {
    pub center: Vec2,
    pub radius: f32,
}

impl CircleMask {
    /// 1 when the pixel center lies inside the circle, else 0.
    #[inline]
    pub fn coverage(&self, x: u32, y: u32) -> f32 {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        if p.distance_squared(self.center) <= self.radius * self.radius {
            1.0
        } else {
            0.0
        }
    }
}

/// Write `circle ∩ silhouette` scaled by `engagement` into `out`.
///
/// Outside the circle the result is exactly 0; inside it is the silhouette
/// coverage times engagement.
pub fn reveal_mask(
    out: &mut AlphaMask,
    circle: &CircleMask,
    silhouette: &AlphaMask,
    engagement: f32,
) -> Result<(), FxError> {
    if out.width != silhouette.width || out.height != silhouette.height {
        return Err(FxError::MaskMismatch {
            mask_width: silhouette.width,
            mask_height: silhouette.height,
            width: out.width,
            height: out.height,
        });
    }
    out.values.fill(0.0);
    let e = engagement.clamp(0.0, 1.0);
    if e <= 0.0 || circle.radius <= 0.0 {
        return Ok(());
    }

    // Only rows and columns inside the circle's bounding box can be nonzero.
    let r = circle.radius;
    let y0 = (circle.center.y - r).floor().max(0.0) as u32;
    let y1 = ((circle.center.y + r).ceil().max(0.0) as u32).min(out.height);
    let x0 = (circle.center.x - r).floor().max(0.0) as u32;
    let x1 = ((circle.center.x + r).ceil().max(0.0) as u32).min(out.width);
    let w = out.width as usize;
    for y in y0..y1 {
        for x in x0..x1 {
            if circle.coverage(x, y) > 0.0 {
                let i = y as usize * w + x as usize;
                out.values[i] = silhouette.values[i] * e;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_coverage_uses_pixel_centers() {
        let c = CircleMask {
            center: Vec2::new(5.0, 5.0),
            radius: 1.0,
        };
        assert_eq!(c.coverage(4, 4), 1.0);
        assert_eq!(c.coverage(5, 5), 1.0);
        assert_eq!(c.coverage(6, 6), 0.0);
        assert_eq!(c.coverage(0, 0), 0.0);
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let mut out = AlphaMask::new(4, 4);
        let sil = AlphaMask::new(5, 4);
        let c = CircleMask {
            center: Vec2::ZERO,
            radius: 2.0,
        };
        assert!(matches!(
            reveal_mask(&mut out, &c, &sil, 1.0),
            Err(FxError::MaskMismatch { .. })
        ));
    }
}
