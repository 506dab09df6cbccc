// Host-side tests for the software surface: construction limits, blending and primitives.

use fx_core::{AlphaMask, Color, FxError, Rgba8, Surface, TextAlign, TextBaseline};
use glam::Vec2;

const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

#[test]
fn zero_sized_and_oversized_surfaces_are_rejected() {
    assert_eq!(
        Surface::new(0, 10).unwrap_err(),
        FxError::InvalidSurface { width: 0, height: 10 }
    );
    assert!(matches!(
        Surface::new(100_000, 100_000),
        Err(FxError::SurfaceTooLarge { .. })
    ));
}

#[test]
fn from_rgba8_checks_buffer_length() {
    let err = Surface::from_rgba8(2, 2, &[0; 15]).unwrap_err();
    assert_eq!(
        err,
        FxError::BufferSize {
            expected: 16,
            actual: 15
        }
    );
    let bytes: Vec<u8> = (0..16).collect();
    let s = Surface::from_rgba8(2, 2, &bytes).unwrap();
    assert_eq!(s.pixel(1, 0), Some(Rgba8::new(4, 5, 6, 7)));
    assert_eq!(s.as_bytes(), &bytes[..]);
}

#[test]
fn new_surface_is_transparent() {
    let s = Surface::new(4, 3).unwrap();
    assert!(s.pixels().iter().all(|p| *p == Rgba8::TRANSPARENT));
    assert_eq!(s.pixel(4, 0), None);
}

#[test]
fn trail_fill_decays_previous_frames_geometrically() {
    let mut s = Surface::new(1, 1).unwrap();
    s.fill(WHITE);
    let bg = Color::rgba([10, 10, 10], 0.15);
    let mut expected = 1.0f32;
    for _ in 0..10 {
        s.fill(bg);
        // each fill keeps 85% of the old white contribution
        expected = expected * 0.85 + (10.0 / 255.0) * 0.15;
        let r = s.pixel(0, 0).unwrap().r as f32 / 255.0;
        assert!((r - expected).abs() < 4.0 / 255.0, "r={r} expected={expected}");
    }
    assert_eq!(s.pixel(0, 0).unwrap().a, 255);
}

#[test]
fn fill_rect_covers_exactly_the_rect() {
    let mut s = Surface::new(8, 8).unwrap();
    s.fill_rect(2.0, 3.0, 2.0, 1.0, WHITE);
    for y in 0..8 {
        for x in 0..8 {
            let inside = (2..4).contains(&x) && y == 3;
            let a = s.pixel(x, y).unwrap().a;
            assert_eq!(a == 255, inside, "({x},{y})");
            assert_eq!(a == 0, !inside, "({x},{y})");
        }
    }
}

#[test]
fn half_pixel_rect_edges_get_partial_coverage() {
    let mut s = Surface::new(4, 1).unwrap();
    s.fill_rect(0.5, 0.0, 2.0, 1.0, WHITE);
    assert_eq!(s.pixel(0, 0).unwrap().a, 128);
    assert_eq!(s.pixel(1, 0).unwrap().a, 255);
    assert_eq!(s.pixel(2, 0).unwrap().a, 128);
    assert_eq!(s.pixel(3, 0).unwrap().a, 0);
}

#[test]
fn scale_maps_logical_units_to_pixels() {
    let mut s = Surface::new(8, 8).unwrap().with_scale(2.0);
    assert_eq!(s.logical_size(), Vec2::new(4.0, 4.0));
    s.fill_rect(1.0, 1.0, 1.0, 1.0, WHITE);
    assert_eq!(s.pixel(2, 2).unwrap().a, 255);
    assert_eq!(s.pixel(3, 3).unwrap().a, 255);
    assert_eq!(s.pixel(4, 4).unwrap().a, 0);
    assert_eq!(s.pixel(1, 1).unwrap().a, 0);
}

#[test]
fn invalid_scale_falls_back_to_one() {
    let s = Surface::new(2, 2).unwrap().with_scale(f32::NAN);
    assert_eq!(s.scale(), 1.0);
}

#[test]
fn filled_circle_is_solid_inside_and_empty_far_outside() {
    let mut s = Surface::new(21, 21).unwrap();
    s.fill_circle(Vec2::new(10.5, 10.5), 5.0, WHITE);
    assert_eq!(s.pixel(10, 10).unwrap().a, 255);
    assert_eq!(s.pixel(10, 13).unwrap().a, 255);
    assert_eq!(s.pixel(10, 17).unwrap().a, 0);
    assert_eq!(s.pixel(0, 0).unwrap().a, 0);
}

#[test]
fn stroked_circle_leaves_center_empty() {
    let mut s = Surface::new(41, 41).unwrap();
    s.stroke_circle(Vec2::new(20.5, 20.5), 10.0, 2.0, WHITE);
    assert_eq!(s.pixel(20, 20).unwrap().a, 0);
    assert_eq!(s.pixel(30, 20).unwrap().a, 255);
}

#[test]
fn ring_glow_peaks_on_the_radius() {
    let mut s = Surface::new(81, 81).unwrap();
    s.stroke_ring_glow(Vec2::new(40.5, 40.5), 20.0, 10.0, WHITE);
    let on_ring = s.pixel(60, 40).unwrap().a;
    let inside = s.pixel(55, 40).unwrap().a;
    let far = s.pixel(40, 40).unwrap().a;
    assert!(on_ring > inside);
    assert!(inside > 0);
    assert_eq!(far, 0);
}

#[test]
fn polyline_joints_are_not_double_blended() {
    let mut s = Surface::new(20, 20).unwrap();
    let c = Color::new(1.0, 1.0, 1.0, 0.5);
    s.stroke_polyline(
        &[Vec2::new(2.5, 10.5), Vec2::new(10.5, 10.5), Vec2::new(10.5, 2.5)],
        1.0,
        c,
    );
    // the joint pixel has the same alpha as a mid-segment pixel
    let joint = s.pixel(10, 10).unwrap().a;
    let mid = s.pixel(6, 10).unwrap().a;
    assert_eq!(joint, mid);
    assert_eq!(mid, 128);
}

#[test]
fn vertical_gradient_fades_to_transparent_at_edges() {
    let mut s = Surface::new(1, 60).unwrap();
    let peak = Color::rgba([74, 158, 255], 1.0);
    s.fill_rect_gradient_v(
        0.0,
        0.0,
        1.0,
        60.0,
        &[(0.0, Color::TRANSPARENT), (0.5, peak), (1.0, Color::TRANSPARENT)],
    );
    let top = s.pixel(0, 0).unwrap().a;
    let middle = s.pixel(0, 30).unwrap().a;
    let bottom = s.pixel(0, 59).unwrap().a;
    assert!(top < 10);
    assert!(bottom < 10);
    assert!(middle > 240);
}

#[test]
fn text_respects_alignment() {
    let mut left = Surface::new(100, 20).unwrap();
    left.draw_text("0x00", Vec2::new(10.0, 0.0), 8.0, WHITE, TextAlign::Left, TextBaseline::Top);
    let mut right = Surface::new(100, 20).unwrap();
    right.draw_text("0x00", Vec2::new(90.0, 0.0), 8.0, WHITE, TextAlign::Right, TextBaseline::Top);

    let ink_x = |s: &Surface| -> (u32, u32) {
        let mut min = u32::MAX;
        let mut max = 0;
        for y in 0..20 {
            for x in 0..100 {
                if s.pixel(x, y).unwrap().a > 0 {
                    min = min.min(x);
                    max = max.max(x);
                }
            }
        }
        (min, max)
    };
    let (l0, _) = ink_x(&left);
    let (_, r1) = ink_x(&right);
    assert!(l0 >= 10);
    assert!(r1 < 90);
    // 4 glyphs at 1 px per font unit: 23 units wide
    assert!(l0 < 12);
    assert!(r1 >= 88);
}

#[test]
fn text_outside_the_surface_draws_nothing() {
    let mut s = Surface::new(10, 10).unwrap();
    s.draw_text("HELLO", Vec2::new(-200.0, 0.0), 8.0, WHITE, TextAlign::Left, TextBaseline::Top);
    s.draw_text("HELLO", Vec2::new(0.0, 50.0), 8.0, WHITE, TextAlign::Left, TextBaseline::Top);
    assert!(s.pixels().iter().all(|p| p.a == 0));
}

#[test]
fn masked_composite_rejects_size_mismatch() {
    let mut dst = Surface::new(4, 4).unwrap();
    let src = Surface::new(4, 4).unwrap();
    let mask = AlphaMask::new(3, 4);
    assert!(matches!(
        dst.composite_masked(&src, &mask, 1.0),
        Err(FxError::MaskMismatch { .. })
    ));
}

#[test]
fn draw_surface_blends_with_global_alpha() {
    let mut base = Surface::new(2, 2).unwrap();
    let mut top = Surface::new(2, 2).unwrap();
    top.fill(WHITE);
    base.draw_surface(&top, 0.5);
    assert_eq!(base.pixel(1, 1).unwrap().a, 128);
}
