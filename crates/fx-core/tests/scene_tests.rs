// Host-side tests for the signal monitor and glyph matrix scenes.

use fx_core::render::glyphs::units_per_world;
use fx_core::render::monitor::hex_label;
use fx_core::{
    run_frame, Effect, FrameLoop, FrameTime, GlyphMatrix, GlyphMatrixConfig, MonitorConfig, SignalMonitor,
    Surface, GLYPHS,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;

fn monitor() -> SignalMonitor {
    SignalMonitor::new(MonitorConfig::default(), &mut StdRng::seed_from_u64(1)).unwrap()
}

fn at(elapsed_ms: f64, delta_ms: f64) -> FrameTime {
    FrameTime {
        elapsed_ms,
        delta_ms,
    }
}

#[test]
fn monitor_starts_with_expected_populations() {
    let m = monitor();
    assert_eq!(m.motes().len(), 30);
    assert_eq!(m.config().signals.len(), 3);
    assert_eq!(hex_label(m.config().width), "190h");
    assert_eq!(hex_label(m.config().height), "1F4h");
}

#[test]
fn scan_band_position_follows_elapsed_time() {
    let mut m = monitor();
    m.advance(at(0.0, 0.0));
    assert_eq!(m.scan_y(), -50.0);
    // 1.5 px per reference frame: 100 frames -> 150 px
    m.advance(at(100.0 * 1000.0 / 60.0, 16.0));
    assert!((m.scan_y() - 100.0).abs() < 1e-2);
}

#[test]
fn waveform_is_a_function_of_time_not_frame_count() {
    // one 64 ms step and four 16 ms steps land on the same wave
    let mut a = monitor();
    let mut b = monitor();
    a.advance(at(64.0, 64.0));
    for i in 1..=4 {
        b.advance(at(16.0 * i as f64, 16.0));
    }
    for x in [0.0, 50.0, 123.0, 398.0] {
        assert!((a.wave_offset(0, x) - b.wave_offset(0, x)).abs() < 1e-4);
    }
}

#[test]
fn monitor_trail_keeps_surface_opaque_after_warmup() {
    let mut m = monitor();
    let mut surface = Surface::new(400, 500).unwrap();
    for i in 0..60 {
        run_frame(&mut m, at(i as f64 * 16.7, 16.7), &mut surface);
    }
    // the translucent base fill saturates alpha everywhere
    assert!(surface.pixels().iter().all(|p| p.a >= 250));
}

#[test]
fn monitor_paints_on_a_high_dpi_surface() {
    let mut m = monitor();
    let mut surface = Surface::new(800, 1000).unwrap().with_scale(2.0);
    run_frame(&mut m, at(0.0, 0.0), &mut surface);
    // center dot sits at (200, 250) logical
    let center = surface.pixel(400, 500).unwrap();
    assert!(center.b > center.r);
}

fn glyphs(seed: u64) -> GlyphMatrix {
    GlyphMatrix::new(GlyphMatrixConfig::default(), &mut StdRng::seed_from_u64(seed)).unwrap()
}

#[test]
fn glyph_grid_has_configured_size_and_variants() {
    let g = glyphs(3);
    assert_eq!(g.field().len(), 80 * 55);
    assert_eq!(g.field().variants(), GLYPHS.chars().count());
    let visible = g.field().visible().count() as f32 / g.field().len() as f32;
    assert!((visible - 0.25).abs() < 0.03);
}

#[test]
fn scroll_progress_scales_churn() {
    let mut g = glyphs(3);
    assert_eq!(g.rate_scale(), 3.0);
    g.set_scroll_progress(1.0);
    assert_eq!(g.rate_scale(), 1.0);
    g.set_scroll_progress(0.5);
    assert_eq!(g.rate_scale(), 2.0);
    g.set_scroll_progress(f32::NAN);
    assert_eq!(g.scroll_progress(), 0.0);
    g.set_scroll_progress(7.0);
    assert_eq!(g.scroll_progress(), 1.0);
}

#[test]
fn top_of_page_mutates_faster_than_bottom() {
    let mut top = glyphs(8);
    let mut bottom = glyphs(8);
    bottom.set_scroll_progress(1.0);
    let mut surface = Surface::new(64, 64).unwrap();
    for i in 0..30 {
        let t = at(i as f64 * 100.0, 100.0);
        run_frame(&mut top, t, &mut surface);
        run_frame(&mut bottom, t, &mut surface);
    }
    // a token that never mutated has accumulated the full 3000 ms
    let mutated = |g: &GlyphMatrix| g.field().visible().filter(|t| t.mutation_timer < 2999.0).count();
    let visible = top.field().visible().count();
    // at 3x churn every threshold is under 2.2 s
    assert_eq!(mutated(&top), visible);
    assert!(mutated(&bottom) < visible);
}

#[test]
fn drift_stays_within_one_tile() {
    let mut g = glyphs(1);
    for ms in [0.0, 10.0, 64.9, 65.0, 1e6] {
        g.advance(at(ms, 0.0));
        let d = g.drift();
        assert!((0.0..0.65).contains(&d), "drift {d} at {ms}");
    }
}

#[test]
fn glyph_matrix_clears_and_draws_faint_glyphs() {
    let mut g = glyphs(2);
    let mut surface = Surface::new(320, 240).unwrap();
    surface.fill(fx_core::Color::new(1.0, 0.0, 0.0, 1.0));
    run_frame(&mut g, at(0.0, 0.0), &mut surface);
    let max_alpha = surface.pixels().iter().map(|p| p.a).max().unwrap();
    assert!(max_alpha > 0);
    // opacity never exceeds 10%
    assert!(max_alpha <= 26);
}

#[test]
fn world_scale_matches_camera() {
    // 50 degree fov at z = 20 spans ~18.65 world units vertically
    let ppu = units_per_world(1865.0);
    assert!((ppu - 100.0).abs() < 0.5);
}

#[test]
fn effects_run_under_a_frame_loop() {
    let frames = FrameLoop::new();
    let surface = Rc::new(RefCell::new(Surface::new(400, 500).unwrap()));
    let effect: Rc<RefCell<Box<dyn Effect>>> = Rc::new(RefCell::new(Box::new(monitor())));
    let (s, e) = (surface.clone(), effect.clone());
    frames.start(move |time| run_frame(e.borrow_mut().as_mut(), time, &mut s.borrow_mut()));
    for i in 0..5 {
        assert!(frames.pump(i as f64 * 16.0));
    }
    frames.stop();
    assert!(!frames.pump(100.0));
    assert_eq!(effect.borrow().name(), "signal-monitor");
    assert!(surface.borrow().pixels().iter().any(|p| p.a > 0));
}
