//! Tuning constants for the effect engine.
//!
//! Most of these were tuned by eye; they are defaults for the `…Config`
//! structs, not semantics. Time-based rates are expressed per millisecond or
//! per reference frame (1000/60 ms) so that throttled hosts stay correct.

// Reference frame used to convert "per frame" tuning into time-based rates
pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;
pub const FRAMES_PER_MS: f32 = 60.0 / 1000.0;

// Pointer easing (fraction of the remaining distance per reference frame)
pub const POINTER_POSITION_EASE: f32 = 0.15;
pub const POINTER_ENGAGEMENT_EASE: f32 = 0.1;
pub const POINTER_PARK: [f32; 2] = [-1000.0, -1000.0]; // off-surface rest position

// Surface limits
pub const MAX_SURFACE_PIXELS: u64 = 8192 * 8192;
pub const MAX_DEVICE_PIXEL_RATIO: f32 = 2.0;

// Shared accent (rgb 74,158,255)
pub const ACCENT_RGB: [u8; 3] = [74, 158, 255];

// ---------------- Signal monitor ----------------
pub const MONITOR_WIDTH: f32 = 400.0;
pub const MONITOR_HEIGHT: f32 = 500.0;
pub const MONITOR_TRAIL_RGB: [u8; 3] = [10, 10, 10];
pub const MONITOR_TRAIL_ALPHA: f32 = 0.15; // per-frame fade of previous frames
pub const MONITOR_GRID_SPACING: f32 = 40.0;
pub const MONITOR_GRID_MARGIN: f32 = 20.0;
pub const MONITOR_MOTE_COUNT: usize = 30;
pub const MONITOR_MOTE_SPEED_PER_FRAME: f32 = 0.15; // max |v| per axis
pub const MONITOR_SCAN_SPEED_PER_FRAME: f32 = 1.5;
pub const MONITOR_SCAN_HALF_HEIGHT: f32 = 30.0;
pub const MONITOR_BAR_COUNT: usize = 12;
pub const MONITOR_CROSS_SIZE: f32 = 15.0;

// ---------------- Glyph matrix ----------------
pub const GLYPHS: &str = "01234567890ABCDEF#$:./-\\|_[]{}()<>+=*&%@!?~^";
pub const GLYPH_GRID_COLS: usize = 80;
pub const GLYPH_GRID_ROWS: usize = 55;
pub const GLYPH_TILE_SIZE: f32 = 0.35; // world units
pub const GLYPH_TILE_SPACING: f32 = 0.65; // world units
pub const GLYPH_DENSITY: f32 = 0.25;
pub const GLYPH_INTERVAL_MIN_MS: f32 = 1500.0;
pub const GLYPH_INTERVAL_MAX_MS: f32 = 6500.0;
pub const GLYPH_OPACITY_MIN: f32 = 0.03;
pub const GLYPH_OPACITY_MAX: f32 = 0.10;
pub const GLYPH_DRIFT_UNITS_PER_MS: f32 = 0.01;
pub const GLYPH_SCROLL_JITTER_BOOST: f32 = 2.0; // rate scale at scroll progress 0 is 1 + boost
pub const GLYPH_CAMERA_Z: f32 = 20.0;
pub const GLYPH_CAMERA_FOV_DEG: f32 = 50.0;
pub const GLYPH_RGB: [f32; 3] = [0.45, 0.55, 0.45];

// ---------------- Code lens ----------------
pub const LENS_COLUMNS: usize = 3;
pub const LENS_MIN_FONT_PX: f32 = 7.0;
pub const LENS_FONT_DIVISOR: f32 = 60.0;
pub const LENS_LINE_HEIGHT: f32 = 1.3;
pub const LENS_SCROLL_PER_FRAME: f32 = 0.5;
pub const LENS_SCROLL_THRESHOLD: f32 = 0.1; // engagement needed to scroll
pub const LENS_PAINT_THRESHOLD: f32 = 0.01; // engagement needed to paint
pub const LENS_RADIUS_FRACTION: f32 = 0.25;
pub const LENS_LAYER_OPACITY: f32 = 0.95;
pub const LENS_GLOW_SIZE: f32 = 15.0;
pub const LENS_BRACKET_SIZE: f32 = 12.0;
pub const LENS_BRACKET_OFFSET: f32 = 0.72; // fraction of radius
pub const LENS_BACKGROUND_RGB: [u8; 3] = [10, 10, 10];

// ---------------- Boot sequence ----------------
pub const BOOT_FLAG_KEY: &str = "hasBooted";
pub const BOOT_TOTAL_MS: u32 = 2000;
pub const BOOT_EXIT_FADE_MS: u32 = 800;

// ---------------- Carousel ----------------
pub const CAROUSEL_INTERVAL_MS: f32 = 4000.0;
