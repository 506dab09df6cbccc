//! Fixed-size sets of independently animated tokens.
//!
//! One `ParticleField` type covers the glyph tiles of the matrix background
//! (grid, mutating variants), the pulse dots of the monitor (grid, static) and
//! the drifting motes (scatter, moving with wrap-around).

use crate::error::FxError;
use glam::Vec2;
use rand::Rng;
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Layout {
    /// Row-major grid; token `i` sits at `origin + (i % cols, i / cols) * spacing`.
    Grid {
        cols: usize,
        rows: usize,
        origin: Vec2,
        spacing: Vec2,
    },
    /// Uniformly scattered inside `bounds`.
    Scatter { count: usize, bounds: Bounds },
}

impl Layout {
    pub fn count(&self) -> usize {
        match self {
            Layout::Grid { cols, rows, .. } => cols * rows,
            Layout::Scatter { count, .. } => *count,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub layout: Layout,
    /// Probability that a token is visible; fixed at creation.
    pub density: f32,
    /// Size of the variant set (glyph count); at least 1.
    pub variants: usize,
    /// Mutation interval range; `None` means tokens never mutate.
    pub interval_ms: Option<Range<f32>>,
    pub opacity: Range<f32>,
    pub size: Range<f32>,
    /// Max absolute velocity per axis in units per millisecond.
    pub max_speed: f32,
    /// Wrap positions around these bounds after moving.
    pub wrap: Option<Bounds>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Scatter {
                count: 0,
                bounds: Bounds {
                    width: 1.0,
                    height: 1.0,
                },
            },
            density: 1.0,
            variants: 1,
            interval_ms: None,
            opacity: 1.0..1.0,
            size: 1.0..1.0,
            max_speed: 0.0,
            wrap: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub position: Vec2,
    pub grid_index: Option<usize>,
    pub velocity: Vec2,
    pub size: f32,
    /// Random phase in \[0, 2π) used by pulsing renderers.
    pub phase: f32,
    pub visible: bool,
    pub variant: usize,
    pub mutation_timer: f32,
    pub mutation_interval: f32,
    pub opacity: f32,
}

#[derive(Clone, Debug)]
pub struct ParticleField {
    tokens: Vec<Token>,
    variants: usize,
    wrap: Option<Bounds>,
}

impl ParticleField {
    pub fn create(config: &FieldConfig, rng: &mut impl Rng) -> Result<Self, FxError> {
        if !(0.0..=1.0).contains(&config.density) {
            return Err(FxError::InvalidConfig("density must be within 0..=1"));
        }
        if config.variants == 0 {
            return Err(FxError::InvalidConfig("variant set is empty"));
        }
        if let Some(range) = &config.interval_ms {
            if range.start <= 0.0 || range.end < range.start {
                return Err(FxError::InvalidConfig("mutation interval must be positive"));
            }
        }

        let count = config.layout.count();
        let mut tokens = Vec::with_capacity(count);
        for i in 0..count {
            let (position, grid_index) = match &config.layout {
                Layout::Grid {
                    cols,
                    origin,
                    spacing,
                    ..
                } => {
                    let col = (i % cols) as f32;
                    let row = (i / cols) as f32;
                    (*origin + Vec2::new(col, row) * *spacing, Some(i))
                }
                Layout::Scatter { bounds, .. } => (
                    Vec2::new(
                        rng.gen::<f32>() * bounds.width,
                        rng.gen::<f32>() * bounds.height,
                    ),
                    None,
                ),
            };
            let velocity = if config.max_speed > 0.0 {
                Vec2::new(
                    (rng.gen::<f32>() - 0.5) * 2.0 * config.max_speed,
                    (rng.gen::<f32>() - 0.5) * 2.0 * config.max_speed,
                )
            } else {
                Vec2::ZERO
            };
            tokens.push(Token {
                position,
                grid_index,
                velocity,
                size: sample(rng, &config.size),
                phase: rng.gen::<f32>() * std::f32::consts::TAU,
                visible: rng.gen::<f32>() < config.density,
                variant: rng.gen_range(0..config.variants),
                mutation_timer: 0.0,
                mutation_interval: config
                    .interval_ms
                    .as_ref()
                    .map_or(f32::INFINITY, |r| sample(rng, r)),
                opacity: sample(rng, &config.opacity),
            });
        }

        let visible = tokens.iter().filter(|t| t.visible).count();
        log::debug!("[field] created {} tokens ({} visible)", count, visible);

        Ok(Self {
            tokens,
            variants: config.variants,
            wrap: config.wrap,
        })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.visible)
    }

    pub fn variants(&self) -> usize {
        self.variants
    }

    /// Move every token by its velocity and run the mutation timers of the
    /// visible ones. `rate_scale` divides the mutation threshold (2.0 means
    /// twice the churn) without touching accumulated time. Returns the number
    /// of tokens that changed variant.
    pub fn advance(&mut self, dt_ms: f32, rate_scale: f32, rng: &mut impl Rng) -> usize {
        let dt = dt_ms.max(0.0);
        let rate = if rate_scale > 0.0 {
            rate_scale
        } else {
            f32::MIN_POSITIVE
        };
        let mut mutated = 0;
        for token in &mut self.tokens {
            if token.velocity != Vec2::ZERO {
                token.position += token.velocity * dt;
                if let Some(bounds) = self.wrap {
                    wrap_position(&mut token.position, bounds);
                }
            }
            if !token.visible {
                continue;
            }
            token.mutation_timer += dt;
            if token.mutation_timer >= token.mutation_interval / rate {
                token.mutation_timer = 0.0;
                token.variant = rng.gen_range(0..self.variants);
                mutated += 1;
            }
        }
        mutated
    }
}

/// Screen-edge wrap: leaving one side re-enters at the opposite edge.
#[inline]
pub fn wrap_position(p: &mut Vec2, bounds: Bounds) {
    if p.x < 0.0 {
        p.x = bounds.width;
    } else if p.x > bounds.width {
        p.x = 0.0;
    }
    if p.y < 0.0 {
        p.y = bounds.height;
    } else if p.y > bounds.height {
        p.y = 0.0;
    }
}

#[inline]
fn sample(rng: &mut impl Rng, range: &Range<f32>) -> f32 {
    if range.end > range.start {
        rng.gen_range(range.clone())
    } else {
        range.start
    }
}
